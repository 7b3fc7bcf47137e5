//! Timetable models.
//!
//! A timetable entry occupies a slot `(school, class, day, period)`. No two
//! entries may share a slot.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::ids::{ClassId, PrincipalId, SchoolId, TimetableEntryId};

/// School days. Ordering follows the week, so sorting entries by day works.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
    ToSchema,
)]
#[sqlx(type_name = "weekday")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

/// `HH:MM` on the wire; `HH:MM:SS` is accepted on input.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(s: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(s, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
            .ok()
    }

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid time: {}", raw)))
    }

    pub mod option {
        use chrono::NaiveTime;
        use serde::{Deserialize, Deserializer};

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveTime>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid time: {}", raw))),
                None => Ok(None),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEntry {
    pub id: TimetableEntryId,
    pub school_id: SchoolId,
    pub class_id: ClassId,
    pub day: Weekday,
    pub period: i32,
    pub subject: String,
    pub teacher_id: Option<PrincipalId>,
    #[serde(with = "hhmm")]
    #[schema(value_type = String, example = "09:00")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    #[schema(value_type = String, example = "09:45")]
    pub end_time: NaiveTime,
    pub room: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The uniqueness key of a timetable entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimetableSlot {
    pub school_id: SchoolId,
    pub class_id: ClassId,
    pub day: Weekday,
    pub period: i32,
}

impl TimetableEntry {
    pub fn slot(&self) -> TimetableSlot {
        TimetableSlot {
            school_id: self.school_id.clone(),
            class_id: self.class_id,
            day: self.day,
            period: self.period,
        }
    }
}

fn validate_create_times(dto: &CreateTimetableEntryDto) -> Result<(), ValidationError> {
    ensure_ordered(dto.start_time, dto.end_time)
}

pub fn ensure_ordered(start: NaiveTime, end: NaiveTime) -> Result<(), ValidationError> {
    if end > start {
        Ok(())
    } else {
        Err(ValidationError::new("time_range")
            .with_message("endTime must be after startTime".into()))
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_create_times"))]
pub struct CreateTimetableEntryDto {
    pub class_id: ClassId,
    pub day: Weekday,
    #[validate(range(min = 1, max = 20, message = "period must be between 1 and 20"))]
    pub period: i32,
    #[validate(length(min = 1, max = 100, message = "subject is required"))]
    pub subject: String,
    pub teacher_id: Option<PrincipalId>,
    #[serde(deserialize_with = "hhmm::deserialize")]
    #[schema(value_type = String, example = "09:00")]
    pub start_time: NaiveTime,
    #[serde(deserialize_with = "hhmm::deserialize")]
    #[schema(value_type = String, example = "09:45")]
    pub end_time: NaiveTime,
    #[validate(length(min = 1, max = 50))]
    pub room: Option<String>,
}

/// Partial update. The class of an entry cannot change; move it by deleting
/// and re-creating.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTimetableEntryDto {
    pub day: Option<Weekday>,
    #[validate(range(min = 1, max = 20, message = "period must be between 1 and 20"))]
    pub period: Option<i32>,
    #[validate(length(min = 1, max = 100))]
    pub subject: Option<String>,
    pub teacher_id: Option<PrincipalId>,
    #[serde(default, deserialize_with = "hhmm::option::deserialize")]
    #[schema(value_type = Option<String>, example = "09:00")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, deserialize_with = "hhmm::option::deserialize")]
    #[schema(value_type = Option<String>, example = "09:45")]
    pub end_time: Option<NaiveTime>,
    #[validate(length(min = 1, max = 50))]
    pub room: Option<String>,
}

impl UpdateTimetableEntryDto {
    /// True when the update moves the entry to a different day or period.
    pub fn moves_slot(&self, current: &TimetableEntry) -> bool {
        let day_changes = self.day.is_some_and(|day| day != current.day);
        let period_changes = self.period.is_some_and(|period| period != current.period);
        day_changes || period_changes
    }

    pub fn apply(self, entry: &mut TimetableEntry) {
        if let Some(v) = self.day {
            entry.day = v;
        }
        if let Some(v) = self.period {
            entry.period = v;
        }
        if let Some(v) = self.subject {
            entry.subject = v;
        }
        if let Some(v) = self.teacher_id {
            entry.teacher_id = Some(v);
        }
        if let Some(v) = self.start_time {
            entry.start_time = v;
        }
        if let Some(v) = self.end_time {
            entry.end_time = v;
        }
        if let Some(v) = self.room {
            entry.room = Some(v);
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TimetableQuery {
    /// Only entries of this class.
    pub class_id: Option<ClassId>,
}
