use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::ids::{AttendanceId, ClassId, PrincipalId, SchoolId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "attendance_status", rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: AttendanceId,
    pub school_id: SchoolId,
    pub class_id: ClassId,
    pub student_id: PrincipalId,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
    pub marked_by: PrincipalId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Attendance {
    pub fn new(
        school_id: SchoolId,
        class_id: ClassId,
        date: NaiveDate,
        mark: AttendanceMark,
        marked_by: PrincipalId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: AttendanceId::new(),
            school_id,
            class_id,
            student_id: mark.student_id,
            date,
            status: mark.status,
            remarks: mark.remarks,
            marked_by,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceMark {
    pub student_id: PrincipalId,
    pub status: AttendanceStatus,
    #[validate(length(max = 500))]
    pub remarks: Option<String>,
}

/// Body of `POST /api/attendance/mark`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceDto {
    pub class_id: ClassId,
    pub date: NaiveDate,
    #[serde(alias = "attendanceData")]
    #[validate(length(min = 1, message = "records must not be empty"), nested)]
    pub records: Vec<AttendanceMark>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttendanceDto {
    pub status: Option<AttendanceStatus>,
    #[validate(length(max = 500))]
    pub remarks: Option<String>,
}

impl UpdateAttendanceDto {
    pub fn apply(self, record: &mut Attendance) {
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(remarks) = self.remarks {
            record.remarks = Some(remarks);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceResponse {
    pub message: String,
    pub records: Vec<Attendance>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ClassAttendanceQuery {
    /// Day to report; defaults to today.
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StudentAttendanceQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_attendance_data_alias() {
        let dto: MarkAttendanceDto = serde_json::from_value(json!({
            "classId": ClassId::new(),
            "date": "2024-10-01",
            "attendanceData": [
                { "studentId": PrincipalId::new(), "status": "present" },
                { "studentId": PrincipalId::new(), "status": "late", "remarks": "bus" }
            ]
        }))
        .unwrap();
        assert_eq!(dto.records.len(), 2);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn empty_records_fail_validation() {
        let dto: MarkAttendanceDto = serde_json::from_value(json!({
            "classId": ClassId::new(),
            "date": "2024-10-01",
            "records": []
        }))
        .unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn record_remarks_are_validated() {
        let dto = MarkAttendanceDto {
            class_id: ClassId::new(),
            date: NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
            records: vec![AttendanceMark {
                student_id: PrincipalId::new(),
                status: AttendanceStatus::Absent,
                remarks: Some("x".repeat(501)),
            }],
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.errors().contains_key("records"));
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(serde_json::from_value::<AttendanceStatus>(json!("excused")).is_err());
    }
}
