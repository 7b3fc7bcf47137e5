//! Timetable entries and the slot conflict rule.
//!
//! The pre-check in this service turns an occupied slot into a 409 before
//! anything is written. The store write is still the authority: a racing
//! insert that wins the slot makes the loser's write fail with the same
//! conflict.

use anyhow::anyhow;
use axum::http::StatusCode;
use chrono::Utc;
use schoolhub_core::AppError;
use schoolhub_db::{Duplicate, StoreError, TenantStore};
use schoolhub_models::timetable::ensure_ordered;
use schoolhub_models::{ClassId, TimetableEntryId};
use tracing::{info, instrument, warn};

use super::model::{CreateTimetableEntryDto, TimetableEntry, UpdateTimetableEntryDto, Weekday};
use crate::metrics::track_timetable_conflict;
use crate::modules::classes::service::ClassService;
use crate::modules::teachers::service::TeacherService;

pub struct TimetableService;

fn slot_taken() -> AppError {
    track_timetable_conflict();
    StoreError::Conflict(Duplicate::TimetableSlot).into()
}

/// Counts conflicts the store reported on write, so lost races show up too.
fn on_write_error(err: StoreError) -> AppError {
    if err.is_conflict(Duplicate::TimetableSlot) {
        warn!("Timetable slot taken by a concurrent write");
        return slot_taken();
    }
    err.into()
}

impl TimetableService {
    async fn ensure_slot_free(
        tenant: &TenantStore,
        class_id: ClassId,
        day: Weekday,
        period: i32,
        excluding: Option<TimetableEntryId>,
    ) -> Result<(), AppError> {
        let occupant = tenant
            .find_slot_occupant(class_id, day, period, excluding)
            .await?;
        if let Some(occupant) = occupant {
            warn!(
                class.id = %class_id,
                ?day,
                period,
                occupant.id = %occupant.id,
                "Timetable slot already occupied"
            );
            return Err(slot_taken());
        }
        Ok(())
    }

    /// Entries of the school, optionally of one class, by day then period.
    #[instrument(skip(tenant), fields(school.id = %tenant.school_id()))]
    pub async fn list_entries(
        tenant: &TenantStore,
        class_id: Option<ClassId>,
    ) -> Result<Vec<TimetableEntry>, AppError> {
        let mut entries = tenant.list_entries(class_id).await?;
        entries.sort_by_key(|e| (e.day, e.period));
        Ok(entries)
    }

    #[instrument(skip(tenant), fields(school.id = %tenant.school_id()))]
    pub async fn get_entry(
        tenant: &TenantStore,
        id: TimetableEntryId,
    ) -> Result<TimetableEntry, AppError> {
        tenant
            .find_entry(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Timetable entry not found")))
    }

    #[instrument(skip(tenant, dto), fields(school.id = %tenant.school_id(), class.id = %dto.class_id))]
    pub async fn create_entry(
        tenant: &TenantStore,
        dto: CreateTimetableEntryDto,
    ) -> Result<TimetableEntry, AppError> {
        ClassService::get_class(tenant, dto.class_id).await?;
        if let Some(teacher_id) = dto.teacher_id {
            TeacherService::ensure_assignable(tenant, teacher_id).await?;
        }
        Self::ensure_slot_free(tenant, dto.class_id, dto.day, dto.period, None).await?;

        let now = Utc::now();
        let entry = TimetableEntry {
            id: TimetableEntryId::new(),
            school_id: tenant.school_id().clone(),
            class_id: dto.class_id,
            day: dto.day,
            period: dto.period,
            subject: dto.subject,
            teacher_id: dto.teacher_id,
            start_time: dto.start_time,
            end_time: dto.end_time,
            room: dto.room,
            created_at: now,
            updated_at: now,
        };
        let entry = tenant.insert_entry(entry).await.map_err(on_write_error)?;

        info!(entry.id = %entry.id, "Timetable entry created");
        Ok(entry)
    }

    /// Applies a partial update. The slot is only re-checked when the day
    /// or period actually changes.
    #[instrument(skip(tenant, dto), fields(school.id = %tenant.school_id()))]
    pub async fn update_entry(
        tenant: &TenantStore,
        id: TimetableEntryId,
        dto: UpdateTimetableEntryDto,
    ) -> Result<TimetableEntry, AppError> {
        let mut entry = Self::get_entry(tenant, id).await?;

        if let Some(teacher_id) = dto.teacher_id {
            TeacherService::ensure_assignable(tenant, teacher_id).await?;
        }
        if dto.moves_slot(&entry) {
            let day = dto.day.unwrap_or(entry.day);
            let period = dto.period.unwrap_or(entry.period);
            Self::ensure_slot_free(tenant, entry.class_id, day, period, Some(id)).await?;
        }

        dto.apply(&mut entry);
        ensure_ordered(entry.start_time, entry.end_time).map_err(|e| {
            let message = e
                .message
                .map(|m| m.to_string())
                .unwrap_or_else(|| "endTime must be after startTime".to_string());
            AppError::new(StatusCode::UNPROCESSABLE_ENTITY, anyhow!(message))
        })?;
        entry.updated_at = Utc::now();

        tenant.update_entry(&entry).await.map_err(on_write_error)?;

        info!(entry.id = %id, "Timetable entry updated");
        Ok(entry)
    }

    #[instrument(skip(tenant), fields(school.id = %tenant.school_id()))]
    pub async fn delete_entry(tenant: &TenantStore, id: TimetableEntryId) -> Result<(), AppError> {
        Self::get_entry(tenant, id).await?;
        tenant.delete_entry(id).await?;
        info!(entry.id = %id, "Timetable entry deleted");
        Ok(())
    }
}
