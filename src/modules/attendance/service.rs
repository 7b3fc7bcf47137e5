use std::collections::HashSet;

use anyhow::anyhow;
use chrono::{NaiveDate, Utc};
use schoolhub_config::AttendancePolicy;
use schoolhub_core::{AppError, Role};
use schoolhub_db::TenantStore;
use schoolhub_models::principals::Principal;
use schoolhub_models::{AttendanceId, ClassId, PrincipalId};
use tracing::{info, instrument, warn};

use super::model::{Attendance, MarkAttendanceDto, UpdateAttendanceDto};
use crate::modules::classes::service::ClassService;

pub struct AttendanceService;

impl AttendanceService {
    async fn ensure_student(tenant: &TenantStore, id: PrincipalId) -> Result<(), AppError> {
        let found = tenant
            .find_principal(id, Role::Student)
            .await?
            .is_some_and(|p| p.is_active);
        if found {
            Ok(())
        } else {
            warn!(student.id = %id, "Student not in this school");
            Err(AppError::not_found(anyhow!("Student not found")))
        }
    }

    /// Records one mark per student for the day.
    ///
    /// With [`AttendancePolicy::Upsert`] a repeated mark replaces the earlier
    /// record for the same student, class and date; with
    /// [`AttendancePolicy::Append`] every mark is kept.
    #[instrument(skip(tenant, marked_by, dto), fields(school.id = %tenant.school_id(), class.id = %dto.class_id))]
    pub async fn mark_attendance(
        tenant: &TenantStore,
        marked_by: &Principal,
        dto: MarkAttendanceDto,
        policy: AttendancePolicy,
    ) -> Result<Vec<Attendance>, AppError> {
        ClassService::get_class(tenant, dto.class_id).await?;

        let mut checked = HashSet::new();
        for mark in &dto.records {
            if checked.insert(mark.student_id) {
                Self::ensure_student(tenant, mark.student_id).await?;
            }
        }

        let records = dto
            .records
            .into_iter()
            .map(|mark| {
                Attendance::new(
                    tenant.school_id().clone(),
                    dto.class_id,
                    dto.date,
                    mark,
                    marked_by.id,
                )
            })
            .collect();

        let saved = tenant.record_attendance(records, policy).await?;
        info!(count = saved.len(), date = %dto.date, "Attendance marked");
        Ok(saved)
    }

    #[instrument(skip(tenant), fields(school.id = %tenant.school_id()))]
    pub async fn class_attendance(
        tenant: &TenantStore,
        class_id: ClassId,
        date: Option<NaiveDate>,
    ) -> Result<Vec<Attendance>, AppError> {
        ClassService::get_class(tenant, class_id).await?;
        let date = date.unwrap_or_else(|| Utc::now().date_naive());
        Ok(tenant.list_class_attendance(class_id, date).await?)
    }

    /// Records of one student, newest first.
    #[instrument(skip(tenant), fields(school.id = %tenant.school_id()))]
    pub async fn student_attendance(
        tenant: &TenantStore,
        student_id: PrincipalId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Attendance>, AppError> {
        if let (Some(from), Some(to)) = (from, to)
            && from > to
        {
            return Err(AppError::bad_request(anyhow!(
                "startDate must not be after endDate"
            )));
        }
        Self::ensure_student(tenant, student_id).await?;
        Ok(tenant.list_student_attendance(student_id, from, to).await?)
    }

    #[instrument(skip(tenant, dto), fields(school.id = %tenant.school_id()))]
    pub async fn update_attendance(
        tenant: &TenantStore,
        id: AttendanceId,
        dto: UpdateAttendanceDto,
    ) -> Result<Attendance, AppError> {
        let mut record = tenant
            .find_attendance(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Attendance record not found")))?;

        dto.apply(&mut record);
        record.updated_at = Utc::now();
        tenant.update_attendance(&record).await?;

        info!(attendance.id = %id, "Attendance updated");
        Ok(record)
    }
}
