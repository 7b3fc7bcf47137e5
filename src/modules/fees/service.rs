use anyhow::anyhow;
use axum::http::StatusCode;
use chrono::Utc;
use schoolhub_core::{AppError, Role};
use schoolhub_db::TenantStore;
use schoolhub_models::{ClassId, FeeId, PrincipalId};
use tracing::{info, instrument};

use super::model::{CreateFeeDto, Fee, FeeSummary, UpdateFeeDto};
use crate::modules::classes::service::ClassService;

pub struct FeeService;

impl FeeService {
    async fn ensure_student(tenant: &TenantStore, id: PrincipalId) -> Result<(), AppError> {
        tenant
            .find_principal(id, Role::Student)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))
    }

    #[instrument(skip(tenant), fields(school.id = %tenant.school_id()))]
    pub async fn class_fees(tenant: &TenantStore, class_id: ClassId) -> Result<Vec<Fee>, AppError> {
        ClassService::get_class(tenant, class_id).await?;
        Ok(tenant.list_class_fees(class_id).await?)
    }

    #[instrument(skip(tenant), fields(school.id = %tenant.school_id()))]
    pub async fn student_fees(
        tenant: &TenantStore,
        student_id: PrincipalId,
    ) -> Result<Vec<Fee>, AppError> {
        Self::ensure_student(tenant, student_id).await?;
        Ok(tenant.list_student_fees(student_id).await?)
    }

    #[instrument(skip(tenant), fields(school.id = %tenant.school_id()))]
    pub async fn get_fee(tenant: &TenantStore, id: FeeId) -> Result<Fee, AppError> {
        tenant
            .find_fee(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Fee not found")))
    }

    #[instrument(skip(tenant, dto), fields(school.id = %tenant.school_id(), student.id = %dto.student_id))]
    pub async fn create_fee(tenant: &TenantStore, dto: CreateFeeDto) -> Result<Fee, AppError> {
        Self::ensure_student(tenant, dto.student_id).await?;
        ClassService::get_class(tenant, dto.class_id).await?;

        let fee = tenant
            .insert_fee(dto.into_fee(tenant.school_id().clone()))
            .await?;
        info!(fee.id = %fee.id, amount = fee.amount, "Fee created");
        Ok(fee)
    }

    /// Applies a partial update, then re-checks the payment rules against
    /// the merged record.
    #[instrument(skip(tenant, dto), fields(school.id = %tenant.school_id()))]
    pub async fn update_fee(
        tenant: &TenantStore,
        id: FeeId,
        dto: UpdateFeeDto,
    ) -> Result<Fee, AppError> {
        let mut fee = Self::get_fee(tenant, id).await?;
        dto.apply(&mut fee);

        fee.validate_payment().map_err(|e| {
            let message = e
                .message
                .map(|m| m.to_string())
                .unwrap_or_else(|| "Invalid payment details".to_string());
            AppError::new(StatusCode::UNPROCESSABLE_ENTITY, anyhow!(message))
        })?;

        fee.updated_at = Utc::now();
        tenant.update_fee(&fee).await?;

        info!(fee.id = %id, status = ?fee.status, "Fee updated");
        Ok(fee)
    }

    #[instrument(skip(tenant), fields(school.id = %tenant.school_id()))]
    pub async fn delete_fee(tenant: &TenantStore, id: FeeId) -> Result<(), AppError> {
        Self::get_fee(tenant, id).await?;
        tenant.delete_fee(id).await?;
        info!(fee.id = %id, "Fee deleted");
        Ok(())
    }

    #[instrument(skip(tenant), fields(school.id = %tenant.school_id()))]
    pub async fn class_summary(
        tenant: &TenantStore,
        class_id: ClassId,
    ) -> Result<FeeSummary, AppError> {
        let fees = Self::class_fees(tenant, class_id).await?;
        Ok(FeeSummary::from_fees(&fees))
    }
}
