use axum::{Json, extract::Path, http::StatusCode};
use schoolhub_core::AppError;
use schoolhub_models::{ClassId, FeeId, PrincipalId};
use tracing::instrument;

use super::model::{CreateFeeDto, Fee, FeeSummary, UpdateFeeDto};
use super::service::FeeService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::require_staff_or_self;
use crate::middleware::tenant::Tenant;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::MessageResponse;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/fees/class/{classId}",
    params(
        ("classId" = ClassId, Path, description = "Class ID"),
        crate::middleware::tenant::SchoolScopeQuery
    ),
    responses(
        (status = 200, description = "Fees of the class", body = Vec<Fee>),
        (status = 403, description = "Forbidden - staff only", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Fees"
)]
#[instrument(skip_all, fields(class.id = %class_id))]
pub async fn get_class_fees(
    Tenant(tenant): Tenant,
    Path(class_id): Path<ClassId>,
) -> Result<Json<Vec<Fee>>, AppError> {
    Ok(Json(FeeService::class_fees(&tenant, class_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/fees/student/{studentId}",
    params(
        ("studentId" = PrincipalId, Path, description = "Student ID"),
        crate::middleware::tenant::SchoolScopeQuery
    ),
    responses(
        (status = 200, description = "Fees of the student", body = Vec<Fee>),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Fees"
)]
#[instrument(skip_all, fields(student.id = %student_id))]
pub async fn get_student_fees(
    auth_user: AuthUser,
    Tenant(tenant): Tenant,
    Path(student_id): Path<PrincipalId>,
) -> Result<Json<Vec<Fee>>, AppError> {
    require_staff_or_self(&auth_user.0, student_id)?;
    Ok(Json(FeeService::student_fees(&tenant, student_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/fees",
    params(crate::middleware::tenant::SchoolScopeQuery),
    request_body = CreateFeeDto,
    responses(
        (status = 201, description = "Fee created", body = Fee),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Student or class not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Fees"
)]
#[instrument(skip_all)]
pub async fn create_fee(
    Tenant(tenant): Tenant,
    ValidatedJson(dto): ValidatedJson<CreateFeeDto>,
) -> Result<(StatusCode, Json<Fee>), AppError> {
    let fee = FeeService::create_fee(&tenant, dto).await?;
    Ok((StatusCode::CREATED, Json(fee)))
}

#[utoipa::path(
    put,
    path = "/api/fees/{id}",
    params(
        ("id" = FeeId, Path, description = "Fee ID"),
        crate::middleware::tenant::SchoolScopeQuery
    ),
    request_body = UpdateFeeDto,
    responses(
        (status = 200, description = "Fee updated", body = Fee),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Fee not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Fees"
)]
#[instrument(skip_all, fields(fee.id = %id))]
pub async fn update_fee(
    Tenant(tenant): Tenant,
    Path(id): Path<FeeId>,
    ValidatedJson(dto): ValidatedJson<UpdateFeeDto>,
) -> Result<Json<Fee>, AppError> {
    Ok(Json(FeeService::update_fee(&tenant, id, dto).await?))
}

#[utoipa::path(
    delete,
    path = "/api/fees/{id}",
    params(
        ("id" = FeeId, Path, description = "Fee ID"),
        crate::middleware::tenant::SchoolScopeQuery
    ),
    responses(
        (status = 200, description = "Fee deleted", body = MessageResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Fee not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Fees"
)]
#[instrument(skip_all, fields(fee.id = %id))]
pub async fn delete_fee(
    Tenant(tenant): Tenant,
    Path(id): Path<FeeId>,
) -> Result<Json<MessageResponse>, AppError> {
    FeeService::delete_fee(&tenant, id).await?;
    Ok(Json(MessageResponse::new("Fee deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/fees/summary/class/{classId}",
    params(
        ("classId" = ClassId, Path, description = "Class ID"),
        crate::middleware::tenant::SchoolScopeQuery
    ),
    responses(
        (status = 200, description = "Totals and status counts", body = FeeSummary),
        (status = 403, description = "Forbidden - staff only", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Fees"
)]
#[instrument(skip_all, fields(class.id = %class_id))]
pub async fn get_fee_summary(
    Tenant(tenant): Tenant,
    Path(class_id): Path<ClassId>,
) -> Result<Json<FeeSummary>, AppError> {
    Ok(Json(FeeService::class_summary(&tenant, class_id).await?))
}
