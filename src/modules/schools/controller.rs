use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use schoolhub_core::AppError;
use schoolhub_models::SchoolId;
use tracing::instrument;

use super::model::{
    CreateSchoolAdminDto, DeactivateSchoolResponse, School, SchoolAdminCreatedResponse,
    UpdateSchoolDto,
};
use super::service::SchoolService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::require_school_access;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/schools",
    responses(
        (status = 200, description = "Active schools sorted by name", body = Vec<School>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - super-admin only", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Schools"
)]
#[instrument(skip_all)]
pub async fn get_schools(State(state): State<AppState>) -> Result<Json<Vec<School>>, AppError> {
    let schools = SchoolService::list_schools(state.store.as_ref()).await?;
    Ok(Json(schools))
}

#[utoipa::path(
    get,
    path = "/api/schools/{schoolId}",
    params(
        ("schoolId" = String, Path, description = "School code")
    ),
    responses(
        (status = 200, description = "School details", body = School),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - not your school", body = ErrorResponse),
        (status = 404, description = "School not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Schools"
)]
#[instrument(skip_all, fields(school.id = %school_id))]
pub async fn get_school(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(school_id): Path<SchoolId>,
) -> Result<Json<School>, AppError> {
    require_school_access(&auth_user.0, &school_id)?;
    let school = SchoolService::get_school(state.store.as_ref(), &school_id).await?;
    Ok(Json(school))
}

#[utoipa::path(
    put,
    path = "/api/schools/{schoolId}",
    params(
        ("schoolId" = String, Path, description = "School code")
    ),
    request_body = UpdateSchoolDto,
    responses(
        (status = 200, description = "School updated", body = School),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "School not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Schools"
)]
#[instrument(skip_all, fields(school.id = %school_id))]
pub async fn update_school(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(school_id): Path<SchoolId>,
    ValidatedJson(dto): ValidatedJson<UpdateSchoolDto>,
) -> Result<Json<School>, AppError> {
    require_school_access(&auth_user.0, &school_id)?;
    let school = SchoolService::update_school(state.store.as_ref(), &school_id, dto).await?;
    Ok(Json(school))
}

#[utoipa::path(
    delete,
    path = "/api/schools/{schoolId}",
    params(
        ("schoolId" = String, Path, description = "School code")
    ),
    responses(
        (status = 200, description = "School and its accounts deactivated", body = DeactivateSchoolResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - super-admin only", body = ErrorResponse),
        (status = 404, description = "School not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Schools"
)]
#[instrument(skip_all, fields(school.id = %school_id))]
pub async fn delete_school(
    State(state): State<AppState>,
    Path(school_id): Path<SchoolId>,
) -> Result<Json<DeactivateSchoolResponse>, AppError> {
    let response = SchoolService::deactivate_school(state.store.as_ref(), &school_id).await?;
    Ok(Json(response))
}

/// Add an admin to an existing school (super-admin only)
///
/// Credentials are generated and sent to the new admin by email.
#[utoipa::path(
    post,
    path = "/api/schools/{schoolId}/admins",
    params(
        ("schoolId" = String, Path, description = "School code")
    ),
    request_body = CreateSchoolAdminDto,
    responses(
        (status = 201, description = "Admin created", body = SchoolAdminCreatedResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - super-admin only", body = ErrorResponse),
        (status = 404, description = "School not found", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Schools"
)]
#[instrument(skip_all, fields(school.id = %school_id))]
pub async fn create_school_admin(
    State(state): State<AppState>,
    Path(school_id): Path<SchoolId>,
    ValidatedJson(dto): ValidatedJson<CreateSchoolAdminDto>,
) -> Result<(StatusCode, Json<SchoolAdminCreatedResponse>), AppError> {
    let response = SchoolService::create_admin(&state, &school_id, dto).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
