use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use schoolhub_core::AppError;
use schoolhub_models::PrincipalId;
use tracing::instrument;

use super::model::{CreateTeacherDto, PrincipalProfile, TeacherCreatedResponse, UpdateTeacherDto};
use super::service::TeacherService;
use crate::middleware::tenant::Tenant;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::MessageResponse;
use crate::state::AppState;
use crate::validator::ProvisionForm;

#[utoipa::path(
    get,
    path = "/api/admin/teachers",
    params(crate::middleware::tenant::SchoolScopeQuery),
    responses(
        (status = 200, description = "Teachers of the school", body = Vec<PrincipalProfile>),
        (status = 400, description = "schoolId missing for super-admin", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Teachers"
)]
#[instrument(skip_all)]
pub async fn get_teachers(
    Tenant(tenant): Tenant,
) -> Result<Json<Vec<PrincipalProfile>>, AppError> {
    let teachers = TeacherService::list_teachers(&tenant).await?;
    Ok(Json(teachers.into_iter().map(PrincipalProfile::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/admin/teachers/{id}",
    params(
        ("id" = PrincipalId, Path, description = "Teacher ID"),
        crate::middleware::tenant::SchoolScopeQuery
    ),
    responses(
        (status = 200, description = "Teacher details", body = PrincipalProfile),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Teachers"
)]
#[instrument(skip_all, fields(principal.id = %id))]
pub async fn get_teacher(
    Tenant(tenant): Tenant,
    Path(id): Path<PrincipalId>,
) -> Result<Json<PrincipalProfile>, AppError> {
    let teacher = TeacherService::get_teacher(&tenant, id).await?;
    Ok(Json(teacher.into()))
}

/// Create a teacher with generated credentials
///
/// Accepts JSON, or multipart with a `data` JSON part and an optional `image`.
#[utoipa::path(
    post,
    path = "/api/admin/teachers",
    params(crate::middleware::tenant::SchoolScopeQuery),
    request_body = CreateTeacherDto,
    responses(
        (status = 201, description = "Teacher created", body = TeacherCreatedResponse),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse),
        (status = 422, description = "Validation error or rejected image", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Teachers"
)]
#[instrument(skip_all)]
pub async fn create_teacher(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    form: ProvisionForm<CreateTeacherDto>,
) -> Result<(StatusCode, Json<TeacherCreatedResponse>), AppError> {
    let (teacher, credentials) =
        TeacherService::create_teacher(&state, &tenant, form.data, form.image).await?;
    Ok((
        StatusCode::CREATED,
        Json(TeacherCreatedResponse {
            teacher: teacher.into(),
            credentials,
        }),
    ))
}

/// Update a teacher
///
/// Multipart requests may carry an `image` part that replaces the current image.
#[utoipa::path(
    put,
    path = "/api/admin/teachers/{id}",
    params(
        ("id" = PrincipalId, Path, description = "Teacher ID"),
        crate::middleware::tenant::SchoolScopeQuery
    ),
    request_body = UpdateTeacherDto,
    responses(
        (status = 200, description = "Teacher updated", body = PrincipalProfile),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse),
        (status = 422, description = "Validation error or rejected image", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Teachers"
)]
#[instrument(skip_all, fields(principal.id = %id))]
pub async fn update_teacher(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Path(id): Path<PrincipalId>,
    form: ProvisionForm<UpdateTeacherDto>,
) -> Result<Json<PrincipalProfile>, AppError> {
    let teacher = TeacherService::update_teacher(&state, &tenant, id, form.data, form.image).await?;
    Ok(Json(teacher.into()))
}

#[utoipa::path(
    delete,
    path = "/api/admin/teachers/{id}",
    params(
        ("id" = PrincipalId, Path, description = "Teacher ID"),
        crate::middleware::tenant::SchoolScopeQuery
    ),
    responses(
        (status = 200, description = "Teacher deactivated", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Teachers"
)]
#[instrument(skip_all, fields(principal.id = %id))]
pub async fn delete_teacher(
    Tenant(tenant): Tenant,
    Path(id): Path<PrincipalId>,
) -> Result<Json<MessageResponse>, AppError> {
    TeacherService::deactivate_teacher(&tenant, id).await?;
    Ok(Json(MessageResponse::new("Teacher deleted successfully")))
}
