use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use schoolhub_core::AppError;
use schoolhub_models::PrincipalId;
use tracing::instrument;

use super::model::{CreateStudentDto, PrincipalProfile, StudentCreatedResponse, UpdateStudentDto};
use super::service::StudentService;
use crate::middleware::tenant::Tenant;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::MessageResponse;
use crate::state::AppState;
use crate::validator::ProvisionForm;

#[utoipa::path(
    get,
    path = "/api/admin/students",
    params(crate::middleware::tenant::SchoolScopeQuery),
    responses(
        (status = 200, description = "Students of the school", body = Vec<PrincipalProfile>),
        (status = 400, description = "schoolId missing for super-admin", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip_all)]
pub async fn get_students(
    Tenant(tenant): Tenant,
) -> Result<Json<Vec<PrincipalProfile>>, AppError> {
    let students = StudentService::list_students(&tenant).await?;
    Ok(Json(students.into_iter().map(PrincipalProfile::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/admin/students/{id}",
    params(
        ("id" = PrincipalId, Path, description = "Student ID"),
        crate::middleware::tenant::SchoolScopeQuery
    ),
    responses(
        (status = 200, description = "Student details", body = PrincipalProfile),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip_all, fields(principal.id = %id))]
pub async fn get_student(
    Tenant(tenant): Tenant,
    Path(id): Path<PrincipalId>,
) -> Result<Json<PrincipalProfile>, AppError> {
    let student = StudentService::get_student(&tenant, id).await?;
    Ok(Json(student.into()))
}

/// Create a student with generated credentials
///
/// The login id is derived from `admissionYear`, defaulting to the current year.
#[utoipa::path(
    post,
    path = "/api/admin/students",
    params(crate::middleware::tenant::SchoolScopeQuery),
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student created", body = StudentCreatedResponse),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse),
        (status = 409, description = "Email or admission number already in use", body = ErrorResponse),
        (status = 422, description = "Validation error or rejected image", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip_all)]
pub async fn create_student(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    form: ProvisionForm<CreateStudentDto>,
) -> Result<(StatusCode, Json<StudentCreatedResponse>), AppError> {
    let (student, credentials) =
        StudentService::create_student(&state, &tenant, form.data, form.image).await?;
    Ok((
        StatusCode::CREATED,
        Json(StudentCreatedResponse {
            student: student.into(),
            credentials,
        }),
    ))
}

/// Update a student
///
/// Multipart requests may carry an `image` part that replaces the current image.
#[utoipa::path(
    put,
    path = "/api/admin/students/{id}",
    params(
        ("id" = PrincipalId, Path, description = "Student ID"),
        crate::middleware::tenant::SchoolScopeQuery
    ),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated", body = PrincipalProfile),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse),
        (status = 422, description = "Validation error or rejected image", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip_all, fields(principal.id = %id))]
pub async fn update_student(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Path(id): Path<PrincipalId>,
    form: ProvisionForm<UpdateStudentDto>,
) -> Result<Json<PrincipalProfile>, AppError> {
    let student = StudentService::update_student(&state, &tenant, id, form.data, form.image).await?;
    Ok(Json(student.into()))
}

#[utoipa::path(
    delete,
    path = "/api/admin/students/{id}",
    params(
        ("id" = PrincipalId, Path, description = "Student ID"),
        crate::middleware::tenant::SchoolScopeQuery
    ),
    responses(
        (status = 200, description = "Student deactivated", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip_all, fields(principal.id = %id))]
pub async fn delete_student(
    Tenant(tenant): Tenant,
    Path(id): Path<PrincipalId>,
) -> Result<Json<MessageResponse>, AppError> {
    StudentService::deactivate_student(&tenant, id).await?;
    Ok(Json(MessageResponse::new("Student deleted successfully")))
}
