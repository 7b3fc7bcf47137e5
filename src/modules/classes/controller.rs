use axum::{Json, extract::Path, http::StatusCode};
use schoolhub_core::AppError;
use schoolhub_models::ClassId;
use tracing::instrument;

use super::model::{Class, CreateClassDto, UpdateClassDto};
use super::service::ClassService;
use crate::middleware::tenant::Tenant;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::MessageResponse;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/admin/classes",
    params(crate::middleware::tenant::SchoolScopeQuery),
    responses(
        (status = 200, description = "Classes of the school", body = Vec<Class>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Classes"
)]
#[instrument(skip_all)]
pub async fn get_classes(Tenant(tenant): Tenant) -> Result<Json<Vec<Class>>, AppError> {
    Ok(Json(ClassService::list_classes(&tenant).await?))
}

#[utoipa::path(
    get,
    path = "/api/admin/classes/{id}",
    params(
        ("id" = ClassId, Path, description = "Class ID"),
        crate::middleware::tenant::SchoolScopeQuery
    ),
    responses(
        (status = 200, description = "Class details", body = Class),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Classes"
)]
#[instrument(skip_all, fields(class.id = %id))]
pub async fn get_class(
    Tenant(tenant): Tenant,
    Path(id): Path<ClassId>,
) -> Result<Json<Class>, AppError> {
    Ok(Json(ClassService::get_class(&tenant, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/admin/classes",
    params(crate::middleware::tenant::SchoolScopeQuery),
    request_body = CreateClassDto,
    responses(
        (status = 201, description = "Class created", body = Class),
        (status = 400, description = "Teacher does not belong to this school", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Classes"
)]
#[instrument(skip_all)]
pub async fn create_class(
    Tenant(tenant): Tenant,
    ValidatedJson(dto): ValidatedJson<CreateClassDto>,
) -> Result<(StatusCode, Json<Class>), AppError> {
    let class = ClassService::create_class(&tenant, dto).await?;
    Ok((StatusCode::CREATED, Json(class)))
}

#[utoipa::path(
    put,
    path = "/api/admin/classes/{id}",
    params(
        ("id" = ClassId, Path, description = "Class ID"),
        crate::middleware::tenant::SchoolScopeQuery
    ),
    request_body = UpdateClassDto,
    responses(
        (status = 200, description = "Class updated", body = Class),
        (status = 400, description = "Teacher does not belong to this school", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Classes"
)]
#[instrument(skip_all, fields(class.id = %id))]
pub async fn update_class(
    Tenant(tenant): Tenant,
    Path(id): Path<ClassId>,
    ValidatedJson(dto): ValidatedJson<UpdateClassDto>,
) -> Result<Json<Class>, AppError> {
    Ok(Json(ClassService::update_class(&tenant, id, dto).await?))
}

#[utoipa::path(
    delete,
    path = "/api/admin/classes/{id}",
    params(
        ("id" = ClassId, Path, description = "Class ID"),
        crate::middleware::tenant::SchoolScopeQuery
    ),
    responses(
        (status = 200, description = "Class deleted", body = MessageResponse),
        (status = 404, description = "Class not found", body = ErrorResponse),
        (status = 409, description = "Class has attendance or fee records", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Classes"
)]
#[instrument(skip_all, fields(class.id = %id))]
pub async fn delete_class(
    Tenant(tenant): Tenant,
    Path(id): Path<ClassId>,
) -> Result<Json<MessageResponse>, AppError> {
    ClassService::delete_class(&tenant, id).await?;
    Ok(Json(MessageResponse::new("Class deleted successfully")))
}
