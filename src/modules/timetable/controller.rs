use axum::{
    Json,
    extract::{Path, Query},
    http::StatusCode,
};
use schoolhub_core::AppError;
use schoolhub_models::TimetableEntryId;
use tracing::instrument;

use super::model::{
    CreateTimetableEntryDto, TimetableEntry, TimetableQuery, UpdateTimetableEntryDto,
};
use super::service::TimetableService;
use crate::middleware::tenant::Tenant;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::MessageResponse;
use crate::validator::ValidatedJson;

/// List timetable entries
///
/// Open to every authenticated principal of the school.
#[utoipa::path(
    get,
    path = "/api/admin/timetable",
    params(TimetableQuery, crate::middleware::tenant::SchoolScopeQuery),
    responses(
        (status = 200, description = "Entries sorted by day then period", body = Vec<TimetableEntry>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Timetable"
)]
#[instrument(skip_all)]
pub async fn get_timetable(
    Tenant(tenant): Tenant,
    Query(query): Query<TimetableQuery>,
) -> Result<Json<Vec<TimetableEntry>>, AppError> {
    let entries = TimetableService::list_entries(&tenant, query.class_id).await?;
    Ok(Json(entries))
}

#[utoipa::path(
    post,
    path = "/api/admin/timetable",
    params(crate::middleware::tenant::SchoolScopeQuery),
    request_body = CreateTimetableEntryDto,
    responses(
        (status = 201, description = "Entry created", body = TimetableEntry),
        (status = 400, description = "Teacher does not belong to this school", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse),
        (status = 409, description = "Time slot already occupied", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Timetable"
)]
#[instrument(skip_all)]
pub async fn create_entry(
    Tenant(tenant): Tenant,
    ValidatedJson(dto): ValidatedJson<CreateTimetableEntryDto>,
) -> Result<(StatusCode, Json<TimetableEntry>), AppError> {
    let entry = TimetableService::create_entry(&tenant, dto).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[utoipa::path(
    get,
    path = "/api/admin/timetable/{id}",
    params(
        ("id" = TimetableEntryId, Path, description = "Timetable entry ID"),
        crate::middleware::tenant::SchoolScopeQuery
    ),
    responses(
        (status = 200, description = "Entry details", body = TimetableEntry),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Timetable entry not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Timetable"
)]
#[instrument(skip_all, fields(entry.id = %id))]
pub async fn get_entry(
    Tenant(tenant): Tenant,
    Path(id): Path<TimetableEntryId>,
) -> Result<Json<TimetableEntry>, AppError> {
    Ok(Json(TimetableService::get_entry(&tenant, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/admin/timetable/{id}",
    params(
        ("id" = TimetableEntryId, Path, description = "Timetable entry ID"),
        crate::middleware::tenant::SchoolScopeQuery
    ),
    request_body = UpdateTimetableEntryDto,
    responses(
        (status = 200, description = "Entry updated", body = TimetableEntry),
        (status = 400, description = "Teacher does not belong to this school", body = ErrorResponse),
        (status = 404, description = "Timetable entry not found", body = ErrorResponse),
        (status = 409, description = "Time slot already occupied", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Timetable"
)]
#[instrument(skip_all, fields(entry.id = %id))]
pub async fn update_entry(
    Tenant(tenant): Tenant,
    Path(id): Path<TimetableEntryId>,
    ValidatedJson(dto): ValidatedJson<UpdateTimetableEntryDto>,
) -> Result<Json<TimetableEntry>, AppError> {
    Ok(Json(TimetableService::update_entry(&tenant, id, dto).await?))
}

#[utoipa::path(
    delete,
    path = "/api/admin/timetable/{id}",
    params(
        ("id" = TimetableEntryId, Path, description = "Timetable entry ID"),
        crate::middleware::tenant::SchoolScopeQuery
    ),
    responses(
        (status = 200, description = "Entry deleted", body = MessageResponse),
        (status = 404, description = "Timetable entry not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Timetable"
)]
#[instrument(skip_all, fields(entry.id = %id))]
pub async fn delete_entry(
    Tenant(tenant): Tenant,
    Path(id): Path<TimetableEntryId>,
) -> Result<Json<MessageResponse>, AppError> {
    TimetableService::delete_entry(&tenant, id).await?;
    Ok(Json(MessageResponse::new("Timetable entry deleted successfully")))
}
