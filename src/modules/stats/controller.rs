use axum::{Json, extract::State};
use schoolhub_core::AppError;
use schoolhub_models::stats::{PlatformStats, SchoolStats};
use tracing::instrument;

use super::service::StatsService;
use crate::middleware::tenant::Tenant;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    params(crate::middleware::tenant::SchoolScopeQuery),
    responses(
        (status = 200, description = "Dashboard counters", body = SchoolStats),
        (status = 400, description = "schoolId missing for super-admin", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Stats"
)]
#[instrument(skip_all)]
pub async fn get_stats(Tenant(tenant): Tenant) -> Result<Json<SchoolStats>, AppError> {
    Ok(Json(StatsService::school_stats(&tenant).await?))
}

/// Platform-wide counters for the super-admin dashboard
#[utoipa::path(
    get,
    path = "/api/super-admin/stats",
    responses(
        (status = 200, description = "Schools and accounts across the platform", body = PlatformStats),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - super-admin only", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Stats"
)]
#[instrument(skip_all)]
pub async fn get_platform_stats(
    State(state): State<AppState>,
) -> Result<Json<PlatformStats>, AppError> {
    Ok(Json(StatsService::platform_stats(state.store.as_ref()).await?))
}
