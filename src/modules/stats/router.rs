use axum::{Router, middleware, routing::get};

use super::controller::{get_platform_stats, get_stats};
use crate::middleware::role::{require_admin, require_super_admin};
use crate::state::AppState;

pub fn init_stats_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(get_stats))
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}

pub fn init_platform_stats_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(get_platform_stats))
        .route_layer(middleware::from_fn_with_state(state, require_super_admin))
}
