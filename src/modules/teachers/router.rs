use axum::{Router, middleware, routing::get};

use super::controller::{create_teacher, delete_teacher, get_teacher, get_teachers, update_teacher};
use crate::middleware::role::require_admin;
use crate::state::AppState;

pub fn init_teachers_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(get_teachers).post(create_teacher))
        .route(
            "/{id}",
            get(get_teacher).put(update_teacher).delete(delete_teacher),
        )
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}
