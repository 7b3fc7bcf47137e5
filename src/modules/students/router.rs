use axum::{Router, middleware, routing::get};

use super::controller::{create_student, delete_student, get_student, get_students, update_student};
use crate::middleware::role::require_admin;
use crate::state::AppState;

pub fn init_students_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(get_students).post(create_student))
        .route(
            "/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}
