use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use super::controller::{
    get_class_attendance, get_student_attendance, mark_attendance, update_attendance,
};
use crate::middleware::role::require_staff;
use crate::state::AppState;

pub fn init_attendance_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/mark", post(mark_attendance))
        .route("/class/{classId}", get(get_class_attendance))
        .route("/{id}", put(update_attendance))
        .route_layer(middleware::from_fn_with_state(state, require_staff))
        // Students may read their own history.
        .route("/student/{studentId}", get(get_student_attendance))
}
