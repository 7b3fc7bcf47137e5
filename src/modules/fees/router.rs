use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use super::controller::{
    create_fee, delete_fee, get_class_fees, get_fee_summary, get_student_fees, update_fee,
};
use crate::middleware::role::{require_admin, require_staff};
use crate::state::AppState;

pub fn init_fees_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_fee))
        .route("/{id}", put(update_fee).delete(delete_fee))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .route("/class/{classId}", get(get_class_fees))
        .route("/summary/class/{classId}", get(get_fee_summary))
        .route_layer(middleware::from_fn_with_state(state, require_staff))
        // Students may read their own fees.
        .route("/student/{studentId}", get(get_student_fees))
}
