use axum::{Router, middleware, routing::get};

use super::controller::{create_class, delete_class, get_class, get_classes, update_class};
use crate::middleware::role::require_admin;
use crate::state::AppState;

pub fn init_classes_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(get_classes).post(create_class))
        .route(
            "/{id}",
            get(get_class).put(update_class).delete(delete_class),
        )
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}
