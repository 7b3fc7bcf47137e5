use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::controller::{create_entry, delete_entry, get_entry, get_timetable, update_entry};
use crate::middleware::role::require_admin;
use crate::state::AppState;

/// Reading the timetable only needs a login; everything else is admin only.
/// `POST /` shares its path with the open listing, so the admin layer sits on
/// that method alone.
pub fn init_timetable_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .route(
            "/",
            post(create_entry)
                .route_layer(middleware::from_fn_with_state(state, require_admin))
                .get(get_timetable),
        )
}
