use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use super::controller::{
    create_school_admin, delete_school, get_school, get_schools, update_school,
};
use crate::middleware::role::{require_admin, require_super_admin};
use crate::state::AppState;

pub fn init_schools_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(get_schools))
        .route("/{schoolId}/admins", post(create_school_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_super_admin))
        .route(
            "/{schoolId}",
            get(get_school)
                .merge(
                    put(update_school)
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
                )
                .merge(
                    delete(delete_school)
                        .route_layer(middleware::from_fn_with_state(state, require_super_admin)),
                ),
        )
}
