use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::controller::{check_super_admin, get_me, login_user, register_school};
use crate::middleware::role::require_super_admin;
use crate::state::AppState;

pub fn init_auth_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/register-school", post(register_school))
        .route_layer(middleware::from_fn_with_state(state, require_super_admin))
        .route("/login", post(login_user))
        .route("/check-super-admin", get(check_super_admin))
        .route("/me", get(get_me))
}
