use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use schoolhub_core::AppError;
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use super::model::{
    CheckSuperAdminResponse, LoginRequest, LoginResponse, PrincipalProfile, RegisterSchoolDto,
    RegisterSchoolResponse,
};
use super::service::AuthService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Body of every error response.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

/// Login and receive a JWT
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Bad request - malformed body", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 429, description = "Too many login attempts", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login(
        state.store.as_ref(),
        &state.jwt_config,
        state.password_config.bcrypt_cost,
        dto,
    )
    .await?;
    Ok(Json(response))
}

/// Register a school and its first admin (super-admin only)
#[utoipa::path(
    post,
    path = "/api/auth/register-school",
    request_body = RegisterSchoolDto,
    responses(
        (status = 201, description = "School and admin created", body = RegisterSchoolResponse),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - super-admin only", body = ErrorResponse),
        (status = 409, description = "School ID or email already exists", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Authentication"
)]
#[instrument(skip_all, fields(principal.id = %auth_user.id()))]
pub async fn register_school(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<RegisterSchoolDto>,
) -> Result<(StatusCode, Json<RegisterSchoolResponse>), AppError> {
    let response = AuthService::register_school(&state, dto).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Report whether a super-admin account exists
#[utoipa::path(
    get,
    path = "/api/auth/check-super-admin",
    responses(
        (status = 200, description = "Super-admin presence", body = CheckSuperAdminResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn check_super_admin(
    State(state): State<AppState>,
) -> Result<Json<CheckSuperAdminResponse>, AppError> {
    let response = AuthService::check_super_admin(state.store.as_ref()).await?;
    Ok(Json(response))
}

/// Get the current principal
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current principal", body = PrincipalProfile),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Authentication"
)]
#[instrument(skip_all, fields(principal.id = %auth_user.id()))]
pub async fn get_me(auth_user: AuthUser) -> Json<PrincipalProfile> {
    Json(PrincipalProfile::from(&auth_user.0))
}
