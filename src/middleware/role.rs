//! Role based authorization.
//!
//! Two layers of checks run after authentication, in this order:
//!
//! 1. [`require_role`]: the principal's role must be in the allowed set.
//! 2. [`require_school_access`]: a school scoped principal may only touch its
//!    own school; a super-admin may touch any.
//!
//! Route groups, or single methods of a path, use the middleware wrappers
//! ([`require_super_admin`], [`require_admin`], [`require_staff`]) with
//! `axum::middleware::from_fn_with_state`, so the role is settled before the
//! body is read. Handlers with per-record rules call the plain functions.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use schoolhub_core::{AppError, Role};
use schoolhub_models::{PrincipalId, SchoolId};
use schoolhub_models::principals::Principal;
use tracing::warn;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub const SUPER_ADMIN_ONLY: &[Role] = &[Role::SuperAdmin];
pub const ADMINS: &[Role] = &[Role::SuperAdmin, Role::Admin];
pub const STAFF: &[Role] = &[Role::SuperAdmin, Role::Admin, Role::Teacher];

pub fn require_role(principal: &Principal, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&principal.role) {
        return Ok(());
    }

    warn!(
        principal.id = %principal.id,
        role = principal.role.as_str(),
        "Role not allowed"
    );
    Err(AppError::forbidden("Access denied: insufficient permissions"))
}

pub fn require_school_access(principal: &Principal, target: &SchoolId) -> Result<(), AppError> {
    match principal.role {
        Role::SuperAdmin => Ok(()),
        Role::Admin | Role::Teacher | Role::Student => {
            if principal.school_id.as_ref() == Some(target) {
                Ok(())
            } else {
                warn!(
                    principal.id = %principal.id,
                    school.id = %target,
                    "School access denied"
                );
                Err(AppError::forbidden(
                    "Access denied: Not authorized for this school",
                ))
            }
        }
    }
}

/// Staff may read any student's records of their school; a student only
/// their own.
pub fn require_staff_or_self(principal: &Principal, student_id: PrincipalId) -> Result<(), AppError> {
    if principal.id == student_id {
        return Ok(());
    }
    require_role(principal, STAFF)
}

/// Authenticates the request and checks the role before running `next`.
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed: &'static [Role],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;
    require_role(&auth_user.0, allowed)?;

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}

pub async fn require_super_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    match require_roles(State(state), req, next, SUPER_ADMIN_ONLY).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Admins of a school, plus super-admins naming a school.
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, ADMINS).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

pub async fn require_staff(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, STAFF).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Any authenticated principal.
pub async fn require_auth(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, &Role::ALL).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}
