use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use schoolhub_auth::verify_token;
use schoolhub_core::{AppError, Role};
use schoolhub_models::principals::Principal;
use schoolhub_models::{PrincipalId, SchoolId};
use tracing::{debug, warn};

use crate::state::AppState;

/// The authenticated principal behind a request.
///
/// Resolved from the bearer token and then re-read from the store, so a
/// principal deactivated after the token was issued is rejected. Extraction
/// caches the result in the request extensions; role middleware and the
/// handler share one lookup.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl AuthUser {
    pub fn id(&self) -> PrincipalId {
        self.0.id
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn school_id(&self) -> Option<&SchoolId> {
        self.0.school_id.as_ref()
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;

        let claims = verify_token(token, &state.jwt_config)?;
        let principal_id = PrincipalId::from(claims.subject_id()?);

        let principal = state
            .store
            .find_principal(principal_id)
            .await?
            .filter(|p| p.is_active)
            .ok_or_else(|| {
                warn!(principal.id = %principal_id, "Token subject missing or inactive");
                AppError::unauthorized("Account not found or inactive")
            })?;

        if principal.role != claims.role {
            warn!(principal.id = %principal_id, "Token role no longer matches account");
            return Err(AppError::unauthorized("Invalid or expired token"));
        }

        debug!(principal.id = %principal.id, role = principal.role.as_str(), "Authenticated");
        let user = AuthUser(principal);
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
