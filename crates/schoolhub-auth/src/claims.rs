//! JWT claim structure for access tokens.

use schoolhub_core::{AppError, Role};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// JWT claims for access tokens.
///
/// Only the subject and role travel in the token. Everything else about the
/// principal (school, active flag) is looked up on every request so that a
/// deactivation takes effect immediately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Principal ID (subject claim)
    pub sub: String,
    /// Principal role at issue time
    pub role: Role,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

impl Claims {
    pub fn subject_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AppError::unauthorized("Invalid subject in token"))
    }
}
