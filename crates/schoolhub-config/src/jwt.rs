//! Token signing configuration.
//!
//! There is deliberately no fallback secret: `from_env()` returns
//! [`ConfigError::MissingVar`] when `JWT_SECRET` is unset or blank, and the
//! server refuses to start.

use std::env;
use std::fmt;

use crate::error::ConfigError;

/// Access tokens live for 24 hours.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(ConfigError::MissingVar("JWT_SECRET"));
        }

        Ok(Self {
            secret,
            access_token_expiry: ACCESS_TOKEN_TTL_SECS,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?;
        Self::new(secret)
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("access_token_expiry", &self.access_token_expiry)
            .finish()
    }
}
