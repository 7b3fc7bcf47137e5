//! # SchoolHub Config
//!
//! Configuration types for the SchoolHub API.
//!
//! Every structure is loaded from environment variables with `from_env()`:
//!
//! - [`jwt`]: token signing configuration (the secret is mandatory)
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`email`]: Email/SMTP configuration for credential notifications
//! - [`rate_limit`]: API rate limiting configuration
//! - [`attendance`]: attendance marking policy
//! - [`server`]: bind address, storage backend, logging and metrics
//! - [`upload`]: profile image storage
//! - [`password`]: password hashing cost
//!
//! # Example
//!
//! ```ignore
//! use schoolhub_config::{JwtConfig, CorsConfig, EmailConfig, RateLimitConfig};
//!
//! let jwt_config = JwtConfig::from_env()?; // fails without JWT_SECRET
//! let cors_config = CorsConfig::from_env();
//! let email_config = EmailConfig::from_env();
//! let rate_limit_config = RateLimitConfig::from_env();
//! ```

pub mod attendance;
pub mod cors;
pub mod email;
pub mod error;
pub mod jwt;
pub mod password;
pub mod rate_limit;
pub mod server;
pub mod upload;

// Re-export commonly used types at crate root
pub use attendance::{AttendanceConfig, AttendancePolicy};
pub use cors::CorsConfig;
pub use email::EmailConfig;
pub use error::ConfigError;
pub use jwt::JwtConfig;
pub use password::PasswordConfig;
pub use rate_limit::RateLimitConfig;
pub use server::{ServerConfig, StoreBackend};
pub use upload::UploadConfig;

/// Reads a boolean flag, accepting `true`/`1` (case-insensitive).
pub(crate) fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        .unwrap_or(default)
}

/// Reads and parses a variable, falling back to `default` when unset or unparsable.
pub(crate) fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
