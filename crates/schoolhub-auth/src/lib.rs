//! # SchoolHub Auth
//!
//! Identity tokens for the SchoolHub API.
//!
//! - [`claims`]: the JWT claim structure (`sub`, `role`, `iat`, `exp`)
//! - [`jwt`]: token issuing and verification
//!
//! Tokens are HS256 JWTs signed with the configured secret and valid for 24 hours.
//!
//! # Example
//!
//! ```ignore
//! use schoolhub_auth::{create_access_token, verify_token};
//! use schoolhub_config::JwtConfig;
//! use schoolhub_core::Role;
//!
//! let config = JwtConfig::from_env()?;
//! let token = create_access_token(principal_id, Role::Teacher, &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.role, Role::Teacher);
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
