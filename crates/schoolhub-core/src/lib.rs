//! # SchoolHub Core
//!
//! Core types, errors, and utilities for the SchoolHub API.
//!
//! This crate provides foundational types used throughout the application:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`roles`]: The closed set of principal roles
//! - [`password`]: Password hashing and verification
//! - [`credentials`]: Login identifier and one-time password generation
//!
//! # Example
//!
//! ```ignore
//! use schoolhub_core::{AppError, Role};
//! use schoolhub_core::credentials::{LoginIdKind, generate_login_id, generate_password};
//!
//! let login_id = generate_login_id(LoginIdKind::Student { admission_year: 2024 });
//! let password = generate_password();
//! let hash = schoolhub_core::hash_password(&password, bcrypt::DEFAULT_COST)?;
//!
//! if !Role::Admin.is_school_scoped() {
//!     return Err(AppError::forbidden("Not allowed"));
//! }
//! ```

pub mod credentials;
pub mod errors;
pub mod password;
pub mod roles;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use password::{hash_password, verify_password};
pub use roles::Role;
