//! Request extractors and middleware.
//!
//! - [`auth`]: `AuthUser`, the principal behind a bearer token
//! - [`role`]: role and school access checks
//! - [`tenant`]: `Tenant`, a store handle pinned to the caller's school
//! - [`rate_limit`]: per client token buckets
//!
//! # Request flow
//!
//! 1. Rate limiting and logging layers see every request.
//! 2. `AuthUser` verifies the token and loads the principal from the store.
//! 3. Role middleware checks the role, on a route group or a single method.
//! 4. `Tenant` pins the store to a school for the handler.
//!
//! ```ignore
//! async fn list_classes(Tenant(tenant): Tenant) -> Result<Json<Vec<Class>>, AppError> {
//!     Ok(Json(tenant.list_classes().await?))
//! }
//! ```

pub mod auth;
pub mod rate_limit;
pub mod role;
pub mod tenant;
