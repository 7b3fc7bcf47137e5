//! Domain models and DTOs for SchoolHub.
//!
//! Entities derive `sqlx::FromRow` so the Postgres store can load them directly,
//! and `utoipa::ToSchema` so they appear in the OpenAPI document. Request DTOs
//! derive `validator::Validate`. Everything is camelCase on the wire.

pub mod attendance;
pub mod auth;
pub mod classes;
pub mod fees;
pub mod ids;
pub mod principals;
pub mod schools;
pub mod stats;
pub mod timetable;

pub use ids::{AttendanceId, ClassId, FeeId, PrincipalId, SchoolId, TimetableEntryId};
