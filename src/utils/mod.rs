//! Shared helpers for the HTTP layer.
//!
//! - [`email`]: credential notifications over SMTP or to the log
//! - [`provisioning`]: login id and password issuing for new principals
//! - [`uploads`]: profile image storage

pub mod email;
pub mod provisioning;
pub mod uploads;
