use anyhow::anyhow;
use schoolhub_core::AppError;
use thiserror::Error;

/// Which uniqueness rule a write violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Duplicate {
    #[error("School ID already exists")]
    SchoolId,
    #[error("Email already in use")]
    Email,
    #[error("User ID already in use")]
    LoginId,
    #[error("Admission number already in use")]
    AdmissionNumber,
    #[error("Time slot already occupied")]
    TimetableSlot,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("{0}")]
    Conflict(Duplicate),
    /// The record is still referenced by history that must be kept.
    #[error("{0}")]
    InUse(&'static str),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub const CLASS_HAS_HISTORY: &str = "Class has attendance or fee records";

impl StoreError {
    pub fn is_conflict(&self, kind: Duplicate) -> bool {
        matches!(self, StoreError::Conflict(k) if *k == kind)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::not_found(anyhow!("Resource not found")),
            StoreError::Conflict(kind) => AppError::conflict(anyhow!(kind.to_string())),
            StoreError::InUse(reason) => AppError::conflict(anyhow!(reason)),
            StoreError::Database(e) => AppError::internal(e),
        }
    }
}

/// Translates a Postgres unique violation into the matching [`Duplicate`].
pub(crate) fn from_pg(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        let kind = match db_err.constraint() {
            Some("schools_pkey") => Duplicate::SchoolId,
            Some("principals_email_key") => Duplicate::Email,
            Some("principals_login_key") => Duplicate::LoginId,
            Some("principals_admission_number_key") => Duplicate::AdmissionNumber,
            Some("timetable_slot_key") => Duplicate::TimetableSlot,
            _ => return StoreError::Database(err),
        };
        return StoreError::Conflict(kind);
    }
    StoreError::Database(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_to_http_statuses() {
        let conflict: AppError = StoreError::Conflict(Duplicate::TimetableSlot).into();
        assert_eq!(conflict.status.as_u16(), 409);
        assert_eq!(conflict.public_message(), "Time slot already occupied");

        let missing: AppError = StoreError::NotFound.into();
        assert_eq!(missing.status.as_u16(), 404);

        let in_use: AppError = StoreError::InUse(CLASS_HAS_HISTORY).into();
        assert_eq!(in_use.status.as_u16(), 409);
        assert_eq!(in_use.public_message(), CLASS_HAS_HISTORY);

        let db: AppError = StoreError::Database(sqlx::Error::PoolTimedOut).into();
        assert_eq!(db.status.as_u16(), 500);
        assert_eq!(db.public_message(), "Internal server error");
    }

    #[test]
    fn non_unique_errors_stay_database_errors() {
        assert!(matches!(
            from_pg(sqlx::Error::RowNotFound),
            StoreError::Database(_)
        ));
    }
}
