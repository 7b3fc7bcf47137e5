//! Repository traits.
//!
//! Every method on a tenant-scoped aggregate takes the owning [`SchoolId`] and
//! filters on it, so a record of another school behaves exactly like a missing
//! one. Handlers reach these methods through [`crate::TenantStore`], which fixes
//! the school id from the authenticated principal.
//!
//! Uniqueness rules are enforced by the write itself and surface as
//! [`StoreError::Conflict`](crate::StoreError::Conflict). Multi-row writes
//! (school registration, deactivation cascade, bulk attendance) are atomic.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use schoolhub_config::AttendancePolicy;
use schoolhub_core::Role;
use schoolhub_models::attendance::Attendance;
use schoolhub_models::classes::Class;
use schoolhub_models::fees::Fee;
use schoolhub_models::principals::Principal;
use schoolhub_models::schools::School;
use schoolhub_models::stats::{PlatformStats, SchoolStats};
use schoolhub_models::timetable::{TimetableEntry, TimetableSlot};
use schoolhub_models::{AttendanceId, ClassId, FeeId, PrincipalId, SchoolId, TimetableEntryId};

use crate::error::StoreResult;

#[async_trait]
pub trait SchoolRepository: Send + Sync {
    async fn insert_school(&self, school: &School) -> StoreResult<()>;

    /// Inserts a school and its first admin in one transaction.
    async fn insert_school_with_admin(&self, school: &School, admin: &Principal)
    -> StoreResult<()>;

    async fn find_school(&self, school_id: &SchoolId) -> StoreResult<Option<School>>;

    /// Active schools ordered by name.
    async fn list_active_schools(&self) -> StoreResult<Vec<School>>;

    async fn update_school(&self, school: &School) -> StoreResult<()>;

    /// Marks the school and every principal in it inactive, atomically.
    /// Returns the number of principals that were active before.
    async fn deactivate_school(&self, school_id: &SchoolId) -> StoreResult<u64>;
}

#[async_trait]
pub trait PrincipalRepository: Send + Sync {
    async fn insert_principal(&self, principal: &Principal) -> StoreResult<()>;

    /// Unscoped lookup used to resolve the subject of a verified token.
    async fn find_principal(&self, id: PrincipalId) -> StoreResult<Option<Principal>>;

    /// Super-admin matched by login id or email.
    async fn find_super_admin(&self, login: &str) -> StoreResult<Option<Principal>>;

    /// Any super-admin, oldest first.
    async fn first_super_admin(&self) -> StoreResult<Option<Principal>>;

    /// Principal of `school_id` matched by login id or email.
    async fn find_school_principal(
        &self,
        school_id: &SchoolId,
        login: &str,
    ) -> StoreResult<Option<Principal>>;

    async fn find_principal_in_school(
        &self,
        school_id: &SchoolId,
        id: PrincipalId,
        role: Role,
    ) -> StoreResult<Option<Principal>>;

    /// Active principals of one role, ordered by last then first name.
    async fn list_principals(&self, school_id: &SchoolId, role: Role)
    -> StoreResult<Vec<Principal>>;

    async fn email_exists(&self, email: &str, excluding: Option<PrincipalId>) -> StoreResult<bool>;

    /// `school_id == None` checks the super-admin namespace.
    async fn login_id_exists(
        &self,
        school_id: Option<&SchoolId>,
        login_id: &str,
    ) -> StoreResult<bool>;

    async fn admission_number_exists(
        &self,
        school_id: &SchoolId,
        admission_number: &str,
        excluding: Option<PrincipalId>,
    ) -> StoreResult<bool>;

    /// Saves every mutable field; the id and school are the match key.
    async fn update_principal(&self, principal: &Principal) -> StoreResult<()>;

    async fn record_login(&self, id: PrincipalId, at: DateTime<Utc>) -> StoreResult<()>;
}

#[async_trait]
pub trait ClassRepository: Send + Sync {
    async fn insert_class(&self, class: &Class) -> StoreResult<()>;

    async fn find_class(&self, school_id: &SchoolId, id: ClassId) -> StoreResult<Option<Class>>;

    /// Ordered by name then section.
    async fn list_classes(&self, school_id: &SchoolId) -> StoreResult<Vec<Class>>;

    async fn update_class(&self, class: &Class) -> StoreResult<()>;

    /// Hard delete. Timetable entries, attendance and fees of the class go with
    /// it; students keep their record with no class.
    async fn delete_class(&self, school_id: &SchoolId, id: ClassId) -> StoreResult<()>;
}

#[async_trait]
pub trait TimetableRepository: Send + Sync {
    /// Fails with `Conflict(TimetableSlot)` if the slot is taken.
    async fn insert_entry(&self, entry: &TimetableEntry) -> StoreResult<()>;

    async fn find_entry(
        &self,
        school_id: &SchoolId,
        id: TimetableEntryId,
    ) -> StoreResult<Option<TimetableEntry>>;

    async fn find_slot_occupant(
        &self,
        slot: &TimetableSlot,
        excluding: Option<TimetableEntryId>,
    ) -> StoreResult<Option<TimetableEntry>>;

    /// Ordered by day then period.
    async fn list_entries(
        &self,
        school_id: &SchoolId,
        class_id: Option<ClassId>,
    ) -> StoreResult<Vec<TimetableEntry>>;

    /// Fails with `Conflict(TimetableSlot)` if the new slot is taken by
    /// another entry.
    async fn update_entry(&self, entry: &TimetableEntry) -> StoreResult<()>;

    async fn delete_entry(&self, school_id: &SchoolId, id: TimetableEntryId) -> StoreResult<()>;
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Writes a batch of marks in one transaction. Under
    /// [`AttendancePolicy::Upsert`] an existing record for the same student,
    /// class and date is replaced; under `Append` every mark is a new record.
    async fn record_attendance(
        &self,
        records: Vec<Attendance>,
        policy: AttendancePolicy,
    ) -> StoreResult<Vec<Attendance>>;

    async fn find_attendance(
        &self,
        school_id: &SchoolId,
        id: AttendanceId,
    ) -> StoreResult<Option<Attendance>>;

    async fn update_attendance(&self, record: &Attendance) -> StoreResult<()>;

    async fn list_class_attendance(
        &self,
        school_id: &SchoolId,
        class_id: ClassId,
        date: NaiveDate,
    ) -> StoreResult<Vec<Attendance>>;

    /// Newest first. Open bounds are unbounded.
    async fn list_student_attendance(
        &self,
        school_id: &SchoolId,
        student_id: PrincipalId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> StoreResult<Vec<Attendance>>;
}

#[async_trait]
pub trait FeeRepository: Send + Sync {
    async fn insert_fee(&self, fee: &Fee) -> StoreResult<()>;

    async fn find_fee(&self, school_id: &SchoolId, id: FeeId) -> StoreResult<Option<Fee>>;

    async fn list_class_fees(&self, school_id: &SchoolId, class_id: ClassId)
    -> StoreResult<Vec<Fee>>;

    async fn list_student_fees(
        &self,
        school_id: &SchoolId,
        student_id: PrincipalId,
    ) -> StoreResult<Vec<Fee>>;

    async fn update_fee(&self, fee: &Fee) -> StoreResult<()>;

    async fn delete_fee(&self, school_id: &SchoolId, id: FeeId) -> StoreResult<()>;
}

#[async_trait]
pub trait StatsRepository: Send + Sync {
    async fn school_stats(&self, school_id: &SchoolId, today: NaiveDate)
    -> StoreResult<SchoolStats>;

    /// Active schools and accounts across the whole platform.
    async fn platform_stats(&self) -> StoreResult<PlatformStats>;
}

/// The whole storage surface. Implemented by [`crate::PgStore`] and
/// [`crate::MemoryStore`].
pub trait Store:
    SchoolRepository
    + PrincipalRepository
    + ClassRepository
    + TimetableRepository
    + AttendanceRepository
    + FeeRepository
    + StatsRepository
{
    fn backend(&self) -> &'static str;
}
