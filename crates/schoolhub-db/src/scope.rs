//! Tenant scoping.
//!
//! A [`TenantStore`] is a [`Store`] handle pinned to one school. It is the only
//! way request handlers touch tenant-scoped data: every read filters on the
//! pinned school, every create stamps it, and every update or delete of a
//! record owned by another school fails with [`StoreError::NotFound`].

use std::sync::Arc;

use anyhow::anyhow;
use chrono::NaiveDate;
use schoolhub_config::AttendancePolicy;
use schoolhub_core::{AppError, Role};
use schoolhub_models::attendance::Attendance;
use schoolhub_models::classes::Class;
use schoolhub_models::fees::Fee;
use schoolhub_models::principals::Principal;
use schoolhub_models::schools::School;
use schoolhub_models::stats::SchoolStats;
use schoolhub_models::timetable::{TimetableEntry, TimetableSlot, Weekday};
use schoolhub_models::{AttendanceId, ClassId, FeeId, PrincipalId, SchoolId, TimetableEntryId};
use thiserror::Error;

use crate::error::{StoreError, StoreResult};
use crate::store::{
    AttendanceRepository, ClassRepository, FeeRepository, PrincipalRepository, SchoolRepository,
    StatsRepository, Store, TimetableRepository,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScopeError {
    #[error("schoolId query parameter is required")]
    MissingSchool,
    #[error("Account is not assigned to a school")]
    Unassigned,
}

impl From<ScopeError> for AppError {
    fn from(err: ScopeError) -> Self {
        match err {
            ScopeError::MissingSchool => AppError::bad_request(anyhow!(err.to_string())),
            ScopeError::Unassigned => AppError::forbidden(err.to_string()),
        }
    }
}

/// Picks the school a request operates on.
///
/// School-scoped principals always get their own school and whatever the
/// client asked for is ignored. A super-admin has no school of their own and
/// must name one.
pub fn resolve_school(
    principal: &Principal,
    requested: Option<SchoolId>,
) -> Result<SchoolId, ScopeError> {
    match principal.role {
        Role::SuperAdmin => requested
            .filter(|id| !id.as_str().trim().is_empty())
            .ok_or(ScopeError::MissingSchool),
        Role::Admin | Role::Teacher | Role::Student => {
            principal.school_id.clone().ok_or(ScopeError::Unassigned)
        }
    }
}

#[derive(Clone)]
pub struct TenantStore {
    store: Arc<dyn Store>,
    school_id: SchoolId,
}

impl TenantStore {
    pub fn new(store: Arc<dyn Store>, school_id: SchoolId) -> Self {
        Self { store, school_id }
    }

    pub fn for_principal(
        store: Arc<dyn Store>,
        principal: &Principal,
        requested: Option<SchoolId>,
    ) -> Result<Self, ScopeError> {
        let school_id = resolve_school(principal, requested)?;
        Ok(Self::new(store, school_id))
    }

    pub fn school_id(&self) -> &SchoolId {
        &self.school_id
    }

    fn ensure_owned(&self, owner: &SchoolId) -> StoreResult<()> {
        if owner == &self.school_id {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    pub async fn school(&self) -> StoreResult<Option<School>> {
        self.store.find_school(&self.school_id).await
    }

    // Principals

    pub async fn find_principal(
        &self,
        id: PrincipalId,
        role: Role,
    ) -> StoreResult<Option<Principal>> {
        self.store
            .find_principal_in_school(&self.school_id, id, role)
            .await
    }

    pub async fn list_principals(&self, role: Role) -> StoreResult<Vec<Principal>> {
        self.store.list_principals(&self.school_id, role).await
    }

    pub async fn insert_principal(&self, mut principal: Principal) -> StoreResult<Principal> {
        principal.school_id = Some(self.school_id.clone());
        self.store.insert_principal(&principal).await?;
        Ok(principal)
    }

    pub async fn update_principal(&self, principal: &Principal) -> StoreResult<()> {
        match &principal.school_id {
            Some(owner) => self.ensure_owned(owner)?,
            None => return Err(StoreError::NotFound),
        }
        self.store.update_principal(principal).await
    }

    /// Emails are unique across all schools.
    pub async fn email_exists(
        &self,
        email: &str,
        excluding: Option<PrincipalId>,
    ) -> StoreResult<bool> {
        self.store.email_exists(email, excluding).await
    }

    pub async fn login_id_exists(&self, login_id: &str) -> StoreResult<bool> {
        self.store
            .login_id_exists(Some(&self.school_id), login_id)
            .await
    }

    pub async fn admission_number_exists(
        &self,
        admission_number: &str,
        excluding: Option<PrincipalId>,
    ) -> StoreResult<bool> {
        self.store
            .admission_number_exists(&self.school_id, admission_number, excluding)
            .await
    }

    // Classes

    pub async fn find_class(&self, id: ClassId) -> StoreResult<Option<Class>> {
        self.store.find_class(&self.school_id, id).await
    }

    pub async fn list_classes(&self) -> StoreResult<Vec<Class>> {
        self.store.list_classes(&self.school_id).await
    }

    pub async fn insert_class(&self, mut class: Class) -> StoreResult<Class> {
        class.school_id = self.school_id.clone();
        self.store.insert_class(&class).await?;
        Ok(class)
    }

    pub async fn update_class(&self, class: &Class) -> StoreResult<()> {
        self.ensure_owned(&class.school_id)?;
        self.store.update_class(class).await
    }

    pub async fn delete_class(&self, id: ClassId) -> StoreResult<()> {
        self.store.delete_class(&self.school_id, id).await
    }

    // Timetable

    pub async fn find_entry(&self, id: TimetableEntryId) -> StoreResult<Option<TimetableEntry>> {
        self.store.find_entry(&self.school_id, id).await
    }

    pub async fn list_entries(&self, class_id: Option<ClassId>) -> StoreResult<Vec<TimetableEntry>> {
        self.store.list_entries(&self.school_id, class_id).await
    }

    pub async fn find_slot_occupant(
        &self,
        class_id: ClassId,
        day: Weekday,
        period: i32,
        excluding: Option<TimetableEntryId>,
    ) -> StoreResult<Option<TimetableEntry>> {
        let slot = TimetableSlot {
            school_id: self.school_id.clone(),
            class_id,
            day,
            period,
        };
        self.store.find_slot_occupant(&slot, excluding).await
    }

    pub async fn insert_entry(&self, mut entry: TimetableEntry) -> StoreResult<TimetableEntry> {
        entry.school_id = self.school_id.clone();
        self.store.insert_entry(&entry).await?;
        Ok(entry)
    }

    pub async fn update_entry(&self, entry: &TimetableEntry) -> StoreResult<()> {
        self.ensure_owned(&entry.school_id)?;
        self.store.update_entry(entry).await
    }

    pub async fn delete_entry(&self, id: TimetableEntryId) -> StoreResult<()> {
        self.store.delete_entry(&self.school_id, id).await
    }

    // Attendance

    pub async fn record_attendance(
        &self,
        mut records: Vec<Attendance>,
        policy: AttendancePolicy,
    ) -> StoreResult<Vec<Attendance>> {
        for record in &mut records {
            record.school_id = self.school_id.clone();
        }
        self.store.record_attendance(records, policy).await
    }

    pub async fn find_attendance(&self, id: AttendanceId) -> StoreResult<Option<Attendance>> {
        self.store.find_attendance(&self.school_id, id).await
    }

    pub async fn update_attendance(&self, record: &Attendance) -> StoreResult<()> {
        self.ensure_owned(&record.school_id)?;
        self.store.update_attendance(record).await
    }

    pub async fn list_class_attendance(
        &self,
        class_id: ClassId,
        date: NaiveDate,
    ) -> StoreResult<Vec<Attendance>> {
        self.store
            .list_class_attendance(&self.school_id, class_id, date)
            .await
    }

    pub async fn list_student_attendance(
        &self,
        student_id: PrincipalId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> StoreResult<Vec<Attendance>> {
        self.store
            .list_student_attendance(&self.school_id, student_id, from, to)
            .await
    }

    // Fees

    pub async fn insert_fee(&self, mut fee: Fee) -> StoreResult<Fee> {
        fee.school_id = self.school_id.clone();
        self.store.insert_fee(&fee).await?;
        Ok(fee)
    }

    pub async fn find_fee(&self, id: FeeId) -> StoreResult<Option<Fee>> {
        self.store.find_fee(&self.school_id, id).await
    }

    pub async fn list_class_fees(&self, class_id: ClassId) -> StoreResult<Vec<Fee>> {
        self.store.list_class_fees(&self.school_id, class_id).await
    }

    pub async fn list_student_fees(&self, student_id: PrincipalId) -> StoreResult<Vec<Fee>> {
        self.store
            .list_student_fees(&self.school_id, student_id)
            .await
    }

    pub async fn update_fee(&self, fee: &Fee) -> StoreResult<()> {
        self.ensure_owned(&fee.school_id)?;
        self.store.update_fee(fee).await
    }

    pub async fn delete_fee(&self, id: FeeId) -> StoreResult<()> {
        self.store.delete_fee(&self.school_id, id).await
    }

    pub async fn stats(&self, today: NaiveDate) -> StoreResult<SchoolStats> {
        self.store.school_stats(&self.school_id, today).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use chrono::Utc;

    fn principal(role: Role, school: Option<&str>) -> Principal {
        Principal::new(
            role,
            school.map(SchoolId::new),
            "12345",
            format!("{}@test.local", role.as_str().to_lowercase()),
            "hash",
            "Test",
            "User",
        )
    }

    fn class(school: &str, name: &str) -> Class {
        let now = Utc::now();
        Class {
            id: ClassId::new(),
            school_id: SchoolId::new(school),
            name: name.to_string(),
            section: "A".to_string(),
            capacity: 30,
            teacher_id: None,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn admin_scope_ignores_requested_school() {
        let admin = principal(Role::Admin, Some("GF-01"));
        let school = resolve_school(&admin, Some(SchoolId::new("OTHER"))).unwrap();
        assert_eq!(school.as_str(), "GF-01");
    }

    #[test]
    fn super_admin_must_name_a_school() {
        let root = principal(Role::SuperAdmin, None);
        assert_eq!(resolve_school(&root, None), Err(ScopeError::MissingSchool));
        assert_eq!(
            resolve_school(&root, Some(SchoolId::new(" "))),
            Err(ScopeError::MissingSchool)
        );
        assert_eq!(
            resolve_school(&root, Some(SchoolId::new("GF-01"))).unwrap().as_str(),
            "GF-01"
        );
    }

    #[test]
    fn missing_school_is_a_bad_request() {
        let err: AppError = ScopeError::MissingSchool.into();
        assert_eq!(err.status.as_u16(), 400);
    }

    #[tokio::test]
    async fn other_schools_records_are_invisible() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let a = TenantStore::new(store.clone(), SchoolId::new("A"));
        let b = TenantStore::new(store.clone(), SchoolId::new("B"));

        let created = a.insert_class(class("A", "Grade 1")).await.unwrap();

        assert!(a.find_class(created.id).await.unwrap().is_some());
        assert!(b.find_class(created.id).await.unwrap().is_none());
        assert!(b.list_classes().await.unwrap().is_empty());
        assert!(matches!(
            b.delete_class(created.id).await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            b.update_class(&created).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn inserts_are_stamped_with_the_scope() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let a = TenantStore::new(store, SchoolId::new("A"));

        let created = a.insert_class(class("B", "Sneaky")).await.unwrap();
        assert_eq!(created.school_id.as_str(), "A");
    }
}
