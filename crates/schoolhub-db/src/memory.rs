//! In-memory [`Store`] backend.
//!
//! All tables live behind a single `parking_lot::RwLock`. Every method takes the
//! lock once and releases it before returning, so uniqueness checks and the
//! write they guard are atomic with respect to other callers. The lock is
//! never held across an `.await`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;
use schoolhub_config::AttendancePolicy;
use schoolhub_core::Role;
use schoolhub_models::attendance::Attendance;
use schoolhub_models::classes::Class;
use schoolhub_models::fees::{Fee, FeeStatus};
use schoolhub_models::principals::Principal;
use schoolhub_models::schools::School;
use schoolhub_models::stats::{PlatformStats, SchoolStats, UserBreakdown};
use schoolhub_models::timetable::{TimetableEntry, TimetableSlot};
use schoolhub_models::{AttendanceId, ClassId, FeeId, PrincipalId, SchoolId, TimetableEntryId};

use crate::error::{CLASS_HAS_HISTORY, Duplicate, StoreError, StoreResult};
use crate::store::{
    AttendanceRepository, ClassRepository, FeeRepository, PrincipalRepository, SchoolRepository,
    StatsRepository, Store, TimetableRepository,
};

#[derive(Default)]
struct Tables {
    schools: HashMap<SchoolId, School>,
    principals: HashMap<PrincipalId, Principal>,
    classes: HashMap<ClassId, Class>,
    timetable: HashMap<TimetableEntryId, TimetableEntry>,
    attendance: HashMap<AttendanceId, Attendance>,
    fees: HashMap<FeeId, Fee>,
}

fn matches_login(p: &Principal, login: &str) -> bool {
    p.login_id == login || p.email.eq_ignore_ascii_case(login)
}

impl Tables {
    fn check_principal_unique(&self, candidate: &Principal) -> StoreResult<()> {
        for other in self.principals.values().filter(|p| p.id != candidate.id) {
            if other.email.eq_ignore_ascii_case(&candidate.email) {
                return Err(StoreError::Conflict(Duplicate::Email));
            }
            if other.school_id == candidate.school_id && other.login_id == candidate.login_id {
                return Err(StoreError::Conflict(Duplicate::LoginId));
            }
            if other.school_id == candidate.school_id
                && candidate.admission_number.is_some()
                && other.admission_number == candidate.admission_number
            {
                return Err(StoreError::Conflict(Duplicate::AdmissionNumber));
            }
        }
        Ok(())
    }

    fn slot_occupant(
        &self,
        slot: &TimetableSlot,
        excluding: Option<TimetableEntryId>,
    ) -> Option<&TimetableEntry> {
        self.timetable
            .values()
            .find(|e| Some(e.id) != excluding && &e.slot() == slot)
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[async_trait]
impl SchoolRepository for MemoryStore {
    async fn insert_school(&self, school: &School) -> StoreResult<()> {
        let mut t = self.tables.write();
        if t.schools.contains_key(&school.school_id) {
            return Err(StoreError::Conflict(Duplicate::SchoolId));
        }
        t.schools.insert(school.school_id.clone(), school.clone());
        Ok(())
    }

    async fn insert_school_with_admin(
        &self,
        school: &School,
        admin: &Principal,
    ) -> StoreResult<()> {
        let mut t = self.tables.write();
        if t.schools.contains_key(&school.school_id) {
            return Err(StoreError::Conflict(Duplicate::SchoolId));
        }
        t.check_principal_unique(admin)?;
        t.schools.insert(school.school_id.clone(), school.clone());
        t.principals.insert(admin.id, admin.clone());
        Ok(())
    }

    async fn find_school(&self, school_id: &SchoolId) -> StoreResult<Option<School>> {
        Ok(self.tables.read().schools.get(school_id).cloned())
    }

    async fn list_active_schools(&self) -> StoreResult<Vec<School>> {
        let mut schools: Vec<School> = self
            .tables
            .read()
            .schools
            .values()
            .filter(|s| s.is_active)
            .cloned()
            .collect();
        schools.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(schools)
    }

    async fn update_school(&self, school: &School) -> StoreResult<()> {
        let mut t = self.tables.write();
        let stored = t
            .schools
            .get_mut(&school.school_id)
            .ok_or(StoreError::NotFound)?;
        *stored = School {
            updated_at: Utc::now(),
            ..school.clone()
        };
        Ok(())
    }

    async fn deactivate_school(&self, school_id: &SchoolId) -> StoreResult<u64> {
        let mut t = self.tables.write();
        let now = Utc::now();
        let school = t.schools.get_mut(school_id).ok_or(StoreError::NotFound)?;
        school.is_active = false;
        school.updated_at = now;

        let mut deactivated = 0;
        for p in t
            .principals
            .values_mut()
            .filter(|p| p.school_id.as_ref() == Some(school_id) && p.is_active)
        {
            p.is_active = false;
            p.updated_at = now;
            deactivated += 1;
        }
        Ok(deactivated)
    }
}

#[async_trait]
impl PrincipalRepository for MemoryStore {
    async fn insert_principal(&self, principal: &Principal) -> StoreResult<()> {
        let mut t = self.tables.write();
        t.check_principal_unique(principal)?;
        t.principals.insert(principal.id, principal.clone());
        Ok(())
    }

    async fn find_principal(&self, id: PrincipalId) -> StoreResult<Option<Principal>> {
        Ok(self.tables.read().principals.get(&id).cloned())
    }

    async fn find_super_admin(&self, login: &str) -> StoreResult<Option<Principal>> {
        Ok(self
            .tables
            .read()
            .principals
            .values()
            .find(|p| p.role == Role::SuperAdmin && matches_login(p, login))
            .cloned())
    }

    async fn first_super_admin(&self) -> StoreResult<Option<Principal>> {
        Ok(self
            .tables
            .read()
            .principals
            .values()
            .filter(|p| p.role == Role::SuperAdmin)
            .min_by_key(|p| p.created_at)
            .cloned())
    }

    async fn find_school_principal(
        &self,
        school_id: &SchoolId,
        login: &str,
    ) -> StoreResult<Option<Principal>> {
        Ok(self
            .tables
            .read()
            .principals
            .values()
            .find(|p| p.school_id.as_ref() == Some(school_id) && matches_login(p, login))
            .cloned())
    }

    async fn find_principal_in_school(
        &self,
        school_id: &SchoolId,
        id: PrincipalId,
        role: Role,
    ) -> StoreResult<Option<Principal>> {
        Ok(self
            .tables
            .read()
            .principals
            .get(&id)
            .filter(|p| p.school_id.as_ref() == Some(school_id) && p.role == role)
            .cloned())
    }

    async fn list_principals(
        &self,
        school_id: &SchoolId,
        role: Role,
    ) -> StoreResult<Vec<Principal>> {
        let mut list: Vec<Principal> = self
            .tables
            .read()
            .principals
            .values()
            .filter(|p| p.school_id.as_ref() == Some(school_id) && p.role == role && p.is_active)
            .cloned()
            .collect();
        list.sort_by(|a, b| {
            (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name))
        });
        Ok(list)
    }

    async fn email_exists(&self, email: &str, excluding: Option<PrincipalId>) -> StoreResult<bool> {
        Ok(self
            .tables
            .read()
            .principals
            .values()
            .any(|p| Some(p.id) != excluding && p.email.eq_ignore_ascii_case(email)))
    }

    async fn login_id_exists(
        &self,
        school_id: Option<&SchoolId>,
        login_id: &str,
    ) -> StoreResult<bool> {
        Ok(self
            .tables
            .read()
            .principals
            .values()
            .any(|p| p.school_id.as_ref() == school_id && p.login_id == login_id))
    }

    async fn admission_number_exists(
        &self,
        school_id: &SchoolId,
        admission_number: &str,
        excluding: Option<PrincipalId>,
    ) -> StoreResult<bool> {
        Ok(self.tables.read().principals.values().any(|p| {
            Some(p.id) != excluding
                && p.school_id.as_ref() == Some(school_id)
                && p.admission_number.as_deref() == Some(admission_number)
        }))
    }

    async fn update_principal(&self, principal: &Principal) -> StoreResult<()> {
        let mut t = self.tables.write();
        match t.principals.get(&principal.id) {
            Some(stored) if stored.school_id == principal.school_id => {}
            _ => return Err(StoreError::NotFound),
        }
        t.check_principal_unique(principal)?;
        t.principals.insert(
            principal.id,
            Principal {
                updated_at: Utc::now(),
                ..principal.clone()
            },
        );
        Ok(())
    }

    async fn record_login(&self, id: PrincipalId, at: DateTime<Utc>) -> StoreResult<()> {
        let mut t = self.tables.write();
        let p = t.principals.get_mut(&id).ok_or(StoreError::NotFound)?;
        p.last_login = Some(at);
        Ok(())
    }
}

#[async_trait]
impl ClassRepository for MemoryStore {
    async fn insert_class(&self, class: &Class) -> StoreResult<()> {
        self.tables.write().classes.insert(class.id, class.clone());
        Ok(())
    }

    async fn find_class(&self, school_id: &SchoolId, id: ClassId) -> StoreResult<Option<Class>> {
        Ok(self
            .tables
            .read()
            .classes
            .get(&id)
            .filter(|c| &c.school_id == school_id)
            .cloned())
    }

    async fn list_classes(&self, school_id: &SchoolId) -> StoreResult<Vec<Class>> {
        let mut list: Vec<Class> = self
            .tables
            .read()
            .classes
            .values()
            .filter(|c| &c.school_id == school_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| (&a.name, &a.section).cmp(&(&b.name, &b.section)));
        Ok(list)
    }

    async fn update_class(&self, class: &Class) -> StoreResult<()> {
        let mut t = self.tables.write();
        let stored = t
            .classes
            .get_mut(&class.id)
            .filter(|c| c.school_id == class.school_id)
            .ok_or(StoreError::NotFound)?;
        *stored = Class {
            updated_at: Utc::now(),
            ..class.clone()
        };
        Ok(())
    }

    async fn delete_class(&self, school_id: &SchoolId, id: ClassId) -> StoreResult<()> {
        let mut t = self.tables.write();
        if !t.classes.get(&id).is_some_and(|c| &c.school_id == school_id) {
            return Err(StoreError::NotFound);
        }
        if t.attendance.values().any(|a| a.class_id == id)
            || t.fees.values().any(|f| f.class_id == id)
        {
            return Err(StoreError::InUse(CLASS_HAS_HISTORY));
        }
        t.classes.remove(&id);
        t.timetable.retain(|_, e| e.class_id != id);
        for p in t.principals.values_mut() {
            if p.class_id == Some(id) {
                p.class_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl TimetableRepository for MemoryStore {
    async fn insert_entry(&self, entry: &TimetableEntry) -> StoreResult<()> {
        let mut t = self.tables.write();
        if t.slot_occupant(&entry.slot(), None).is_some() {
            return Err(StoreError::Conflict(Duplicate::TimetableSlot));
        }
        t.timetable.insert(entry.id, entry.clone());
        Ok(())
    }

    async fn find_entry(
        &self,
        school_id: &SchoolId,
        id: TimetableEntryId,
    ) -> StoreResult<Option<TimetableEntry>> {
        Ok(self
            .tables
            .read()
            .timetable
            .get(&id)
            .filter(|e| &e.school_id == school_id)
            .cloned())
    }

    async fn find_slot_occupant(
        &self,
        slot: &TimetableSlot,
        excluding: Option<TimetableEntryId>,
    ) -> StoreResult<Option<TimetableEntry>> {
        Ok(self.tables.read().slot_occupant(slot, excluding).cloned())
    }

    async fn list_entries(
        &self,
        school_id: &SchoolId,
        class_id: Option<ClassId>,
    ) -> StoreResult<Vec<TimetableEntry>> {
        let mut list: Vec<TimetableEntry> = self
            .tables
            .read()
            .timetable
            .values()
            .filter(|e| &e.school_id == school_id)
            .filter(|e| class_id.is_none_or(|c| e.class_id == c))
            .cloned()
            .collect();
        list.sort_by_key(|e| (e.day, e.period));
        Ok(list)
    }

    async fn update_entry(&self, entry: &TimetableEntry) -> StoreResult<()> {
        let mut t = self.tables.write();
        if !t
            .timetable
            .get(&entry.id)
            .is_some_and(|e| e.school_id == entry.school_id)
        {
            return Err(StoreError::NotFound);
        }
        if t.slot_occupant(&entry.slot(), Some(entry.id)).is_some() {
            return Err(StoreError::Conflict(Duplicate::TimetableSlot));
        }
        t.timetable.insert(
            entry.id,
            TimetableEntry {
                updated_at: Utc::now(),
                ..entry.clone()
            },
        );
        Ok(())
    }

    async fn delete_entry(&self, school_id: &SchoolId, id: TimetableEntryId) -> StoreResult<()> {
        let mut t = self.tables.write();
        match t.timetable.get(&id) {
            Some(e) if &e.school_id == school_id => {
                t.timetable.remove(&id);
                Ok(())
            }
            _ => Err(StoreError::NotFound),
        }
    }
}

#[async_trait]
impl AttendanceRepository for MemoryStore {
    async fn record_attendance(
        &self,
        records: Vec<Attendance>,
        policy: AttendancePolicy,
    ) -> StoreResult<Vec<Attendance>> {
        let mut t = self.tables.write();
        let mut saved = Vec::with_capacity(records.len());
        for record in records {
            let existing = match policy {
                AttendancePolicy::Append => None,
                AttendancePolicy::Upsert => t
                    .attendance
                    .values_mut()
                    .find(|a| {
                        a.school_id == record.school_id
                            && a.class_id == record.class_id
                            && a.student_id == record.student_id
                            && a.date == record.date
                    }),
            };
            match existing {
                Some(current) => {
                    current.status = record.status;
                    current.remarks = record.remarks;
                    current.marked_by = record.marked_by;
                    current.updated_at = Utc::now();
                    saved.push(current.clone());
                }
                None => {
                    t.attendance.insert(record.id, record.clone());
                    saved.push(record);
                }
            }
        }
        Ok(saved)
    }

    async fn find_attendance(
        &self,
        school_id: &SchoolId,
        id: AttendanceId,
    ) -> StoreResult<Option<Attendance>> {
        Ok(self
            .tables
            .read()
            .attendance
            .get(&id)
            .filter(|a| &a.school_id == school_id)
            .cloned())
    }

    async fn update_attendance(&self, record: &Attendance) -> StoreResult<()> {
        let mut t = self.tables.write();
        let stored = t
            .attendance
            .get_mut(&record.id)
            .filter(|a| a.school_id == record.school_id)
            .ok_or(StoreError::NotFound)?;
        *stored = Attendance {
            updated_at: Utc::now(),
            ..record.clone()
        };
        Ok(())
    }

    async fn list_class_attendance(
        &self,
        school_id: &SchoolId,
        class_id: ClassId,
        date: NaiveDate,
    ) -> StoreResult<Vec<Attendance>> {
        let mut list: Vec<Attendance> = self
            .tables
            .read()
            .attendance
            .values()
            .filter(|a| &a.school_id == school_id && a.class_id == class_id && a.date == date)
            .cloned()
            .collect();
        list.sort_by_key(|a| a.created_at);
        Ok(list)
    }

    async fn list_student_attendance(
        &self,
        school_id: &SchoolId,
        student_id: PrincipalId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> StoreResult<Vec<Attendance>> {
        let mut list: Vec<Attendance> = self
            .tables
            .read()
            .attendance
            .values()
            .filter(|a| &a.school_id == school_id && a.student_id == student_id)
            .filter(|a| from.is_none_or(|d| a.date >= d) && to.is_none_or(|d| a.date <= d))
            .cloned()
            .collect();
        list.sort_by(|a, b| (b.date, b.created_at).cmp(&(a.date, a.created_at)));
        Ok(list)
    }
}

#[async_trait]
impl FeeRepository for MemoryStore {
    async fn insert_fee(&self, fee: &Fee) -> StoreResult<()> {
        self.tables.write().fees.insert(fee.id, fee.clone());
        Ok(())
    }

    async fn find_fee(&self, school_id: &SchoolId, id: FeeId) -> StoreResult<Option<Fee>> {
        Ok(self
            .tables
            .read()
            .fees
            .get(&id)
            .filter(|f| &f.school_id == school_id)
            .cloned())
    }

    async fn list_class_fees(
        &self,
        school_id: &SchoolId,
        class_id: ClassId,
    ) -> StoreResult<Vec<Fee>> {
        let mut list: Vec<Fee> = self
            .tables
            .read()
            .fees
            .values()
            .filter(|f| &f.school_id == school_id && f.class_id == class_id)
            .cloned()
            .collect();
        list.sort_by_key(|f| (f.due_date, f.created_at));
        Ok(list)
    }

    async fn list_student_fees(
        &self,
        school_id: &SchoolId,
        student_id: PrincipalId,
    ) -> StoreResult<Vec<Fee>> {
        let mut list: Vec<Fee> = self
            .tables
            .read()
            .fees
            .values()
            .filter(|f| &f.school_id == school_id && f.student_id == student_id)
            .cloned()
            .collect();
        list.sort_by_key(|f| (f.due_date, f.created_at));
        Ok(list)
    }

    async fn update_fee(&self, fee: &Fee) -> StoreResult<()> {
        let mut t = self.tables.write();
        let stored = t
            .fees
            .get_mut(&fee.id)
            .filter(|f| f.school_id == fee.school_id)
            .ok_or(StoreError::NotFound)?;
        *stored = Fee {
            updated_at: Utc::now(),
            ..fee.clone()
        };
        Ok(())
    }

    async fn delete_fee(&self, school_id: &SchoolId, id: FeeId) -> StoreResult<()> {
        let mut t = self.tables.write();
        match t.fees.get(&id) {
            Some(f) if &f.school_id == school_id => {
                t.fees.remove(&id);
                Ok(())
            }
            _ => Err(StoreError::NotFound),
        }
    }
}

#[async_trait]
impl StatsRepository for MemoryStore {
    async fn school_stats(
        &self,
        school_id: &SchoolId,
        today: NaiveDate,
    ) -> StoreResult<SchoolStats> {
        let t = self.tables.read();
        let count_role = |role: Role| {
            t.principals
                .values()
                .filter(|p| p.school_id.as_ref() == Some(school_id) && p.role == role && p.is_active)
                .count() as i64
        };
        Ok(SchoolStats {
            total_teachers: count_role(Role::Teacher),
            total_students: count_role(Role::Student),
            total_classes: t
                .classes
                .values()
                .filter(|c| &c.school_id == school_id)
                .count() as i64,
            total_attendance: t
                .attendance
                .values()
                .filter(|a| &a.school_id == school_id && a.date == today)
                .count() as i64,
            total_fees: t
                .fees
                .values()
                .filter(|f| &f.school_id == school_id && f.status != FeeStatus::Paid)
                .map(Fee::outstanding)
                .sum(),
        })
    }

    async fn platform_stats(&self) -> StoreResult<PlatformStats> {
        let t = self.tables.read();
        let active: Vec<&Principal> = t.principals.values().filter(|p| p.is_active).collect();
        let count_role = |role: Role| active.iter().filter(|p| p.role == role).count() as i64;
        Ok(PlatformStats {
            total_schools: t.schools.values().filter(|s| s.is_active).count() as i64,
            total_users: active.len() as i64,
            user_breakdown: UserBreakdown {
                admins: count_role(Role::Admin),
                teachers: count_role(Role::Teacher),
                students: count_role(Role::Student),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use schoolhub_models::attendance::{AttendanceMark, AttendanceStatus};
    use schoolhub_models::timetable::Weekday;

    fn school(code: &str) -> School {
        let now = Utc::now();
        School {
            school_id: SchoolId::new(code),
            name: format!("School {}", code),
            address: "1 Main St".into(),
            contact_email: format!("office@{}.test", code.to_lowercase()),
            contact_phone: "555-0100".into(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn member(role: Role, code: &str, login: &str, email: &str) -> Principal {
        Principal::new(role, Some(SchoolId::new(code)), login, email, "hash", "A", "B")
    }

    fn entry(code: &str, class_id: ClassId, day: Weekday, period: i32) -> TimetableEntry {
        let now = Utc::now();
        TimetableEntry {
            id: TimetableEntryId::new(),
            school_id: SchoolId::new(code),
            class_id,
            day,
            period,
            subject: "Maths".into(),
            teacher_id: None,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(9, 45, 0).unwrap(),
            room: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn school_with_admin_is_all_or_nothing() {
        let store = MemoryStore::new();
        store
            .insert_principal(&member(Role::Teacher, "X", "11111", "taken@test.local"))
            .await
            .unwrap();

        let admin = member(Role::Admin, "GF", "02412345", "taken@test.local");
        let err = store
            .insert_school_with_admin(&school("GF"), &admin)
            .await
            .unwrap_err();
        assert!(err.is_conflict(Duplicate::Email));
        assert!(store.find_school(&SchoolId::new("GF")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deactivation_cascades_to_principals() {
        let store = MemoryStore::new();
        let admin = member(Role::Admin, "GF", "1", "a@test.local");
        store
            .insert_school_with_admin(&school("GF"), &admin)
            .await
            .unwrap();
        store
            .insert_principal(&member(Role::Teacher, "GF", "2", "t@test.local"))
            .await
            .unwrap();
        store
            .insert_principal(&member(Role::Teacher, "OTHER", "3", "o@test.local"))
            .await
            .unwrap();

        let count = store.deactivate_school(&SchoolId::new("GF")).await.unwrap();
        assert_eq!(count, 2);
        let admin = store.find_principal(admin.id).await.unwrap().unwrap();
        assert!(!admin.is_active);
        assert!(store.list_active_schools().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn login_ids_are_unique_per_school_only() {
        let store = MemoryStore::new();
        store
            .insert_principal(&member(Role::Teacher, "A", "12345", "a@test.local"))
            .await
            .unwrap();
        store
            .insert_principal(&member(Role::Teacher, "B", "12345", "b@test.local"))
            .await
            .unwrap();
        let err = store
            .insert_principal(&member(Role::Teacher, "A", "12345", "c@test.local"))
            .await
            .unwrap_err();
        assert!(err.is_conflict(Duplicate::LoginId));
    }

    #[tokio::test]
    async fn occupied_slot_rejects_second_entry() {
        let store = MemoryStore::new();
        let class_id = ClassId::new();
        store
            .insert_entry(&entry("A", class_id, Weekday::Monday, 1))
            .await
            .unwrap();
        let err = store
            .insert_entry(&entry("A", class_id, Weekday::Monday, 1))
            .await
            .unwrap_err();
        assert!(err.is_conflict(Duplicate::TimetableSlot));

        // Same slot in another class is free.
        store
            .insert_entry(&entry("A", ClassId::new(), Weekday::Monday, 1))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn updating_an_entry_in_place_is_not_a_conflict() {
        let store = MemoryStore::new();
        let mut e = entry("A", ClassId::new(), Weekday::Friday, 3);
        store.insert_entry(&e).await.unwrap();
        e.room = Some("Lab".into());
        store.update_entry(&e).await.unwrap();
        let stored = store.find_entry(&e.school_id, e.id).await.unwrap().unwrap();
        assert_eq!(stored.room.as_deref(), Some("Lab"));
    }

    #[tokio::test]
    async fn attendance_policies() {
        let store = MemoryStore::new();
        let school_id = SchoolId::new("A");
        let class_id = ClassId::new();
        let student = PrincipalId::new();
        let date = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
        let mark = |status| {
            Attendance::new(
                school_id.clone(),
                class_id,
                date,
                AttendanceMark {
                    student_id: student,
                    status,
                    remarks: None,
                },
                PrincipalId::new(),
            )
        };

        store
            .record_attendance(vec![mark(AttendanceStatus::Absent)], AttendancePolicy::Upsert)
            .await
            .unwrap();
        store
            .record_attendance(vec![mark(AttendanceStatus::Late)], AttendancePolicy::Upsert)
            .await
            .unwrap();
        let day = store
            .list_class_attendance(&school_id, class_id, date)
            .await
            .unwrap();
        assert_eq!(day.len(), 1);
        assert_eq!(day[0].status, AttendanceStatus::Late);

        store
            .record_attendance(vec![mark(AttendanceStatus::Present)], AttendancePolicy::Append)
            .await
            .unwrap();
        let day = store
            .list_class_attendance(&school_id, class_id, date)
            .await
            .unwrap();
        assert_eq!(day.len(), 2);
    }
}
