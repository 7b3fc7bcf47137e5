//! Fake record generation. Nothing here touches the store.

use std::collections::HashSet;

use anyhow::anyhow;
use chrono::{Datelike, Utc};
use fake::Fake;
use fake::faker::address::en::{CityName, StreetName};
use fake::faker::company::en::CompanyName;
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::PhoneNumber;
use rayon::prelude::*;
use schoolhub_core::credentials::{LoginIdKind, generate_login_id};
use schoolhub_core::{Role, hash_password};
use schoolhub_models::classes::Class;
use schoolhub_models::principals::Principal;
use schoolhub_models::schools::School;
use schoolhub_models::{ClassId, PrincipalId, SchoolId};

const SUBJECTS: &[&str] = &[
    "Mathematics",
    "English",
    "Physics",
    "Chemistry",
    "Biology",
    "History",
    "Geography",
    "Art",
];

fn slug(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

pub fn seed_school_id(index: usize) -> SchoolId {
    SchoolId::new(format!("SEED-{:03}", index + 1))
}

pub fn school(index: usize) -> School {
    let now = Utc::now();
    let name: String = CompanyName().fake();
    let street: String = StreetName().fake();
    let city: String = CityName().fake();
    let school_id = seed_school_id(index);

    School {
        contact_email: format!("office@{}.example.com", slug(school_id.as_str())),
        school_id,
        name: format!("{} Academy", name),
        address: format!("{} {}, {}", index + 1, street, city),
        contact_phone: PhoneNumber().fake(),
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

fn login_kind(role: Role) -> LoginIdKind {
    match role {
        Role::Teacher => LoginIdKind::Teacher,
        Role::SuperAdmin | Role::Admin | Role::Student => LoginIdKind::Student {
            admission_year: Utc::now().year(),
        },
    }
}

/// Draws login ids until one is not in `taken`.
fn unique_login_id(kind: LoginIdKind, taken: &mut HashSet<String>) -> String {
    loop {
        let id = generate_login_id(kind);
        if taken.insert(id.clone()) {
            return id;
        }
    }
}

/// `count` principals of `role` for one school, with unhashed passwords.
pub fn principals(
    school_id: &SchoolId,
    school_index: usize,
    role: Role,
    count: usize,
    taken: &mut HashSet<String>,
) -> Vec<Principal> {
    let kind = login_kind(role);
    (0..count)
        .map(|i| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            let email = format!(
                "{}.{}+{}{}x{}@example.com",
                slug(&first_name),
                slug(&last_name),
                role.as_str().to_lowercase(),
                school_index,
                i
            );

            let mut principal = Principal::new(
                role,
                Some(school_id.clone()),
                unique_login_id(kind, taken),
                email,
                "",
                first_name,
                last_name,
            );
            match role {
                Role::Teacher => {
                    principal.subject = Some(SUBJECTS[i % SUBJECTS.len()].to_string());
                    principal.joining_date = Some(Utc::now().date_naive());
                }
                Role::Student => {
                    principal.admission_number = Some(format!("ADM-{:05}", i + 1));
                    principal.admission_year = Some(Utc::now().year());
                }
                Role::SuperAdmin | Role::Admin => {}
            }
            principal
        })
        .collect()
}

/// Classes named "Grade N" with rotating sections and homeroom teachers.
pub fn classes(school_id: &SchoolId, count: usize, teachers: &[PrincipalId]) -> Vec<Class> {
    let now = Utc::now();
    (0..count)
        .map(|i| Class {
            id: ClassId::new(),
            school_id: school_id.clone(),
            name: format!("Grade {}", i / 2 + 1),
            section: if i % 2 == 0 { "A" } else { "B" }.to_string(),
            capacity: 30,
            teacher_id: (!teachers.is_empty()).then(|| teachers[i % teachers.len()]),
            description: None,
            created_at: now,
            updated_at: now,
        })
        .collect()
}

/// Hashes `password` for every principal in parallel. bcrypt dominates
/// seeding time, so this is the part worth spreading over cores.
pub fn hash_passwords(
    principals: &mut [Principal],
    password: &str,
    bcrypt_cost: u32,
) -> anyhow::Result<()> {
    principals.par_iter_mut().try_for_each(|p| {
        p.password_hash = hash_password(password, bcrypt_cost)
            .map_err(|e| anyhow!("Failed to hash password: {}", e))?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolhub_core::verify_password;

    #[test]
    fn login_ids_are_unique_within_a_school() {
        let school_id = seed_school_id(0);
        let mut taken = HashSet::new();
        let teachers = principals(&school_id, 0, Role::Teacher, 50, &mut taken);
        let students = principals(&school_id, 0, Role::Student, 50, &mut taken);

        let ids: HashSet<_> = teachers
            .iter()
            .chain(&students)
            .map(|p| p.login_id.clone())
            .collect();
        assert_eq!(ids.len(), 100);
        assert!(teachers.iter().all(|t| t.login_id.len() == 5));
        assert!(students.iter().all(|s| s.login_id.len() == 8));
    }

    #[test]
    fn emails_are_distinct() {
        let school_id = seed_school_id(2);
        let mut taken = HashSet::new();
        let people = principals(&school_id, 2, Role::Student, 30, &mut taken);
        let emails: HashSet<_> = people.iter().map(|p| p.email.clone()).collect();
        assert_eq!(emails.len(), 30);
    }

    #[test]
    fn hashes_every_password() {
        let school_id = seed_school_id(1);
        let mut taken = HashSet::new();
        let mut people = principals(&school_id, 1, Role::Teacher, 3, &mut taken);
        hash_passwords(&mut people, "password123", 4).unwrap();
        for p in &people {
            assert!(verify_password("password123", &p.password_hash).unwrap());
        }
    }

    #[test]
    fn classes_rotate_homeroom_teachers() {
        let teachers = [PrincipalId::new(), PrincipalId::new()];
        let list = classes(&seed_school_id(0), 3, &teachers);
        assert_eq!(list[0].teacher_id, Some(teachers[0]));
        assert_eq!(list[1].teacher_id, Some(teachers[1]));
        assert_eq!(list[2].teacher_id, Some(teachers[0]));
        assert_eq!(list[2].name, "Grade 2");
    }
}
