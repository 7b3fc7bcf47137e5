//! Fake data seeding.
//!
//! Each seeded school gets one admin, its teachers, classes and students.
//! Schools are coded `SEED-001`, `SEED-002`, ...; codes that already exist
//! are skipped, so seeding twice is harmless.

use std::collections::HashSet;
use std::time::Instant;

use schoolhub_core::Role;
use schoolhub_db::{ClassRepository, PrincipalRepository, SchoolRepository, Store};

pub mod generate;

/// Records per school.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub schools: usize,
    pub teachers: usize,
    pub students: usize,
    pub classes: usize,
}

impl SeedConfig {
    pub fn new(schools: usize) -> Self {
        Self {
            schools,
            teachers: 5,
            students: 50,
            classes: 4,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub schools: usize,
    pub skipped_schools: usize,
    pub principals: usize,
    pub classes: usize,
}

pub async fn seed(
    store: &dyn Store,
    config: &SeedConfig,
    password: &str,
    bcrypt_cost: u32,
) -> anyhow::Result<SeedReport> {
    let start = Instant::now();
    let mut report = SeedReport::default();

    println!(
        "🌱 Seeding {} schools ({} teachers, {} classes, {} students each)...",
        config.schools, config.teachers, config.classes, config.students
    );

    for index in 0..config.schools {
        let school = generate::school(index);
        if store.find_school(&school.school_id).await?.is_some() {
            println!("   ↷ {} already exists, skipping", school.school_id);
            report.skipped_schools += 1;
            continue;
        }

        let mut taken = HashSet::new();
        let id = &school.school_id;
        let mut people = generate::principals(id, index, Role::Admin, 1, &mut taken);
        people.extend(generate::principals(id, index, Role::Teacher, config.teachers, &mut taken));

        let teacher_ids: Vec<_> = people
            .iter()
            .filter(|p| p.role == Role::Teacher)
            .map(|p| p.id)
            .collect();
        let classes = generate::classes(id, config.classes, &teacher_ids);

        let mut students =
            generate::principals(id, index, Role::Student, config.students, &mut taken);
        if !classes.is_empty() {
            for (i, student) in students.iter_mut().enumerate() {
                student.class_id = Some(classes[i % classes.len()].id);
            }
        }
        people.extend(students);

        generate::hash_passwords(&mut people, password, bcrypt_cost)?;

        let mut people = people.into_iter();
        let Some(admin) = people.next() else {
            continue;
        };
        store.insert_school_with_admin(&school, &admin).await?;
        report.principals += 1;

        // Homeroom teachers must exist before their classes.
        let (teachers, students): (Vec<_>, Vec<_>) = people.partition(|p| p.role == Role::Teacher);
        for teacher in &teachers {
            store.insert_principal(teacher).await?;
        }
        for class in &classes {
            store.insert_class(class).await?;
        }
        for student in &students {
            store.insert_principal(student).await?;
        }

        report.schools += 1;
        report.principals += teachers.len() + students.len();
        report.classes += classes.len();
        println!(
            "   ✓ {} ({}) admin user ID {}",
            school.name, school.school_id, admin.login_id
        );
    }

    println!(
        "✅ Seeded {} schools, {} users and {} classes in {:?}",
        report.schools,
        report.principals,
        report.classes,
        start.elapsed()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolhub_db::MemoryStore;
    use schoolhub_models::SchoolId;

    fn small() -> SeedConfig {
        SeedConfig {
            schools: 2,
            teachers: 2,
            students: 3,
            classes: 2,
        }
    }

    #[tokio::test]
    async fn seeds_every_school_through_the_store() {
        let store = MemoryStore::new();
        let report = seed(&store, &small(), "password123", 4).await.unwrap();

        assert_eq!(report.schools, 2);
        assert_eq!(report.principals, 2 * (1 + 2 + 3));
        assert_eq!(report.classes, 4);

        let school = SchoolId::new("SEED-001");
        let students = store.list_principals(&school, Role::Student).await.unwrap();
        assert_eq!(students.len(), 3);
        assert!(students.iter().all(|s| s.class_id.is_some()));
        assert_eq!(store.list_classes(&school).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn reseeding_skips_existing_schools() {
        let store = MemoryStore::new();
        seed(&store, &small(), "password123", 4).await.unwrap();
        let again = seed(&store, &small(), "password123", 4).await.unwrap();
        assert_eq!(again.schools, 0);
        assert_eq!(again.skipped_schools, 2);
    }
}
