//! Principal (authenticated actor) models and DTOs.
//!
//! Super-admins, school admins, teachers and students share one record shape.
//! Teacher- and student-specific profile fields are optional columns that stay
//! empty for the other roles.

use chrono::{DateTime, NaiveDate, Utc};
use schoolhub_core::Role;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{ClassId, PrincipalId, SchoolId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "gender", rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// A stored principal. Carries the password hash, so it is never serialized
/// directly; API responses use [`PrincipalProfile`].
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Principal {
    pub id: PrincipalId,
    /// Login identifier, unique within the school (`userId` on the wire).
    pub login_id: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    /// `None` only for SUPER_ADMIN.
    pub school_id: Option<SchoolId>,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub image: Option<String>,
    pub subject: Option<String>,
    pub qualification: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub class_id: Option<ClassId>,
    pub admission_number: Option<String>,
    pub admission_year: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Principal {
    /// A blank record for `role`; callers fill in the profile before inserting.
    pub fn new(
        role: Role,
        school_id: Option<SchoolId>,
        login_id: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: PrincipalId::new(),
            login_id: login_id.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            role,
            school_id,
            is_active: true,
            last_login: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: None,
            image: None,
            subject: None,
            qualification: None,
            joining_date: None,
            date_of_birth: None,
            gender: None,
            address: None,
            class_id: None,
            admission_number: None,
            admission_year: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Public view of a principal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalProfile {
    pub id: PrincipalId,
    pub user_id: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_id: Option<SchoolId>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joining_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<ClassId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admission_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admission_year: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<&Principal> for PrincipalProfile {
    fn from(p: &Principal) -> Self {
        Self {
            id: p.id,
            user_id: p.login_id.clone(),
            email: p.email.clone(),
            role: p.role,
            school_id: p.school_id.clone(),
            is_active: p.is_active,
            last_login: p.last_login,
            first_name: p.first_name.clone(),
            last_name: p.last_name.clone(),
            phone: p.phone.clone(),
            image: p.image.clone(),
            subject: p.subject.clone(),
            qualification: p.qualification.clone(),
            joining_date: p.joining_date,
            date_of_birth: p.date_of_birth,
            gender: p.gender,
            address: p.address.clone(),
            class_id: p.class_id,
            admission_number: p.admission_number.clone(),
            admission_year: p.admission_year,
            created_at: p.created_at,
        }
    }
}

impl From<Principal> for PrincipalProfile {
    fn from(p: Principal) -> Self {
        Self::from(&p)
    }
}

/// One-time credentials handed back to the creator of a new principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssuedCredentials {
    pub user_id: String,
    pub password: String,
}

/// Response for endpoints that create a principal.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionedPrincipal {
    pub user: PrincipalProfile,
    pub credentials: IssuedCredentials,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeacherDto {
    #[validate(length(min = 1, max = 100, message = "firstName is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "lastName is required"))]
    pub last_name: String,
    #[validate(email(message = "email must be a valid email"))]
    pub email: String,
    #[validate(length(min = 1, max = 32))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub subject: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub qualification: Option<String>,
    pub joining_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeacherDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email(message = "email must be a valid email"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub subject: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub qualification: Option<String>,
    pub joining_date: Option<NaiveDate>,
}

impl UpdateTeacherDto {
    pub fn apply(self, teacher: &mut Principal) {
        if let Some(v) = self.first_name {
            teacher.first_name = v;
        }
        if let Some(v) = self.last_name {
            teacher.last_name = v;
        }
        if let Some(v) = self.email {
            teacher.email = v;
        }
        if let Some(v) = self.phone {
            teacher.phone = Some(v);
        }
        if let Some(v) = self.subject {
            teacher.subject = Some(v);
        }
        if let Some(v) = self.qualification {
            teacher.qualification = Some(v);
        }
        if let Some(v) = self.joining_date {
            teacher.joining_date = Some(v);
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentDto {
    #[validate(length(min = 1, max = 100, message = "firstName is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "lastName is required"))]
    pub last_name: String,
    #[validate(email(message = "email must be a valid email"))]
    pub email: String,
    #[validate(length(min = 1, max = 32))]
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    #[validate(length(min = 1, max = 300))]
    pub address: Option<String>,
    pub class_id: Option<ClassId>,
    #[validate(length(min = 1, max = 50))]
    pub admission_number: Option<String>,
    #[validate(range(min = 1900, max = 2100, message = "admissionYear is out of range"))]
    pub admission_year: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email(message = "email must be a valid email"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    #[validate(length(min = 1, max = 300))]
    pub address: Option<String>,
    pub class_id: Option<ClassId>,
    #[validate(length(min = 1, max = 50))]
    pub admission_number: Option<String>,
}

impl UpdateStudentDto {
    pub fn apply(self, student: &mut Principal) {
        if let Some(v) = self.first_name {
            student.first_name = v;
        }
        if let Some(v) = self.last_name {
            student.last_name = v;
        }
        if let Some(v) = self.email {
            student.email = v;
        }
        if let Some(v) = self.phone {
            student.phone = Some(v);
        }
        if let Some(v) = self.date_of_birth {
            student.date_of_birth = Some(v);
        }
        if let Some(v) = self.gender {
            student.gender = Some(v);
        }
        if let Some(v) = self.address {
            student.address = Some(v);
        }
        if let Some(v) = self.class_id {
            student.class_id = Some(v);
        }
        if let Some(v) = self.admission_number {
            student.admission_number = Some(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teacher() -> Principal {
        Principal::new(
            Role::Teacher,
            Some(SchoolId::new("GF-01")),
            "48213",
            "t@gf.test",
            "$2b$04$hash",
            "Grace",
            "Hopper",
        )
    }

    #[test]
    fn profile_never_contains_password_hash() {
        let json = serde_json::to_value(PrincipalProfile::from(&teacher())).unwrap();
        let text = json.to_string();
        assert!(!text.contains("$2b$04$hash"));
        assert_eq!(json["userId"], "48213");
        assert_eq!(json["role"], "TEACHER");
        assert_eq!(json["schoolId"], "GF-01");
        assert!(json.get("gender").is_none());
    }

    #[test]
    fn update_only_touches_given_fields() {
        let mut t = teacher();
        UpdateTeacherDto {
            subject: Some("Physics".into()),
            ..Default::default()
        }
        .apply(&mut t);
        assert_eq!(t.subject.as_deref(), Some("Physics"));
        assert_eq!(t.first_name, "Grace");
        assert_eq!(t.email, "t@gf.test");
    }

    #[test]
    fn gender_is_lowercase_on_the_wire() {
        assert_eq!(serde_json::to_string(&Gender::Female).unwrap(), "\"female\"");
        assert!(serde_json::from_str::<Gender>("\"Female\"").is_err());
    }
}
