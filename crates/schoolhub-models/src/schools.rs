//! School (tenant) models and DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::ids::SchoolId;

/// A school. Never hard-deleted; deactivation flips `is_active`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub school_id: SchoolId,
    pub name: String,
    pub address: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub(crate) fn validate_school_code(code: &SchoolId) -> Result<(), ValidationError> {
    if SchoolId::is_well_formed(code.as_str()) {
        Ok(())
    } else {
        Err(ValidationError::new("school_id").with_message(
            "schoolId must be 2-32 letters, digits, '-' or '_'".into(),
        ))
    }
}

/// Body of `POST /api/auth/register-school`.
///
/// Creates the school and its first admin. The admin's login id and password
/// are generated; `admissionDate` only contributes its year to the login id.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSchoolDto {
    #[validate(length(min = 1, max = 200, message = "name is required"))]
    pub name: String,
    #[validate(custom(function = "validate_school_code"))]
    pub school_id: SchoolId,
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
    #[validate(email(message = "contactEmail must be a valid email"))]
    pub contact_email: String,
    #[validate(length(min = 1, message = "contactPhone is required"))]
    pub contact_phone: String,
    #[validate(email(message = "adminEmail must be a valid email"))]
    pub admin_email: String,
    #[validate(length(min = 1, message = "adminFirstName is required"))]
    pub admin_first_name: String,
    #[validate(length(min = 1, message = "adminLastName is required"))]
    pub admin_last_name: String,
    pub admission_date: Option<NaiveDate>,
}

/// Body of `POST /api/schools/{schoolId}/admins`: an extra admin for a
/// school that already exists. Credentials are generated as for the first one.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSchoolAdminDto {
    #[validate(length(min = 1, max = 100, message = "firstName is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "lastName is required"))]
    pub last_name: String,
    #[validate(email(message = "email must be a valid email"))]
    pub email: String,
    #[validate(length(min = 1, max = 32))]
    pub phone: Option<String>,
    pub admission_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSchoolDto {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub address: Option<String>,
    #[validate(email(message = "contactEmail must be a valid email"))]
    pub contact_email: Option<String>,
    #[validate(length(min = 1))]
    pub contact_phone: Option<String>,
}

impl UpdateSchoolDto {
    pub fn apply(self, school: &mut School) {
        if let Some(name) = self.name {
            school.name = name;
        }
        if let Some(address) = self.address {
            school.address = address;
        }
        if let Some(email) = self.contact_email {
            school.contact_email = email;
        }
        if let Some(phone) = self.contact_phone {
            school.contact_phone = phone;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeactivateSchoolResponse {
    pub message: String,
    pub deactivated_users: u64,
}
