use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{ClassId, PrincipalId, SchoolId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: ClassId,
    pub school_id: SchoolId,
    pub name: String,
    pub section: String,
    pub capacity: i32,
    /// Homeroom teacher; always a teacher of the same school.
    pub teacher_id: Option<PrincipalId>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClassDto {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 20, message = "section is required"))]
    pub section: String,
    #[validate(range(min = 1, max = 1000, message = "capacity must be at least 1"))]
    pub capacity: i32,
    pub teacher_id: Option<PrincipalId>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClassDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub section: Option<String>,
    #[validate(range(min = 1, max = 1000, message = "capacity must be at least 1"))]
    pub capacity: Option<i32>,
    pub teacher_id: Option<PrincipalId>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

impl UpdateClassDto {
    pub fn apply(self, class: &mut Class) {
        if let Some(v) = self.name {
            class.name = v;
        }
        if let Some(v) = self.section {
            class.section = v;
        }
        if let Some(v) = self.capacity {
            class.capacity = v;
        }
        if let Some(v) = self.teacher_id {
            class.teacher_id = Some(v);
        }
        if let Some(v) = self.description {
            class.description = Some(v);
        }
    }
}
