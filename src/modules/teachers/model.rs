use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use schoolhub_models::principals::{
    CreateTeacherDto, IssuedCredentials, PrincipalProfile, UpdateTeacherDto,
};

/// Returned once, when the teacher is created.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeacherCreatedResponse {
    pub teacher: PrincipalProfile,
    pub credentials: IssuedCredentials,
}
