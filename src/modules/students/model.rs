use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use schoolhub_models::principals::{
    CreateStudentDto, IssuedCredentials, PrincipalProfile, UpdateStudentDto,
};

/// Returned once, when the student is created.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentCreatedResponse {
    pub student: PrincipalProfile,
    pub credentials: IssuedCredentials,
}
