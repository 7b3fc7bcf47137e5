use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use schoolhub_models::principals::{IssuedCredentials, PrincipalProfile};
pub use schoolhub_models::schools::{
    CreateSchoolAdminDto, DeactivateSchoolResponse, School, UpdateSchoolDto,
};

/// Returned once, when an extra admin is added to a school.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchoolAdminCreatedResponse {
    pub message: String,
    pub admin: PrincipalProfile,
    pub credentials: IssuedCredentials,
}
