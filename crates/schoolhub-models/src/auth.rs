use schoolhub_core::Role;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{PrincipalId, SchoolId};
use crate::principals::{IssuedCredentials, Principal, PrincipalProfile};
use crate::schools::School;

/// Body of `POST /api/auth/login`.
///
/// `userId` is the generated login id; an email address is accepted too.
/// Without `schoolId` (or with role `SUPER_ADMIN`) the super-admin namespace is
/// searched.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "userId is required"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    pub school_id: Option<SchoolId>,
    pub role: Option<Role>,
}

impl LoginRequest {
    pub fn targets_super_admin(&self) -> bool {
        self.role == Some(Role::SuperAdmin)
            || self
                .school_id
                .as_ref()
                .is_none_or(|id| id.as_str().trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    pub id: PrincipalId,
    pub user_id: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_id: Option<SchoolId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<&Principal> for LoginUser {
    fn from(p: &Principal) -> Self {
        Self {
            id: p.id,
            user_id: p.login_id.clone(),
            role: p.role,
            school_id: p.school_id.clone(),
            first_name: p.first_name.clone(),
            last_name: p.last_name.clone(),
            email: p.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckSuperAdminResponse {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSchoolResponse {
    pub message: String,
    pub school: School,
    pub user: PrincipalProfile,
    pub credentials: IssuedCredentials,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn login(body: serde_json::Value) -> LoginRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn missing_school_targets_super_admin() {
        assert!(login(json!({"userId": "121", "password": "x"})).targets_super_admin());
        assert!(
            login(json!({"userId": "121", "password": "x", "schoolId": ""})).targets_super_admin()
        );
    }

    #[test]
    fn explicit_super_admin_role_wins() {
        let req = login(json!({
            "userId": "121",
            "password": "x",
            "schoolId": "GF-01",
            "role": "SUPER_ADMIN"
        }));
        assert!(req.targets_super_admin());
    }

    #[test]
    fn school_login_targets_tenant() {
        let req = login(json!({"userId": "02412345", "password": "x", "schoolId": "GF-01"}));
        assert!(!req.targets_super_admin());
    }

    #[test]
    fn unknown_role_is_rejected() {
        let result = serde_json::from_value::<LoginRequest>(json!({
            "userId": "1",
            "password": "x",
            "role": "PRINCIPAL"
        }));
        assert!(result.is_err());
    }
}
