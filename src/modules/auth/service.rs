use std::sync::OnceLock;

use chrono::{Datelike, Utc};
use schoolhub_auth::create_access_token;
use schoolhub_config::JwtConfig;
use schoolhub_core::credentials::LoginIdKind;
use schoolhub_core::{AppError, Role, hash_password, verify_password};
use schoolhub_db::Store;
use schoolhub_models::principals::Principal;
use schoolhub_models::schools::School;
use tracing::{info, instrument, warn};

use super::model::{
    CheckSuperAdminResponse, LoginRequest, LoginResponse, LoginUser, RegisterSchoolDto,
    RegisterSchoolResponse,
};
use crate::metrics::{track_login, track_school_registered};
use crate::state::AppState;
use crate::utils::provisioning::{Destination, credential_notice, dispatch_credentials, provision};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Hash checked when no account matches, so unknown and known login ids cost
/// the same bcrypt round.
fn decoy_hash(cost: u32) -> Option<&'static str> {
    static DECOY: OnceLock<Option<String>> = OnceLock::new();
    DECOY
        .get_or_init(|| hash_password("schoolhub-login-decoy", cost).ok())
        .as_deref()
}

pub struct AuthService;

impl AuthService {
    /// Finds the account a login request names, or `None`.
    ///
    /// Only active accounts of active schools are considered.
    async fn find_login_target(
        store: &dyn Store,
        dto: &LoginRequest,
    ) -> Result<Option<Principal>, AppError> {
        let login = dto.user_id.trim();

        let principal = match (&dto.school_id, dto.targets_super_admin()) {
            (Some(school_id), false) => {
                let school_active = store
                    .find_school(school_id)
                    .await?
                    .is_some_and(|s| s.is_active);
                if !school_active {
                    return Ok(None);
                }
                store.find_school_principal(school_id, login).await?
            }
            _ => store.find_super_admin(login).await?,
        };

        Ok(principal
            .filter(|p| p.is_active)
            .filter(|p| dto.role.is_none_or(|role| role == p.role)))
    }

    #[instrument(skip(store, jwt_config, dto), fields(user_id = %dto.user_id, school.id = ?dto.school_id))]
    pub async fn login(
        store: &dyn Store,
        jwt_config: &JwtConfig,
        bcrypt_cost: u32,
        dto: LoginRequest,
    ) -> Result<LoginResponse, AppError> {
        let Some(mut principal) = Self::find_login_target(store, &dto).await? else {
            if let Some(decoy) = decoy_hash(bcrypt_cost) {
                verify_password(&dto.password, decoy)?;
            }
            track_login("unknown_user");
            warn!("Login failed, no matching active account");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(&dto.password, &principal.password_hash)? {
            track_login("bad_password");
            warn!(principal.id = %principal.id, "Login failed, password mismatch");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let now = Utc::now();
        store.record_login(principal.id, now).await?;
        principal.last_login = Some(now);

        let token = create_access_token(principal.id.into_inner(), principal.role, jwt_config)?;

        track_login("success");
        info!(principal.id = %principal.id, role = principal.role.as_str(), "Login succeeded");

        Ok(LoginResponse {
            token,
            user: LoginUser::from(&principal),
        })
    }

    /// Creates a school together with its first admin.
    ///
    /// Both records are written in one store transaction; a taken school id
    /// or admin email leaves nothing behind.
    #[instrument(skip(state, dto), fields(school.id = %dto.school_id))]
    pub async fn register_school(
        state: &AppState,
        dto: RegisterSchoolDto,
    ) -> Result<RegisterSchoolResponse, AppError> {
        let now = Utc::now();
        let school = School {
            school_id: dto.school_id,
            name: dto.name,
            address: dto.address,
            contact_email: dto.contact_email,
            contact_phone: dto.contact_phone,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let admission_year = dto.admission_date.map_or(now.year(), |d| d.year());
        let admin = Principal::new(
            Role::Admin,
            Some(school.school_id.clone()),
            "",
            dto.admin_email,
            "",
            dto.admin_first_name,
            dto.admin_last_name,
        );

        let (admin, credentials) = provision(
            Destination::NewSchool {
                store: state.store.as_ref(),
                school: &school,
            },
            admin,
            LoginIdKind::Student { admission_year },
            state.password_config.bcrypt_cost,
        )
        .await?;

        dispatch_credentials(
            state.notifier.clone(),
            credential_notice(&admin, &credentials, &school.name),
        );

        track_school_registered();
        info!(principal.id = %admin.id, "School registered");

        Ok(RegisterSchoolResponse {
            message: "School registered successfully".to_string(),
            school,
            user: admin.into(),
            credentials,
        })
    }

    #[instrument(skip(store))]
    pub async fn check_super_admin(store: &dyn Store) -> Result<CheckSuperAdminResponse, AppError> {
        let found = store.first_super_admin().await?;
        Ok(CheckSuperAdminResponse {
            exists: found.is_some(),
            user_id: found.as_ref().map(|p| p.login_id.clone()),
            email: found.map(|p| p.email),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoy_hash_matches_no_password() {
        let decoy = decoy_hash(4).unwrap();
        assert!(decoy.starts_with("$2"));
        assert!(!verify_password("testpass123", decoy).unwrap());
        assert_eq!(decoy_hash(4), Some(decoy));
    }
}
