use anyhow::anyhow;
use chrono::{Datelike, Utc};
use schoolhub_core::credentials::LoginIdKind;
use schoolhub_core::{AppError, Role};
use schoolhub_db::{Store, TenantStore};
use schoolhub_models::SchoolId;
use schoolhub_models::principals::Principal;
use tracing::{info, instrument};

use super::model::{
    CreateSchoolAdminDto, DeactivateSchoolResponse, School, SchoolAdminCreatedResponse,
    UpdateSchoolDto,
};
use crate::state::AppState;
use crate::utils::provisioning::{Destination, credential_notice, dispatch_credentials, provision};

pub struct SchoolService;

impl SchoolService {
    #[instrument(skip(store), fields(db.operation = "SELECT", db.table = "schools"))]
    pub async fn list_schools(store: &dyn Store) -> Result<Vec<School>, AppError> {
        Ok(store.list_active_schools().await?)
    }

    #[instrument(skip(store), fields(db.operation = "SELECT", db.table = "schools"))]
    pub async fn get_school(store: &dyn Store, school_id: &SchoolId) -> Result<School, AppError> {
        store
            .find_school(school_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("School not found")))
    }

    #[instrument(skip(store, dto), fields(db.operation = "UPDATE", db.table = "schools"))]
    pub async fn update_school(
        store: &dyn Store,
        school_id: &SchoolId,
        dto: UpdateSchoolDto,
    ) -> Result<School, AppError> {
        let mut school = Self::get_school(store, school_id).await?;
        dto.apply(&mut school);
        school.updated_at = Utc::now();

        store.update_school(&school).await?;
        info!(school.id = %school_id, "School updated");
        Ok(school)
    }

    /// Soft deactivation. The school and every principal in it are switched
    /// off together, so none of them can log in afterwards.
    #[instrument(skip(store), fields(db.operation = "UPDATE", db.table = "schools"))]
    pub async fn deactivate_school(
        store: &dyn Store,
        school_id: &SchoolId,
    ) -> Result<DeactivateSchoolResponse, AppError> {
        Self::get_school(store, school_id).await?;

        let deactivated_users = store.deactivate_school(school_id).await?;
        info!(school.id = %school_id, deactivated_users, "School deactivated");

        Ok(DeactivateSchoolResponse {
            message: "School deactivated successfully".to_string(),
            deactivated_users,
        })
    }

    /// Adds another admin to an active school. The login id follows the same
    /// scheme as the admin created with the school.
    #[instrument(skip(state, dto), fields(school.id = %school_id))]
    pub async fn create_admin(
        state: &AppState,
        school_id: &SchoolId,
        dto: CreateSchoolAdminDto,
    ) -> Result<SchoolAdminCreatedResponse, AppError> {
        let school = Self::get_school(state.store.as_ref(), school_id).await?;
        if !school.is_active {
            return Err(AppError::not_found(anyhow!("School not found")));
        }

        let admission_year = dto.admission_date.map_or(Utc::now().year(), |d| d.year());
        let mut admin = Principal::new(
            Role::Admin,
            Some(school.school_id.clone()),
            "",
            dto.email,
            "",
            dto.first_name,
            dto.last_name,
        );
        admin.phone = dto.phone;

        let tenant = TenantStore::new(state.store.clone(), school.school_id.clone());
        let (admin, credentials) = provision(
            Destination::School(&tenant),
            admin,
            LoginIdKind::Student { admission_year },
            state.password_config.bcrypt_cost,
        )
        .await?;

        dispatch_credentials(
            state.notifier.clone(),
            credential_notice(&admin, &credentials, &school.name),
        );
        info!(principal.id = %admin.id, "School admin created");

        Ok(SchoolAdminCreatedResponse {
            message: "Admin created successfully".to_string(),
            admin: admin.into(),
            credentials,
        })
    }
}
