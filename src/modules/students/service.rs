use anyhow::anyhow;
use chrono::{Datelike, Utc};
use schoolhub_core::credentials::LoginIdKind;
use schoolhub_core::{AppError, Role};
use schoolhub_db::{Duplicate, StoreError, TenantStore};
use schoolhub_models::principals::Principal;
use schoolhub_models::{ClassId, PrincipalId};
use tracing::{info, instrument, warn};

use super::model::{CreateStudentDto, IssuedCredentials, UpdateStudentDto};
use crate::state::AppState;
use crate::utils::provisioning::{Destination, credential_notice, dispatch_credentials, provision};
use crate::utils::uploads::{ImageKind, ImageUpload};

pub struct StudentService;

impl StudentService {
    async fn ensure_class(tenant: &TenantStore, class_id: ClassId) -> Result<(), AppError> {
        tenant
            .find_class(class_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(anyhow!("Class not found")))
    }

    async fn ensure_admission_number_free(
        tenant: &TenantStore,
        admission_number: &str,
        excluding: Option<PrincipalId>,
    ) -> Result<(), AppError> {
        if tenant
            .admission_number_exists(admission_number, excluding)
            .await?
        {
            warn!(admission_number, "Admission number already in use");
            return Err(StoreError::Conflict(Duplicate::AdmissionNumber).into());
        }
        Ok(())
    }

    #[instrument(skip(tenant), fields(school.id = %tenant.school_id()))]
    pub async fn list_students(tenant: &TenantStore) -> Result<Vec<Principal>, AppError> {
        Ok(tenant.list_principals(Role::Student).await?)
    }

    #[instrument(skip(tenant), fields(school.id = %tenant.school_id()))]
    pub async fn get_student(tenant: &TenantStore, id: PrincipalId) -> Result<Principal, AppError> {
        tenant
            .find_principal(id, Role::Student)
            .await?
            .filter(|p| p.is_active)
            .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))
    }

    #[instrument(skip(state, tenant, dto, image), fields(school.id = %tenant.school_id()))]
    pub async fn create_student(
        state: &AppState,
        tenant: &TenantStore,
        dto: CreateStudentDto,
        image: Option<ImageUpload>,
    ) -> Result<(Principal, IssuedCredentials), AppError> {
        let school = tenant
            .school()
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("School not found")))?;

        if let Some(class_id) = dto.class_id {
            Self::ensure_class(tenant, class_id).await?;
        }
        if let Some(number) = dto.admission_number.as_deref() {
            Self::ensure_admission_number_free(tenant, number, None).await?;
        }

        let admission_year = dto.admission_year.unwrap_or_else(|| Utc::now().year());

        let image = match image {
            Some(upload) => Some(state.images.save(ImageKind::Student, &upload).await?),
            None => None,
        };

        let mut student = Principal::new(
            Role::Student,
            Some(school.school_id.clone()),
            "",
            dto.email,
            "",
            dto.first_name,
            dto.last_name,
        );
        student.phone = dto.phone;
        student.date_of_birth = dto.date_of_birth;
        student.gender = dto.gender;
        student.address = dto.address;
        student.class_id = dto.class_id;
        student.admission_number = dto.admission_number;
        student.admission_year = Some(admission_year);
        student.image = image.clone();

        let provisioned = provision(
            Destination::School(tenant),
            student,
            LoginIdKind::Student { admission_year },
            state.password_config.bcrypt_cost,
        )
        .await;

        let (student, credentials) = match provisioned {
            Ok(done) => done,
            Err(e) => {
                if let Some(path) = &image {
                    state.images.delete(path).await;
                }
                return Err(e);
            }
        };

        dispatch_credentials(
            state.notifier.clone(),
            credential_notice(&student, &credentials, &school.name),
        );

        Ok((student, credentials))
    }

    /// Same image handling as teacher updates: the old file goes once the write succeeds.
    #[instrument(skip(state, tenant, dto, image), fields(school.id = %tenant.school_id()))]
    pub async fn update_student(
        state: &AppState,
        tenant: &TenantStore,
        id: PrincipalId,
        dto: UpdateStudentDto,
        image: Option<ImageUpload>,
    ) -> Result<Principal, AppError> {
        let mut student = Self::get_student(tenant, id).await?;

        if let Some(email) = dto.email.as_deref()
            && email != student.email
            && tenant.email_exists(email, Some(id)).await?
        {
            return Err(StoreError::Conflict(Duplicate::Email).into());
        }
        if let Some(class_id) = dto.class_id
            && student.class_id != Some(class_id)
        {
            Self::ensure_class(tenant, class_id).await?;
        }
        if let Some(number) = dto.admission_number.as_deref()
            && student.admission_number.as_deref() != Some(number)
        {
            Self::ensure_admission_number_free(tenant, number, Some(id)).await?;
        }

        let new_image = match image {
            Some(upload) => Some(state.images.save(ImageKind::Student, &upload).await?),
            None => None,
        };
        let old_image = student.image.clone();

        dto.apply(&mut student);
        if let Some(path) = &new_image {
            student.image = Some(path.clone());
        }
        student.updated_at = Utc::now();

        if let Err(e) = tenant.update_principal(&student).await {
            if let Some(path) = &new_image {
                state.images.delete(path).await;
            }
            return Err(e.into());
        }
        if new_image.is_some()
            && let Some(old) = old_image
        {
            state.images.delete(&old).await;
        }

        info!(principal.id = %id, "Student updated");
        Ok(student)
    }

    #[instrument(skip(tenant), fields(school.id = %tenant.school_id()))]
    pub async fn deactivate_student(tenant: &TenantStore, id: PrincipalId) -> Result<(), AppError> {
        let mut student = Self::get_student(tenant, id).await?;
        student.is_active = false;
        student.updated_at = Utc::now();
        tenant.update_principal(&student).await?;

        info!(principal.id = %id, "Student deactivated");
        Ok(())
    }
}
