use anyhow::anyhow;
use chrono::Utc;
use schoolhub_core::credentials::LoginIdKind;
use schoolhub_core::{AppError, Role};
use schoolhub_db::{Duplicate, StoreError, TenantStore};
use schoolhub_models::PrincipalId;
use schoolhub_models::principals::Principal;
use tracing::{info, instrument};

use super::model::{CreateTeacherDto, IssuedCredentials, UpdateTeacherDto};
use crate::state::AppState;
use crate::utils::provisioning::{Destination, credential_notice, dispatch_credentials, provision};
use crate::utils::uploads::{ImageKind, ImageUpload};

pub struct TeacherService;

impl TeacherService {
    #[instrument(skip(tenant), fields(school.id = %tenant.school_id()))]
    pub async fn list_teachers(tenant: &TenantStore) -> Result<Vec<Principal>, AppError> {
        Ok(tenant.list_principals(Role::Teacher).await?)
    }

    /// Deactivated teachers are reported as missing.
    #[instrument(skip(tenant), fields(school.id = %tenant.school_id()))]
    pub async fn get_teacher(tenant: &TenantStore, id: PrincipalId) -> Result<Principal, AppError> {
        tenant
            .find_principal(id, Role::Teacher)
            .await?
            .filter(|p| p.is_active)
            .ok_or_else(|| AppError::not_found(anyhow!("Teacher not found")))
    }

    /// Checks that `id` can be assigned to a class or timetable slot.
    pub async fn ensure_assignable(tenant: &TenantStore, id: PrincipalId) -> Result<(), AppError> {
        let assignable = tenant
            .find_principal(id, Role::Teacher)
            .await?
            .is_some_and(|p| p.is_active);
        if assignable {
            Ok(())
        } else {
            Err(AppError::bad_request(anyhow!(
                "Teacher does not belong to this school"
            )))
        }
    }

    /// Creates the teacher and mails the generated credentials.
    ///
    /// A stored image is removed again when provisioning fails.
    #[instrument(skip(state, tenant, dto, image), fields(school.id = %tenant.school_id()))]
    pub async fn create_teacher(
        state: &AppState,
        tenant: &TenantStore,
        dto: CreateTeacherDto,
        image: Option<ImageUpload>,
    ) -> Result<(Principal, IssuedCredentials), AppError> {
        let school = tenant
            .school()
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("School not found")))?;

        let image = match image {
            Some(upload) => Some(state.images.save(ImageKind::Teacher, &upload).await?),
            None => None,
        };

        let mut teacher = Principal::new(
            Role::Teacher,
            Some(school.school_id.clone()),
            "",
            dto.email,
            "",
            dto.first_name,
            dto.last_name,
        );
        teacher.phone = dto.phone;
        teacher.subject = dto.subject;
        teacher.qualification = dto.qualification;
        teacher.joining_date = dto.joining_date;
        teacher.image = image.clone();

        let provisioned = provision(
            Destination::School(tenant),
            teacher,
            LoginIdKind::Teacher,
            state.password_config.bcrypt_cost,
        )
        .await;

        let (teacher, credentials) = match provisioned {
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
            credential_notice(&teacher, &credentials, &school.name),
        );

        Ok((teacher, credentials))
    }

    /// Applies the changes and, when an image is given, swaps the profile image.
    ///
    /// The previous image file is removed only after the record is written.
    #[instrument(skip(state, tenant, dto, image), fields(school.id = %tenant.school_id()))]
    pub async fn update_teacher(
        state: &AppState,
        tenant: &TenantStore,
        id: PrincipalId,
        dto: UpdateTeacherDto,
        image: Option<ImageUpload>,
    ) -> Result<Principal, AppError> {
        let mut teacher = Self::get_teacher(tenant, id).await?;

        if let Some(email) = dto.email.as_deref()
            && email != teacher.email
            && tenant.email_exists(email, Some(id)).await?
        {
            return Err(StoreError::Conflict(Duplicate::Email).into());
        }

        let new_image = match image {
            Some(upload) => Some(state.images.save(ImageKind::Teacher, &upload).await?),
            None => None,
        };
        let old_image = teacher.image.clone();

        dto.apply(&mut teacher);
        if let Some(path) = &new_image {
            teacher.image = Some(path.clone());
        }
        teacher.updated_at = Utc::now();

        if let Err(e) = tenant.update_principal(&teacher).await {
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

        info!(principal.id = %id, "Teacher updated");
        Ok(teacher)
    }

    #[instrument(skip(tenant), fields(school.id = %tenant.school_id()))]
    pub async fn deactivate_teacher(tenant: &TenantStore, id: PrincipalId) -> Result<(), AppError> {
        let mut teacher = Self::get_teacher(tenant, id).await?;
        teacher.is_active = false;
        teacher.updated_at = Utc::now();
        tenant.update_principal(&teacher).await?;

        info!(principal.id = %id, "Teacher deactivated");
        Ok(())
    }
}
