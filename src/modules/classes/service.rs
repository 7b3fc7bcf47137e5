use anyhow::anyhow;
use chrono::Utc;
use schoolhub_core::AppError;
use schoolhub_db::TenantStore;
use schoolhub_models::ClassId;
use tracing::{info, instrument};

use super::model::{Class, CreateClassDto, UpdateClassDto};
use crate::modules::teachers::service::TeacherService;

pub struct ClassService;

impl ClassService {
    #[instrument(skip(tenant), fields(school.id = %tenant.school_id()))]
    pub async fn list_classes(tenant: &TenantStore) -> Result<Vec<Class>, AppError> {
        Ok(tenant.list_classes().await?)
    }

    #[instrument(skip(tenant), fields(school.id = %tenant.school_id()))]
    pub async fn get_class(tenant: &TenantStore, id: ClassId) -> Result<Class, AppError> {
        tenant
            .find_class(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Class not found")))
    }

    #[instrument(skip(tenant, dto), fields(school.id = %tenant.school_id()))]
    pub async fn create_class(tenant: &TenantStore, dto: CreateClassDto) -> Result<Class, AppError> {
        if let Some(teacher_id) = dto.teacher_id {
            TeacherService::ensure_assignable(tenant, teacher_id).await?;
        }

        let now = Utc::now();
        let class = tenant
            .insert_class(Class {
                id: ClassId::new(),
                school_id: tenant.school_id().clone(),
                name: dto.name,
                section: dto.section,
                capacity: dto.capacity,
                teacher_id: dto.teacher_id,
                description: dto.description,
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!(class.id = %class.id, "Class created");
        Ok(class)
    }

    #[instrument(skip(tenant, dto), fields(school.id = %tenant.school_id()))]
    pub async fn update_class(
        tenant: &TenantStore,
        id: ClassId,
        dto: UpdateClassDto,
    ) -> Result<Class, AppError> {
        let mut class = Self::get_class(tenant, id).await?;
        if let Some(teacher_id) = dto.teacher_id {
            TeacherService::ensure_assignable(tenant, teacher_id).await?;
        }

        dto.apply(&mut class);
        class.updated_at = Utc::now();
        tenant.update_class(&class).await?;

        info!(class.id = %id, "Class updated");
        Ok(class)
    }

    #[instrument(skip(tenant), fields(school.id = %tenant.school_id()))]
    pub async fn delete_class(tenant: &TenantStore, id: ClassId) -> Result<(), AppError> {
        Self::get_class(tenant, id).await?;
        tenant.delete_class(id).await?;
        info!(class.id = %id, "Class deleted");
        Ok(())
    }
}
