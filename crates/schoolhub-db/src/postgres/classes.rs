use async_trait::async_trait;
use schoolhub_models::classes::Class;
use schoolhub_models::{ClassId, SchoolId};
use tracing::instrument;

use super::{PgStore, expect_row};
use crate::error::{CLASS_HAS_HISTORY, StoreError, StoreResult, from_pg};
use crate::store::ClassRepository;

const CLASS_COLUMNS: &str =
    "id, school_id, name, section, capacity, teacher_id, description, created_at, updated_at";

#[async_trait]
impl ClassRepository for PgStore {
    #[instrument(skip(self, class), fields(class.id = %class.id, db.operation = "INSERT", db.table = "classes"))]
    async fn insert_class(&self, class: &Class) -> StoreResult<()> {
        sqlx::query(&format!(
            "INSERT INTO classes ({CLASS_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"
        ))
        .bind(class.id)
        .bind(&class.school_id)
        .bind(&class.name)
        .bind(&class.section)
        .bind(class.capacity)
        .bind(class.teacher_id)
        .bind(&class.description)
        .bind(class.created_at)
        .bind(class.updated_at)
        .execute(&self.pool)
        .await
        .map_err(from_pg)?;
        Ok(())
    }

    async fn find_class(&self, school_id: &SchoolId, id: ClassId) -> StoreResult<Option<Class>> {
        let class = sqlx::query_as::<_, Class>(&format!(
            "SELECT {CLASS_COLUMNS} FROM classes WHERE school_id = $1 AND id = $2"
        ))
        .bind(school_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(class)
    }

    async fn list_classes(&self, school_id: &SchoolId) -> StoreResult<Vec<Class>> {
        let classes = sqlx::query_as::<_, Class>(&format!(
            "SELECT {CLASS_COLUMNS} FROM classes WHERE school_id = $1 ORDER BY name, section"
        ))
        .bind(school_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(classes)
    }

    async fn update_class(&self, class: &Class) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE classes
             SET name = $3, section = $4, capacity = $5, teacher_id = $6, description = $7, updated_at = NOW()
             WHERE school_id = $1 AND id = $2",
        )
        .bind(&class.school_id)
        .bind(class.id)
        .bind(&class.name)
        .bind(&class.section)
        .bind(class.capacity)
        .bind(class.teacher_id)
        .bind(&class.description)
        .execute(&self.pool)
        .await
        .map_err(from_pg)?;
        expect_row(result.rows_affected())
    }

    #[instrument(skip(self), fields(class.id = %id, db.operation = "DELETE", db.table = "classes"))]
    async fn delete_class(&self, school_id: &SchoolId, id: ClassId) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        let referenced: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM attendance WHERE class_id = $1)
                 OR EXISTS (SELECT 1 FROM fees WHERE class_id = $1)",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if referenced {
            return Err(StoreError::InUse(CLASS_HAS_HISTORY));
        }

        let result = sqlx::query("DELETE FROM classes WHERE school_id = $1 AND id = $2")
            .bind(school_id)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                    StoreError::InUse(CLASS_HAS_HISTORY)
                }
                _ => StoreError::Database(e),
            })?;
        expect_row(result.rows_affected())?;

        tx.commit().await?;
        Ok(())
    }
}
