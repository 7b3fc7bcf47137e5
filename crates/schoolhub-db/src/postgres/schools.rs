use async_trait::async_trait;
use schoolhub_models::SchoolId;
use schoolhub_models::principals::Principal;
use schoolhub_models::schools::School;
use sqlx::PgExecutor;
use tracing::{debug, info, instrument};

use super::principals::insert_principal_with;
use super::{PgStore, expect_row};
use crate::error::{StoreError, StoreResult, from_pg};
use crate::store::SchoolRepository;

const SCHOOL_COLUMNS: &str =
    "school_id, name, address, contact_email, contact_phone, is_active, created_at, updated_at";

async fn insert_school_with<'e, E: PgExecutor<'e>>(exec: E, school: &School) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO schools (school_id, name, address, contact_email, contact_phone, is_active, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(&school.school_id)
    .bind(&school.name)
    .bind(&school.address)
    .bind(&school.contact_email)
    .bind(&school.contact_phone)
    .bind(school.is_active)
    .bind(school.created_at)
    .bind(school.updated_at)
    .execute(exec)
    .await
    .map_err(from_pg)?;
    Ok(())
}

#[async_trait]
impl SchoolRepository for PgStore {
    #[instrument(skip(self, school), fields(school.id = %school.school_id, db.operation = "INSERT", db.table = "schools"))]
    async fn insert_school(&self, school: &School) -> StoreResult<()> {
        insert_school_with(&self.pool, school).await
    }

    #[instrument(skip(self, school, admin), fields(school.id = %school.school_id, db.operation = "INSERT", db.table = "schools"))]
    async fn insert_school_with_admin(
        &self,
        school: &School,
        admin: &Principal,
    ) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        insert_school_with(&mut *tx, school).await?;
        insert_principal_with(&mut *tx, admin).await?;
        tx.commit().await?;
        debug!("School and admin committed");
        Ok(())
    }

    async fn find_school(&self, school_id: &SchoolId) -> StoreResult<Option<School>> {
        let school = sqlx::query_as::<_, School>(&format!(
            "SELECT {SCHOOL_COLUMNS} FROM schools WHERE school_id = $1"
        ))
        .bind(school_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(school)
    }

    async fn list_active_schools(&self) -> StoreResult<Vec<School>> {
        let schools = sqlx::query_as::<_, School>(&format!(
            "SELECT {SCHOOL_COLUMNS} FROM schools WHERE is_active ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(schools)
    }

    async fn update_school(&self, school: &School) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE schools
             SET name = $2, address = $3, contact_email = $4, contact_phone = $5, is_active = $6, updated_at = NOW()
             WHERE school_id = $1",
        )
        .bind(&school.school_id)
        .bind(&school.name)
        .bind(&school.address)
        .bind(&school.contact_email)
        .bind(&school.contact_phone)
        .bind(school.is_active)
        .execute(&self.pool)
        .await?;
        expect_row(result.rows_affected())
    }

    #[instrument(skip(self), fields(school.id = %school_id, db.operation = "UPDATE", db.table = "schools"))]
    async fn deactivate_school(&self, school_id: &SchoolId) -> StoreResult<u64> {
        let mut tx = self.pool.begin().await?;

        let school = sqlx::query(
            "UPDATE schools SET is_active = FALSE, updated_at = NOW() WHERE school_id = $1",
        )
        .bind(school_id)
        .execute(&mut *tx)
        .await?;
        if school.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        let principals = sqlx::query(
            "UPDATE principals SET is_active = FALSE, updated_at = NOW()
             WHERE school_id = $1 AND is_active",
        )
        .bind(school_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        info!(deactivated = principals.rows_affected(), "School deactivated");
        Ok(principals.rows_affected())
    }
}
