use async_trait::async_trait;
use chrono::{DateTime, Utc};
use schoolhub_core::Role;
use schoolhub_models::principals::Principal;
use schoolhub_models::{PrincipalId, SchoolId};
use sqlx::PgExecutor;
use tracing::instrument;

use super::{PgStore, expect_row};
use crate::error::{StoreResult, from_pg};
use crate::store::PrincipalRepository;

pub(super) const PRINCIPAL_COLUMNS: &str = "id, login_id, email, password_hash, role, school_id, \
     is_active, last_login, first_name, last_name, phone, image, subject, qualification, \
     joining_date, date_of_birth, gender, address, class_id, admission_number, admission_year, \
     created_at, updated_at";

pub(super) async fn insert_principal_with<'e, E: PgExecutor<'e>>(
    exec: E,
    p: &Principal,
) -> StoreResult<()> {
    sqlx::query(&format!(
        "INSERT INTO principals ({PRINCIPAL_COLUMNS})
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23)"
    ))
    .bind(p.id)
    .bind(&p.login_id)
    .bind(&p.email)
    .bind(&p.password_hash)
    .bind(p.role)
    .bind(&p.school_id)
    .bind(p.is_active)
    .bind(p.last_login)
    .bind(&p.first_name)
    .bind(&p.last_name)
    .bind(&p.phone)
    .bind(&p.image)
    .bind(&p.subject)
    .bind(&p.qualification)
    .bind(p.joining_date)
    .bind(p.date_of_birth)
    .bind(p.gender)
    .bind(&p.address)
    .bind(p.class_id)
    .bind(&p.admission_number)
    .bind(p.admission_year)
    .bind(p.created_at)
    .bind(p.updated_at)
    .execute(exec)
    .await
    .map_err(from_pg)?;
    Ok(())
}

#[async_trait]
impl PrincipalRepository for PgStore {
    #[instrument(skip(self, principal), fields(principal.id = %principal.id, principal.role = %principal.role, db.operation = "INSERT", db.table = "principals"))]
    async fn insert_principal(&self, principal: &Principal) -> StoreResult<()> {
        insert_principal_with(&self.pool, principal).await
    }

    async fn find_principal(&self, id: PrincipalId) -> StoreResult<Option<Principal>> {
        let principal = sqlx::query_as::<_, Principal>(&format!(
            "SELECT {PRINCIPAL_COLUMNS} FROM principals WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(principal)
    }

    async fn find_super_admin(&self, login: &str) -> StoreResult<Option<Principal>> {
        let principal = sqlx::query_as::<_, Principal>(&format!(
            "SELECT {PRINCIPAL_COLUMNS} FROM principals
             WHERE role = 'SUPER_ADMIN' AND (login_id = $1 OR LOWER(email) = LOWER($1))
             LIMIT 1"
        ))
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;
        Ok(principal)
    }

    async fn first_super_admin(&self) -> StoreResult<Option<Principal>> {
        let principal = sqlx::query_as::<_, Principal>(&format!(
            "SELECT {PRINCIPAL_COLUMNS} FROM principals
             WHERE role = 'SUPER_ADMIN' ORDER BY created_at LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await?;
        Ok(principal)
    }

    async fn find_school_principal(
        &self,
        school_id: &SchoolId,
        login: &str,
    ) -> StoreResult<Option<Principal>> {
        let principal = sqlx::query_as::<_, Principal>(&format!(
            "SELECT {PRINCIPAL_COLUMNS} FROM principals
             WHERE school_id = $1 AND (login_id = $2 OR LOWER(email) = LOWER($2))
             LIMIT 1"
        ))
        .bind(school_id)
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;
        Ok(principal)
    }

    async fn find_principal_in_school(
        &self,
        school_id: &SchoolId,
        id: PrincipalId,
        role: Role,
    ) -> StoreResult<Option<Principal>> {
        let principal = sqlx::query_as::<_, Principal>(&format!(
            "SELECT {PRINCIPAL_COLUMNS} FROM principals
             WHERE school_id = $1 AND id = $2 AND role = $3"
        ))
        .bind(school_id)
        .bind(id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?;
        Ok(principal)
    }

    #[instrument(skip(self), fields(school.id = %school_id, db.operation = "SELECT", db.table = "principals"))]
    async fn list_principals(
        &self,
        school_id: &SchoolId,
        role: Role,
    ) -> StoreResult<Vec<Principal>> {
        let list = sqlx::query_as::<_, Principal>(&format!(
            "SELECT {PRINCIPAL_COLUMNS} FROM principals
             WHERE school_id = $1 AND role = $2 AND is_active
             ORDER BY last_name, first_name"
        ))
        .bind(school_id)
        .bind(role)
        .fetch_all(&self.pool)
        .await?;
        Ok(list)
    }

    async fn email_exists(&self, email: &str, excluding: Option<PrincipalId>) -> StoreResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM principals
                WHERE LOWER(email) = LOWER($1) AND ($2::uuid IS NULL OR id <> $2)
            )",
        )
        .bind(email)
        .bind(excluding)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn login_id_exists(
        &self,
        school_id: Option<&SchoolId>,
        login_id: &str,
    ) -> StoreResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM principals
                WHERE school_id IS NOT DISTINCT FROM $1 AND login_id = $2
            )",
        )
        .bind(school_id)
        .bind(login_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn admission_number_exists(
        &self,
        school_id: &SchoolId,
        admission_number: &str,
        excluding: Option<PrincipalId>,
    ) -> StoreResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM principals
                WHERE school_id = $1 AND admission_number = $2
                  AND ($3::uuid IS NULL OR id <> $3)
            )",
        )
        .bind(school_id)
        .bind(admission_number)
        .bind(excluding)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    #[instrument(skip(self, p), fields(principal.id = %p.id, db.operation = "UPDATE", db.table = "principals"))]
    async fn update_principal(&self, p: &Principal) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE principals
             SET email = $3, password_hash = $4, is_active = $5, first_name = $6, last_name = $7,
                 phone = $8, image = $9, subject = $10, qualification = $11, joining_date = $12,
                 date_of_birth = $13, gender = $14, address = $15, class_id = $16,
                 admission_number = $17, admission_year = $18, updated_at = NOW()
             WHERE id = $1 AND school_id IS NOT DISTINCT FROM $2",
        )
        .bind(p.id)
        .bind(&p.school_id)
        .bind(&p.email)
        .bind(&p.password_hash)
        .bind(p.is_active)
        .bind(&p.first_name)
        .bind(&p.last_name)
        .bind(&p.phone)
        .bind(&p.image)
        .bind(&p.subject)
        .bind(&p.qualification)
        .bind(p.joining_date)
        .bind(p.date_of_birth)
        .bind(p.gender)
        .bind(&p.address)
        .bind(p.class_id)
        .bind(&p.admission_number)
        .bind(p.admission_year)
        .execute(&self.pool)
        .await
        .map_err(from_pg)?;
        expect_row(result.rows_affected())
    }

    async fn record_login(&self, id: PrincipalId, at: DateTime<Utc>) -> StoreResult<()> {
        let result = sqlx::query("UPDATE principals SET last_login = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await?;
        expect_row(result.rows_affected())
    }
}
