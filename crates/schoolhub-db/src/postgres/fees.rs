use async_trait::async_trait;
use schoolhub_models::fees::Fee;
use schoolhub_models::{ClassId, FeeId, PrincipalId, SchoolId};
use tracing::instrument;

use super::{PgStore, expect_row};
use crate::error::StoreResult;
use crate::store::FeeRepository;

const FEE_COLUMNS: &str = "id, school_id, student_id, class_id, amount, due_date, status, \
     paid_amount, payment_date, payment_method, receipt_number, remarks, created_at, updated_at";

#[async_trait]
impl FeeRepository for PgStore {
    #[instrument(skip(self, fee), fields(fee.id = %fee.id, db.operation = "INSERT", db.table = "fees"))]
    async fn insert_fee(&self, fee: &Fee) -> StoreResult<()> {
        sqlx::query(&format!(
            "INSERT INTO fees ({FEE_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)"
        ))
        .bind(fee.id)
        .bind(&fee.school_id)
        .bind(fee.student_id)
        .bind(fee.class_id)
        .bind(fee.amount)
        .bind(fee.due_date)
        .bind(fee.status)
        .bind(fee.paid_amount)
        .bind(fee.payment_date)
        .bind(fee.payment_method)
        .bind(&fee.receipt_number)
        .bind(&fee.remarks)
        .bind(fee.created_at)
        .bind(fee.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_fee(&self, school_id: &SchoolId, id: FeeId) -> StoreResult<Option<Fee>> {
        let fee = sqlx::query_as::<_, Fee>(&format!(
            "SELECT {FEE_COLUMNS} FROM fees WHERE school_id = $1 AND id = $2"
        ))
        .bind(school_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(fee)
    }

    async fn list_class_fees(
        &self,
        school_id: &SchoolId,
        class_id: ClassId,
    ) -> StoreResult<Vec<Fee>> {
        let fees = sqlx::query_as::<_, Fee>(&format!(
            "SELECT {FEE_COLUMNS} FROM fees
             WHERE school_id = $1 AND class_id = $2 ORDER BY due_date, created_at"
        ))
        .bind(school_id)
        .bind(class_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(fees)
    }

    async fn list_student_fees(
        &self,
        school_id: &SchoolId,
        student_id: PrincipalId,
    ) -> StoreResult<Vec<Fee>> {
        let fees = sqlx::query_as::<_, Fee>(&format!(
            "SELECT {FEE_COLUMNS} FROM fees
             WHERE school_id = $1 AND student_id = $2 ORDER BY due_date, created_at"
        ))
        .bind(school_id)
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(fees)
    }

    async fn update_fee(&self, fee: &Fee) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE fees
             SET amount = $3, due_date = $4, status = $5, paid_amount = $6, payment_date = $7,
                 payment_method = $8, receipt_number = $9, remarks = $10, updated_at = NOW()
             WHERE school_id = $1 AND id = $2",
        )
        .bind(&fee.school_id)
        .bind(fee.id)
        .bind(fee.amount)
        .bind(fee.due_date)
        .bind(fee.status)
        .bind(fee.paid_amount)
        .bind(fee.payment_date)
        .bind(fee.payment_method)
        .bind(&fee.receipt_number)
        .bind(&fee.remarks)
        .execute(&self.pool)
        .await?;
        expect_row(result.rows_affected())
    }

    async fn delete_fee(&self, school_id: &SchoolId, id: FeeId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM fees WHERE school_id = $1 AND id = $2")
            .bind(school_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        expect_row(result.rows_affected())
    }
}
