use async_trait::async_trait;
use chrono::NaiveDate;
use schoolhub_config::AttendancePolicy;
use schoolhub_models::attendance::Attendance;
use schoolhub_models::{AttendanceId, ClassId, PrincipalId, SchoolId};
use tracing::{debug, instrument};

use super::{PgStore, expect_row};
use crate::error::StoreResult;
use crate::store::AttendanceRepository;

const ATTENDANCE_COLUMNS: &str = "id, school_id, class_id, student_id, date, status, remarks, \
     marked_by, created_at, updated_at";

#[async_trait]
impl AttendanceRepository for PgStore {
    #[instrument(skip(self, records), fields(records = records.len(), db.operation = "INSERT", db.table = "attendance"))]
    async fn record_attendance(
        &self,
        records: Vec<Attendance>,
        policy: AttendancePolicy,
    ) -> StoreResult<Vec<Attendance>> {
        let mut tx = self.pool.begin().await?;
        let mut saved = Vec::with_capacity(records.len());

        for record in records {
            if policy == AttendancePolicy::Upsert {
                let replaced = sqlx::query_as::<_, Attendance>(&format!(
                    "UPDATE attendance
                     SET status = $5, remarks = $6, marked_by = $7, updated_at = NOW()
                     WHERE school_id = $1 AND class_id = $2 AND student_id = $3 AND date = $4
                     RETURNING {ATTENDANCE_COLUMNS}"
                ))
                .bind(&record.school_id)
                .bind(record.class_id)
                .bind(record.student_id)
                .bind(record.date)
                .bind(record.status)
                .bind(&record.remarks)
                .bind(record.marked_by)
                .fetch_all(&mut *tx)
                .await?;
                if let Some(first) = replaced.into_iter().next() {
                    saved.push(first);
                    continue;
                }
            }

            let inserted = sqlx::query_as::<_, Attendance>(&format!(
                "INSERT INTO attendance ({ATTENDANCE_COLUMNS})
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                 RETURNING {ATTENDANCE_COLUMNS}"
            ))
            .bind(record.id)
            .bind(&record.school_id)
            .bind(record.class_id)
            .bind(record.student_id)
            .bind(record.date)
            .bind(record.status)
            .bind(&record.remarks)
            .bind(record.marked_by)
            .bind(record.created_at)
            .bind(record.updated_at)
            .fetch_one(&mut *tx)
            .await?;
            saved.push(inserted);
        }

        tx.commit().await?;
        debug!(saved = saved.len(), "Attendance committed");
        Ok(saved)
    }

    async fn find_attendance(
        &self,
        school_id: &SchoolId,
        id: AttendanceId,
    ) -> StoreResult<Option<Attendance>> {
        let record = sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE school_id = $1 AND id = $2"
        ))
        .bind(school_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn update_attendance(&self, record: &Attendance) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE attendance SET status = $3, remarks = $4, updated_at = NOW()
             WHERE school_id = $1 AND id = $2",
        )
        .bind(&record.school_id)
        .bind(record.id)
        .bind(record.status)
        .bind(&record.remarks)
        .execute(&self.pool)
        .await?;
        expect_row(result.rows_affected())
    }

    async fn list_class_attendance(
        &self,
        school_id: &SchoolId,
        class_id: ClassId,
        date: NaiveDate,
    ) -> StoreResult<Vec<Attendance>> {
        let records = sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance
             WHERE school_id = $1 AND class_id = $2 AND date = $3
             ORDER BY created_at"
        ))
        .bind(school_id)
        .bind(class_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn list_student_attendance(
        &self,
        school_id: &SchoolId,
        student_id: PrincipalId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> StoreResult<Vec<Attendance>> {
        let records = sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance
             WHERE school_id = $1 AND student_id = $2
               AND ($3::date IS NULL OR date >= $3)
               AND ($4::date IS NULL OR date <= $4)
             ORDER BY date DESC, created_at DESC"
        ))
        .bind(school_id)
        .bind(student_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }
}
