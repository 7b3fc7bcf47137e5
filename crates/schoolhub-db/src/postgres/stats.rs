use async_trait::async_trait;
use chrono::NaiveDate;
use schoolhub_models::SchoolId;
use schoolhub_models::stats::{PlatformStats, SchoolStats, UserBreakdown};
use tracing::instrument;

use super::PgStore;
use crate::error::StoreResult;
use crate::store::StatsRepository;

#[async_trait]
impl StatsRepository for PgStore {
    #[instrument(skip(self), fields(school.id = %school_id, db.operation = "SELECT"))]
    async fn school_stats(
        &self,
        school_id: &SchoolId,
        today: NaiveDate,
    ) -> StoreResult<SchoolStats> {
        let (teachers, students, classes, attendance, fees) =
            sqlx::query_as::<_, (i64, i64, i64, i64, f64)>(
                "SELECT
                    (SELECT COUNT(*) FROM principals
                       WHERE school_id = $1 AND role = 'TEACHER' AND is_active),
                    (SELECT COUNT(*) FROM principals
                       WHERE school_id = $1 AND role = 'STUDENT' AND is_active),
                    (SELECT COUNT(*) FROM classes WHERE school_id = $1),
                    (SELECT COUNT(*) FROM attendance WHERE school_id = $1 AND date = $2),
                    (SELECT COALESCE(SUM(amount - paid_amount), 0)::DOUBLE PRECISION FROM fees
                       WHERE school_id = $1 AND status <> 'paid')",
            )
            .bind(school_id)
            .bind(today)
            .fetch_one(&self.pool)
            .await?;

        Ok(SchoolStats {
            total_teachers: teachers,
            total_students: students,
            total_classes: classes,
            total_attendance: attendance,
            total_fees: fees,
        })
    }

    #[instrument(skip(self), fields(db.operation = "SELECT"))]
    async fn platform_stats(&self) -> StoreResult<PlatformStats> {
        let (schools, users, admins, teachers, students) =
            sqlx::query_as::<_, (i64, i64, i64, i64, i64)>(
                "SELECT
                    (SELECT COUNT(*) FROM schools WHERE is_active),
                    COUNT(*),
                    COUNT(*) FILTER (WHERE role = 'ADMIN'),
                    COUNT(*) FILTER (WHERE role = 'TEACHER'),
                    COUNT(*) FILTER (WHERE role = 'STUDENT')
                 FROM principals
                 WHERE is_active",
            )
            .fetch_one(&self.pool)
            .await?;

        Ok(PlatformStats {
            total_schools: schools,
            total_users: users,
            user_breakdown: UserBreakdown {
                admins,
                teachers,
                students,
            },
        })
    }
}
