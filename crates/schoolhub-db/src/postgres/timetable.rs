use async_trait::async_trait;
use schoolhub_models::timetable::{TimetableEntry, TimetableSlot};
use schoolhub_models::{ClassId, SchoolId, TimetableEntryId};
use tracing::instrument;

use super::{PgStore, expect_row};
use crate::error::{StoreResult, from_pg};
use crate::store::TimetableRepository;

const ENTRY_COLUMNS: &str = "id, school_id, class_id, day, period, subject, teacher_id, \
     start_time, end_time, room, created_at, updated_at";

#[async_trait]
impl TimetableRepository for PgStore {
    /// The `timetable_slot_key` unique index makes this the authoritative
    /// conflict check.
    #[instrument(skip(self, entry), fields(class.id = %entry.class_id, db.operation = "INSERT", db.table = "timetable_entries"))]
    async fn insert_entry(&self, entry: &TimetableEntry) -> StoreResult<()> {
        sqlx::query(&format!(
            "INSERT INTO timetable_entries ({ENTRY_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)"
        ))
        .bind(entry.id)
        .bind(&entry.school_id)
        .bind(entry.class_id)
        .bind(entry.day)
        .bind(entry.period)
        .bind(&entry.subject)
        .bind(entry.teacher_id)
        .bind(entry.start_time)
        .bind(entry.end_time)
        .bind(&entry.room)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await
        .map_err(from_pg)?;
        Ok(())
    }

    async fn find_entry(
        &self,
        school_id: &SchoolId,
        id: TimetableEntryId,
    ) -> StoreResult<Option<TimetableEntry>> {
        let entry = sqlx::query_as::<_, TimetableEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM timetable_entries WHERE school_id = $1 AND id = $2"
        ))
        .bind(school_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn find_slot_occupant(
        &self,
        slot: &TimetableSlot,
        excluding: Option<TimetableEntryId>,
    ) -> StoreResult<Option<TimetableEntry>> {
        let entry = sqlx::query_as::<_, TimetableEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM timetable_entries
             WHERE school_id = $1 AND class_id = $2 AND day = $3 AND period = $4
               AND ($5::uuid IS NULL OR id <> $5)"
        ))
        .bind(&slot.school_id)
        .bind(slot.class_id)
        .bind(slot.day)
        .bind(slot.period)
        .bind(excluding)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn list_entries(
        &self,
        school_id: &SchoolId,
        class_id: Option<ClassId>,
    ) -> StoreResult<Vec<TimetableEntry>> {
        let entries = sqlx::query_as::<_, TimetableEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM timetable_entries
             WHERE school_id = $1 AND ($2::uuid IS NULL OR class_id = $2)
             ORDER BY day, period"
        ))
        .bind(school_id)
        .bind(class_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    #[instrument(skip(self, entry), fields(entry.id = %entry.id, db.operation = "UPDATE", db.table = "timetable_entries"))]
    async fn update_entry(&self, entry: &TimetableEntry) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE timetable_entries
             SET day = $3, period = $4, subject = $5, teacher_id = $6, start_time = $7,
                 end_time = $8, room = $9, updated_at = NOW()
             WHERE school_id = $1 AND id = $2",
        )
        .bind(&entry.school_id)
        .bind(entry.id)
        .bind(entry.day)
        .bind(entry.period)
        .bind(&entry.subject)
        .bind(entry.teacher_id)
        .bind(entry.start_time)
        .bind(entry.end_time)
        .bind(&entry.room)
        .execute(&self.pool)
        .await
        .map_err(from_pg)?;
        expect_row(result.rows_affected())
    }

    async fn delete_entry(&self, school_id: &SchoolId, id: TimetableEntryId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM timetable_entries WHERE school_id = $1 AND id = $2")
            .bind(school_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        expect_row(result.rows_affected())
    }
}
