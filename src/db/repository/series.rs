use chrono::Utc;
use sqlx::{Sqlite, SqlitePool};
use uuid::Uuid;

use crate::db::models::{BookingSeries, CreateSeries, SeriesSummary};
use crate::error::{AppError, AppResult};

const SERIES_COLUMNS: &str = "id, professional_id, client_id, time_of_day, duration_minutes, \
     tag_id, notes, recurrence_type, days_of_week, interval, day_of_month, start_date, \
     end_date, max_occurrences, status, total_generated, created_at, updated_at";

/// Repository for recurrence rules (`booking_series` table).
pub struct SeriesRepository;

impl SeriesRepository {
    /// Insert the rule row with status `active` and `total_generated = 0`;
    /// the orchestrator writes the real count after expansion.
    pub async fn create<'e, E>(db: E, create: &CreateSeries) -> AppResult<BookingSeries>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();
        let days_of_week = match &create.days_of_week {
            Some(days) => Some(
                serde_json::to_string(days)
                    .map_err(|e| AppError::Internal(anyhow::Error::new(e)))?,
            ),
            None => None,
        };

        let row = sqlx::query_as::<_, BookingSeries>(&format!(
            r#"
            INSERT INTO booking_series (
                id, professional_id, client_id, time_of_day, duration_minutes,
                tag_id, notes, recurrence_type, days_of_week, interval, day_of_month,
                start_date, end_date, max_occurrences, status, total_generated,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'active', 0, ?, ?)
            RETURNING {SERIES_COLUMNS}
            "#
        ))
        .bind(&id)
        .bind(&create.professional_id)
        .bind(&create.client_id)
        .bind(create.time_of_day)
        .bind(create.duration_minutes as i64)
        .bind(&create.tag_id)
        .bind(&create.notes)
        .bind(create.recurrence_type)
        .bind(days_of_week)
        .bind(create.interval.unwrap_or(1) as i64)
        .bind(create.day_of_month.map(|d| d as i64))
        .bind(create.start_date)
        .bind(create.end_date)
        .bind(create.max_occurrences.map(|m| m as i64))
        .bind(now)
        .bind(now)
        .fetch_one(db)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }

    pub async fn find_by_id<'e, E>(db: E, id: &str) -> AppResult<Option<BookingSeries>>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let row = sqlx::query_as::<_, BookingSeries>(&format!(
            "SELECT {SERIES_COLUMNS} FROM booking_series WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }

    /// Write the denormalized count once, right after expansion.
    pub async fn set_total_generated<'e, E>(db: E, id: &str, total: i64) -> AppResult<()>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now().naive_utc();
        sqlx::query("UPDATE booking_series SET total_generated = ?, updated_at = ? WHERE id = ?")
            .bind(total)
            .bind(now)
            .bind(id)
            .execute(db)
            .await
            .map_err(AppError::Database)?;

        Ok(())
    }

    /// Flip the rule to `finished`. Returns false when the id is unknown.
    pub async fn finish<'e, E>(db: E, id: &str) -> AppResult<bool>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now().naive_utc();
        let result =
            sqlx::query("UPDATE booking_series SET status = 'finished', updated_at = ? WHERE id = ?")
                .bind(now)
                .bind(id)
                .execute(db)
                .await
                .map_err(AppError::Database)?;

        Ok(result.rows_affected() > 0)
    }

    /// Active rules for one professional, joined with client and tag display
    /// data for the listing page.
    pub async fn list_active_with_details(
        pool: &SqlitePool,
        professional_id: &str,
    ) -> AppResult<Vec<SeriesSummary>> {
        let rows = sqlx::query_as::<_, SeriesSummary>(
            r#"
            SELECT
                s.id, s.client_id, c.name AS client_name, s.time_of_day,
                s.duration_minutes, s.recurrence_type, s.interval, s.start_date,
                s.end_date, s.total_generated, t.name AS tag_name, t.color AS tag_color
            FROM booking_series s
            JOIN clients c ON c.id = s.client_id
            LEFT JOIN tags t ON t.id = s.tag_id
            WHERE s.professional_id = ? AND s.status = 'active'
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(professional_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)?;

        Ok(rows)
    }
}
