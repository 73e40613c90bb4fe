use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::{
    AvailabilityWindow, CreateAvailabilityWindow, SchedulingConfig, UpsertSchedulingConfig,
};
use crate::error::{AppError, AppResult};

const WINDOW_COLUMNS: &str =
    "id, professional_id, day_of_week, start_time, end_time, created_at";

/// Repository for weekly availability windows. The configuration UI writes
/// these rows; the scheduling core only reads them.
pub struct AvailabilityRepository;

impl AvailabilityRepository {
    pub async fn list_by_professional(
        pool: &SqlitePool,
        professional_id: &str,
    ) -> AppResult<Vec<AvailabilityWindow>> {
        let rows = sqlx::query_as::<_, AvailabilityWindow>(&format!(
            r#"
            SELECT {WINDOW_COLUMNS}
            FROM availability_windows
            WHERE professional_id = ?
            ORDER BY day_of_week, start_time
            "#
        ))
        .bind(professional_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)?;

        Ok(rows)
    }

    /// Windows for one weekday (0 = Monday .. 6 = Sunday), ordered by start
    /// time. An empty result means the professional does not work that day.
    pub async fn list_for_day(
        pool: &SqlitePool,
        professional_id: &str,
        day_of_week: i64,
    ) -> AppResult<Vec<AvailabilityWindow>> {
        let rows = sqlx::query_as::<_, AvailabilityWindow>(&format!(
            r#"
            SELECT {WINDOW_COLUMNS}
            FROM availability_windows
            WHERE professional_id = ? AND day_of_week = ?
            ORDER BY start_time
            "#
        ))
        .bind(professional_id)
        .bind(day_of_week)
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)?;

        Ok(rows)
    }

    /// Replace the professional's whole weekly grid in one transaction; the
    /// configuration UI always submits the full set.
    pub async fn replace_all(
        pool: &SqlitePool,
        professional_id: &str,
        windows: &[CreateAvailabilityWindow],
    ) -> AppResult<Vec<AvailabilityWindow>> {
        let now = Utc::now().naive_utc();
        let mut tx = pool.begin().await.map_err(AppError::Database)?;

        sqlx::query("DELETE FROM availability_windows WHERE professional_id = ?")
            .bind(professional_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        for window in windows {
            sqlx::query(
                r#"
                INSERT INTO availability_windows
                    (id, professional_id, day_of_week, start_time, end_time, created_at)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(professional_id)
            .bind(window.day_of_week as i64)
            .bind(window.start_time)
            .bind(window.end_time)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;

        Self::list_by_professional(pool, professional_id).await
    }
}

const CONFIG_COLUMNS: &str = "professional_id, lesson_duration_minutes, gap_minutes, timezone, \
     created_at, updated_at";

/// Repository for per-professional slot parameters.
pub struct SchedulingConfigRepository;

impl SchedulingConfigRepository {
    pub async fn get(
        pool: &SqlitePool,
        professional_id: &str,
    ) -> AppResult<Option<SchedulingConfig>> {
        let row = sqlx::query_as::<_, SchedulingConfig>(&format!(
            "SELECT {CONFIG_COLUMNS} FROM scheduling_configs WHERE professional_id = ?"
        ))
        .bind(professional_id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }

    pub async fn upsert(
        pool: &SqlitePool,
        professional_id: &str,
        config: &UpsertSchedulingConfig,
    ) -> AppResult<SchedulingConfig> {
        let now = Utc::now().naive_utc();

        let row = sqlx::query_as::<_, SchedulingConfig>(&format!(
            r#"
            INSERT INTO scheduling_configs
                (professional_id, lesson_duration_minutes, gap_minutes, timezone, created_at, updated_at)
            VALUES (?, ?, ?, COALESCE(?, 'America/Sao_Paulo'), ?, ?)
            ON CONFLICT(professional_id) DO UPDATE SET
                lesson_duration_minutes = excluded.lesson_duration_minutes,
                gap_minutes = excluded.gap_minutes,
                timezone = COALESCE(?, timezone),
                updated_at = excluded.updated_at
            RETURNING {CONFIG_COLUMNS}
            "#
        ))
        .bind(professional_id)
        .bind(config.lesson_duration_minutes as i64)
        .bind(config.gap_minutes as i64)
        .bind(&config.timezone)
        .bind(now)
        .bind(now)
        .bind(&config.timezone)
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }
}
