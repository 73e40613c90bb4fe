use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::{Sqlite, SqlitePool};
use uuid::Uuid;

use crate::db::models::{Booking, BookingStatus, CreateBooking};
use crate::error::{AppError, AppResult};

const BOOKING_COLUMNS: &str = "id, professional_id, client_id, date, start_time, end_time, \
     tag_id, notes, status, series_id, is_recurring, created_at, updated_at";

/// Repository for appointment rows (`bookings` table).
///
/// Write operations accept any executor so they compose with the series
/// transaction; plain reads take the pool.
pub struct BookingRepository;

impl BookingRepository {
    /// First non-cancelled booking overlapping `[start, end)` on the given
    /// date, by half-open interval semantics. `exclude_id` makes the check
    /// usable when rescheduling an existing booking.
    pub async fn find_conflict<'e, E>(
        db: E,
        professional_id: &str,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        exclude_id: Option<&str>,
    ) -> AppResult<Option<Booking>>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let row = sqlx::query_as::<_, Booking>(&format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            WHERE professional_id = ?
              AND date = ?
              AND status != 'cancelled'
              AND start_time < ?
              AND end_time > ?
              AND (? IS NULL OR id != ?)
            ORDER BY start_time
            LIMIT 1
            "#
        ))
        .bind(professional_id)
        .bind(date)
        .bind(end)
        .bind(start)
        .bind(exclude_id)
        .bind(exclude_id)
        .fetch_optional(db)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }

    /// Insert one booking row. A unique-index violation on the live-slot
    /// index means another writer claimed the slot between the conflict
    /// check and this insert; it surfaces as a conflict, not a 500.
    pub async fn create<'e, E>(db: E, create: CreateBooking) -> AppResult<Booking>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();

        let row = sqlx::query_as::<_, Booking>(&format!(
            r#"
            INSERT INTO bookings (
                id, professional_id, client_id, date, start_time, end_time,
                tag_id, notes, status, series_id, is_recurring, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, 'confirmed', ?, ?, ?, ?)
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(&id)
        .bind(&create.professional_id)
        .bind(&create.client_id)
        .bind(create.date)
        .bind(create.start_time)
        .bind(create.end_time)
        .bind(&create.tag_id)
        .bind(&create.notes)
        .bind(&create.series_id)
        .bind(create.is_recurring)
        .bind(now)
        .bind(now)
        .fetch_one(db)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("the time slot is already booked".to_string())
            }
            _ => AppError::Database(e),
        })?;

        Ok(row)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> AppResult<Option<Booking>> {
        let row = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }

    /// Non-cancelled bookings for one day, ordered by start time. This is
    /// the set the slot annotation runs against.
    pub async fn list_by_professional_and_date(
        pool: &SqlitePool,
        professional_id: &str,
        date: NaiveDate,
    ) -> AppResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, Booking>(&format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            WHERE professional_id = ? AND date = ? AND status != 'cancelled'
            ORDER BY start_time
            "#
        ))
        .bind(professional_id)
        .bind(date)
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)?;

        Ok(rows)
    }

    /// All bookings (any status) in the inclusive date range, for agenda and
    /// history views.
    pub async fn list_by_professional_and_date_range(
        pool: &SqlitePool,
        professional_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, Booking>(&format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            WHERE professional_id = ? AND date >= ? AND date <= ?
            ORDER BY date, start_time
            "#
        ))
        .bind(professional_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)?;

        Ok(rows)
    }

    /// Rewrite the mutable fields of a booking from the given model.
    pub async fn update(pool: &SqlitePool, booking: &Booking) -> AppResult<Booking> {
        let now = Utc::now().naive_utc();

        let row = sqlx::query_as::<_, Booking>(&format!(
            r#"
            UPDATE bookings
            SET date = ?, start_time = ?, end_time = ?, tag_id = ?, notes = ?, updated_at = ?
            WHERE id = ?
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(booking.date)
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(&booking.tag_id)
        .bind(&booking.notes)
        .bind(now)
        .bind(&booking.id)
        .fetch_one(pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("the time slot is already booked".to_string())
            }
            _ => AppError::Database(e),
        })?;

        Ok(row)
    }

    pub async fn update_status(
        pool: &SqlitePool,
        id: &str,
        status: BookingStatus,
    ) -> AppResult<Option<Booking>> {
        let now = Utc::now().naive_utc();

        let row = sqlx::query_as::<_, Booking>(&format!(
            r#"
            UPDATE bookings
            SET status = ?, updated_at = ?
            WHERE id = ?
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(status)
        .bind(now)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }

    /// Soft-cancel every live booking of a series. With `from_date` set only
    /// bookings on or after that date are touched (future-only cancel).
    /// Returns the number of cancelled rows.
    pub async fn cancel_by_series<'e, E>(
        db: E,
        series_id: &str,
        from_date: Option<NaiveDate>,
    ) -> AppResult<u64>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET status = 'cancelled', updated_at = ?
            WHERE series_id = ?
              AND status != 'cancelled'
              AND (? IS NULL OR date >= ?)
            "#,
        )
        .bind(now)
        .bind(series_id)
        .bind(from_date)
        .bind(from_date)
        .execute(db)
        .await
        .map_err(AppError::Database)?;

        Ok(result.rows_affected())
    }
}
