use chrono::{Duration, NaiveDate, NaiveTime};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::models::{CreateBooking, CreateSeries, RecurrenceType, SeriesSummary};
use crate::db::repository::{BookingRepository, ClientRepository, SeriesRepository};
use crate::error::{AppError, AppResult};
use crate::scheduling::{expand, RecurrencePattern};

/// Aggregate result of a series creation. Conflicting occurrences are
/// skipped, not failed: `total_generated + total_skipped == total_requested`
/// always holds.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesCreated {
    pub series_id: String,
    pub total_requested: usize,
    pub total_generated: usize,
    pub total_skipped: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesCancelled {
    pub series_id: String,
    pub total_cancelled: u64,
}

/// Orchestrates recurrence rules: validation, expansion and the bulk insert
/// of the generated bookings. This service is the only transaction boundary
/// for series writes: either the rule row and every generated booking
/// commit together, or nothing does.
pub struct SeriesService;

impl SeriesService {
    pub async fn create_series(pool: &SqlitePool, input: CreateSeries) -> AppResult<SeriesCreated> {
        let pattern = validate(&input)?;
        let end_time = booking_end_time(input.time_of_day, input.duration_minutes)?;

        let client = ClientRepository::find_by_id(pool, &input.client_id)
            .await?
            .filter(|c| c.professional_id == input.professional_id)
            .ok_or_else(|| AppError::NotFound(format!("client {} not found", input.client_id)))?;

        let dates = expand(input.start_date, &pattern, input.end_date, input.max_occurrences)
            .map_err(|e| AppError::Validation(vec![e.to_string()]))?;

        let mut tx = pool.begin().await.map_err(AppError::Database)?;

        let series = SeriesRepository::create(&mut *tx, &input).await?;

        let mut generated = 0usize;
        let mut skipped = 0usize;
        for date in &dates {
            let conflict = BookingRepository::find_conflict(
                &mut *tx,
                &input.professional_id,
                *date,
                input.time_of_day,
                end_time,
                None,
            )
            .await?;
            if conflict.is_some() {
                skipped += 1;
                continue;
            }

            BookingRepository::create(
                &mut *tx,
                CreateBooking {
                    professional_id: input.professional_id.clone(),
                    client_id: client.id.clone(),
                    date: *date,
                    start_time: input.time_of_day,
                    end_time,
                    tag_id: input.tag_id.clone(),
                    notes: input.notes.clone(),
                    series_id: Some(series.id.clone()),
                    is_recurring: true,
                },
            )
            .await?;
            generated += 1;
        }

        SeriesRepository::set_total_generated(&mut *tx, &series.id, generated as i64).await?;

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!(
            series_id = %series.id,
            requested = dates.len(),
            generated,
            skipped,
            "Created booking series"
        );

        Ok(SeriesCreated {
            series_id: series.id,
            total_requested: dates.len(),
            total_generated: generated,
            total_skipped: skipped,
        })
    }

    /// Finish the rule and soft-cancel its bookings: all of them, or only
    /// those on/after `today` when `future_only` is set.
    pub async fn cancel_series(
        pool: &SqlitePool,
        series_id: &str,
        professional_id: &str,
        future_only: bool,
        today: NaiveDate,
    ) -> AppResult<SeriesCancelled> {
        let mut tx = pool.begin().await.map_err(AppError::Database)?;

        let series = SeriesRepository::find_by_id(&mut *tx, series_id)
            .await?
            .filter(|s| s.professional_id == professional_id)
            .ok_or_else(|| AppError::NotFound(format!("series {} not found", series_id)))?;

        SeriesRepository::finish(&mut *tx, &series.id).await?;
        let from_date = future_only.then_some(today);
        let cancelled = BookingRepository::cancel_by_series(&mut *tx, &series.id, from_date).await?;

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!(series_id = %series.id, cancelled, future_only, "Cancelled booking series");

        Ok(SeriesCancelled {
            series_id: series.id,
            total_cancelled: cancelled,
        })
    }

    pub async fn list_active_series(
        pool: &SqlitePool,
        professional_id: &str,
    ) -> AppResult<Vec<SeriesSummary>> {
        SeriesRepository::list_active_with_details(pool, professional_id).await
    }
}

/// Check the per-type requirements and assemble the typed pattern. Every
/// problem is collected so the caller sees the whole list at once, not just
/// the first missing field.
fn validate(input: &CreateSeries) -> Result<RecurrencePattern, AppError> {
    let mut errors = Vec::new();

    let interval = input.interval.unwrap_or(1);
    if input.interval == Some(0) {
        errors.push("interval must be at least 1".to_string());
    }

    if input.duration_minutes == 0 {
        errors.push("duration_minutes must be positive".to_string());
    } else {
        let (_, wrapped) = input
            .time_of_day
            .overflowing_add_signed(Duration::minutes(input.duration_minutes as i64));
        if wrapped != 0 {
            errors.push("appointment would cross midnight".to_string());
        }
    }

    let pattern = match input.recurrence_type {
        RecurrenceType::Daily => Some(RecurrencePattern::Daily { interval }),
        RecurrenceType::Weekly => match &input.days_of_week {
            Some(days) if !days.is_empty() => {
                for &day in days {
                    if !(1..=7).contains(&day) {
                        errors.push(format!("weekday {} is outside the ISO range 1-7", day));
                    }
                }
                Some(RecurrencePattern::Weekly {
                    interval,
                    days_of_week: days.clone(),
                })
            }
            _ => {
                errors.push("days_of_week is required for weekly series".to_string());
                None
            }
        },
        RecurrenceType::Monthly => match input.day_of_month {
            Some(day) if (1..=31).contains(&day) => Some(RecurrencePattern::Monthly {
                interval,
                day_of_month: day,
            }),
            Some(day) => {
                errors.push(format!("day_of_month {} is outside the range 1-31", day));
                None
            }
            None => {
                errors.push("day_of_month is required for monthly series".to_string());
                None
            }
        },
    };

    match (pattern, errors.is_empty()) {
        (Some(pattern), true) => Ok(pattern),
        _ => Err(AppError::Validation(errors)),
    }
}

fn booking_end_time(start: NaiveTime, duration_minutes: u32) -> AppResult<NaiveTime> {
    let (end, wrapped) = start.overflowing_add_signed(Duration::minutes(duration_minutes as i64));
    if wrapped != 0 {
        return Err(AppError::Validation(vec![
            "appointment would cross midnight".to_string(),
        ]));
    }
    Ok(end)
}
