use chrono::NaiveTime;
use sqlx::SqlitePool;

use crate::db::models::{Booking, BookingStatus, CreateBooking, UpdateBooking};
use crate::db::repository::{BookingRepository, ClientRepository};
use crate::error::{AppError, AppResult};

/// Direct single-appointment path. Unlike series expansion, a conflicting
/// slot here is an error for the caller, not a silent skip.
pub struct BookingService;

impl BookingService {
    pub async fn create_booking(pool: &SqlitePool, mut input: CreateBooking) -> AppResult<Booking> {
        validate_times(input.start_time, input.end_time)?;

        ClientRepository::find_by_id(pool, &input.client_id)
            .await?
            .filter(|c| c.professional_id == input.professional_id)
            .ok_or_else(|| AppError::NotFound(format!("client {} not found", input.client_id)))?;

        if let Some(conflicting) = BookingRepository::find_conflict(
            pool,
            &input.professional_id,
            input.date,
            input.start_time,
            input.end_time,
            None,
        )
        .await?
        {
            return Err(AppError::Conflict(format!(
                "time slot overlaps existing booking {}",
                conflicting.id
            )));
        }

        // Standalone path: series linkage is owned by the orchestrator.
        input.series_id = None;
        input.is_recurring = false;

        BookingRepository::create(pool, input).await
    }

    pub async fn update_booking(
        pool: &SqlitePool,
        id: &str,
        professional_id: &str,
        update: UpdateBooking,
    ) -> AppResult<Booking> {
        let mut booking = BookingRepository::find_by_id(pool, id)
            .await?
            .filter(|b| b.professional_id == professional_id)
            .ok_or_else(|| AppError::NotFound(format!("booking {} not found", id)))?;

        if let Some(date) = update.date {
            booking.date = date;
        }
        if let Some(start_time) = update.start_time {
            booking.start_time = start_time;
        }
        if let Some(end_time) = update.end_time {
            booking.end_time = end_time;
        }
        if update.tag_id.is_some() {
            booking.tag_id = update.tag_id;
        }
        if update.notes.is_some() {
            booking.notes = update.notes;
        }

        validate_times(booking.start_time, booking.end_time)?;

        if let Some(conflicting) = BookingRepository::find_conflict(
            pool,
            professional_id,
            booking.date,
            booking.start_time,
            booking.end_time,
            Some(&booking.id),
        )
        .await?
        {
            return Err(AppError::Conflict(format!(
                "time slot overlaps existing booking {}",
                conflicting.id
            )));
        }

        BookingRepository::update(pool, &booking).await
    }

    /// Soft-cancel. Cancelling an already-cancelled booking is a no-op.
    pub async fn cancel_booking(
        pool: &SqlitePool,
        id: &str,
        professional_id: &str,
    ) -> AppResult<Booking> {
        let booking = BookingRepository::find_by_id(pool, id)
            .await?
            .filter(|b| b.professional_id == professional_id)
            .ok_or_else(|| AppError::NotFound(format!("booking {} not found", id)))?;

        if booking.status == BookingStatus::Cancelled {
            return Ok(booking);
        }

        BookingRepository::update_status(pool, &booking.id, BookingStatus::Cancelled)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("booking {} not found", id)))
    }

    pub async fn get_booking(
        pool: &SqlitePool,
        id: &str,
        professional_id: &str,
    ) -> AppResult<Booking> {
        BookingRepository::find_by_id(pool, id)
            .await?
            .filter(|b| b.professional_id == professional_id)
            .ok_or_else(|| AppError::NotFound(format!("booking {} not found", id)))
    }
}

fn validate_times(start: NaiveTime, end: NaiveTime) -> AppResult<()> {
    if start >= end {
        return Err(AppError::Validation(vec![
            "start_time must be before end_time".to_string(),
        ]));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::db::test_util::{memory_pool, seed_client};

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn new_booking(client_id: &str, start: NaiveTime, end: NaiveTime) -> CreateBooking {
        CreateBooking {
            professional_id: "prof-1".to_string(),
            client_id: client_id.to_string(),
            date: d(2025, 3, 3),
            start_time: start,
            end_time: end,
            tag_id: None,
            notes: None,
            series_id: None,
            is_recurring: false,
        }
    }

    #[tokio::test]
    async fn overlapping_direct_booking_is_a_conflict_error() {
        let pool = memory_pool().await;
        let client = seed_client(&pool, "prof-1", "Ana").await;
        BookingService::create_booking(&pool, new_booking(&client, t(9, 0), t(10, 0)))
            .await
            .unwrap();

        let err = BookingService::create_booking(&pool, new_booking(&client, t(9, 30), t(10, 30)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn abutting_direct_booking_is_allowed() {
        let pool = memory_pool().await;
        let client = seed_client(&pool, "prof-1", "Ana").await;
        BookingService::create_booking(&pool, new_booking(&client, t(9, 0), t(10, 0)))
            .await
            .unwrap();

        BookingService::create_booking(&pool, new_booking(&client, t(10, 0), t(11, 0)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn inverted_times_are_rejected() {
        let pool = memory_pool().await;
        let client = seed_client(&pool, "prof-1", "Ana").await;

        let err = BookingService::create_booking(&pool, new_booking(&client, t(10, 0), t(9, 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn reschedule_into_occupied_slot_is_rejected() {
        let pool = memory_pool().await;
        let client = seed_client(&pool, "prof-1", "Ana").await;
        BookingService::create_booking(&pool, new_booking(&client, t(9, 0), t(10, 0)))
            .await
            .unwrap();
        let second = BookingService::create_booking(&pool, new_booking(&client, t(11, 0), t(12, 0)))
            .await
            .unwrap();

        let err = BookingService::update_booking(
            &pool,
            &second.id,
            "prof-1",
            UpdateBooking {
                start_time: Some(t(9, 30)),
                end_time: Some(t(10, 30)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_keeping_the_same_slot_does_not_conflict_with_itself() {
        let pool = memory_pool().await;
        let client = seed_client(&pool, "prof-1", "Ana").await;
        let booking = BookingService::create_booking(&pool, new_booking(&client, t(9, 0), t(10, 0)))
            .await
            .unwrap();

        let updated = BookingService::update_booking(
            &pool,
            &booking.id,
            "prof-1",
            UpdateBooking {
                notes: Some("bring homework".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.notes.as_deref(), Some("bring homework"));
        assert_eq!(updated.start_time, t(9, 0));
    }

    #[tokio::test]
    async fn cancel_is_idempotent_and_frees_the_slot() {
        let pool = memory_pool().await;
        let client = seed_client(&pool, "prof-1", "Ana").await;
        let booking = BookingService::create_booking(&pool, new_booking(&client, t(9, 0), t(10, 0)))
            .await
            .unwrap();

        let cancelled = BookingService::cancel_booking(&pool, &booking.id, "prof-1")
            .await
            .unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        let again = BookingService::cancel_booking(&pool, &booking.id, "prof-1")
            .await
            .unwrap();
        assert_eq!(again.status, BookingStatus::Cancelled);

        // The slot is bookable again.
        BookingService::create_booking(&pool, new_booking(&client, t(9, 0), t(10, 0)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn other_professionals_cannot_touch_the_booking() {
        let pool = memory_pool().await;
        let client = seed_client(&pool, "prof-1", "Ana").await;
        let booking = BookingService::create_booking(&pool, new_booking(&client, t(9, 0), t(10, 0)))
            .await
            .unwrap();

        let err = BookingService::cancel_booking(&pool, &booking.id, "prof-2")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
