use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::repository::{AvailabilityRepository, BookingRepository, SchedulingConfigRepository};
use crate::error::{AppError, AppResult};
use crate::scheduling::{annotate_slots, generate_slots, AnnotatedSlot};

/// The bookable-slot view for one calendar day.
///
/// `works_today == false` means the professional has no availability window
/// on that weekday at all, a different condition from "every slot is taken",
/// which shows up as `works_today == true` with no free slot.
#[derive(Debug, Clone, Serialize)]
pub struct DaySchedule {
    pub professional_id: String,
    pub date: NaiveDate,
    pub works_today: bool,
    pub timezone: String,
    pub slots: Vec<AnnotatedSlot>,
}

pub struct AgendaService;

impl AgendaService {
    /// Compute the annotated slot grid for `date`. `now` is the current
    /// timestamp; when `date` is today, slots that already started are
    /// marked past. The timezone string is echoed for display only.
    pub async fn day_schedule(
        pool: &SqlitePool,
        professional_id: &str,
        date: NaiveDate,
        now: NaiveDateTime,
    ) -> AppResult<DaySchedule> {
        let config = SchedulingConfigRepository::get(pool, professional_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "no scheduling config for professional {}",
                    professional_id
                ))
            })?;

        let day_of_week = date.weekday().num_days_from_monday() as i64;
        let windows =
            AvailabilityRepository::list_for_day(pool, professional_id, day_of_week).await?;

        if windows.is_empty() {
            return Ok(DaySchedule {
                professional_id: professional_id.to_string(),
                date,
                works_today: false,
                timezone: config.timezone,
                slots: Vec::new(),
            });
        }

        let bookings =
            BookingRepository::list_by_professional_and_date(pool, professional_id, date).await?;

        let slots = generate_slots(
            &windows,
            config.lesson_duration_minutes as u32,
            config.gap_minutes as u32,
        );
        let time_now = (date == now.date()).then(|| now.time());
        let slots = annotate_slots(&slots, &bookings, time_now);

        Ok(DaySchedule {
            professional_id: professional_id.to_string(),
            date,
            works_today: true,
            timezone: config.timezone,
            slots,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    use crate::db::models::CreateBooking;
    use crate::db::test_util::{memory_pool, seed_client, seed_config, seed_window};
    use crate::scheduling::SlotStatus;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn at(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        date.and_time(t(h, m))
    }

    #[tokio::test]
    async fn monday_grid_marks_the_booked_hour_as_conflicted() {
        let pool = memory_pool().await;
        let client = seed_client(&pool, "prof-1", "Ana").await;
        seed_config(&pool, "prof-1", 60, 0).await;
        // 2025-03-03 is a Monday.
        seed_window(&pool, "prof-1", 0, "08:00:00", "12:00:00").await;

        let booked = BookingRepository::create(
            &pool,
            CreateBooking {
                professional_id: "prof-1".to_string(),
                client_id: client,
                date: d(2025, 3, 3),
                start_time: t(9, 0),
                end_time: t(10, 0),
                tag_id: None,
                notes: None,
                series_id: None,
                is_recurring: false,
            },
        )
        .await
        .unwrap();

        let schedule = AgendaService::day_schedule(
            &pool,
            "prof-1",
            d(2025, 3, 3),
            at(d(2025, 3, 1), 12, 0),
        )
        .await
        .unwrap();

        assert!(schedule.works_today);
        let statuses: Vec<_> = schedule.slots.iter().map(|s| s.status.clone()).collect();
        assert_eq!(
            statuses,
            vec![
                SlotStatus::Free,
                SlotStatus::Conflicted { booking_id: booked.id },
                SlotStatus::Free,
                SlotStatus::Free,
            ]
        );
    }

    #[tokio::test]
    async fn day_without_windows_is_not_a_working_day() {
        let pool = memory_pool().await;
        seed_config(&pool, "prof-1", 60, 0).await;
        seed_window(&pool, "prof-1", 0, "08:00:00", "12:00:00").await;

        // 2025-03-04 is a Tuesday; only Monday has windows.
        let schedule = AgendaService::day_schedule(
            &pool,
            "prof-1",
            d(2025, 3, 4),
            at(d(2025, 3, 1), 12, 0),
        )
        .await
        .unwrap();

        assert!(!schedule.works_today);
        assert!(schedule.slots.is_empty());
    }

    #[tokio::test]
    async fn slots_before_now_are_past_only_when_the_date_is_today() {
        let pool = memory_pool().await;
        seed_config(&pool, "prof-1", 60, 0).await;
        seed_window(&pool, "prof-1", 0, "08:00:00", "12:00:00").await;

        // Viewing today at 10:30: 08, 09 and 10 o'clock already started.
        let today = d(2025, 3, 3);
        let schedule = AgendaService::day_schedule(&pool, "prof-1", today, at(today, 10, 30))
            .await
            .unwrap();
        let past = schedule
            .slots
            .iter()
            .filter(|s| s.status == SlotStatus::Past)
            .count();
        assert_eq!(past, 3);

        // Viewing the same grid a week ahead: nothing is past.
        let next_monday = d(2025, 3, 10);
        let schedule = AgendaService::day_schedule(&pool, "prof-1", next_monday, at(today, 10, 30))
            .await
            .unwrap();
        assert!(schedule.slots.iter().all(|s| s.status == SlotStatus::Free));
    }

    #[tokio::test]
    async fn gap_minutes_shift_the_grid() {
        let pool = memory_pool().await;
        seed_config(&pool, "prof-1", 60, 15).await;
        seed_window(&pool, "prof-1", 0, "08:00:00", "10:00:00").await;

        let schedule = AgendaService::day_schedule(
            &pool,
            "prof-1",
            d(2025, 3, 3),
            at(d(2025, 3, 1), 12, 0),
        )
        .await
        .unwrap();

        // Only 08:00-09:00 fits; 09:15-10:15 would overrun the window.
        assert_eq!(schedule.slots.len(), 1);
        assert_eq!(schedule.slots[0].start, t(8, 0));
        assert_eq!(schedule.slots[0].end, t(9, 0));
    }

    #[tokio::test]
    async fn missing_config_is_not_found() {
        let pool = memory_pool().await;

        let err = AgendaService::day_schedule(
            &pool,
            "prof-1",
            d(2025, 3, 3),
            at(d(2025, 3, 1), 12, 0),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn cancelled_bookings_do_not_block_slots() {
        let pool = memory_pool().await;
        let client = seed_client(&pool, "prof-1", "Ana").await;
        seed_config(&pool, "prof-1", 60, 0).await;
        seed_window(&pool, "prof-1", 0, "08:00:00", "10:00:00").await;

        let booking = BookingRepository::create(
            &pool,
            CreateBooking {
                professional_id: "prof-1".to_string(),
                client_id: client,
                date: d(2025, 3, 3),
                start_time: t(8, 0),
                end_time: t(9, 0),
                tag_id: None,
                notes: None,
                series_id: None,
                is_recurring: false,
            },
        )
        .await
        .unwrap();
        crate::db::repository::BookingRepository::update_status(
            &pool,
            &booking.id,
            crate::db::models::BookingStatus::Cancelled,
        )
        .await
        .unwrap();

        let schedule = AgendaService::day_schedule(
            &pool,
            "prof-1",
            d(2025, 3, 3),
            at(d(2025, 3, 1), 12, 0),
        )
        .await
        .unwrap();
        assert!(schedule.slots.iter().all(|s| s.status == SlotStatus::Free));
    }
}
