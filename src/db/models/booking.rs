use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

/// A single appointment on a professional's calendar.
///
/// `series_id` links back to the recurrence rule when the row was produced by
/// series expansion; standalone bookings leave it NULL. Cancellation is a
/// status flip, never a delete, so the row stays visible in history views.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub professional_id: String,
    pub client_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub tag_id: Option<String>,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub series_id: Option<String>,
    pub is_recurring: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data required to insert a booking row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBooking {
    pub professional_id: String,
    pub client_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub tag_id: Option<String>,
    pub notes: Option<String>,
    pub series_id: Option<String>,
    pub is_recurring: bool,
}

/// Partial update for an existing booking. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBooking {
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub tag_id: Option<String>,
    pub notes: Option<String>,
}
