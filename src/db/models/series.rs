use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SeriesStatus {
    Active,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceType {
    Daily,
    Weekly,
    Monthly,
}

/// A persisted recurrence rule (one row per series of bookings).
///
/// `days_of_week` holds a JSON array of ISO weekdays (1-7) and is populated
/// only for weekly rules; `day_of_month` only for monthly rules. The typed
/// view of these fields is `scheduling::RecurrencePattern`.
///
/// `total_generated` is denormalized: written once right after the initial
/// expansion and never recomputed.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct BookingSeries {
    pub id: String,
    pub professional_id: String,
    pub client_id: String,
    pub time_of_day: NaiveTime,
    pub duration_minutes: i64,
    pub tag_id: Option<String>,
    pub notes: Option<String>,
    pub recurrence_type: RecurrenceType,
    pub days_of_week: Option<String>,
    pub interval: i64,
    pub day_of_month: Option<i64>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub max_occurrences: Option<i64>,
    pub status: SeriesStatus,
    pub total_generated: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input for creating a new series. Per-type requirements (weekly needs
/// `days_of_week`, monthly needs `day_of_month`) are checked by
/// `SeriesService` before anything touches the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSeries {
    pub professional_id: String,
    pub client_id: String,
    pub time_of_day: NaiveTime,
    pub duration_minutes: u32,
    pub tag_id: Option<String>,
    pub notes: Option<String>,
    pub recurrence_type: RecurrenceType,
    pub days_of_week: Option<Vec<u8>>,
    pub interval: Option<u32>,
    pub day_of_month: Option<u32>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub max_occurrences: Option<u32>,
}

/// Row shape for the active-series listing, joined with client and tag
/// display data.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SeriesSummary {
    pub id: String,
    pub client_id: String,
    pub client_name: String,
    pub time_of_day: NaiveTime,
    pub duration_minutes: i64,
    pub recurrence_type: RecurrenceType,
    pub interval: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub total_generated: i64,
    pub tag_name: Option<String>,
    pub tag_color: Option<String>,
}
