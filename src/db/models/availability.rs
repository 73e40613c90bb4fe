use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One weekly working interval. `day_of_week`: 0 = Monday .. 6 = Sunday,
/// matching chrono's `num_days_from_monday`. A professional may declare
/// several windows on the same day (e.g. morning and afternoon blocks).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub id: String,
    pub professional_id: String,
    pub day_of_week: i64,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAvailabilityWindow {
    pub day_of_week: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Per-professional slot parameters. One row each; the timezone string is
/// stored verbatim and only ever echoed back for display.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SchedulingConfig {
    pub professional_id: String,
    pub lesson_duration_minutes: i64,
    pub gap_minutes: i64,
    pub timezone: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertSchedulingConfig {
    pub lesson_duration_minutes: u32,
    pub gap_minutes: u32,
    pub timezone: Option<String>,
}
