use chrono::{Datelike, Days, Months, NaiveDate};

/// Cap applied when a rule has neither end date nor occurrence limit.
pub const DEFAULT_MAX_OCCURRENCES: u32 = 100;
/// Expansion horizon for rules without an end date.
pub const DEFAULT_HORIZON_MONTHS: u32 = 3;

/// Typed recurrence rule. The per-type fields are part of the variant, so a
/// weekly rule without weekdays or a monthly rule without a day of month
/// cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrencePattern {
    Daily {
        interval: u32,
    },
    /// `days_of_week` are ISO weekdays, 1 = Monday .. 7 = Sunday.
    Weekly {
        interval: u32,
        days_of_week: Vec<u8>,
    },
    /// `day_of_month` clamps to the last day of shorter months.
    Monthly {
        interval: u32,
        day_of_month: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecurrenceError {
    #[error("interval must be at least 1")]
    ZeroInterval,

    #[error("weekly rules need at least one weekday")]
    EmptyWeekdays,

    #[error("weekday {0} is outside the ISO range 1-7")]
    InvalidWeekday(u8),

    #[error("day of month {0} is outside the range 1-31")]
    InvalidDayOfMonth(u32),

    #[error("date arithmetic overflowed")]
    DateOverflow,
}

impl RecurrencePattern {
    pub fn interval(&self) -> u32 {
        match self {
            RecurrencePattern::Daily { interval }
            | RecurrencePattern::Weekly { interval, .. }
            | RecurrencePattern::Monthly { interval, .. } => *interval,
        }
    }

    fn validate(&self) -> Result<(), RecurrenceError> {
        if self.interval() == 0 {
            return Err(RecurrenceError::ZeroInterval);
        }
        match self {
            RecurrencePattern::Daily { .. } => {}
            RecurrencePattern::Weekly { days_of_week, .. } => {
                if days_of_week.is_empty() {
                    return Err(RecurrenceError::EmptyWeekdays);
                }
                if let Some(&bad) = days_of_week.iter().find(|d| !(1..=7).contains(*d)) {
                    return Err(RecurrenceError::InvalidWeekday(bad));
                }
            }
            RecurrencePattern::Monthly { day_of_month, .. } => {
                if !(1..=31).contains(day_of_month) {
                    return Err(RecurrenceError::InvalidDayOfMonth(*day_of_month));
                }
            }
        }
        Ok(())
    }
}

/// Expand a recurrence rule into the ascending list of concrete dates.
///
/// Stop conditions: `end_date` (inclusive) and `max_occurrences`. A rule
/// without an end date is capped at `start_date + 3 months`, and also at 100
/// occurrences when no explicit limit was given. An empty result is valid
/// (e.g. end date before start date).
pub fn expand(
    start_date: NaiveDate,
    pattern: &RecurrencePattern,
    end_date: Option<NaiveDate>,
    max_occurrences: Option<u32>,
) -> Result<Vec<NaiveDate>, RecurrenceError> {
    pattern.validate()?;

    let (end, max) = match (end_date, max_occurrences) {
        (Some(end), Some(max)) => (end, max as usize),
        (Some(end), None) => (end, usize::MAX),
        (None, max) => {
            let horizon = start_date
                .checked_add_months(Months::new(DEFAULT_HORIZON_MONTHS))
                .ok_or(RecurrenceError::DateOverflow)?;
            (horizon, max.unwrap_or(DEFAULT_MAX_OCCURRENCES) as usize)
        }
    };

    let mut dates = Vec::new();
    match *pattern {
        RecurrencePattern::Daily { interval } => {
            let mut current = start_date;
            while current <= end && dates.len() < max {
                dates.push(current);
                current = current
                    .checked_add_days(Days::new(interval as u64))
                    .ok_or(RecurrenceError::DateOverflow)?;
            }
        }
        RecurrencePattern::Weekly {
            interval,
            ref days_of_week,
        } => {
            let mut current = start_date;
            while current <= end && dates.len() < max {
                let iso_weekday = current.weekday().number_from_monday() as u8;
                if days_of_week.contains(&iso_weekday) {
                    dates.push(current);
                }
                let mut next = current
                    .checked_add_days(Days::new(1))
                    .ok_or(RecurrenceError::DateOverflow)?;
                // Sunday closes the week; multi-week intervals jump over the
                // weeks in between.
                if iso_weekday == 7 && interval > 1 {
                    next = next
                        .checked_add_days(Days::new((interval as u64 - 1) * 7))
                        .ok_or(RecurrenceError::DateOverflow)?;
                }
                current = next;
            }
        }
        RecurrencePattern::Monthly {
            interval,
            day_of_month,
        } => {
            let mut step = 0u32;
            while dates.len() < max {
                let anchor = start_date
                    .checked_add_months(Months::new(step * interval))
                    .ok_or(RecurrenceError::DateOverflow)?;
                let last_day = days_in_month(anchor.year(), anchor.month())
                    .ok_or(RecurrenceError::DateOverflow)?;
                let date =
                    NaiveDate::from_ymd_opt(anchor.year(), anchor.month(), day_of_month.min(last_day))
                        .ok_or(RecurrenceError::DateOverflow)?;
                if date > end {
                    break;
                }
                if date >= start_date {
                    dates.push(date);
                }
                step += 1;
            }
        }
    }

    Ok(dates)
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    Some(first.checked_add_months(Months::new(1))?.pred_opt()?.day())
}
