use chrono::NaiveTime;

use crate::db::models::{Booking, BookingStatus};

/// Half-open interval overlap: `[a_start, a_end)` against `[b_start, b_end)`.
/// Abutting intervals (one ends exactly where the other starts) do not
/// overlap.
pub fn overlaps<T: PartialOrd>(a_start: T, a_end: T, b_start: T, b_end: T) -> bool {
    a_start < b_end && b_start < a_end
}

/// First booking whose interval overlaps `[start, end)`, in input order.
/// Cancelled bookings never conflict.
pub fn find_conflict<'a>(
    start: NaiveTime,
    end: NaiveTime,
    existing: &'a [Booking],
) -> Option<&'a Booking> {
    existing
        .iter()
        .filter(|b| b.status != BookingStatus::Cancelled)
        .find(|b| overlaps(start, end, b.start_time, b.end_time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn booking(id: &str, start: NaiveTime, end: NaiveTime, status: BookingStatus) -> Booking {
        let now = Utc::now().naive_utc();
        Booking {
            id: id.to_string(),
            professional_id: "prof-1".to_string(),
            client_id: "client-1".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            start_time: start,
            end_time: end,
            tag_id: None,
            notes: None,
            status,
            series_id: None,
            is_recurring: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn overlap_is_symmetric() {
        let cases = [
            (t(9, 0), t(10, 0), t(9, 30), t(10, 30)),
            (t(9, 0), t(10, 0), t(10, 0), t(11, 0)),
            (t(8, 0), t(12, 0), t(9, 0), t(10, 0)),
            (t(9, 0), t(10, 0), t(14, 0), t(15, 0)),
        ];
        for (a, b, c, d) in cases {
            assert_eq!(overlaps(a, b, c, d), overlaps(c, d, a, b));
        }
    }

    #[test]
    fn abutting_intervals_do_not_conflict() {
        assert!(!overlaps(t(9, 0), t(10, 0), t(10, 0), t(11, 0)));
        assert!(!overlaps(t(10, 0), t(11, 0), t(9, 0), t(10, 0)));
    }

    #[test]
    fn containment_and_partial_overlap_conflict() {
        assert!(overlaps(t(8, 0), t(12, 0), t(9, 0), t(10, 0)));
        assert!(overlaps(t(9, 30), t(10, 30), t(9, 0), t(10, 0)));
        assert!(overlaps(t(9, 0), t(10, 0), t(9, 0), t(10, 0)));
    }

    #[test]
    fn find_conflict_returns_first_in_input_order() {
        let existing = vec![
            booking("a", t(9, 0), t(10, 0), BookingStatus::Confirmed),
            booking("b", t(9, 30), t(10, 30), BookingStatus::Confirmed),
        ];
        let hit = find_conflict(t(9, 45), t(10, 45), &existing).unwrap();
        assert_eq!(hit.id, "a");
    }

    #[test]
    fn cancelled_bookings_never_conflict() {
        let existing = vec![booking("a", t(9, 0), t(10, 0), BookingStatus::Cancelled)];
        assert!(find_conflict(t(9, 0), t(10, 0), &existing).is_none());
    }

    #[test]
    fn no_conflict_returns_none() {
        let existing = vec![booking("a", t(9, 0), t(10, 0), BookingStatus::Confirmed)];
        assert!(find_conflict(t(10, 0), t(11, 0), &existing).is_none());
    }
}
