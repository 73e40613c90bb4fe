use chrono::{Duration, NaiveTime};
use serde::Serialize;

use crate::db::models::{AvailabilityWindow, Booking};
use crate::scheduling::conflict;

/// A candidate bookable interval `[start, end)` within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SlotStatus {
    Free,
    Past,
    Conflicted { booking_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
    #[serde(flatten)]
    pub status: SlotStatus,
}

/// Walk each availability window emitting `[t, t + duration)` while the slot
/// still fits, advancing by `duration + gap`. Slots are concatenated in
/// window order; a slot that would cross midnight ends the window.
pub fn generate_slots(
    windows: &[AvailabilityWindow],
    duration_minutes: u32,
    gap_minutes: u32,
) -> Vec<Slot> {
    if duration_minutes == 0 {
        return Vec::new();
    }
    let duration = Duration::minutes(duration_minutes as i64);
    let stride = duration + Duration::minutes(gap_minutes as i64);

    let mut slots = Vec::new();
    for window in windows {
        let mut start = window.start_time;
        loop {
            let (end, wrapped) = start.overflowing_add_signed(duration);
            if wrapped != 0 || end > window.end_time {
                break;
            }
            slots.push(Slot { start, end });
            let (next, wrapped) = start.overflowing_add_signed(stride);
            if wrapped != 0 {
                break;
            }
            start = next;
        }
    }
    slots
}

/// Tag every slot as free, past or conflicted. `now` is the current
/// wall-clock time when the target date is today, `None` otherwise. The past
/// check runs before the conflict check, so a slot that is both reports
/// "past".
pub fn annotate_slots(
    slots: &[Slot],
    bookings: &[Booking],
    now: Option<NaiveTime>,
) -> Vec<AnnotatedSlot> {
    slots
        .iter()
        .map(|slot| {
            let status = if now.is_some_and(|n| slot.start < n) {
                SlotStatus::Past
            } else if let Some(hit) = conflict::find_conflict(slot.start, slot.end, bookings) {
                SlotStatus::Conflicted {
                    booking_id: hit.id.clone(),
                }
            } else {
                SlotStatus::Free
            };
            AnnotatedSlot {
                start: slot.start,
                end: slot.end,
                status,
            }
        })
        .collect()
}
