//! Pure scheduling logic: recurrence expansion, slot generation and interval
//! overlap checks. Nothing in this module touches the database; services feed
//! it rows and persist its output.

pub mod conflict;
pub mod recurrence;
pub mod slots;

pub use conflict::{find_conflict, overlaps};
pub use recurrence::{expand, RecurrenceError, RecurrencePattern};
pub use slots::{annotate_slots, generate_slots, AnnotatedSlot, Slot, SlotStatus};
