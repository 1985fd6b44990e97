//! Scheduling rules.
//!
//! A rule looks at a slot collection and returns the slots (or synthetic
//! sub-slots) that are forbidden. Rules never change their input and never
//! remove anything themselves: the caller subtracts the forbidden slots, either
//! with [`difference_slots`] (which can split slots) or by exact match with
//! [`remove_slots`] (which cannot).
//!
//! - [`weekday`] — allow or forbid days of the week
//! - [`time_of_day`] — allow or forbid local time-of-day windows
//! - [`buffer`] — pad matching slots with buffer time
//! - [`day_limit`] — cap the number of slots per local day

use tracing::trace;

use crate::operations::remove_slots;
use crate::options::SlotOperationOptions;
use crate::set_ops::difference_slots;
use crate::slot::Slot;

pub mod buffer;
pub mod day_limit;
pub mod time_of_day;
pub mod weekday;

pub use buffer::{buffer_rule, BufferType};
pub use day_limit::max_slots_per_day_rule;
pub use time_of_day::{
    allow_time_of_day_rule, allow_time_range_rule, block_time_range_rule,
    no_meetings_after_rule, no_meetings_before_rule, time_of_day_rule, TimeOfDay,
};
pub use weekday::{
    allow_weekdays_rule, forbid_weekdays_rule, remove_weekends_rule, weekday_from_number,
};

/// A rule: slots in, forbidden slots out.
pub type SlotRule = Box<dyn Fn(&[Slot]) -> Vec<Slot> + Send + Sync>;

/// Subtract each rule's forbidden slots from `slots`, in order.
///
/// Each rule sees the remainder left by the rules before it. Subtraction uses
/// [`difference_slots`], so buffers and other partial overlaps cut notches
/// rather than removing whole slots.
pub fn apply_rules(
    slots: &[Slot],
    rules: &[SlotRule],
    options: &SlotOperationOptions,
) -> Vec<Slot> {
    let mut remaining = slots.to_vec();
    for (index, rule) in rules.iter().enumerate() {
        let forbidden = rule(&remaining);
        trace!("rule {} forbade {} slots", index, forbidden.len());
        if forbidden.is_empty() {
            continue;
        }
        remaining = difference_slots(&remaining, &forbidden, options);
    }
    remaining
}

/// Drop every slot the rule forbids, by exact `(start, end)` match.
pub fn remove_forbidden(slots: &[Slot], rule: &SlotRule) -> Vec<Slot> {
    let forbidden = rule(slots);
    remove_slots(forbidden)(slots.to_vec()).data
}
