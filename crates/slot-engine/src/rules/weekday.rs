//! Day-of-week rules.
//!
//! The weekday of a slot is the local weekday of its start, in the slot's own
//! zone. Two slots at the same instant in different zones can land on
//! different days.

use chrono::{Datelike, Weekday};

use super::SlotRule;
use crate::error::{Result, SlotError};
use crate::slot::Slot;

fn weekday_rule(weekdays: &[Weekday], is_allow_list: bool) -> SlotRule {
    let weekdays = weekdays.to_vec();
    Box::new(move |slots: &[Slot]| {
        // An empty list is "no restriction", for both variants.
        if weekdays.is_empty() {
            return Vec::new();
        }
        slots
            .iter()
            .filter(|slot| weekdays.contains(&slot.start.weekday()) != is_allow_list)
            .cloned()
            .collect()
    })
}

/// Forbid every slot that does not start on one of `allowed`.
pub fn allow_weekdays_rule(allowed: &[Weekday]) -> SlotRule {
    weekday_rule(allowed, true)
}

/// Forbid every slot that starts on one of `forbidden`.
pub fn forbid_weekdays_rule(forbidden: &[Weekday]) -> SlotRule {
    weekday_rule(forbidden, false)
}

/// Forbid Saturdays and Sundays.
pub fn remove_weekends_rule() -> SlotRule {
    forbid_weekdays_rule(&[Weekday::Sat, Weekday::Sun])
}

/// Convert a Monday-first weekday number (1 = Monday … 7 = Sunday).
///
/// # Errors
/// Returns `SlotError::InvalidWeekday` outside `1..=7`.
pub fn weekday_from_number(number: u32) -> Result<Weekday> {
    match number {
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        7 => Ok(Weekday::Sun),
        n => Err(SlotError::InvalidWeekday(n)),
    }
}
