//! Per-day slot caps.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::SlotRule;
use crate::slot::Slot;

/// Forbid every slot beyond the earliest `max_slots` of each local day.
///
/// Slots are grouped by the calendar date of their start in their own zone.
/// Within an over-full day the earliest `max_slots` (by start, ties in input
/// order) are kept and the rest are returned. Days are independent, and a day
/// with exactly `max_slots` slots is not flagged. The result is sorted by start.
pub fn max_slots_per_day_rule(max_slots: usize) -> SlotRule {
    Box::new(move |slots: &[Slot]| {
        let mut by_day: BTreeMap<(NaiveDate, &'static str), Vec<&Slot>> = BTreeMap::new();
        for slot in slots {
            by_day
                .entry((slot.start.date_naive(), slot.timezone().name()))
                .or_default()
                .push(slot);
        }

        let mut excess: Vec<Slot> = Vec::new();
        for day in by_day.values_mut() {
            if day.len() <= max_slots {
                continue;
            }
            day.sort_by_key(|slot| slot.start);
            excess.extend(day.iter().skip(max_slots).map(|slot| (*slot).clone()));
        }

        excess.sort_by_key(|slot| slot.start);
        excess
    })
}
