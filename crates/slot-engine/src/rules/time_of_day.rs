//! Time-of-day rules.
//!
//! Windows are half-open `[start, end)` in local wall-clock time of each
//! slot's own zone. A window whose end is before its start wraps past
//! midnight and is treated as `[start, 24:00) ∪ [00:00, end)`.

use chrono::{Duration, Timelike};

use super::SlotRule;
use crate::error::{Result, SlotError};
use crate::slot::Slot;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// A wall-clock time between `00:00` and `24:00` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    hour: u32,
    minute: u32,
}

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { hour: 0, minute: 0 };
    pub const END_OF_DAY: TimeOfDay = TimeOfDay { hour: 24, minute: 0 };

    /// # Errors
    /// Returns `SlotError::InvalidTimeOfDay` unless `hour <= 23 && minute <= 59`
    /// or the time is exactly `24:00`.
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        if minute > 59 || hour > 24 || (hour == 24 && minute != 0) {
            return Err(SlotError::InvalidTimeOfDay(format!(
                "{:02}:{:02}",
                hour, minute
            )));
        }
        Ok(Self { hour, minute })
    }

    /// On the hour.
    pub fn hour(hour: u32) -> Result<Self> {
        Self::new(hour, 0)
    }

    pub fn minutes_since_midnight(&self) -> u32 {
        self.hour * 60 + self.minute
    }

    fn seconds_since_midnight(&self) -> i64 {
        i64::from(self.minutes_since_midnight()) * 60
    }
}

/// `[lo, hi)` ranges in seconds since midnight covered by a window.
fn window_ranges(start: TimeOfDay, end: TimeOfDay) -> Vec<(i64, i64)> {
    let (ws, we) = (start.seconds_since_midnight(), end.seconds_since_midnight());
    let ranges = if ws <= we {
        vec![(ws, we)]
    } else {
        vec![(ws, SECONDS_PER_DAY), (0, we)]
    };
    ranges.into_iter().filter(|(lo, hi)| lo < hi).collect()
}

/// The slot's span as `(start, end)` seconds since the local midnight of its
/// start. The start is read off the local wall clock; the end adds the elapsed
/// duration, rounded up to a whole second, so a DST change inside the slot
/// does not distort its length. `None` if the slot lasts a full day or more.
fn local_span(slot: &Slot) -> Option<(i64, i64)> {
    let duration = slot.duration();
    if duration >= Duration::days(1) {
        return None;
    }
    let start = i64::from(slot.start.num_seconds_from_midnight());
    let elapsed = duration.num_seconds() + i64::from(duration.subsec_nanos() > 0);
    Some((start, start + elapsed))
}

fn hits(span: (i64, i64), range: (i64, i64)) -> bool {
    let (s, e) = span;
    let (lo, hi) = range;
    let starts_inside = s >= lo && s < hi;
    starts_inside || (s < hi && e > lo)
}

fn in_window(slot: &Slot, ranges: &[(i64, i64)]) -> bool {
    if ranges.is_empty() {
        return false;
    }
    match local_span(slot) {
        None => true,
        Some(span) => ranges.iter().any(|&(lo, hi)| {
            hits(span, (lo, hi)) || hits(span, (lo + SECONDS_PER_DAY, hi + SECONDS_PER_DAY))
        }),
    }
}

/// Forbid slots that start, end, or sit inside the local `[start, end)` window.
///
/// A window with `start == end` is empty and forbids nothing.
pub fn time_of_day_rule(start: TimeOfDay, end: TimeOfDay) -> SlotRule {
    let ranges = window_ranges(start, end);
    Box::new(move |slots: &[Slot]| {
        slots
            .iter()
            .filter(|slot| in_window(slot, &ranges))
            .cloned()
            .collect()
    })
}

/// Forbid slots that reach outside the local `[start, end)` window.
///
/// The complement of the window is the wrap range `[end, start)`, i.e.
/// `[end, 24:00) ∪ [00:00, start)` for a daytime window; a slot touching
/// either part is reported once. With `start == end` nothing is allowed.
pub fn allow_time_of_day_rule(start: TimeOfDay, end: TimeOfDay) -> SlotRule {
    if start == end {
        return Box::new(|slots: &[Slot]| slots.to_vec());
    }
    time_of_day_rule(end, start)
}

/// Forbid anything before `hour:minute`.
pub fn no_meetings_before_rule(hour: u32, minute: u32) -> Result<SlotRule> {
    Ok(time_of_day_rule(TimeOfDay::MIDNIGHT, TimeOfDay::new(hour, minute)?))
}

/// Forbid anything from `hour:minute` on.
pub fn no_meetings_after_rule(hour: u32, minute: u32) -> Result<SlotRule> {
    Ok(time_of_day_rule(TimeOfDay::new(hour, minute)?, TimeOfDay::END_OF_DAY))
}

/// Forbid `[start_hour:start_minute, end_hour:end_minute)`.
pub fn block_time_range_rule(
    start_hour: u32,
    end_hour: u32,
    start_minute: u32,
    end_minute: u32,
) -> Result<SlotRule> {
    Ok(time_of_day_rule(
        TimeOfDay::new(start_hour, start_minute)?,
        TimeOfDay::new(end_hour, end_minute)?,
    ))
}

/// Forbid everything outside `[start_hour:start_minute, end_hour:end_minute)`.
pub fn allow_time_range_rule(
    start_hour: u32,
    end_hour: u32,
    start_minute: u32,
    end_minute: u32,
) -> Result<SlotRule> {
    Ok(allow_time_of_day_rule(
        TimeOfDay::new(start_hour, start_minute)?,
        TimeOfDay::new(end_hour, end_minute)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_of_day_bounds() {
        assert!(TimeOfDay::new(23, 59).is_ok());
        assert!(TimeOfDay::new(24, 0).is_ok());
        assert!(TimeOfDay::new(24, 1).is_err());
        assert!(TimeOfDay::new(25, 0).is_err());
        assert!(TimeOfDay::new(9, 60).is_err());
    }

    #[test]
    fn wrapping_window_splits_at_midnight() {
        let ranges = window_ranges(TimeOfDay::new(22, 0).unwrap(), TimeOfDay::new(6, 0).unwrap());
        assert_eq!(ranges, vec![(22 * 3600, SECONDS_PER_DAY), (0, 6 * 3600)]);
    }

    #[test]
    fn degenerate_windows_are_empty() {
        assert!(window_ranges(TimeOfDay::hour(9).unwrap(), TimeOfDay::hour(9).unwrap()).is_empty());
        assert!(window_ranges(TimeOfDay::END_OF_DAY, TimeOfDay::MIDNIGHT).is_empty());
    }

    #[test]
    fn span_uses_elapsed_time_from_the_local_start() {
        use chrono::TimeZone;
        use chrono_tz::UTC;

        let start = UTC.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let half_minute = Slot::bare(start, start + Duration::seconds(30));
        assert_eq!(local_span(&half_minute), Some((36_000, 36_030)));

        let blip = Slot::bare(start, start + Duration::milliseconds(1));
        assert_eq!(local_span(&blip), Some((36_000, 36_001)));

        let whole_day = Slot::bare(start, start + Duration::days(1));
        assert_eq!(local_span(&whole_day), None);
    }

    #[test]
    fn slot_ending_at_window_start_is_outside() {
        assert!(!hits((8 * 60, 9 * 60), (9 * 60, 17 * 60)));
        assert!(hits((8 * 60, 9 * 60 + 1), (9 * 60, 17 * 60)));
        // A zero-length slot exactly at the window start is inside.
        assert!(hits((9 * 60, 9 * 60), (9 * 60, 17 * 60)));
        assert!(!hits((17 * 60, 17 * 60), (9 * 60, 17 * 60)));
    }
}
