//! Fixed-duration, fixed-stride slot generation.

use chrono::{DateTime, Duration};
use chrono_tz::Tz;

use crate::error::{Result, SlotError};
use crate::slot::{Metadata, Slot};

/// Generate slots `[start + k·stride, start + k·stride + duration]` for
/// `k = 0, 1, 2, …` while the slot end does not pass `end`.
///
/// - `stride < duration` gives a sliding window of overlapping slots.
/// - `stride == duration` tiles the range.
/// - `stride > duration` leaves gaps.
///
/// Arithmetic is on absolute time, so a one-hour stride across a DST change
/// still yields one-hour slots. Every slot gets its own copy of `metadata` and
/// keeps the zone of `start`.
///
/// Returns an empty `Vec` when `start >= end`.
///
/// # Errors
/// Returns `SlotError::InvalidStep` if `duration` or `stride` is not positive.
pub fn generate_slots(
    start: DateTime<Tz>,
    end: DateTime<Tz>,
    duration: Duration,
    stride: Duration,
    metadata: &Metadata,
) -> Result<Vec<Slot>> {
    if duration <= Duration::zero() || stride <= Duration::zero() {
        return Err(SlotError::InvalidStep(format!(
            "duration {}, stride {}",
            duration, stride
        )));
    }

    if start >= end {
        return Ok(Vec::new());
    }

    let mut slots = Vec::new();
    let mut current = start;
    while current + duration <= end {
        slots.push(Slot::new(current, current + duration, metadata.clone()));
        current += stride;
    }

    Ok(slots)
}
