//! Tests for fixed-stride slot generation.

use chrono::{DateTime, Duration, TimeZone, Timelike};
use chrono_tz::{America::New_York, Asia::Tokyo, Tz, UTC};
use serde_json::json;
use slot_engine::{generate_slots, Metadata, SlotError};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn utc(day: u32, hour: u32, minute: u32) -> DateTime<Tz> {
    UTC.with_ymd_and_hms(2024, 1, day, hour, minute, 0).unwrap()
}

fn tagged() -> Metadata {
    json!({"type": "free"}).as_object().cloned().unwrap()
}

// ── Strides ─────────────────────────────────────────────────────────────────

#[test]
fn hour_long_slots_every_half_hour() {
    let slots = generate_slots(
        utc(1, 10, 0),
        utc(1, 12, 0),
        Duration::minutes(60),
        Duration::minutes(30),
        &Metadata::new(),
    )
    .unwrap();

    let spans: Vec<(DateTime<Tz>, DateTime<Tz>)> = slots.iter().map(|s| (s.start, s.end)).collect();
    assert_eq!(
        spans,
        vec![
            (utc(1, 10, 0), utc(1, 11, 0)),
            (utc(1, 10, 30), utc(1, 11, 30)),
            (utc(1, 11, 0), utc(1, 12, 0)),
        ]
    );
}

#[test]
fn overlapping_window_with_short_stride() {
    let slots = generate_slots(
        utc(1, 10, 0),
        utc(1, 12, 0),
        Duration::minutes(60),
        Duration::minutes(15),
        &tagged(),
    )
    .unwrap();

    // Starts at 10:00, 10:15, 10:30, 10:45, 11:00; 11:15 would end past noon.
    assert_eq!(slots.len(), 5);
    assert_eq!(slots[0].start, utc(1, 10, 0));
    assert_eq!(slots[0].end, utc(1, 11, 0));
    assert_eq!(slots[4].start, utc(1, 11, 0));
    assert_eq!(slots[4].end, utc(1, 12, 0));
    for pair in slots.windows(2) {
        assert_eq!(pair[1].start - pair[0].start, Duration::minutes(15));
    }
}

#[test]
fn stride_equal_to_duration_tiles_the_range() {
    let slots = generate_slots(
        utc(1, 9, 0),
        utc(1, 17, 0),
        Duration::minutes(30),
        Duration::minutes(30),
        &Metadata::new(),
    )
    .unwrap();

    assert_eq!(slots.len(), 16);
    for pair in slots.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
    }
    assert_eq!(slots.last().unwrap().end, utc(1, 17, 0));
}

#[test]
fn stride_longer_than_duration_leaves_gaps() {
    let slots = generate_slots(
        utc(1, 9, 0),
        utc(1, 12, 0),
        Duration::minutes(30),
        Duration::minutes(60),
        &Metadata::new(),
    )
    .unwrap();

    assert_eq!(slots.len(), 3);
    assert_eq!(slots[1].start, utc(1, 10, 0));
    assert_eq!(slots[1].end, utc(1, 10, 30));
}

#[test]
fn slot_ending_exactly_at_range_end_is_included() {
    let slots = generate_slots(
        utc(1, 10, 0),
        utc(1, 11, 0),
        Duration::minutes(60),
        Duration::minutes(60),
        &Metadata::new(),
    )
    .unwrap();
    assert_eq!(slots.len(), 1);
}

// ── Empty ranges and invalid steps ──────────────────────────────────────────

#[test]
fn empty_or_reversed_range_yields_nothing() {
    let hour = Duration::hours(1);
    let meta = Metadata::new();
    assert!(generate_slots(utc(1, 10, 0), utc(1, 10, 0), hour, hour, &meta)
        .unwrap()
        .is_empty());
    assert!(generate_slots(utc(1, 12, 0), utc(1, 10, 0), hour, hour, &meta)
        .unwrap()
        .is_empty());
}

#[test]
fn range_shorter_than_duration_yields_nothing() {
    let slots = generate_slots(
        utc(1, 10, 0),
        utc(1, 10, 45),
        Duration::hours(1),
        Duration::hours(1),
        &Metadata::new(),
    )
    .unwrap();
    assert!(slots.is_empty());
}

#[test]
fn non_positive_duration_or_stride_is_rejected() {
    let meta = Metadata::new();
    let (start, end) = (utc(1, 10, 0), utc(1, 12, 0));

    for (duration, stride) in [
        (Duration::zero(), Duration::hours(1)),
        (Duration::hours(1), Duration::zero()),
        (Duration::minutes(-30), Duration::hours(1)),
    ] {
        let result = generate_slots(start, end, duration, stride, &meta);
        assert!(
            matches!(result, Err(SlotError::InvalidStep(_))),
            "duration {} stride {} should be rejected",
            duration,
            stride
        );
    }
}

// ── Metadata and zones ──────────────────────────────────────────────────────

#[test]
fn every_slot_gets_its_own_metadata_copy() {
    let mut slots = generate_slots(
        utc(1, 10, 0),
        utc(1, 13, 0),
        Duration::hours(1),
        Duration::hours(1),
        &tagged(),
    )
    .unwrap();

    slots[0].metadata.insert("type".to_string(), json!("busy"));

    assert_eq!(slots[0].metadata["type"], "busy");
    assert_eq!(slots[1].metadata["type"], "free");
    assert_eq!(slots[2].metadata["type"], "free");
}

#[test]
fn slots_keep_the_start_zone() {
    let start = Tokyo.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
    let end = Tokyo.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
    let slots =
        generate_slots(start, end, Duration::hours(1), Duration::hours(1), &Metadata::new())
            .unwrap();

    assert_eq!(slots.len(), 3);
    for (i, slot) in slots.iter().enumerate() {
        assert_eq!(slot.timezone(), Tokyo);
        assert_eq!(slot.start.hour(), 9 + i as u32);
    }
}

#[test]
fn hourly_stride_uses_absolute_time_across_spring_forward() {
    // 2024-03-10 02:00 does not exist in New York.
    let start = New_York.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
    let end = New_York.with_ymd_and_hms(2024, 3, 10, 6, 0, 0).unwrap();

    let slots =
        generate_slots(start, end, Duration::hours(1), Duration::hours(1), &Metadata::new())
            .unwrap();

    assert_eq!(slots.len(), 5);
    let local_hours: Vec<u32> = slots.iter().map(|s| s.start.hour()).collect();
    assert_eq!(local_hours, vec![0, 1, 3, 4, 5]);
    assert!(slots.iter().all(|s| s.duration() == Duration::hours(1)));
}
