//! WASM bindings for slot-engine.
//!
//! Exposes the set operations, normalization and slot generation to
//! JavaScript via `wasm-bindgen`. Slots and options cross the boundary as
//! JSON strings.
//!
//! A slot is `{start, end, timezone?, metadata?}`. `start` and `end` are
//! RFC 3339 strings (or naive `YYYY-MM-DDTHH:MM:SS`, read in `timezone`);
//! `timezone` is an IANA name and defaults to UTC. Results use the same shape
//! with `timezone` always present. Options are an `OperationConfig` object
//! and must name the metadata merge, e.g.
//! `{"metadata_merge": "overwrite", "edge_strategy": "exclusive"}`.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/slot-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone};
use chrono_tz::{Tz, UTC};
use serde::Deserialize;
use serde_json::Value;
use slot_engine::{
    Metadata, OperationConfig, SetOperation, Slot, SlotError, SlotOperationOptions,
};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// Input format for slots passed from JavaScript.
#[derive(Deserialize)]
struct SlotInput {
    start: String,
    end: String,
    #[serde(default)]
    timezone: Option<String>,
    #[serde(default)]
    metadata: Metadata,
}

// ---------------------------------------------------------------------------
// Helpers: parsing and serialization
// ---------------------------------------------------------------------------

fn parse_timezone(name: Option<&str>) -> Result<Tz, String> {
    match name {
        None => Ok(UTC),
        Some(name) => name
            .parse::<Tz>()
            .map_err(|_| SlotError::InvalidTimezone(name.to_string()).to_string()),
    }
}

/// Parse a datetime string into `tz`.
///
/// RFC 3339 strings keep their instant and are shown in `tz`. Naive strings
/// are read as local time in `tz`; a local time skipped by a DST change is an
/// error, an ambiguous one resolves to the earlier instant.
fn parse_datetime(s: &str, tz: Tz) -> Result<DateTime<Tz>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&tz));
    }
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map_err(|e| format!("Invalid datetime '{}': {}", s, e))?;
    tz.from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| format!("Datetime '{}' does not exist in {}", s, tz.name()))
}

fn parse_slot(input: SlotInput) -> Result<Slot, String> {
    let tz = parse_timezone(input.timezone.as_deref())?;
    let start = parse_datetime(&input.start, tz)?;
    let end = parse_datetime(&input.end, tz)?;
    Ok(Slot::new(start, end, input.metadata))
}

/// Convert a JSON array of slot objects into `Vec<Slot>`.
fn parse_slots_json(json: &str) -> Result<Vec<Slot>, String> {
    let inputs: Vec<SlotInput> =
        serde_json::from_str(json).map_err(|e| format!("Invalid slots JSON: {}", e))?;
    inputs.into_iter().map(parse_slot).collect()
}

fn parse_options_json(json: &str) -> Result<SlotOperationOptions, String> {
    OperationConfig::from_json(json)
        .and_then(OperationConfig::into_options)
        .map_err(|e| e.to_string())
}

fn slots_to_json(slots: &[Slot]) -> Result<String, String> {
    let values: Vec<Value> = slots.iter().map(Slot::to_json).collect();
    serde_json::to_string(&values).map_err(|e| format!("Serialization error: {}", e))
}

fn run_set_operation(
    operation: SetOperation,
    a_json: &str,
    b_json: &str,
    options_json: &str,
) -> Result<String, String> {
    let a = parse_slots_json(a_json)?;
    let b = parse_slots_json(b_json)?;
    let options = parse_options_json(options_json)?;
    slots_to_json(&slot_engine::apply_set_operation(operation, &a, &b, &options))
}

fn run_merge(slots_json: &str, options_json: &str) -> Result<String, String> {
    let slots = parse_slots_json(slots_json)?;
    let options = parse_options_json(options_json)?;
    slots_to_json(&slot_engine::merge_overlapping_slots(
        &slots,
        &options.metadata_merge,
        options.edge_strategy,
    ))
}

fn run_generate(
    start: &str,
    end: &str,
    duration_minutes: i64,
    stride_minutes: i64,
    timezone: Option<&str>,
    metadata_json: Option<&str>,
) -> Result<String, String> {
    let tz = parse_timezone(timezone)?;
    let start = parse_datetime(start, tz)?;
    let end = parse_datetime(end, tz)?;
    let metadata: Metadata = match metadata_json {
        None => Metadata::new(),
        Some(json) => {
            serde_json::from_str(json).map_err(|e| format!("Invalid metadata JSON: {}", e))?
        }
    };
    let slots = slot_engine::generate_slots(
        start,
        end,
        Duration::minutes(duration_minutes),
        Duration::minutes(stride_minutes),
        &metadata,
    )
    .map_err(|e| e.to_string())?;
    slots_to_json(&slots)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Time covered by both slot lists.
///
/// `a_json` and `b_json` are JSON arrays of slot objects; `options_json` is an
/// `OperationConfig`. Returns a JSON array of slot objects.
#[wasm_bindgen(js_name = "intersectSlots")]
pub fn intersect_slots(
    a_json: &str,
    b_json: &str,
    options_json: &str,
) -> Result<String, JsValue> {
    run_set_operation(SetOperation::Intersection, a_json, b_json, options_json)
        .map_err(|e| JsValue::from_str(&e))
}

/// Time covered by either slot list, normalized.
#[wasm_bindgen(js_name = "unionSlots")]
pub fn union_slots(
    a_json: &str,
    b_json: &str,
    options_json: &str,
) -> Result<String, JsValue> {
    run_set_operation(SetOperation::Union, a_json, b_json, options_json)
        .map_err(|e| JsValue::from_str(&e))
}

/// The parts of `a_json` not covered by `b_json`.
#[wasm_bindgen(js_name = "differenceSlots")]
pub fn difference_slots(
    a_json: &str,
    b_json: &str,
    options_json: &str,
) -> Result<String, JsValue> {
    run_set_operation(SetOperation::Difference, a_json, b_json, options_json)
        .map_err(|e| JsValue::from_str(&e))
}

/// Time covered by exactly one of the two slot lists.
#[wasm_bindgen(js_name = "symmetricDifferenceSlots")]
pub fn symmetric_difference_slots(
    a_json: &str,
    b_json: &str,
    options_json: &str,
) -> Result<String, JsValue> {
    run_set_operation(
        SetOperation::SymmetricDifference,
        a_json,
        b_json,
        options_json,
    )
    .map_err(|e| JsValue::from_str(&e))
}

/// Run a set operation chosen by name: `union`, `intersection`, `difference`
/// or `symmetric_difference`.
#[wasm_bindgen(js_name = "applySetOperation")]
pub fn apply_set_operation(
    operation: &str,
    a_json: &str,
    b_json: &str,
    options_json: &str,
) -> Result<String, JsValue> {
    let operation: SetOperation = operation
        .parse()
        .map_err(|e: SlotError| JsValue::from_str(&e.to_string()))?;
    run_set_operation(operation, a_json, b_json, options_json)
        .map_err(|e| JsValue::from_str(&e))
}

/// Sort a slot list and merge overlapping slots.
#[wasm_bindgen(js_name = "mergeOverlappingSlots")]
pub fn merge_overlapping_slots(
    slots_json: &str,
    options_json: &str,
) -> Result<String, JsValue> {
    run_merge(slots_json, options_json).map_err(|e| JsValue::from_str(&e))
}

/// Generate fixed-length slots every `stride_minutes` between `start` and `end`.
///
/// # Arguments
/// - `start`, `end` -- RFC 3339 or naive local datetime strings
/// - `duration_minutes` -- length of each slot
/// - `stride_minutes` -- distance between consecutive slot starts
/// - `timezone` -- optional IANA zone for the generated slots (default UTC)
/// - `metadata_json` -- optional JSON object copied into every slot
#[wasm_bindgen(js_name = "generateSlots")]
pub fn generate_slots(
    start: &str,
    end: &str,
    duration_minutes: i32,
    stride_minutes: i32,
    timezone: Option<String>,
    metadata_json: Option<String>,
) -> Result<String, JsValue> {
    run_generate(
        start,
        end,
        i64::from(duration_minutes),
        i64::from(stride_minutes),
        timezone.as_deref(),
        metadata_json.as_deref(),
    )
    .map_err(|e| JsValue::from_str(&e))
}
