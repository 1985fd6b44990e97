//! Metadata merge strategies and slot normalization.
//!
//! Normalization sorts slots by start time, then sweeps once, folding every
//! slot that overlaps the running accumulator into it. This is the only place
//! a collection is merged; the set operations and the collection operations
//! all go through [`merge_overlapping_slots`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::slot::{overlaps, EdgeStrategy, Metadata, Slot};

/// A caller-supplied metadata merge function. Called as `merger(first, second)`.
pub type MetadataMerger = Arc<dyn Fn(&Metadata, &Metadata) -> Metadata + Send + Sync>;

/// A caller-supplied merge for the two values of a single conflicting key.
pub type ValueMerger = Arc<dyn Fn(&Value, &Value) -> Value + Send + Sync>;

/// How the metadata of two slots is combined when the slots are merged or
/// intersected.
///
/// No `Default`: every call site picks a strategy.
#[derive(Clone)]
pub enum MetadataMerge {
    /// Keep the first operand's metadata untouched.
    KeepFirst,
    /// Keep the second operand's metadata untouched.
    KeepLast,
    /// `{...first, ...second}`: all keys, second operand wins on conflict.
    Overwrite,
    /// All keys; conflicting values are combined with [`combine_values`].
    Combine,
    /// Per-key strategies with a fallback.
    PerKey(MetadataMergeConfig),
    Custom(MetadataMerger),
}

impl MetadataMerge {
    /// Wrap a closure as a [`MetadataMerge::Custom`] strategy.
    pub fn custom<F>(merger: F) -> Self
    where
        F: Fn(&Metadata, &Metadata) -> Metadata + Send + Sync + 'static,
    {
        MetadataMerge::Custom(Arc::new(merger))
    }

    /// Merge `first` and `second`. Argument order is significant.
    pub fn merge(&self, first: &Metadata, second: &Metadata) -> Metadata {
        match self {
            MetadataMerge::KeepFirst => first.clone(),
            MetadataMerge::KeepLast => second.clone(),
            MetadataMerge::Overwrite => {
                let mut merged = first.clone();
                for (key, value) in second {
                    merged.insert(key.clone(), value.clone());
                }
                merged
            }
            MetadataMerge::Combine => {
                let mut merged = first.clone();
                for (key, value) in second {
                    let combined = match first.get(key) {
                        Some(existing) => combine_values(existing, value),
                        None => value.clone(),
                    };
                    merged.insert(key.clone(), combined);
                }
                merged
            }
            MetadataMerge::PerKey(config) => config.merge(first, second),
            MetadataMerge::Custom(merger) => merger(first, second),
        }
    }
}

impl fmt::Debug for MetadataMerge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataMerge::KeepFirst => f.write_str("KeepFirst"),
            MetadataMerge::KeepLast => f.write_str("KeepLast"),
            MetadataMerge::Overwrite => f.write_str("Overwrite"),
            MetadataMerge::Combine => f.write_str("Combine"),
            MetadataMerge::PerKey(config) => f.debug_tuple("PerKey").field(config).finish(),
            MetadataMerge::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Strategy for a single metadata key present in both operands.
#[derive(Clone)]
pub enum KeyStrategy {
    KeepFirst,
    KeepLast,
    Combine,
    Custom(ValueMerger),
}

impl KeyStrategy {
    pub fn custom<F>(merger: F) -> Self
    where
        F: Fn(&Value, &Value) -> Value + Send + Sync + 'static,
    {
        KeyStrategy::Custom(Arc::new(merger))
    }

    fn apply(&self, first: &Value, second: &Value) -> Value {
        match self {
            KeyStrategy::KeepFirst => first.clone(),
            KeyStrategy::KeepLast => second.clone(),
            KeyStrategy::Combine => combine_values(first, second),
            KeyStrategy::Custom(merger) => merger(first, second),
        }
    }
}

impl fmt::Debug for KeyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyStrategy::KeepFirst => f.write_str("KeepFirst"),
            KeyStrategy::KeepLast => f.write_str("KeepLast"),
            KeyStrategy::Combine => f.write_str("Combine"),
            KeyStrategy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Per-key merge configuration.
///
/// Keys present in only one operand are always carried over. Keys present in
/// both use their entry in `key_strategies`, or `default_strategy`.
#[derive(Debug, Clone)]
pub struct MetadataMergeConfig {
    pub default_strategy: KeyStrategy,
    pub key_strategies: HashMap<String, KeyStrategy>,
}

impl MetadataMergeConfig {
    pub fn new(default_strategy: KeyStrategy) -> Self {
        Self {
            default_strategy,
            key_strategies: HashMap::new(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>, strategy: KeyStrategy) -> Self {
        self.key_strategies.insert(key.into(), strategy);
        self
    }

    pub fn merge(&self, first: &Metadata, second: &Metadata) -> Metadata {
        let mut merged = first.clone();
        for (key, value) in second {
            let resolved = match first.get(key) {
                Some(existing) => self
                    .key_strategies
                    .get(key)
                    .unwrap_or(&self.default_strategy)
                    .apply(existing, value),
                None => value.clone(),
            };
            merged.insert(key.clone(), resolved);
        }
        merged
    }
}

/// Combine two values of the same key.
///
/// Equal values collapse to one, arrays concatenate, objects merge shallowly
/// with the second winning, anything else becomes `[first, second]`.
pub fn combine_values(first: &Value, second: &Value) -> Value {
    match (first, second) {
        (a, b) if a == b => a.clone(),
        (Value::Array(a), Value::Array(b)) => {
            Value::Array(a.iter().chain(b.iter()).cloned().collect())
        }
        (Value::Object(a), Value::Object(b)) => {
            let mut merged = a.clone();
            for (key, value) in b {
                merged.insert(key.clone(), value.clone());
            }
            Value::Object(merged)
        }
        (a, b) => Value::Array(vec![a.clone(), b.clone()]),
    }
}

/// Merge two slots into their outer bounds.
///
/// `start = min`, `end = max`, metadata is `merge(a.metadata, b.metadata)`.
/// Overlap is not checked; callers decide when two slots should be merged.
pub fn merge_slots(a: &Slot, b: &Slot, merge: &MetadataMerge) -> Slot {
    Slot {
        start: a.start.min(b.start),
        end: a.end.max(b.end),
        metadata: merge.merge(&a.metadata, &b.metadata),
    }
}

/// Normalize a slot collection.
///
/// Returns the slots sorted by start (stable, so equal starts keep their input
/// order) with every run of overlapping slots folded into one. No two slots in
/// the result overlap under `edge_strategy`, and running the function again on
/// its output returns the same sequence.
pub fn merge_overlapping_slots(
    slots: &[Slot],
    merge: &MetadataMerge,
    edge_strategy: EdgeStrategy,
) -> Vec<Slot> {
    let mut sorted: Vec<&Slot> = slots.iter().collect();
    sorted.sort_by_key(|slot| slot.start);

    let mut merged: Vec<Slot> = Vec::with_capacity(sorted.len());
    for slot in sorted {
        if let Some(current) = merged.last_mut() {
            if overlaps(current, slot, edge_strategy) {
                *current = merge_slots(current, slot, merge);
                continue;
            }
        }
        merged.push(slot.clone());
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use chrono_tz::UTC;
    use serde_json::json;

    fn meta(value: Value) -> Metadata {
        match value {
            Value::Object(map) => map,
            _ => Metadata::new(),
        }
    }

    fn slot(start_hours: f64, end_hours: f64, metadata: Value) -> Slot {
        let base = UTC.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        Slot::new(
            base + Duration::minutes((start_hours * 60.0) as i64),
            base + Duration::minutes((end_hours * 60.0) as i64),
            meta(metadata),
        )
    }

    #[test]
    fn overwrite_is_right_biased() {
        let merged = MetadataMerge::Overwrite.merge(
            &meta(json!({"a": 1, "b": 2})),
            &meta(json!({"b": 3, "c": 4})),
        );
        assert_eq!(Value::Object(merged), json!({"a": 1, "b": 3, "c": 4}));
    }

    #[test]
    fn keep_first_and_keep_last_respect_argument_order() {
        let a = meta(json!({"owner": "alice"}));
        let b = meta(json!({"owner": "bob"}));
        assert_eq!(MetadataMerge::KeepFirst.merge(&a, &b), a);
        assert_eq!(MetadataMerge::KeepLast.merge(&a, &b), b);
    }

    #[test]
    fn combine_collects_conflicting_values() {
        let merged = MetadataMerge::Combine.merge(
            &meta(json!({"tags": ["x"], "owner": "alice", "room": 1})),
            &meta(json!({"tags": ["y"], "owner": "bob", "room": 1})),
        );
        assert_eq!(
            Value::Object(merged),
            json!({"tags": ["x", "y"], "owner": ["alice", "bob"], "room": 1})
        );
    }

    #[test]
    fn per_key_config_uses_fallback_for_unlisted_keys() {
        let config = MetadataMergeConfig::new(KeyStrategy::KeepLast)
            .with_key("owner", KeyStrategy::KeepFirst)
            .with_key(
                "count",
                KeyStrategy::custom(|a, b| {
                    json!(a.as_i64().unwrap_or(0) + b.as_i64().unwrap_or(0))
                }),
            );
        let merged = MetadataMerge::PerKey(config).merge(
            &meta(json!({"owner": "alice", "count": 2, "room": "a", "only_a": true})),
            &meta(json!({"owner": "bob", "count": 3, "room": "b"})),
        );
        assert_eq!(
            Value::Object(merged),
            json!({"owner": "alice", "count": 5, "room": "b", "only_a": true})
        );
    }

    #[test]
    fn merge_slots_takes_outer_bounds_and_custom_metadata() {
        let merger = MetadataMerge::custom(|a, b| {
            let mut values = a.get("values").and_then(Value::as_array).cloned().unwrap_or_default();
            values.extend(b.get("values").and_then(Value::as_array).cloned().unwrap_or_default());
            meta(json!({ "values": values }))
        });
        let merged = merge_slots(
            &slot(1.0, 3.0, json!({"values": [1, 2]})),
            &slot(2.0, 4.0, json!({"values": [3, 4]})),
            &merger,
        );
        assert_eq!(merged.start, slot(1.0, 4.0, json!({})).start);
        assert_eq!(merged.end, slot(1.0, 4.0, json!({})).end);
        assert_eq!(Value::Object(merged.metadata), json!({"values": [1, 2, 3, 4]}));
    }

    #[test]
    fn empty_and_single_inputs_pass_through() {
        assert!(merge_overlapping_slots(&[], &MetadataMerge::Overwrite, EdgeStrategy::Inclusive).is_empty());
        let single = vec![slot(1.0, 2.0, json!({}))];
        assert_eq!(
            merge_overlapping_slots(&single, &MetadataMerge::Overwrite, EdgeStrategy::Inclusive),
            single
        );
    }

    #[test]
    fn exclusive_normalization_keeps_touching_slots_apart() {
        let slots = vec![
            slot(1.0, 3.0, json!({"count": 1})),
            slot(2.0, 4.0, json!({"count": 2})),
            slot(4.0, 5.0, json!({"count": 3})),
        ];
        let result = merge_overlapping_slots(&slots, &MetadataMerge::Overwrite, EdgeStrategy::Exclusive);
        assert_eq!(result.len(), 2);
        assert_eq!(Value::Object(result[0].metadata.clone()), json!({"count": 2}));
        assert_eq!(Value::Object(result[1].metadata.clone()), json!({"count": 3}));
    }

    #[test]
    fn inclusive_normalization_chains_touching_slots() {
        let slots = vec![
            slot(1.0, 2.0, json!({"count": 1})),
            slot(2.0, 3.0, json!({"count": 2})),
            slot(3.0, 4.0, json!({"count": 3})),
        ];
        let result = merge_overlapping_slots(&slots, &MetadataMerge::Overwrite, EdgeStrategy::Inclusive);
        assert_eq!(result, vec![slot(1.0, 4.0, json!({"count": 3}))]);
    }

    #[test]
    fn unsorted_input_folds_in_start_order() {
        let slots = vec![
            slot(3.0, 4.0, json!({"value": 3})),
            slot(1.0, 2.0, json!({"value": 1})),
            slot(1.5, 3.5, json!({"value": 2})),
        ];
        let result = merge_overlapping_slots(&slots, &MetadataMerge::Overwrite, EdgeStrategy::Exclusive);
        assert_eq!(result, vec![slot(1.0, 4.0, json!({"value": 3}))]);
    }

    #[test]
    fn equal_starts_keep_input_order() {
        let slots = vec![
            slot(1.0, 2.0, json!({"value": "first"})),
            slot(1.0, 2.0, json!({"value": "second"})),
        ];
        let result = merge_overlapping_slots(&slots, &MetadataMerge::Overwrite, EdgeStrategy::Exclusive);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].metadata["value"], "second");
    }
}
