//! The slot value type and the interval overlap predicate.
//!
//! A [`Slot`] is a closed time range `[start, end]` with open-ended metadata.
//! Endpoints keep the time zone they were created in; every operation in this
//! crate takes its result endpoints from its inputs, so zone identity survives
//! all of the set algebra.

use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Arbitrary key/value tags attached to a slot (`type`, `owner`, `isBuffer`, ...).
pub type Metadata = Map<String, Value>;

/// A time range with attached metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub metadata: Metadata,
}

/// Whether slots that only touch at an endpoint count as overlapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeStrategy {
    /// `a.end == b.start` is an overlap.
    #[default]
    Inclusive,
    /// Only a positive-length overlap counts.
    Exclusive,
}

impl Slot {
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>, metadata: Metadata) -> Self {
        Self {
            start,
            end,
            metadata,
        }
    }

    /// A slot with no metadata.
    pub fn bare(start: DateTime<Tz>, end: DateTime<Tz>) -> Self {
        Self::new(start, end, Metadata::new())
    }

    /// Elapsed time between the endpoints (not a wall-clock difference).
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn is_zero_duration(&self) -> bool {
        self.start == self.end
    }

    /// The zone the slot's start was expressed in.
    pub fn timezone(&self) -> Tz {
        self.start.timezone()
    }

    /// Well-formedness check applied by the collection operations.
    ///
    /// Instants and the metadata mapping are guaranteed by the type, so the
    /// only runtime condition left is `start <= end`.
    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    /// Exact endpoint equality as instants. Metadata is ignored.
    pub fn same_span(&self, other: &Slot) -> bool {
        self.start == other.start && self.end == other.end
    }

    /// Whether `self` and `other` overlap under `edge_strategy`.
    pub fn overlaps(&self, other: &Slot, edge_strategy: EdgeStrategy) -> bool {
        overlaps(self, other, edge_strategy)
    }

    /// JSON snapshot of the slot, used when a slot is embedded in another
    /// slot's metadata.
    pub fn to_json(&self) -> Value {
        json!({
            "start": self.start.to_rfc3339(),
            "end": self.end.to_rfc3339(),
            "timezone": self.timezone().name(),
            "metadata": Value::Object(self.metadata.clone()),
        })
    }
}

/// Interval overlap predicate.
///
/// - `Inclusive`: `a.start <= b.end && b.start <= a.end`
/// - `Exclusive`: `a.start < b.end && b.start < a.end`
///
/// Symmetric in `a` and `b`. Comparison is by instant, so slots in different
/// zones compare correctly.
pub fn overlaps(a: &Slot, b: &Slot, edge_strategy: EdgeStrategy) -> bool {
    match edge_strategy {
        EdgeStrategy::Inclusive => a.start <= b.end && b.start <= a.end,
        EdgeStrategy::Exclusive => a.start < b.end && b.start < a.end,
    }
}
