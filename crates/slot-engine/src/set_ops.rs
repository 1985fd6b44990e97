//! Union, intersection, difference and symmetric difference over slot
//! collections.
//!
//! Every operation takes two collections and returns a collection; an empty
//! `Vec` means "no result". The `*_pair` functions are thin wrappers for the
//! single-slot case and share the collection code path.
//!
//! Operands are normalized with [`merge_overlapping_slots`] before pairwise
//! comparison, with one exception: the minuend of a difference keeps its
//! segmentation, so hourly slots are still hourly after a notch is cut out of
//! them.

use std::fmt;
use std::slice;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::SlotError;
use crate::merge::merge_overlapping_slots;
use crate::options::SlotOperationOptions;
use crate::slot::{overlaps, EdgeStrategy, Slot};

/// The four set operations, selectable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetOperation {
    Union,
    Intersection,
    Difference,
    SymmetricDifference,
}

impl SetOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            SetOperation::Union => "union",
            SetOperation::Intersection => "intersection",
            SetOperation::Difference => "difference",
            SetOperation::SymmetricDifference => "symmetric_difference",
        }
    }
}

impl fmt::Display for SetOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SetOperation {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "union" => Ok(SetOperation::Union),
            "intersection" => Ok(SetOperation::Intersection),
            "difference" => Ok(SetOperation::Difference),
            "symmetric_difference" => Ok(SetOperation::SymmetricDifference),
            other => Err(SlotError::UnknownOperation(other.to_string())),
        }
    }
}

fn normalize(slots: &[Slot], options: &SlotOperationOptions) -> Vec<Slot> {
    merge_overlapping_slots(slots, &options.metadata_merge, options.edge_strategy)
}

/// The time covered by both `a` and `b`.
///
/// For every overlapping pair of normalized slots the fragment
/// `[max(start), min(end)]` is kept with merged metadata (`merge(a, b)`).
/// Under exclusive edges a fragment that collapses to a single instant is not
/// an overlap and is dropped. Fragments shorter than `min_duration` are dropped
/// before the survivors are merged.
pub fn intersect_slots(a: &[Slot], b: &[Slot], options: &SlotOperationOptions) -> Vec<Slot> {
    let left = normalize(a, options);
    let right = normalize(b, options);

    let mut fragments = Vec::new();
    for x in &left {
        for y in &right {
            if !overlaps(x, y, options.edge_strategy) {
                continue;
            }
            let start = x.start.max(y.start);
            let end = x.end.min(y.end);
            if options.edge_strategy == EdgeStrategy::Exclusive && start == end {
                continue;
            }
            if !options.keeps(end - start) {
                continue;
            }
            fragments.push(Slot {
                start,
                end,
                metadata: options.metadata_merge.merge(&x.metadata, &y.metadata),
            });
        }
    }

    trace!("intersection produced {} fragments", fragments.len());
    normalize(&fragments, options)
}

/// The time covered by `a` or `b`, normalized.
///
/// Disjoint slots stay separate; overlapping (and, with inclusive edges,
/// touching) slots are merged.
pub fn union_slots(a: &[Slot], b: &[Slot], options: &SlotOperationOptions) -> Vec<Slot> {
    let mut combined = normalize(a, options);
    combined.extend(normalize(b, options));
    normalize(&combined, options)
}

/// The parts of `a` not covered by `b`.
///
/// Each slot of `a` has every overlapping slot of normalized `b` cut out of
/// it in turn, leaving a left residual `[a.start, b.start]` and/or a right
/// residual `[b.end, a.end]`. Residuals shorter than `min_duration` are
/// dropped; slots of `a` that nothing overlaps pass through unchanged. A
/// zero-duration slot of `a` lying within the closed span of a slot of `b` is
/// removed under either edge strategy.
///
/// The result is sorted by start but never merged.
pub fn difference_slots(a: &[Slot], b: &[Slot], options: &SlotOperationOptions) -> Vec<Slot> {
    let subtrahend = normalize(b, options);

    let mut minuend: Vec<&Slot> = a.iter().collect();
    minuend.sort_by_key(|slot| slot.start);

    let mut result = Vec::new();
    for slot in minuend {
        let mut remainder = vec![slot.clone()];
        for cut in &subtrahend {
            remainder = remainder
                .into_iter()
                .flat_map(|piece| subtract_one(piece, cut, options))
                .collect();
            if remainder.is_empty() {
                break;
            }
        }
        result.extend(remainder);
    }
    // Overlapping minuend slots can leave pieces out of order.
    result.sort_by_key(|slot| slot.start);

    trace!("difference left {} of {} slots", result.len(), a.len());
    result
}

/// Alias for [`difference_slots`]: drop the parts of `slots` that overlap
/// `to_remove`.
pub fn remove_overlapping_slots(
    slots: &[Slot],
    to_remove: &[Slot],
    options: &SlotOperationOptions,
) -> Vec<Slot> {
    difference_slots(slots, to_remove, options)
}

fn subtract_one(piece: Slot, cut: &Slot, options: &SlotOperationOptions) -> Vec<Slot> {
    // An instant within the closed span of a cut goes under either edge strategy.
    if piece.is_zero_duration() && cut.start <= piece.start && piece.end <= cut.end {
        return Vec::new();
    }
    if !overlaps(&piece, cut, options.edge_strategy) {
        return vec![piece];
    }

    let mut residuals = Vec::with_capacity(2);
    if piece.start < cut.start {
        residuals.push(Slot {
            start: piece.start,
            end: cut.start,
            metadata: piece.metadata.clone(),
        });
    }
    if piece.end > cut.end {
        residuals.push(Slot {
            start: cut.end,
            end: piece.end,
            metadata: piece.metadata,
        });
    }
    residuals.retain(|residual| options.keeps(residual.duration()));
    residuals
}

/// The time covered by exactly one of `a` and `b`, normalized.
pub fn symmetric_difference_slots(
    a: &[Slot],
    b: &[Slot],
    options: &SlotOperationOptions,
) -> Vec<Slot> {
    let mut exclusive = difference_slots(a, b, options);
    exclusive.extend(difference_slots(b, a, options));
    normalize(&exclusive, options)
}

/// Run `operation` on `a` and `b`.
pub fn apply_set_operation(
    operation: SetOperation,
    a: &[Slot],
    b: &[Slot],
    options: &SlotOperationOptions,
) -> Vec<Slot> {
    match operation {
        SetOperation::Union => union_slots(a, b, options),
        SetOperation::Intersection => intersect_slots(a, b, options),
        SetOperation::Difference => difference_slots(a, b, options),
        SetOperation::SymmetricDifference => symmetric_difference_slots(a, b, options),
    }
}

pub fn intersect_pair(a: &Slot, b: &Slot, options: &SlotOperationOptions) -> Vec<Slot> {
    intersect_slots(slice::from_ref(a), slice::from_ref(b), options)
}

pub fn union_pair(a: &Slot, b: &Slot, options: &SlotOperationOptions) -> Vec<Slot> {
    union_slots(slice::from_ref(a), slice::from_ref(b), options)
}

pub fn difference_pair(a: &Slot, b: &Slot, options: &SlotOperationOptions) -> Vec<Slot> {
    difference_slots(slice::from_ref(a), slice::from_ref(b), options)
}

pub fn symmetric_difference_pair(a: &Slot, b: &Slot, options: &SlotOperationOptions) -> Vec<Slot> {
    symmetric_difference_slots(slice::from_ref(a), slice::from_ref(b), options)
}

pub fn apply_set_operation_pair(
    operation: SetOperation,
    a: &Slot,
    b: &Slot,
    options: &SlotOperationOptions,
) -> Vec<Slot> {
    apply_set_operation(operation, slice::from_ref(a), slice::from_ref(b), options)
}
