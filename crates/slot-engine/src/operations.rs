//! Collection operations: add, remove and update against a maintained slot
//! collection, plus operator composition.
//!
//! Each operation is built as a [`SlotOperator`], a boxed function from the
//! current collection to an [`OperationResult`]. Operators compose with
//! [`compose_operators`]. Adds and updates keep the collection normalized
//! (sorted, no overlaps under the configured edge strategy).

use tracing::debug;

use crate::error::{Result, SlotError};
use crate::merge::merge_overlapping_slots;
use crate::options::SlotOperationOptions;
use crate::slot::Slot;

/// Outcome of a collection operation.
///
/// On failure `data` is the collection as it was before the failing step and
/// `error` says why.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationResult {
    pub data: Vec<Slot>,
    pub error: Option<SlotError>,
}

impl OperationResult {
    pub fn ok(data: Vec<Slot>) -> Self {
        Self { data, error: None }
    }

    pub fn failed(data: Vec<Slot>, error: SlotError) -> Self {
        Self {
            data,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Drop the data on failure.
    pub fn into_result(self) -> Result<Vec<Slot>> {
        match self.error {
            None => Ok(self.data),
            Some(error) => Err(error),
        }
    }
}

/// A collection transform.
pub type SlotOperator = Box<dyn Fn(Vec<Slot>) -> OperationResult + Send + Sync>;

/// Add `new_slots` to the collection and re-normalize it.
///
/// Every new slot is validated first; if any is malformed the collection is
/// returned untouched with `SlotError::InvalidSlot`. Only the metadata merge
/// and edge strategy of `options` are used.
pub fn add_slots(new_slots: Vec<Slot>, options: SlotOperationOptions) -> SlotOperator {
    Box::new(move |current: Vec<Slot>| {
        if let Some(invalid) = new_slots.iter().find(|slot| !slot.is_valid()) {
            debug!(
                "rejecting slot {} .. {}: start is after end",
                invalid.start, invalid.end
            );
            return OperationResult::failed(current, SlotError::InvalidSlot);
        }

        let mut all = current;
        all.extend(new_slots.iter().cloned());
        OperationResult::ok(merge_overlapping_slots(
            &all,
            &options.metadata_merge,
            options.edge_strategy,
        ))
    })
}

/// Remove every slot whose `(start, end)` exactly equals one of `to_remove`.
///
/// Slots are never split; removals that match nothing are no-ops.
pub fn remove_slots(to_remove: Vec<Slot>) -> SlotOperator {
    Box::new(move |current: Vec<Slot>| {
        let data = current
            .into_iter()
            .filter(|slot| !to_remove.iter().any(|removed| removed.same_span(slot)))
            .collect();
        OperationResult::ok(data)
    })
}

/// Replace `old_slot` with `new_slot`.
///
/// The replacement is validated (`SlotError::InvalidNewSlot`), the old slot
/// removed by exact match, and the replacement added so it can merge with
/// whatever is next to it.
pub fn update_slot(old_slot: Slot, new_slot: Slot, options: SlotOperationOptions) -> SlotOperator {
    let remove = remove_slots(vec![old_slot]);
    let add = add_slots(vec![new_slot.clone()], options);
    Box::new(move |current: Vec<Slot>| {
        if !new_slot.is_valid() {
            debug!(
                "rejecting replacement slot {} .. {}: start is after end",
                new_slot.start, new_slot.end
            );
            return OperationResult::failed(current, SlotError::InvalidNewSlot);
        }
        let without_old = remove(current);
        if !without_old.is_ok() {
            return without_old;
        }
        add(without_old.data)
    })
}

/// Chain operators left to right.
///
/// Stops at the first failing operator and returns its error together with
/// the collection as it was just before that step.
pub fn compose_operators(operators: Vec<SlotOperator>) -> SlotOperator {
    Box::new(move |initial: Vec<Slot>| {
        let mut slots = initial;
        for (step, operator) in operators.iter().enumerate() {
            let before = slots.clone();
            let result = operator(slots);
            if let Some(error) = result.error {
                debug!("operator chain stopped at step {}: {}", step, error);
                return OperationResult::failed(before, error);
            }
            slots = result.data;
        }
        OperationResult::ok(slots)
    })
}
