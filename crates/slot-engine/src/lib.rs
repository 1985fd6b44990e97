//! # slot-engine
//!
//! Set algebra over time-zone-aware availability slots.
//!
//! A [`Slot`] is a time range with metadata. Slot collections can be combined
//! with union, intersection, difference and symmetric difference, filtered by
//! scheduling rules, and maintained as normalized collections. Every operation
//! is a pure function of its inputs; endpoints keep their time zone throughout.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::TimeZone;
//! use chrono_tz::UTC;
//! use slot_engine::{intersect_slots, MetadataMerge, Slot, SlotOperationOptions};
//!
//! let at = |h| UTC.with_ymd_and_hms(2024, 3, 18, h, 0, 0).unwrap();
//! let alice = vec![Slot::bare(at(10), at(12))];
//! let bob = vec![Slot::bare(at(11), at(13))];
//!
//! let options = SlotOperationOptions::new(MetadataMerge::Overwrite);
//! let both = intersect_slots(&alice, &bob, &options);
//! assert_eq!(both, vec![Slot::bare(at(11), at(12))]);
//! ```
//!
//! ## Modules
//!
//! - [`slot`] — the `Slot` type, `EdgeStrategy` and the overlap predicate
//! - [`merge`] — metadata merge strategies and collection normalization
//! - [`options`] — `SlotOperationOptions` and its serialized form
//! - [`set_ops`] — union / intersection / difference / symmetric difference
//! - [`generator`] — fixed-stride slot generation
//! - [`rules`] — weekday, time-of-day, buffer and per-day rules
//! - [`operations`] — add / remove / update and operator composition
//! - [`error`] — error types

pub mod error;
pub mod generator;
pub mod merge;
pub mod operations;
pub mod options;
pub mod rules;
pub mod set_ops;
pub mod slot;

pub use error::SlotError;
pub use generator::generate_slots;
pub use merge::{
    merge_overlapping_slots, merge_slots, KeyStrategy, MetadataMerge, MetadataMergeConfig,
    MetadataMerger,
};
pub use operations::{
    add_slots, compose_operators, remove_slots, update_slot, OperationResult, SlotOperator,
};
pub use options::{NamedMerge, OperationConfig, SlotOperationOptions};
pub use rules::SlotRule;
pub use set_ops::{
    apply_set_operation, difference_slots, intersect_slots, remove_overlapping_slots,
    symmetric_difference_slots, union_slots, SetOperation,
};
pub use slot::{overlaps, EdgeStrategy, Metadata, Slot};
