//! Error types for slot-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    /// A slot handed to [`add_slots`](crate::operations::add_slots) failed validation.
    #[error("Invalid slot format")]
    InvalidSlot,

    /// The replacement slot handed to [`update_slot`](crate::operations::update_slot)
    /// failed validation.
    #[error("Invalid new slot format")]
    InvalidNewSlot,

    /// Slot generation was asked for a non-positive duration or stride.
    #[error("Duration and stride must be positive: {0}")]
    InvalidStep(String),

    #[error("Unknown set operation: {0}")]
    UnknownOperation(String),

    /// Weekday numbers run 1 (Monday) to 7 (Sunday).
    #[error("Invalid weekday number: {0}")]
    InvalidWeekday(u32),

    #[error("Invalid time of day: {0}")]
    InvalidTimeOfDay(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Operation options could not be built from their serialized form.
    #[error("Invalid operation config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SlotError>;
