//! Buffer time around matching slots.
//!
//! ```rust
//! use chrono::Duration;
//! use slot_engine::rules::buffer_rule;
//!
//! // Seven hours before and eight after every flight.
//! let flights = buffer_rule(
//!     |slot| slot.metadata.get("type").and_then(|v| v.as_str()) == Some("flight"),
//!     Duration::hours(7),
//!     Duration::hours(8),
//! );
//! assert!(flights(&[]).is_empty());
//! ```

use chrono::Duration;
use serde_json::Value;

use super::SlotRule;
use crate::slot::Slot;

/// Which side of its anchor a buffer slot sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferType {
    Before,
    After,
}

impl BufferType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BufferType::Before => "before",
            BufferType::After => "after",
        }
    }
}

fn buffer_slot(anchor: &Slot, span: Slot, buffer_type: BufferType) -> Slot {
    let mut metadata = anchor.metadata.clone();
    metadata.insert("isBuffer".to_string(), Value::Bool(true));
    metadata.insert(
        "bufferType".to_string(),
        Value::String(buffer_type.as_str().to_string()),
    );
    metadata.insert("originalSlot".to_string(), anchor.to_json());
    Slot { metadata, ..span }
}

/// Emit buffer slots around every slot `matcher` accepts.
///
/// The `before` buffer ends exactly at the anchor's start, the `after` buffer
/// starts exactly at the anchor's end. Buffers carry the anchor's metadata
/// plus `isBuffer: true`, `bufferType` and an `originalSlot` snapshot. A side
/// whose length is zero (or negative) gets no buffer. Output order follows
/// the input, `before` ahead of `after` for each anchor.
pub fn buffer_rule<F>(matcher: F, before: Duration, after: Duration) -> SlotRule
where
    F: Fn(&Slot) -> bool + Send + Sync + 'static,
{
    Box::new(move |slots: &[Slot]| {
        let mut buffers = Vec::new();
        for anchor in slots {
            if !matcher(anchor) {
                continue;
            }
            if before > Duration::zero() {
                buffers.push(buffer_slot(
                    anchor,
                    Slot::bare(anchor.start - before, anchor.start),
                    BufferType::Before,
                ));
            }
            if after > Duration::zero() {
                buffers.push(buffer_slot(
                    anchor,
                    Slot::bare(anchor.end, anchor.end + after),
                    BufferType::After,
                ));
            }
        }
        buffers
    })
}
