//! The options bundle threaded through every set operation.
//!
//! [`SlotOperationOptions`] is built in code. [`OperationConfig`] is its
//! serde-friendly twin for hosts that receive options as JSON; it can only name
//! the built-in merge strategies.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::merge::MetadataMerge;
use crate::slot::EdgeStrategy;

/// Options for the set operations.
#[derive(Debug, Clone)]
pub struct SlotOperationOptions {
    pub metadata_merge: MetadataMerge,
    pub edge_strategy: EdgeStrategy,
    /// Fragments shorter than this (elapsed time) are dropped.
    pub min_duration: Option<Duration>,
}

impl SlotOperationOptions {
    /// Options with the given merge strategy, inclusive edges and no minimum
    /// duration.
    pub fn new(metadata_merge: MetadataMerge) -> Self {
        Self {
            metadata_merge,
            edge_strategy: EdgeStrategy::default(),
            min_duration: None,
        }
    }

    pub fn with_edge_strategy(mut self, edge_strategy: EdgeStrategy) -> Self {
        self.edge_strategy = edge_strategy;
        self
    }

    pub fn with_min_duration(mut self, min_duration: Duration) -> Self {
        self.min_duration = Some(min_duration);
        self
    }

    /// Whether a fragment of length `duration` survives the minimum-duration filter.
    pub(crate) fn keeps(&self, duration: Duration) -> bool {
        self.min_duration.is_none_or(|min| duration >= min)
    }
}

/// The built-in merge strategies, by name.
///
/// No `Default`: a config has to name its strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedMerge {
    KeepFirst,
    KeepLast,
    Overwrite,
    Combine,
}

impl From<NamedMerge> for MetadataMerge {
    fn from(named: NamedMerge) -> Self {
        match named {
            NamedMerge::KeepFirst => MetadataMerge::KeepFirst,
            NamedMerge::KeepLast => MetadataMerge::KeepLast,
            NamedMerge::Overwrite => MetadataMerge::Overwrite,
            NamedMerge::Combine => MetadataMerge::Combine,
        }
    }
}

/// Serialized form of [`SlotOperationOptions`].
///
/// ```json
/// { "metadata_merge": "keep_first", "edge_strategy": "exclusive", "min_duration_minutes": 30 }
/// ```
///
/// `metadata_merge` is required; the other fields fall back to inclusive
/// edges and no minimum duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperationConfig {
    pub metadata_merge: NamedMerge,
    #[serde(default)]
    pub edge_strategy: EdgeStrategy,
    #[serde(default)]
    pub min_duration_minutes: Option<i64>,
}

impl OperationConfig {
    /// A config with the given merge strategy and every other field at its default.
    pub fn new(metadata_merge: NamedMerge) -> Self {
        Self {
            metadata_merge,
            edge_strategy: EdgeStrategy::default(),
            min_duration_minutes: None,
        }
    }

    /// Parse a JSON config document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SlotError::Config(e.to_string()))
    }

    /// Build the runtime options.
    ///
    /// # Errors
    /// Returns `SlotError::Config` if `min_duration_minutes` is negative or too
    /// large to represent as a duration.
    pub fn into_options(self) -> Result<SlotOperationOptions> {
        let mut options =
            SlotOperationOptions::new(self.metadata_merge.into()).with_edge_strategy(self.edge_strategy);
        if let Some(minutes) = self.min_duration_minutes {
            if minutes < 0 {
                return Err(SlotError::Config(format!(
                    "min_duration_minutes must not be negative, got {}",
                    minutes
                )));
            }
            let min_duration = Duration::try_minutes(minutes).ok_or_else(|| {
                SlotError::Config(format!("min_duration_minutes is out of range, got {}", minutes))
            })?;
            options = options.with_min_duration(min_duration);
        }
        Ok(options)
    }
}
