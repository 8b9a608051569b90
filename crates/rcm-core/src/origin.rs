//! Origin tagging and the computed read types of the repository.
//!
//! The default knowledge base is immutable; only the custom overlay can be
//! changed. Every merged record carries its [`Origin`] so callers can tell
//! which entries are editable.

use serde::{Deserialize, Serialize};

use crate::failure_mode::FailureMode;

// ─── Origin ──────────────────────────────────────────────────────────────────

/// Which partition of the repository a failure mode comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
  /// Ships with the system; read-only.
  Default,
  /// User-authored; the only mutable layer.
  Custom,
}

impl Origin {
  pub fn is_custom(&self) -> bool { matches!(self, Self::Custom) }
}

/// A failure mode bundled with the partition it was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedFailureMode {
  pub mode:   FailureMode,
  pub origin: Origin,
}

// ─── Mutation outcome ────────────────────────────────────────────────────────

/// What an update or delete actually did.
///
/// Targeting a default-only entry is not an error: the overlay is simply left
/// alone and [`MutationOutcome::NotCustom`] is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationOutcome {
  /// A custom entry was replaced or removed and the overlay persisted.
  Applied,
  /// The id exists only in the default knowledge base; nothing changed.
  NotCustom,
  /// The id exists in neither partition for that equipment type.
  NotFound,
}

// ─── Statistics ──────────────────────────────────────────────────────────────

/// Counts over the merged view and over each partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureModeStatistics {
  /// Distinct equipment types across both partitions.
  pub total_equipment_types: usize,
  pub total_failure_modes:   usize,
  pub custom_failure_modes:  usize,
  pub default_failure_modes: usize,
}
