//! The failure mode record: the fundamental unit of the FMEA knowledge base.
//!
//! Failure modes are grouped by equipment type. Equipment types are free text
//! and compared by exact string equality, so `"Bomba Centrífuga"` and
//! `"bomba centrífuga"` are distinct buckets.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::scale::{Detectability, Frequency, Severity};

/// Failure modes keyed by equipment type.
///
/// Iteration order is the lexical order of the equipment type strings; this
/// is the order used by merged listings, export and search.
pub type FailureModeMap = BTreeMap<String, Vec<FailureMode>>;

/// A single way a piece of equipment can fail, with its FMEA ratings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureMode {
  pub id:                 String,
  pub equipment_type:     String,
  pub description:        String,
  #[serde(default)]
  pub causes:             Vec<String>,
  #[serde(default)]
  pub effects:            Vec<String>,
  #[serde(default)]
  pub detection_methods:  Vec<String>,
  #[serde(default)]
  pub preventive_actions: Vec<String>,
  pub frequency:          Frequency,
  pub severity:           Severity,
  pub detectability:      Detectability,
}

impl FailureMode {
  /// Convenience constructor with all list fields empty.
  pub fn new(
    id: impl Into<String>,
    equipment_type: impl Into<String>,
    description: impl Into<String>,
    frequency: Frequency,
    severity: Severity,
    detectability: Detectability,
  ) -> Self {
    Self {
      id: id.into(),
      equipment_type: equipment_type.into(),
      description: description.into(),
      causes: Vec::new(),
      effects: Vec::new(),
      detection_methods: Vec::new(),
      preventive_actions: Vec::new(),
      frequency,
      severity,
      detectability,
    }
  }

  /// A time-based identifier of the form `FM-<unix millis>`.
  ///
  /// Uniqueness is the caller's concern; two calls in the same millisecond
  /// yield the same id.
  pub fn generate_id() -> String {
    format!("FM-{}", Utc::now().timestamp_millis())
  }

  /// Case-insensitive substring match against the description, causes and
  /// effects. `needle` must already be lowercased.
  pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
    let hit = |s: &String| s.to_lowercase().contains(needle);
    hit(&self.description)
      || self.causes.iter().any(hit)
      || self.effects.iter().any(hit)
  }
}
