//! The built-in failure-mode knowledge base.
//!
//! Shipped as JSON inside the binary and parsed on demand. The repository
//! loads it once at construction and never mutates it.

use crate::{Result, failure_mode::FailureModeMap};

const BUILTIN_JSON: &str = include_str!("../data/default_failure_modes.json");

/// Parse the embedded knowledge base.
pub fn builtin() -> Result<FailureModeMap> {
  Ok(serde_json::from_str(BUILTIN_JSON)?)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::scale::Severity;

  #[test]
  fn builtin_parses() {
    let map = builtin().unwrap();
    assert!(map.len() >= 5);
    assert!(map.contains_key("Bomba Centrífuga"));
  }

  #[test]
  fn entries_are_filed_under_their_own_type() {
    for (equipment_type, modes) in builtin().unwrap() {
      assert!(!modes.is_empty());
      for m in modes {
        assert_eq!(m.equipment_type, equipment_type);
      }
    }
  }

  #[test]
  fn ids_are_unique() {
    let map = builtin().unwrap();
    let mut ids: Vec<&str> = map.values().flatten().map(|m| m.id.as_str()).collect();
    let total = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), total);
  }

  #[test]
  fn motor_has_three_modes() {
    let map = builtin().unwrap();
    let severities: Vec<Severity> =
      map["Motor Eléctrico"].iter().map(|m| m.severity).collect();
    assert_eq!(severities, vec![Severity::Major, Severity::Major, Severity::Critical]);
  }
}
