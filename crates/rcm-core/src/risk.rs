//! Risk Priority Number computation and risk banding.
//!
//! `RPN = rank(frequency) × rank(severity) × rank(detectability)`, which with
//! the fixed scales ranges from 1 to 100. Bands use inclusive lower bounds
//! evaluated from the top down.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

use crate::{
  Result,
  failure_mode::FailureMode,
  scale::{Detectability, Frequency, OrdinalScale, Severity},
};

/// Lower bound of the Critical band.
pub const CRITICAL_THRESHOLD: u32 = 60;
/// Lower bound of the High band.
pub const HIGH_THRESHOLD: u32 = 40;
/// Lower bound of the Medium band.
pub const MEDIUM_THRESHOLD: u32 = 20;

// ─── RPN ─────────────────────────────────────────────────────────────────────

pub fn compute_rpn(
  frequency: Frequency,
  severity: Severity,
  detectability: Detectability,
) -> u32 {
  frequency.rank() * severity.rank() * detectability.rank()
}

/// Parse the three labels and compute the RPN.
///
/// Fails with [`crate::Error::InvalidEnumValue`] on the first unknown label.
pub fn compute_rpn_labels(
  frequency: &str,
  severity: &str,
  detectability: &str,
) -> Result<u32> {
  Ok(compute_rpn(
    frequency.parse()?,
    severity.parse()?,
    detectability.parse()?,
  ))
}

// ─── Bands ───────────────────────────────────────────────────────────────────

/// Risk band. Declared from most to least severe, so sorting ascending puts
/// `Critical` first.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  IntoStaticStr,
)]
pub enum RiskBand {
  Critical,
  High,
  Medium,
  Low,
}

pub fn classify_risk(rpn: u32) -> RiskBand {
  if rpn >= CRITICAL_THRESHOLD {
    RiskBand::Critical
  } else if rpn >= HIGH_THRESHOLD {
    RiskBand::High
  } else if rpn >= MEDIUM_THRESHOLD {
    RiskBand::Medium
  } else {
    RiskBand::Low
  }
}

// ─── Assessment ──────────────────────────────────────────────────────────────

/// A failure mode's computed risk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
  pub id:             String,
  pub equipment_type: String,
  pub description:    String,
  pub rpn:            u32,
  pub band:           RiskBand,
}

pub fn assess(mode: &FailureMode) -> RiskAssessment {
  let rpn = compute_rpn(mode.frequency, mode.severity, mode.detectability);
  RiskAssessment {
    id: mode.id.clone(),
    equipment_type: mode.equipment_type.clone(),
    description: mode.description.clone(),
    rpn,
    band: classify_risk(rpn),
  }
}

/// Assess every mode and order the result by RPN, highest first.
///
/// The sort is stable: modes with equal RPN keep their input order.
pub fn rank_failure_modes<'a>(
  modes: impl IntoIterator<Item = &'a FailureMode>,
) -> Vec<RiskAssessment> {
  let mut ranked: Vec<RiskAssessment> = modes.into_iter().map(assess).collect();
  ranked.sort_by(|a, b| b.rpn.cmp(&a.rpn));
  ranked
}

/// Group assessments by band, preserving their relative order.
pub fn bucket_by_band(
  assessments: impl IntoIterator<Item = RiskAssessment>,
) -> BTreeMap<RiskBand, Vec<RiskAssessment>> {
  let mut buckets: BTreeMap<RiskBand, Vec<RiskAssessment>> = BTreeMap::new();
  for a in assessments {
    buckets.entry(a.band).or_default().push(a);
  }
  buckets
}

/// Number of assessments per band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiskSummary {
  pub critical: usize,
  pub high:     usize,
  pub medium:   usize,
  pub low:      usize,
}

impl RiskSummary {
  pub fn from_assessments<'a>(
    assessments: impl IntoIterator<Item = &'a RiskAssessment>,
  ) -> Self {
    let mut summary = Self::default();
    for a in assessments {
      match a.band {
        RiskBand::Critical => summary.critical += 1,
        RiskBand::High => summary.high += 1,
        RiskBand::Medium => summary.medium += 1,
        RiskBand::Low => summary.low += 1,
      }
    }
    summary
  }

  pub fn total(&self) -> usize {
    self.critical + self.high + self.medium + self.low
  }
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator;

  use super::*;

  #[test]
  fn rpn_is_product_of_ranks_for_every_triple() {
    for f in Frequency::iter() {
      for s in Severity::iter() {
        for d in Detectability::iter() {
          let rpn = compute_rpn(f, s, d);
          assert_eq!(rpn, f.rank() * s.rank() * d.rank());
          assert!((1..=100).contains(&rpn));
        }
      }
    }
  }

  #[test]
  fn rpn_extremes() {
    assert_eq!(
      compute_rpn(Frequency::VeryLow, Severity::Minor, Detectability::VeryHigh),
      1
    );
    assert_eq!(
      compute_rpn(Frequency::VeryHigh, Severity::Critical, Detectability::VeryLow),
      100
    );
  }

  #[test]
  fn rpn_from_labels() {
    assert_eq!(compute_rpn_labels("Low", "Critical", "Medium").unwrap(), 24);
    assert!(compute_rpn_labels("Low", "Catastrophic", "Medium").is_err());
  }

  #[test]
  fn band_boundaries() {
    assert_eq!(classify_risk(100), RiskBand::Critical);
    assert_eq!(classify_risk(60), RiskBand::Critical);
    assert_eq!(classify_risk(59), RiskBand::High);
    assert_eq!(classify_risk(40), RiskBand::High);
    assert_eq!(classify_risk(39), RiskBand::Medium);
    assert_eq!(classify_risk(20), RiskBand::Medium);
    assert_eq!(classify_risk(19), RiskBand::Low);
    assert_eq!(classify_risk(1), RiskBand::Low);
  }

  #[test]
  fn band_never_increases_as_rpn_decreases() {
    let mut previous = classify_risk(100);
    for rpn in (0..100).rev() {
      let band = classify_risk(rpn);
      // Ord puts Critical first, so a lower risk compares greater.
      assert!(band >= previous, "rpn {rpn} jumped to {band}");
      previous = band;
    }
  }

  fn mode(id: &str, f: Frequency, s: Severity, d: Detectability) -> FailureMode {
    FailureMode::new(id, "Compresor de Aire", id, f, s, d)
  }

  #[test]
  fn ranking_is_descending_and_stable() {
    let modes = vec![
      mode("a", Frequency::Low, Severity::Minor, Detectability::High),
      mode("b", Frequency::VeryHigh, Severity::Critical, Detectability::Low),
      mode("c", Frequency::Low, Severity::Minor, Detectability::High),
    ];
    let ranked = rank_failure_modes(&modes);
    let ids: Vec<&str> = ranked.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a", "c"]);
    assert_eq!(ranked[0].rpn, 80);
    assert_eq!(ranked[0].band, RiskBand::Critical);
  }

  #[test]
  fn buckets_and_summary() {
    let modes = vec![
      mode("a", Frequency::Low, Severity::Critical, Detectability::Medium),
      mode("b", Frequency::VeryHigh, Severity::Critical, Detectability::Low),
      mode("c", Frequency::VeryLow, Severity::Minor, Detectability::High),
    ];
    let ranked = rank_failure_modes(&modes);
    let summary = RiskSummary::from_assessments(&ranked);
    assert_eq!(summary, RiskSummary { critical: 1, high: 0, medium: 1, low: 1 });
    assert_eq!(summary.total(), 3);

    let buckets = bucket_by_band(ranked);
    assert_eq!(buckets.keys().copied().collect::<Vec<_>>(), vec![
      RiskBand::Critical,
      RiskBand::Medium,
      RiskBand::Low,
    ]);
    assert_eq!(buckets[&RiskBand::Medium][0].rpn, 24);
  }
}
