//! Plain-text rendering of API results for the terminal.

use std::fmt::Write as _;

use rcm_core::{
  failure_mode::FailureMode,
  origin::{FailureModeStatistics, ResolvedFailureMode},
  risk::{RiskAssessment, bucket_by_band, classify_risk, compute_rpn},
};

use crate::client::RiskReport;

fn rpn_of(mode: &FailureMode) -> u32 {
  compute_rpn(mode.frequency, mode.severity, mode.detectability)
}

fn mode_line(out: &mut String, mode: &FailureMode, tag: &str) {
  let rpn = rpn_of(mode);
  let _ = writeln!(
    out,
    "{:<14} {:>3} {:<8} {:<7} {}",
    mode.id,
    rpn,
    classify_risk(rpn).to_string(),
    tag,
    mode.description
  );
}

/// One line per failure mode: id, RPN, band, origin, description.
pub fn failure_modes(modes: &[ResolvedFailureMode]) -> String {
  if modes.is_empty() {
    return "no failure modes\n".into();
  }
  let mut out = String::new();
  for resolved in modes {
    let tag = if resolved.origin.is_custom() { "custom" } else { "default" };
    mode_line(&mut out, &resolved.mode, tag);
  }
  out
}

/// Search hits grouped under their equipment type, in response order.
pub fn search_results(modes: &[FailureMode]) -> String {
  if modes.is_empty() {
    return "no matches\n".into();
  }
  let mut out = String::new();
  let mut current: Option<&str> = None;
  for mode in modes {
    if current != Some(mode.equipment_type.as_str()) {
      let _ = writeln!(out, "{}:", mode.equipment_type);
      current = Some(&mode.equipment_type);
    }
    out.push_str("  ");
    mode_line(&mut out, mode, "");
  }
  out
}

pub fn statistics(stats: &FailureModeStatistics) -> String {
  format!(
    "equipment types: {}\nfailure modes:   {} ({} default, {} custom)\n",
    stats.total_equipment_types,
    stats.total_failure_modes,
    stats.default_failure_modes,
    stats.custom_failure_modes,
  )
}

/// Band summary followed by the assessments of each band, highest first.
pub fn risk(report: &RiskReport) -> String {
  let s = &report.summary;
  let mut out = format!(
    "{}: {} critical, {} high, {} medium, {} low\n",
    report.equipment_type, s.critical, s.high, s.medium, s.low
  );
  for (band, items) in bucket_by_band(report.assessments.iter().cloned()) {
    let _ = writeln!(out, "\n[{band}]");
    for RiskAssessment { id, rpn, description, .. } in items {
      let _ = writeln!(out, "  {id:<14} {rpn:>3} {description}");
    }
  }
  out
}
