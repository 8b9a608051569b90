//! Ordinal rating scales for FMEA.
//!
//! Each scale maps a qualitative label to a small integer rank. Frequency and
//! severity rank upward with the label; detectability is inverted, so a mode
//! that is *easier* to detect gets a *lower* rank.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::{Error, Result};

/// Shared behaviour of the three FMEA rating scales.
pub trait OrdinalScale:
  Copy + IntoEnumIterator + Into<&'static str> + 'static
{
  /// Scale name used in error messages.
  const NAME: &'static str;

  /// The integer rank used in the RPN product.
  fn rank(self) -> u32;

  /// The canonical label, e.g. `"Very Low"`.
  fn label(self) -> &'static str { self.into() }

  /// Parse a label. Matching is case-insensitive and treats `_` and `-` as
  /// spaces, so `very_low`, `very-low` and `Very Low` are equivalent.
  fn parse_label(input: &str) -> Result<Self> {
    let wanted = normalize(input);
    Self::iter()
      .find(|v| normalize(v.label()) == wanted)
      .ok_or_else(|| Error::invalid(Self::NAME, input))
  }
}

fn normalize(s: &str) -> String {
  s.trim()
    .chars()
    .map(|c| if c == '_' || c == '-' { ' ' } else { c.to_ascii_lowercase() })
    .collect()
}

// ─── Frequency ───────────────────────────────────────────────────────────────

/// How often a failure mode is expected to occur.
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
pub enum Frequency {
  #[serde(rename = "Very Low")]
  #[strum(serialize = "Very Low")]
  VeryLow,
  Low,
  Medium,
  High,
  #[serde(rename = "Very High")]
  #[strum(serialize = "Very High")]
  VeryHigh,
}

impl OrdinalScale for Frequency {
  const NAME: &'static str = "frequency";

  fn rank(self) -> u32 {
    match self {
      Self::VeryLow => 1,
      Self::Low => 2,
      Self::Medium => 3,
      Self::High => 4,
      Self::VeryHigh => 5,
    }
  }
}

impl FromStr for Frequency {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::parse_label(s) }
}

// ─── Severity ────────────────────────────────────────────────────────────────

/// How bad the consequences of a failure mode are.
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
pub enum Severity {
  Minor,
  Moderate,
  Major,
  Critical,
}

impl Severity {
  /// Reconcile a 1–10 numeric severity score onto the four-label scale.
  ///
  /// 1–2 → Minor, 3–5 → Moderate, 6–8 → Major, 9–10 → Critical.
  pub fn from_score(score: u8) -> Result<Self> {
    match score {
      1..=2 => Ok(Self::Minor),
      3..=5 => Ok(Self::Moderate),
      6..=8 => Ok(Self::Major),
      9..=10 => Ok(Self::Critical),
      _ => Err(Error::invalid(Self::NAME, score.to_string())),
    }
  }
}

impl OrdinalScale for Severity {
  const NAME: &'static str = "severity";

  fn rank(self) -> u32 {
    match self {
      Self::Minor => 1,
      Self::Moderate => 2,
      Self::Major => 3,
      Self::Critical => 4,
    }
  }
}

/// Accepts either a label or a numeric 1–10 score.
impl FromStr for Severity {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().parse::<u8>() {
      Ok(score) => Self::from_score(score),
      Err(_) => Self::parse_label(s),
    }
  }
}

// ─── Detectability ───────────────────────────────────────────────────────────

/// How easily a failure mode is detected before it causes harm.
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
pub enum Detectability {
  #[serde(rename = "Very High")]
  #[strum(serialize = "Very High")]
  VeryHigh,
  High,
  Medium,
  Low,
  #[serde(rename = "Very Low")]
  #[strum(serialize = "Very Low")]
  VeryLow,
}

impl OrdinalScale for Detectability {
  const NAME: &'static str = "detectability";

  fn rank(self) -> u32 {
    match self {
      Self::VeryHigh => 1,
      Self::High => 2,
      Self::Medium => 3,
      Self::Low => 4,
      Self::VeryLow => 5,
    }
  }
}

impl FromStr for Detectability {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::parse_label(s) }
}
