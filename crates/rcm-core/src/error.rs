//! Error types for `rcm-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A label that is not part of the named ordinal scale.
  #[error("invalid {scale} value: {value:?}")]
  InvalidEnumValue { scale: &'static str, value: String },

  /// Carries the backend's message in its own text; there is no separate
  /// source.
  #[error("store error: {0}")]
  Store(Box<dyn std::error::Error + Send + Sync>),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  pub(crate) fn invalid(scale: &'static str, value: impl Into<String>) -> Self {
    Self::InvalidEnumValue { scale, value: value.into() }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
