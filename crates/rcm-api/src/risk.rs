//! Handler for `GET /risk/rpn`: a stateless RPN calculator.

use axum::{Json, extract::Query};
use rcm_core::risk::{RiskBand, classify_risk, compute_rpn_labels};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct RpnParams {
  pub frequency:     String,
  /// A severity label, or a 1–10 score.
  pub severity:      String,
  pub detectability: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RpnResponse {
  pub rpn:  u32,
  pub band: RiskBand,
}

/// `GET /risk/rpn?frequency=..&severity=..&detectability=..`
///
/// 400 if any label is not on its scale.
pub async fn rpn(Query(params): Query<RpnParams>) -> Result<Json<RpnResponse>, ApiError> {
  let rpn = compute_rpn_labels(
    &params.frequency,
    &params.severity,
    &params.detectability,
  )?;
  Ok(Json(RpnResponse { rpn, band: classify_risk(rpn) }))
}
