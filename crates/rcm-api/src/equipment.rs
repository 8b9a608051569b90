//! Handlers for `/equipment-types` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/equipment-types` | Every type in either partition |
//! | `GET`    | `/equipment-types/:type/failure-modes` | Merged list, each entry tagged with its origin |
//! | `POST`   | `/equipment-types/:type/failure-modes` | Body: [`FailureModeBody`]; returns 201 + stored mode |
//! | `GET`    | `/equipment-types/:type/failure-modes/:id` | 404 if not found |
//! | `PUT`    | `/equipment-types/:type/failure-modes/:id` | Body: [`FailureModeBody`]; custom entries only |
//! | `DELETE` | `/equipment-types/:type/failure-modes/:id` | Custom entries only |
//! | `GET`    | `/equipment-types/:type/risk` | Modes ranked by RPN with a per-band summary |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use rcm_core::{
  failure_mode::FailureMode,
  origin::{MutationOutcome, ResolvedFailureMode},
  risk::{RiskAssessment, RiskSummary, rank_failure_modes},
  scale::{Detectability, Frequency, Severity},
  store::KeyValueStore,
};
use serde::{Deserialize, Serialize};

use crate::{Repo, error::ApiError};

// ─── Types ────────────────────────────────────────────────────────────────────

/// `GET /equipment-types`
pub async fn list_types<S>(State(repo): State<Repo<S>>) -> Json<Vec<String>>
where
  S: KeyValueStore,
{
  Json(repo.equipment_types().await)
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /equipment-types/:type/failure-modes`
pub async fn list<S>(
  State(repo): State<Repo<S>>,
  Path(equipment_type): Path<String>,
) -> Json<Vec<ResolvedFailureMode>>
where
  S: KeyValueStore,
{
  Json(repo.get_resolved_for_equipment(&equipment_type).await)
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /equipment-types/:type/failure-modes/:id`
pub async fn get_one<S>(
  State(repo): State<Repo<S>>,
  Path((equipment_type, id)): Path<(String, String)>,
) -> Result<Json<ResolvedFailureMode>, ApiError>
where
  S: KeyValueStore,
{
  let found = repo
    .find_failure_mode(&equipment_type, &id)
    .await
    .ok_or_else(|| {
      ApiError::NotFound(format!("failure mode {id} not found in {equipment_type}"))
    })?;
  Ok(Json(found))
}

// ─── Create / update body ─────────────────────────────────────────────────────

/// JSON body accepted by `POST` and `PUT`.
///
/// The equipment type always comes from the path. On `POST` a missing or
/// blank `id` is replaced with a generated one; on `PUT` the path id wins.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureModeBody {
  #[serde(default)]
  pub id:                 Option<String>,
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

impl FailureModeBody {
  fn into_mode(self, id: String, equipment_type: String) -> FailureMode {
    FailureMode {
      id,
      equipment_type,
      description: self.description,
      causes: self.causes,
      effects: self.effects,
      detection_methods: self.detection_methods,
      preventive_actions: self.preventive_actions,
      frequency: self.frequency,
      severity: self.severity,
      detectability: self.detectability,
    }
  }
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /equipment-types/:type/failure-modes`: returns 201 + the stored mode.
pub async fn create<S>(
  State(repo): State<Repo<S>>,
  Path(equipment_type): Path<String>,
  Json(body): Json<FailureModeBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: KeyValueStore,
{
  let id = body
    .id
    .clone()
    .filter(|id| !id.trim().is_empty())
    .unwrap_or_else(FailureMode::generate_id);
  let mode = body.into_mode(id, equipment_type.clone());
  repo.add_failure_mode(&equipment_type, mode.clone()).await?;
  Ok((StatusCode::CREATED, Json(mode)))
}

// ─── Update / delete ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct OutcomeBody {
  pub outcome: MutationOutcome,
}

/// `PUT /equipment-types/:type/failure-modes/:id`
///
/// Always 200; `outcome` reports whether a custom entry was replaced.
pub async fn update<S>(
  State(repo): State<Repo<S>>,
  Path((equipment_type, id)): Path<(String, String)>,
  Json(body): Json<FailureModeBody>,
) -> Result<Json<OutcomeBody>, ApiError>
where
  S: KeyValueStore,
{
  let mode = body.into_mode(id.clone(), equipment_type.clone());
  let outcome = repo.update_failure_mode(&equipment_type, &id, mode).await?;
  Ok(Json(OutcomeBody { outcome }))
}

/// `DELETE /equipment-types/:type/failure-modes/:id`
pub async fn delete<S>(
  State(repo): State<Repo<S>>,
  Path((equipment_type, id)): Path<(String, String)>,
) -> Result<Json<OutcomeBody>, ApiError>
where
  S: KeyValueStore,
{
  let outcome = repo.delete_failure_mode(&equipment_type, &id).await?;
  Ok(Json(OutcomeBody { outcome }))
}

// ─── Risk ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskResponse {
  pub equipment_type: String,
  pub summary:        RiskSummary,
  /// Highest RPN first.
  pub assessments:    Vec<RiskAssessment>,
}

/// `GET /equipment-types/:type/risk`
pub async fn risk<S>(
  State(repo): State<Repo<S>>,
  Path(equipment_type): Path<String>,
) -> Json<RiskResponse>
where
  S: KeyValueStore,
{
  let modes = repo.get_failure_modes_for_equipment(&equipment_type).await;
  let assessments = rank_failure_modes(&modes);
  Json(RiskResponse {
    summary: RiskSummary::from_assessments(&assessments),
    equipment_type,
    assessments,
  })
}
