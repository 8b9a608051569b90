//! Handlers for the merged `/failure-modes` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/failure-modes` | Merged map; `?q=` switches to a flat search result |
//! | `GET`  | `/failure-modes/export` | Merged map as a JSON document |
//! | `POST` | `/failure-modes/import` | Body: exported JSON; replaces the custom overlay |
//! | `POST` | `/failure-modes/reset` | Drops every custom failure mode |
//! | `GET`  | `/failure-modes/statistics` | Counts per partition |

use axum::{
  Json,
  extract::{Query, State},
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use rcm_core::{origin::FailureModeStatistics, store::KeyValueStore};
use serde::Deserialize;
use serde_json::json;

use crate::{Repo, error::ApiError};

// ─── List / search ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  /// Case-insensitive text matched against description, causes and effects.
  pub q: Option<String>,
}

/// `GET /failure-modes[?q=<text>]`
///
/// Without `q` the response is `{ "<type>": [FailureMode] }`; with `q` it is
/// a flat array of matches.
pub async fn list<S>(
  State(repo): State<Repo<S>>,
  Query(params): Query<ListParams>,
) -> Response
where
  S: KeyValueStore,
{
  match params.q {
    Some(q) => Json(repo.search_failure_modes(&q).await).into_response(),
    None => Json(repo.get_all_failure_modes().await).into_response(),
  }
}

// ─── Export / import ──────────────────────────────────────────────────────────

/// `GET /failure-modes/export`
pub async fn export<S>(
  State(repo): State<Repo<S>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: KeyValueStore,
{
  let body = repo.export_failure_modes().await?;
  Ok(([(header::CONTENT_TYPE, "application/json")], body))
}

/// `POST /failure-modes/import`: body is an exported document.
///
/// Responds `{"imported": true}`, or 400 with `{"imported": false}` when the
/// body does not parse (the overlay is left untouched).
pub async fn import<S>(
  State(repo): State<Repo<S>>,
  body: String,
) -> Result<Response, ApiError>
where
  S: KeyValueStore,
{
  let imported = repo.import_failure_modes(&body).await?;
  let status = if imported { StatusCode::OK } else { StatusCode::BAD_REQUEST };
  Ok((status, Json(json!({ "imported": imported }))).into_response())
}

// ─── Reset ────────────────────────────────────────────────────────────────────

/// `POST /failure-modes/reset`: 204 on success.
pub async fn reset<S>(
  State(repo): State<Repo<S>>,
) -> Result<StatusCode, ApiError>
where
  S: KeyValueStore,
{
  repo.reset_to_factory_defaults().await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Statistics ───────────────────────────────────────────────────────────────

/// `GET /failure-modes/statistics`
pub async fn statistics<S>(
  State(repo): State<Repo<S>>,
) -> Json<FailureModeStatistics>
where
  S: KeyValueStore,
{
  Json(repo.get_statistics().await)
}
