//! Async HTTP client wrapping the RCM JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use rcm_core::{
  failure_mode::FailureMode,
  origin::{FailureModeStatistics, MutationOutcome, ResolvedFailureMode},
  risk::{RiskAssessment, RiskSummary},
  scale::{Detectability, Frequency, Severity},
};
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

/// Connection settings for the RCM API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Body sent when creating a failure mode. The equipment type travels in the
/// path.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFailureMode {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id:                 Option<String>,
  pub description:        String,
  pub causes:             Vec<String>,
  pub effects:            Vec<String>,
  pub detection_methods:  Vec<String>,
  pub preventive_actions: Vec<String>,
  pub frequency:          Frequency,
  pub severity:           Severity,
  pub detectability:      Detectability,
}

/// Response of `GET /equipment-types/{type}/risk`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskReport {
  pub equipment_type: String,
  pub summary:        RiskSummary,
  pub assessments:    Vec<RiskAssessment>,
}

#[derive(Deserialize)]
struct OutcomeBody {
  outcome: MutationOutcome,
}

#[derive(Deserialize)]
struct ImportBody {
  imported: bool,
}

/// Async HTTP client for the RCM JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  base:   Url,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    let base = Url::parse(&config.base_url)
      .with_context(|| format!("invalid server url {:?}", config.base_url))?;
    if base.cannot_be_a_base() {
      return Err(anyhow!("server url {:?} cannot carry a path", config.base_url));
    }
    Ok(Self { client, base })
  }

  /// `<base>/api/<segments..>`, each segment percent-encoded.
  pub fn url(&self, segments: &[&str]) -> Url {
    let mut url = self.base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().push("api").extend(segments);
    }
    url
  }

  async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
    let url = self.url(segments);
    debug!(%url, "GET");
    let resp = self
      .client
      .get(url.clone())
      .send()
      .await
      .with_context(|| format!("GET {url} failed"))?;
    expect_success("GET", &url, resp)
      .await?
      .json()
      .await
      .with_context(|| format!("deserialising response of GET {url}"))
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// `GET /api/equipment-types`
  pub async fn equipment_types(&self) -> Result<Vec<String>> {
    self.get_json(&["equipment-types"]).await
  }

  /// `GET /api/equipment-types/{type}/failure-modes`
  pub async fn list(&self, equipment_type: &str) -> Result<Vec<ResolvedFailureMode>> {
    self
      .get_json(&["equipment-types", equipment_type, "failure-modes"])
      .await
  }

  /// `GET /api/failure-modes?q=<query>`
  pub async fn search(&self, query: &str) -> Result<Vec<FailureMode>> {
    let mut url = self.url(&["failure-modes"]);
    url.query_pairs_mut().append_pair("q", query);
    debug!(%url, "GET");
    let resp = self
      .client
      .get(url.clone())
      .send()
      .await
      .with_context(|| format!("GET {url} failed"))?;
    expect_success("GET", &url, resp)
      .await?
      .json()
      .await
      .context("deserialising search results")
  }

  /// `GET /api/failure-modes/statistics`
  pub async fn statistics(&self) -> Result<FailureModeStatistics> {
    self.get_json(&["failure-modes", "statistics"]).await
  }

  /// `GET /api/equipment-types/{type}/risk`
  pub async fn risk(&self, equipment_type: &str) -> Result<RiskReport> {
    self.get_json(&["equipment-types", equipment_type, "risk"]).await
  }

  /// `GET /api/failure-modes/export`, returned verbatim.
  pub async fn export(&self) -> Result<String> {
    let url = self.url(&["failure-modes", "export"]);
    let resp = self
      .client
      .get(url.clone())
      .send()
      .await
      .with_context(|| format!("GET {url} failed"))?;
    expect_success("GET", &url, resp)
      .await?
      .text()
      .await
      .context("reading export body")
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  /// `POST /api/equipment-types/{type}/failure-modes`
  pub async fn add(
    &self,
    equipment_type: &str,
    mode: &NewFailureMode,
  ) -> Result<FailureMode> {
    let url = self.url(&["equipment-types", equipment_type, "failure-modes"]);
    let resp = self
      .client
      .post(url.clone())
      .json(mode)
      .send()
      .await
      .with_context(|| format!("POST {url} failed"))?;
    expect_success("POST", &url, resp)
      .await?
      .json()
      .await
      .context("deserialising created failure mode")
  }

  /// `DELETE /api/equipment-types/{type}/failure-modes/{id}`
  pub async fn delete(&self, equipment_type: &str, id: &str) -> Result<MutationOutcome> {
    let url = self.url(&["equipment-types", equipment_type, "failure-modes", id]);
    let resp = self
      .client
      .delete(url.clone())
      .send()
      .await
      .with_context(|| format!("DELETE {url} failed"))?;
    let body: OutcomeBody = expect_success("DELETE", &url, resp)
      .await?
      .json()
      .await
      .context("deserialising delete outcome")?;
    Ok(body.outcome)
  }

  /// `POST /api/failure-modes/import`. `Ok(false)` means the server rejected
  /// the document and left the overlay untouched.
  pub async fn import(&self, document: String) -> Result<bool> {
    let url = self.url(&["failure-modes", "import"]);
    let resp = self
      .client
      .post(url.clone())
      .body(document)
      .send()
      .await
      .with_context(|| format!("POST {url} failed"))?;

    if resp.status() == reqwest::StatusCode::BAD_REQUEST {
      let body: ImportBody = resp.json().await.context("deserialising import result")?;
      return Ok(body.imported);
    }
    let body: ImportBody = expect_success("POST", &url, resp)
      .await?
      .json()
      .await
      .context("deserialising import result")?;
    Ok(body.imported)
  }

  /// `POST /api/failure-modes/reset`
  pub async fn reset(&self) -> Result<()> {
    let url = self.url(&["failure-modes", "reset"]);
    let resp = self
      .client
      .post(url.clone())
      .send()
      .await
      .with_context(|| format!("POST {url} failed"))?;
    expect_success("POST", &url, resp).await?;
    Ok(())
  }
}

/// Turn a non-2xx response into an error carrying the server's message.
async fn expect_success(method: &str, url: &Url, resp: Response) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let message = resp
    .json::<serde_json::Value>()
    .await
    .ok()
    .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned))
    .unwrap_or_default();
  Err(anyhow!("{method} {url} → {status} {message}"))
}
