//! HTTP host for the RCM failure-mode engine.
//!
//! Mounts the [`rcm_api`] router under `/api` and wraps it in request
//! tracing. Configuration is read by the binary; this crate only knows how
//! to turn a repository into a [`Router`].

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use rcm_core::{FailureModeRepository, store::KeyValueStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `RCM_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String { "127.0.0.1".into() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("rcm.sqlite3") }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       default_host(),
      port:       default_port(),
      store_path: default_store_path(),
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the top-level router: `/health` plus the API under `/api`.
pub fn router<S>(repo: Arc<FailureModeRepository<S>>) -> Router
where
  S: KeyValueStore + 'static,
{
  Router::new()
    .route("/health", get(|| async { "ok" }))
    .nest("/api", rcm_api::api_router(repo))
    .layer(TraceLayer::new_for_http())
}
