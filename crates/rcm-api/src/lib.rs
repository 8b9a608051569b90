//! JSON REST API for the RCM failure-mode engine.
//!
//! Exposes an axum [`Router`] backed by a [`FailureModeRepository`] over any
//! [`KeyValueStore`]. Auth, TLS, and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", rcm_api::api_router(repo.clone()))
//! ```

pub mod equipment;
pub mod error;
pub mod failure_modes;
pub mod reliability;
pub mod risk;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use rcm_core::{FailureModeRepository, store::KeyValueStore};

pub use error::ApiError;

/// Shared repository handle threaded through every handler.
pub type Repo<S> = Arc<FailureModeRepository<S>>;

/// Build a fully-materialised API router for `repo`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(repo: Repo<S>) -> Router<()>
where
  S: KeyValueStore + 'static,
{
  Router::new()
    // Merged knowledge base
    .route("/failure-modes", get(failure_modes::list::<S>))
    .route("/failure-modes/export", get(failure_modes::export::<S>))
    .route("/failure-modes/import", post(failure_modes::import::<S>))
    .route("/failure-modes/reset", post(failure_modes::reset::<S>))
    .route("/failure-modes/statistics", get(failure_modes::statistics::<S>))
    // Per equipment type
    .route("/equipment-types", get(equipment::list_types::<S>))
    .route(
      "/equipment-types/{equipment_type}/failure-modes",
      get(equipment::list::<S>).post(equipment::create::<S>),
    )
    .route(
      "/equipment-types/{equipment_type}/failure-modes/{id}",
      get(equipment::get_one::<S>)
        .put(equipment::update::<S>)
        .delete(equipment::delete::<S>),
    )
    .route("/equipment-types/{equipment_type}/risk", get(equipment::risk::<S>))
    // Stateless calculators
    .route("/risk/rpn", get(risk::rpn))
    .route("/reliability", post(reliability::report))
    .route("/reliability/fleet", post(reliability::fleet))
    .route("/reliability/costs", post(reliability::costs))
    .with_state(repo)
}

#[cfg(test)]
mod tests;
