//! The `KeyValueStore` trait and an in-memory implementation.
//!
//! The trait is implemented by storage backends (e.g. `rcm-store-sqlite`).
//! The repository depends on this abstraction, never on a concrete backend,
//! and is handed its store at construction time.

use std::{
  collections::HashMap,
  convert::Infallible,
  future::Future,
  sync::{Arc, Mutex},
};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// A string-keyed, string-valued persistence collaborator.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait KeyValueStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the value stored under `key`. Returns `None` if absent.
  fn get<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'a;

  /// Store `value` under `key`, replacing any previous value.
  fn set<'a>(
    &'a self,
    key: &'a str,
    value: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

// ─── MemoryStore ─────────────────────────────────────────────────────────────

/// A process-local store backed by a `HashMap`.
///
/// Cloning is cheap and clones share the same map, which lets a test keep a
/// handle to inspect what a repository persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// A store pre-seeded with a single entry.
  pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
    let store = Self::new();
    store.lock().insert(key.into(), value.into());
    store
  }

  /// Synchronous read, for inspection in tests and tooling.
  pub fn snapshot(&self, key: &str) -> Option<String> {
    self.lock().get(key).cloned()
  }

  fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
    // A poisoned map is still a valid map.
    self.entries.lock().unwrap_or_else(|e| e.into_inner())
  }
}

impl KeyValueStore for MemoryStore {
  type Error = Infallible;

  async fn get(&self, key: &str) -> Result<Option<String>, Infallible> {
    Ok(self.snapshot(key))
  }

  async fn set(&self, key: &str, value: String) -> Result<(), Infallible> {
    self.lock().insert(key.to_owned(), value);
    Ok(())
  }
}
