//! Integration tests for `SqliteStore` against an in-memory database.

use rcm_core::{
  FailureModeRepository,
  failure_mode::FailureMode,
  repository::CUSTOM_FAILURE_MODES_KEY,
  scale::{Detectability, Frequency, Severity},
  store::KeyValueStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

// ─── Key-value contract ──────────────────────────────────────────────────────

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert!(s.get("absent").await.unwrap().is_none());
}

#[tokio::test]
async fn set_then_get() {
  let s = store().await;
  s.set("greeting", "hola".to_string()).await.unwrap();
  assert_eq!(s.get("greeting").await.unwrap().as_deref(), Some("hola"));
}

#[tokio::test]
async fn set_overwrites_existing_value() {
  let s = store().await;
  s.set("k", "one".to_string()).await.unwrap();
  s.set("k", "two".to_string()).await.unwrap();
  assert_eq!(s.get("k").await.unwrap().as_deref(), Some("two"));
  assert_eq!(s.keys().await.unwrap(), vec!["k".to_string()]);
}

#[tokio::test]
async fn keys_are_sorted() {
  let s = store().await;
  s.set("b", String::new()).await.unwrap();
  s.set("a", String::new()).await.unwrap();
  assert_eq!(s.keys().await.unwrap(), vec!["a".to_string(), "b".to_string()]);
}

#[tokio::test]
async fn clones_share_the_connection() {
  let s = store().await;
  let other = s.clone();
  s.set("shared", "yes".to_string()).await.unwrap();
  assert_eq!(other.get("shared").await.unwrap().as_deref(), Some("yes"));
}

#[tokio::test]
async fn file_store_persists_across_reopen() {
  let path = std::env::temp_dir().join(format!(
    "rcm-store-test-{}-{}.db",
    std::process::id(),
    chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
  ));

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.set("k", "v".to_string()).await.unwrap();
  }
  let reopened = SqliteStore::open(&path).await.unwrap();
  assert_eq!(reopened.get("k").await.unwrap().as_deref(), Some("v"));

  drop(reopened);
  let _ = std::fs::remove_file(&path);
}

// ─── Repository over SQLite ──────────────────────────────────────────────────

#[tokio::test]
async fn repository_overlay_round_trips_through_sqlite() {
  let s = store().await;
  let repo = FailureModeRepository::open(s.clone()).await;

  let mode = FailureMode::new(
    "FM-SQL",
    "Compresor de Aire",
    "Fuga en el enfriador intermedio",
    Frequency::Low,
    Severity::Moderate,
    Detectability::High,
  );
  repo.add_failure_mode("Compresor de Aire", mode).await.unwrap();
  assert!(s.get(CUSTOM_FAILURE_MODES_KEY).await.unwrap().is_some());

  let reopened = FailureModeRepository::open(s).await;
  let found = reopened
    .find_failure_mode("Compresor de Aire", "FM-SQL")
    .await
    .expect("custom mode survives reopen");
  assert!(found.origin.is_custom());
}
