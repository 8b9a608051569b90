//! [`FailureModeRepository`]: the default knowledge base merged with a
//! user-authored custom overlay.
//!
//! The default partition is loaded once and never mutated. The custom overlay
//! is loaded from the injected [`KeyValueStore`] at construction and written
//! back after every mutation. The merged view is recomputed on every read, so
//! callers always get a fresh snapshot.
//!
//! Mutations hold the overlay lock across the read-modify-write-persist
//! sequence, so concurrent writers cannot lose each other's updates. If the
//! store rejects a write the in-memory overlay is rolled back.

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::{
  Error, Result, defaults,
  failure_mode::{FailureMode, FailureModeMap},
  origin::{FailureModeStatistics, MutationOutcome, Origin, ResolvedFailureMode},
  store::KeyValueStore,
};

/// Store key under which the custom overlay is persisted as JSON.
pub const CUSTOM_FAILURE_MODES_KEY: &str = "rcm.custom_failure_modes";

pub struct FailureModeRepository<S> {
  store:    S,
  defaults: FailureModeMap,
  custom:   Mutex<FailureModeMap>,
}

impl<S: KeyValueStore> FailureModeRepository<S> {
  /// Build a repository over the built-in knowledge base.
  pub async fn open(store: S) -> Self {
    let defaults = defaults::builtin().unwrap_or_else(|e| {
      error!(error = %e, "built-in knowledge base is unreadable; starting without defaults");
      FailureModeMap::new()
    });
    Self::with_defaults(store, defaults).await
  }

  /// Build a repository over a caller-supplied default partition.
  ///
  /// Never fails: an unreadable or corrupted overlay is logged and treated as
  /// empty.
  pub async fn with_defaults(store: S, defaults: FailureModeMap) -> Self {
    let custom = load_custom(&store).await;
    info!(
      default_types = defaults.len(),
      custom_types = custom.len(),
      "failure mode repository ready"
    );
    Self { store, defaults, custom: Mutex::new(custom) }
  }

  pub fn store(&self) -> &S { &self.store }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// Defaults and customs merged per equipment type, defaults first.
  ///
  /// Equipment types that exist only in the overlay are included.
  pub async fn get_all_failure_modes(&self) -> FailureModeMap {
    let custom = self.custom.lock().await;
    merge(&self.defaults, &custom)
  }

  /// The merged list for one equipment type; empty if the type is unknown.
  pub async fn get_failure_modes_for_equipment(
    &self,
    equipment_type: &str,
  ) -> Vec<FailureMode> {
    self
      .get_resolved_for_equipment(equipment_type)
      .await
      .into_iter()
      .map(|r| r.mode)
      .collect()
  }

  /// Like [`Self::get_failure_modes_for_equipment`], with each entry tagged
  /// by the partition it came from.
  pub async fn get_resolved_for_equipment(
    &self,
    equipment_type: &str,
  ) -> Vec<ResolvedFailureMode> {
    let custom = self.custom.lock().await;
    let mut resolved = Vec::new();
    for (partition, origin) in
      [(&self.defaults, Origin::Default), (&*custom, Origin::Custom)]
    {
      if let Some(modes) = partition.get(equipment_type) {
        resolved.extend(
          modes
            .iter()
            .map(|m| ResolvedFailureMode { mode: m.clone(), origin }),
        );
      }
    }
    resolved
  }

  /// First entry with `id` under `equipment_type`, in merged order.
  pub async fn find_failure_mode(
    &self,
    equipment_type: &str,
    id: &str,
  ) -> Option<ResolvedFailureMode> {
    self
      .get_resolved_for_equipment(equipment_type)
      .await
      .into_iter()
      .find(|r| r.mode.id == id)
  }

  /// Every equipment type present in either partition.
  pub async fn equipment_types(&self) -> Vec<String> {
    self.get_all_failure_modes().await.into_keys().collect()
  }

  /// Case-insensitive substring search over description, causes and effects
  /// across the merged set.
  pub async fn search_failure_modes(&self, query: &str) -> Vec<FailureMode> {
    let needle = query.to_lowercase();
    self
      .get_all_failure_modes()
      .await
      .into_values()
      .flatten()
      .filter(|m| m.matches_lowercase(&needle))
      .collect()
  }

  pub async fn get_statistics(&self) -> FailureModeStatistics {
    let custom = self.custom.lock().await;
    let count = |map: &FailureModeMap| map.values().map(Vec::len).sum::<usize>();

    let default_failure_modes = count(&self.defaults);
    let custom_failure_modes = count(&*custom);
    let total_equipment_types = self
      .defaults
      .keys()
      .chain(custom.keys().filter(|k| !self.defaults.contains_key(*k)))
      .count();

    FailureModeStatistics {
      total_equipment_types,
      total_failure_modes: default_failure_modes + custom_failure_modes,
      custom_failure_modes,
      default_failure_modes,
    }
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  /// Append `mode` to the overlay for `equipment_type`.
  ///
  /// No uniqueness check is made; see [`FailureMode::generate_id`].
  pub async fn add_failure_mode(
    &self,
    equipment_type: &str,
    mode: FailureMode,
  ) -> Result<()> {
    let id = mode.id.clone();
    self
      .mutate(|custom| {
        custom.entry(equipment_type.to_owned()).or_default().push(mode);
        ((), true)
      })
      .await?;
    info!(equipment_type, id = %id, "custom failure mode added");
    Ok(())
  }

  /// Replace the custom entry with `id`. Default-only entries are left alone.
  pub async fn update_failure_mode(
    &self,
    equipment_type: &str,
    id: &str,
    updated: FailureMode,
  ) -> Result<MutationOutcome> {
    let outcome = self
      .mutate(|custom| {
        let slot = custom
          .get_mut(equipment_type)
          .and_then(|list| list.iter_mut().find(|m| m.id == id));
        match slot {
          Some(slot) => {
            *slot = updated;
            (MutationOutcome::Applied, true)
          }
          None => (self.miss(equipment_type, id), false),
        }
      })
      .await?;
    debug!(equipment_type, id, ?outcome, "update failure mode");
    Ok(outcome)
  }

  /// Remove the custom entry with `id`, dropping the equipment type from the
  /// overlay once its list is empty. Default-only entries are left alone.
  pub async fn delete_failure_mode(
    &self,
    equipment_type: &str,
    id: &str,
  ) -> Result<MutationOutcome> {
    let outcome = self
      .mutate(|custom| {
        let Some(list) = custom.get_mut(equipment_type) else {
          return (self.miss(equipment_type, id), false);
        };
        let Some(pos) = list.iter().position(|m| m.id == id) else {
          return (self.miss(equipment_type, id), false);
        };
        list.remove(pos);
        if list.is_empty() {
          custom.remove(equipment_type);
        }
        (MutationOutcome::Applied, true)
      })
      .await?;
    debug!(equipment_type, id, ?outcome, "delete failure mode");
    Ok(outcome)
  }

  /// Discard the whole custom overlay. Irreversible.
  pub async fn reset_to_factory_defaults(&self) -> Result<()> {
    let removed = self
      .mutate(|custom| {
        let removed = custom.values().map(Vec::len).sum::<usize>();
        custom.clear();
        (removed, true)
      })
      .await?;
    warn!(removed, "custom failure modes reset to factory defaults");
    Ok(())
  }

  // ── Import / export ───────────────────────────────────────────────────────

  /// The merged map as pretty-printed JSON: `{ "<type>": [FailureMode] }`.
  pub async fn export_failure_modes(&self) -> Result<String> {
    let merged = self.get_all_failure_modes().await;
    Ok(serde_json::to_string_pretty(&merged)?)
  }

  /// Replace the custom overlay with the map parsed from `data`.
  ///
  /// A list that starts with the built-in list of its equipment type (as
  /// every export does) has that prefix removed before it becomes the
  /// overlay, so importing an export restores the state that was exported. Returns `Ok(false)` and leaves the overlay untouched when
  /// `data` does not parse; store failures are returned as errors.
  pub async fn import_failure_modes(&self, data: &str) -> Result<bool> {
    let parsed: FailureModeMap = match serde_json::from_str(data) {
      Ok(map) => map,
      Err(e) => {
        warn!(error = %e, "failure mode import rejected");
        return Ok(false);
      }
    };

    let overlay = self.strip_builtin(parsed);
    let imported = overlay.values().map(Vec::len).sum::<usize>();
    self
      .mutate(|custom| {
        *custom = overlay;
        ((), true)
      })
      .await?;
    info!(imported, "custom failure modes imported");
    Ok(true)
  }

  // ── Internals ─────────────────────────────────────────────────────────────

  /// Run `op` against the overlay under the lock and persist if it reports a
  /// change. The overlay is restored if persisting fails.
  async fn mutate<T>(
    &self,
    op: impl FnOnce(&mut FailureModeMap) -> (T, bool),
  ) -> Result<T> {
    let mut custom = self.custom.lock().await;
    let previous = custom.clone();
    let (value, changed) = op(&mut *custom);
    if changed && let Err(e) = self.persist(&custom).await {
      error!(error = %e, "persisting custom failure modes failed; rolled back");
      *custom = previous;
      return Err(e);
    }
    Ok(value)
  }

  async fn persist(&self, custom: &FailureModeMap) -> Result<()> {
    let json = serde_json::to_string(custom)?;
    self
      .store
      .set(CUSTOM_FAILURE_MODES_KEY, json)
      .await
      .map_err(|e| Error::Store(Box::new(e)))
  }

  /// Classify an id that was not found in the overlay.
  fn miss(&self, equipment_type: &str, id: &str) -> MutationOutcome {
    let in_defaults = self
      .defaults
      .get(equipment_type)
      .is_some_and(|list| list.iter().any(|m| m.id == id));
    if in_defaults {
      MutationOutcome::NotCustom
    } else {
      MutationOutcome::NotFound
    }
  }

  /// Drop the built-in list from the front of each imported list when it is
  /// present there verbatim. Everything after it stays, duplicates included.
  fn strip_builtin(&self, mut map: FailureModeMap) -> FailureModeMap {
    for (equipment_type, modes) in map.iter_mut() {
      if let Some(builtin) = self.defaults.get(equipment_type)
        && modes.starts_with(builtin)
      {
        modes.drain(..builtin.len());
      }
    }
    map.retain(|_, modes| !modes.is_empty());
    map
  }
}

fn merge(defaults: &FailureModeMap, custom: &FailureModeMap) -> FailureModeMap {
  let mut merged = defaults.clone();
  for (equipment_type, modes) in custom {
    merged
      .entry(equipment_type.clone())
      .or_default()
      .extend(modes.iter().cloned());
  }
  merged
}

async fn load_custom<S: KeyValueStore>(store: &S) -> FailureModeMap {
  match store.get(CUSTOM_FAILURE_MODES_KEY).await {
    Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
      warn!(error = %e, "stored custom failure modes are corrupted; ignoring them");
      FailureModeMap::new()
    }),
    Ok(None) => FailureModeMap::new(),
    Err(e) => {
      warn!(error = %e, "reading custom failure modes failed; starting empty");
      FailureModeMap::new()
    }
  }
}
