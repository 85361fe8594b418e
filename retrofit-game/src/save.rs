//! Save persistence over a platform key-value slot store.
//!
//! The platform supplies the raw slot store (browser local storage, a file,
//! an in-memory map); [`SaveManager`] owns the fixed keys, the payload
//! format, and the backup mirror. Persistence failures degrade gracefully:
//! a corrupt save reads as "no save" and a write failure is reported to the
//! caller, never thrown past it.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Catalog;
use crate::economy::Economy;
use crate::ledger::TransactionLog;
use crate::vehicle::Vehicle;

/// Primary slot key for the game save.
pub const SAVE_KEY: &str = "retrofit.save";
/// Secondary slot key mirroring the primary for recovery.
pub const BACKUP_KEY: &str = "retrofit.save.backup";

/// Trait for abstracting the platform slot store.
/// Platform-specific implementations should provide this.
pub trait KeyValueStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Remove `key`. Removing an absent key is a success.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), Self::Error>;
}

/// In-memory [`KeyValueStore`] for tests and headless sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: std::collections::HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    type Error = std::convert::Infallible;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Self::Error> {
        self.slots.remove(key);
        Ok(())
    }
}

/// Failures of the persistence gateway.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save payload could not be serialized: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("storage access failed: {0}")]
    Storage(#[source] anyhow::Error),
    #[error("imported payload is not a valid save")]
    InvalidShape,
}

/// The durable snapshot of a session. Wire field names match the payloads
/// written by earlier builds of the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub budget: i64,
    pub garage: Vec<Vehicle>,
    #[serde(rename = "transactionHistory", default)]
    pub transaction_history: TransactionLog,
    pub timestamp: DateTime<Utc>,
}

impl SaveData {
    /// Snapshot the persistable parts of an economy, stamped with the
    /// current time.
    #[must_use]
    pub fn capture(economy: &Economy) -> Self {
        Self {
            budget: economy.budget(),
            garage: economy.garage().to_vec(),
            transaction_history: economy.ledger().clone(),
            timestamp: Utc::now(),
        }
    }

    /// Rebuild a running economy from this snapshot and a session catalog.
    #[must_use]
    pub fn into_economy(self, catalog: Catalog) -> Economy {
        Economy::resume(catalog, self.budget, self.garage, self.transaction_history)
    }
}

/// Metadata about the stored save, for display before loading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveInfo {
    pub timestamp: DateTime<Utc>,
    pub budget: i64,
    pub garage_size: usize,
    pub data_size: usize,
}

/// Persistence gateway bound to one slot store.
///
/// All operations take `&mut self`, so every save, load, and import is
/// serialized against every other one by construction; a multi-threaded
/// host gets the single-flight contract for free by wrapping the manager in
/// its lock of choice.
#[derive(Debug)]
pub struct SaveManager<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> SaveManager<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Write the snapshot to the primary slot.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the storage write fails.
    pub fn save(&mut self, data: &SaveData) -> Result<(), SaveError> {
        let payload = serde_json::to_string(data)?;
        self.store
            .set(SAVE_KEY, &payload)
            .map_err(|err| SaveError::Storage(anyhow::Error::new(err)))?;
        log::debug!("saved game ({} bytes)", payload.len());
        Ok(())
    }

    /// Read the primary slot. A missing key, an unreadable store, or a
    /// corrupt payload all read as "no valid save"; the caller falls back to
    /// a fresh state.
    pub fn load(&mut self) -> Option<SaveData> {
        let payload = match self.store.get(SAVE_KEY) {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(err) => {
                log::warn!("save slot could not be read: {err}");
                return None;
            }
        };
        match serde_json::from_str(&payload) {
            Ok(data) => Some(data),
            Err(err) => {
                log::warn!("save slot held an unreadable payload: {err}");
                None
            }
        }
    }

    /// Whether the primary slot holds any payload (valid or not).
    pub fn has_save(&mut self) -> bool {
        matches!(self.store.get(SAVE_KEY), Ok(Some(_)))
    }

    /// Remove the primary slot. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    pub fn clear(&mut self) -> Result<(), SaveError> {
        self.store
            .remove(SAVE_KEY)
            .map_err(|err| SaveError::Storage(anyhow::Error::new(err)))
    }

    /// Raw serialized save content for external backup, `None` when no save
    /// exists.
    pub fn export_snapshot(&mut self) -> Option<String> {
        match self.store.get(SAVE_KEY) {
            Ok(payload) => payload,
            Err(err) => {
                log::warn!("save slot could not be exported: {err}");
                None
            }
        }
    }

    /// Validate and commit an externally supplied payload. The shape check
    /// requires a `budget` number and a `garage` sequence; anything else is
    /// rejected without touching the existing save.
    ///
    /// # Errors
    ///
    /// `InvalidShape` when the payload fails validation, `Storage` when the
    /// commit fails.
    pub fn import_snapshot(&mut self, payload: &str) -> Result<(), SaveError> {
        let value: serde_json::Value = match serde_json::from_str(payload) {
            Ok(value) => value,
            Err(_) => return Err(SaveError::InvalidShape),
        };
        let budget_present = value.get("budget").is_some_and(serde_json::Value::is_number);
        let garage_is_sequence = value.get("garage").is_some_and(serde_json::Value::is_array);
        if !budget_present || !garage_is_sequence {
            return Err(SaveError::InvalidShape);
        }
        self.store
            .set(SAVE_KEY, payload)
            .map_err(|err| SaveError::Storage(anyhow::Error::new(err)))
    }

    /// Metadata about the stored save, `None` when absent or unreadable.
    pub fn save_info(&mut self) -> Option<SaveInfo> {
        let payload = self.export_snapshot()?;
        let data: SaveData = serde_json::from_str(&payload).ok()?;
        Some(SaveInfo {
            timestamp: data.timestamp,
            budget: data.budget,
            garage_size: data.garage.len(),
            data_size: payload.len(),
        })
    }

    /// Mirror the snapshot into the backup slot.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the storage write fails.
    pub fn backup(&mut self, data: &SaveData) -> Result<(), SaveError> {
        let payload = serde_json::to_string(data)?;
        self.store
            .set(BACKUP_KEY, &payload)
            .map_err(|err| SaveError::Storage(anyhow::Error::new(err)))
    }

    /// Copy the backup slot over the primary. Returns whether a backup was
    /// applied; a missing backup or a storage failure reads as `false`.
    pub fn restore_from_backup(&mut self) -> bool {
        let payload = match self.store.get(BACKUP_KEY) {
            Ok(Some(payload)) => payload,
            Ok(None) => return false,
            Err(err) => {
                log::warn!("backup slot could not be read: {err}");
                return false;
            }
        };
        match self.store.set(SAVE_KEY, &payload) {
            Ok(()) => {
                log::info!("restored save from backup slot");
                true
            }
            Err(err) => {
                log::warn!("backup could not be applied: {err}");
                false
            }
        }
    }

    /// Consume the manager and hand the slot store back.
    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    /// Store whose writes always fail, for error-path coverage.
    #[derive(Debug, Default)]
    struct BrokenStore;

    #[derive(Debug)]
    struct BrokenStoreError;

    impl fmt::Display for BrokenStoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("slot store is broken")
        }
    }

    impl std::error::Error for BrokenStoreError {}

    impl KeyValueStore for BrokenStore {
        type Error = BrokenStoreError;

        fn get(&self, _key: &str) -> Result<Option<String>, Self::Error> {
            Err(BrokenStoreError)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), Self::Error> {
            Err(BrokenStoreError)
        }

        fn remove(&mut self, _key: &str) -> Result<(), Self::Error> {
            Err(BrokenStoreError)
        }
    }

    fn sample_save() -> SaveData {
        let mut economy = Economy::new(Catalog::fallback());
        economy.buy("car_01").unwrap();
        SaveData::capture(&economy)
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut saves = SaveManager::new(MemoryStore::default());
        let data = sample_save();
        saves.save(&data).unwrap();

        assert!(saves.has_save());
        let loaded = saves.load().unwrap();
        assert_eq!(loaded, data);
    }

    #[test]
    fn load_without_save_is_none() {
        let mut saves = SaveManager::new(MemoryStore::default());
        assert!(saves.load().is_none());
        assert!(!saves.has_save());
    }

    #[test]
    fn corrupt_payload_reads_as_no_save() {
        let mut store = MemoryStore::default();
        store.set(SAVE_KEY, "{not json").unwrap();
        let mut saves = SaveManager::new(store);

        assert!(saves.has_save());
        assert!(saves.load().is_none());
    }

    #[test]
    fn clear_is_idempotent() {
        let mut saves = SaveManager::new(MemoryStore::default());
        saves.save(&sample_save()).unwrap();
        saves.clear().unwrap();
        assert!(!saves.has_save());
        saves.clear().unwrap();
    }

    #[test]
    fn export_import_round_trips() {
        let mut saves = SaveManager::new(MemoryStore::default());
        let data = sample_save();
        saves.save(&data).unwrap();
        let exported = saves.export_snapshot().unwrap();

        saves.clear().unwrap();
        assert!(saves.export_snapshot().is_none());

        saves.import_snapshot(&exported).unwrap();
        assert_eq!(saves.load().unwrap(), data);
    }

    #[test]
    fn import_rejects_malformed_shapes() {
        let mut saves = SaveManager::new(MemoryStore::default());
        saves.save(&sample_save()).unwrap();
        let good = saves.export_snapshot().unwrap();

        for bad in [
            "{not json",
            r#"{"garage": []}"#,
            r#"{"budget": 100}"#,
            r#"{"budget": "lots", "garage": []}"#,
            r#"{"budget": 100, "garage": {}}"#,
        ] {
            assert!(matches!(
                saves.import_snapshot(bad),
                Err(SaveError::InvalidShape)
            ));
        }
        // existing save untouched
        assert_eq!(saves.export_snapshot().unwrap(), good);
    }

    #[test]
    fn import_accepts_zero_budget() {
        let mut saves = SaveManager::new(MemoryStore::default());
        saves
            .import_snapshot(
                r#"{"budget": 0, "garage": [], "transactionHistory": [],
                    "timestamp": "2026-08-08T00:00:00Z"}"#,
            )
            .unwrap();
        assert_eq!(saves.load().unwrap().budget, 0);
    }

    #[test]
    fn backup_restores_over_corrupt_primary() {
        let mut saves = SaveManager::new(MemoryStore::default());
        let data = sample_save();
        saves.save(&data).unwrap();
        saves.backup(&data).unwrap();

        // clobber the primary
        let mut store = saves.into_store();
        store.set(SAVE_KEY, "garbage").unwrap();
        let mut saves = SaveManager::new(store);
        assert!(saves.load().is_none());

        assert!(saves.restore_from_backup());
        assert_eq!(saves.load().unwrap(), data);
    }

    #[test]
    fn restore_without_backup_is_false() {
        let mut saves = SaveManager::new(MemoryStore::default());
        assert!(!saves.restore_from_backup());
    }

    #[test]
    fn broken_store_reports_instead_of_panicking() {
        let mut saves = SaveManager::new(BrokenStore);
        assert!(matches!(
            saves.save(&sample_save()),
            Err(SaveError::Storage(_))
        ));
        assert!(saves.load().is_none());
        assert!(saves.export_snapshot().is_none());
        assert!(!saves.restore_from_backup());
        assert!(saves.save_info().is_none());
    }

    #[test]
    fn save_info_reports_stored_metadata() {
        let mut saves = SaveManager::new(MemoryStore::default());
        let data = sample_save();
        saves.save(&data).unwrap();

        let info = saves.save_info().unwrap();
        assert_eq!(info.budget, data.budget);
        assert_eq!(info.garage_size, 1);
        assert!(info.data_size > 0);
    }
}
