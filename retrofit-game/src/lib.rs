//! Retrofit Game Engine
//!
//! Platform-agnostic core game logic for the Retrofit vehicle-workshop
//! simulation. This crate provides the vehicle economy, derived statistics,
//! and save persistence without UI or platform-specific dependencies.

pub mod autosave;
pub mod catalog;
pub mod constants;
pub mod economy;
pub mod ledger;
pub mod numbers;
pub mod save;
pub mod stats;
pub mod vehicle;

// Re-export commonly used types
pub use autosave::Autosave;
pub use catalog::{Catalog, CatalogOutcome, CatalogSource, load_or_fallback};
pub use constants::{CONDITION_MAX, LEVEL_MAX, LEVEL_MIN, STARTING_BUDGET};
pub use economy::{Economy, EconomyError, ModificationPlan};
pub use ledger::{Transaction, TransactionKind, TransactionLog};
pub use save::{
    BACKUP_KEY, KeyValueStore, MemoryStore, SAVE_KEY, SaveData, SaveError, SaveInfo, SaveManager,
};
pub use stats::{
    VehicleStats, acceleration, handling, repaint_cost, restoration_cost, sell_price, top_speed,
    upgrade_cost, vehicle_stats,
};
pub use vehicle::{PaintColor, Part, Vehicle};

use std::time::Duration;

/// Trait for abstracting catalog loading operations
/// Platform-specific implementations should provide this
pub trait CatalogLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the vehicle catalog from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    fn load_catalog(&self) -> Result<Catalog, Self::Error>;
}

/// Main game engine wiring the catalog source and the save store.
///
/// The engine hands out an [`Economy`] for the presentation layer to drive
/// and funnels every persistence call through one [`SaveManager`], keeping
/// saves serialized with the autosave cadence.
pub struct GameEngine<L, S>
where
    L: CatalogLoader,
    S: KeyValueStore,
{
    loader: L,
    saves: SaveManager<S>,
    autosave: Autosave,
}

impl<L, S> GameEngine<L, S>
where
    L: CatalogLoader,
    S: KeyValueStore,
{
    /// Create a new game engine with the provided catalog loader and store
    pub const fn new(loader: L, store: S) -> Self {
        Self {
            loader,
            saves: SaveManager::new(store),
            autosave: Autosave::new(constants::AUTOSAVE_INTERVAL),
        }
    }

    /// Start a session: resume from a stored save when one loads cleanly,
    /// otherwise seed a fresh economy from the catalog (or its fallback).
    /// A corrupt primary save is recovered from the backup slot when
    /// possible before giving up on it.
    pub fn start_session(&mut self) -> (Economy, CatalogSource) {
        let outcome = catalog::load_or_fallback(&self.loader);

        let mut save = self.saves.load();
        if save.is_none() && self.saves.has_save() && self.saves.restore_from_backup() {
            save = self.saves.load();
        }

        let economy = match save {
            Some(data) => data.into_economy(outcome.catalog),
            None => Economy::new(outcome.catalog),
        };
        (economy, outcome.source)
    }

    /// Persist the session to the primary slot and mirror it to the backup
    /// slot, re-arming the autosave interval.
    ///
    /// # Errors
    ///
    /// Returns an error when the primary write fails; a failed backup mirror
    /// is logged but does not fail the save.
    pub fn save_session(&mut self, economy: &Economy) -> Result<(), SaveError> {
        let data = SaveData::capture(economy);
        self.saves.save(&data)?;
        if let Err(err) = self.saves.backup(&data) {
            log::warn!("backup mirror failed: {err}");
        }
        self.autosave.mark_saved();
        Ok(())
    }

    /// Feed elapsed time to the autosave policy; performs a save when one
    /// is due. Returns `None` when no save was attempted.
    pub fn autosave_tick(
        &mut self,
        economy: &Economy,
        elapsed: Duration,
    ) -> Option<Result<(), SaveError>> {
        if !self.autosave.tick(elapsed) {
            return None;
        }
        Some(self.save_session(economy))
    }

    /// Reset the session to its seeded state and drop the stored save.
    ///
    /// # Errors
    ///
    /// Returns an error when the stored save cannot be removed; the
    /// in-memory reset has already happened by then.
    pub fn reset_session(&mut self, economy: &mut Economy) -> Result<(), SaveError> {
        economy.reset();
        self.saves.clear()
    }

    /// Direct access to the persistence gateway (export/import, save info).
    pub fn saves(&mut self) -> &mut SaveManager<S> {
        &mut self.saves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[derive(Clone, Copy, Default)]
    struct FixtureLoader;

    impl CatalogLoader for FixtureLoader {
        type Error = Infallible;

        fn load_catalog(&self) -> Result<Catalog, Self::Error> {
            Ok(Catalog::fallback())
        }
    }

    #[derive(Clone, Copy, Default)]
    struct UnreachableLoader;

    impl CatalogLoader for UnreachableLoader {
        type Error = std::io::Error;

        fn load_catalog(&self) -> Result<Catalog, Self::Error> {
            Err(std::io::Error::other("catalog host unreachable"))
        }
    }

    #[test]
    fn engine_round_trips_a_session() {
        let mut engine = GameEngine::new(FixtureLoader, MemoryStore::default());
        let (mut economy, source) = engine.start_session();
        assert_eq!(source, CatalogSource::Loaded);

        economy.buy("car_01").unwrap();
        engine.save_session(&economy).unwrap();

        let (resumed, _) = engine.start_session();
        assert_eq!(resumed.budget(), economy.budget());
        assert!(resumed.vehicle_in_garage("car_01").is_some());
        assert!(resumed.available_vehicle("car_01").is_none());
    }

    #[test]
    fn failed_catalog_load_starts_on_fallback() {
        let mut engine = GameEngine::new(UnreachableLoader, MemoryStore::default());
        let (economy, source) = engine.start_session();
        assert_eq!(source, CatalogSource::Fallback);
        assert_eq!(economy.available().len(), 3);
    }

    #[test]
    fn corrupt_primary_recovers_from_backup() {
        let mut economy = Economy::new(Catalog::fallback());
        economy.buy("car_03").unwrap();
        let data = SaveData::capture(&economy);

        let mut store = MemoryStore::default();
        store.set(SAVE_KEY, "garbage").unwrap();
        store
            .set(BACKUP_KEY, &serde_json::to_string(&data).unwrap())
            .unwrap();

        let mut engine = GameEngine::new(FixtureLoader, store);
        let (resumed, _) = engine.start_session();
        assert_eq!(resumed.budget(), economy.budget());
        assert!(resumed.vehicle_in_garage("car_03").is_some());
    }

    #[test]
    fn autosave_fires_on_cadence_and_explicit_save_defers_it() {
        let mut engine = GameEngine::new(FixtureLoader, MemoryStore::default());
        let (economy, _) = engine.start_session();

        assert!(engine.autosave_tick(&economy, Duration::from_secs(10)).is_none());
        engine.save_session(&economy).unwrap();
        assert!(engine.autosave_tick(&economy, Duration::from_secs(25)).is_none());
        let result = engine.autosave_tick(&economy, Duration::from_secs(5));
        assert!(matches!(result, Some(Ok(()))));
        assert!(engine.autosave_tick(&economy, Duration::from_secs(1)).is_none());
    }

    #[test]
    fn reset_session_clears_save_and_state() {
        let mut engine = GameEngine::new(FixtureLoader, MemoryStore::default());
        let (mut economy, _) = engine.start_session();
        economy.buy("car_01").unwrap();
        engine.save_session(&economy).unwrap();

        engine.reset_session(&mut economy).unwrap();
        assert_eq!(economy.budget(), STARTING_BUDGET);
        assert!(economy.garage().is_empty());
        assert!(!engine.saves().has_save());
    }
}
