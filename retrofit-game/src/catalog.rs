//! Vehicle catalog loading with a built-in fallback.
use serde::{Deserialize, Serialize};

use crate::CatalogLoader;
use crate::vehicle::{PaintColor, Vehicle};

/// Where the session catalog came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    /// Supplied by the platform loader.
    Loaded,
    /// Built-in default used when the loader failed.
    Fallback,
}

/// The set of vehicles offered to the player at session start.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    vehicles: Vec<Vehicle>,
}

impl Catalog {
    /// Create empty catalog data (useful for tests)
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a catalog from pre-parsed vehicles, clamping each record into
    /// its invariant ranges.
    #[must_use]
    pub fn from_vehicles(mut vehicles: Vec<Vehicle>) -> Self {
        for vehicle in &mut vehicles {
            vehicle.clamp();
        }
        Self { vehicles }
    }

    /// Load catalog data from a JSON array of vehicles.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid vehicle
    /// records.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let vehicles: Vec<Vehicle> = serde_json::from_str(json)?;
        Ok(Self::from_vehicles(vehicles))
    }

    /// The built-in default catalog used when no external source is
    /// reachable.
    #[must_use]
    pub fn fallback() -> Self {
        Self::from_vehicles(vec![
            Vehicle {
                id: "car_01".to_string(),
                name: "Fusca 1970".to_string(),
                image: "car_01.png".to_string(),
                price_base: 5_000,
                buy_price: 2_000,
                condition: 45,
                base_top_speed: 120,
                base_acceleration: 8,
                base_handling: 6,
                engine_level: 1,
                tires_level: 1,
                suspension_level: 1,
                paint: PaintColor::new("#FF0000"),
            },
            Vehicle {
                id: "car_02".to_string(),
                name: "Kombi 1985".to_string(),
                image: "car_02.png".to_string(),
                price_base: 8_000,
                buy_price: 3_500,
                condition: 60,
                base_top_speed: 100,
                base_acceleration: 6,
                base_handling: 5,
                engine_level: 1,
                tires_level: 1,
                suspension_level: 1,
                paint: PaintColor::new("#00FF00"),
            },
            Vehicle {
                id: "car_03".to_string(),
                name: "Brasília 1980".to_string(),
                image: "car_03.png".to_string(),
                price_base: 4_000,
                buy_price: 1_500,
                condition: 30,
                base_top_speed: 110,
                base_acceleration: 7,
                base_handling: 7,
                engine_level: 1,
                tires_level: 1,
                suspension_level: 1,
                paint: PaintColor::new("#0000FF"),
            },
        ])
    }

    #[must_use]
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|vehicle| vehicle.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}

/// Outcome of the startup catalog load: always a usable catalog, plus where
/// it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogOutcome {
    pub catalog: Catalog,
    pub source: CatalogSource,
}

/// Ask the platform loader for the catalog, falling back to the built-in
/// default when the load fails or yields nothing. Sessions are only ever
/// constructed from a complete outcome, so callers cannot observe a
/// half-initialized vehicle pool.
pub fn load_or_fallback<L: CatalogLoader>(loader: &L) -> CatalogOutcome {
    match loader.load_catalog() {
        Ok(catalog) if !catalog.is_empty() => CatalogOutcome {
            catalog,
            source: CatalogSource::Loaded,
        },
        Ok(_) => {
            log::warn!("catalog source returned no vehicles, using fallback catalog");
            CatalogOutcome {
                catalog: Catalog::fallback(),
                source: CatalogSource::Fallback,
            }
        }
        Err(err) => {
            log::warn!("catalog load failed ({err}), using fallback catalog");
            CatalogOutcome {
                catalog: Catalog::fallback(),
                source: CatalogSource::Fallback,
            }
        }
    }
}
