//! Vehicle records and upgradeable parts.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{CONDITION_MAX, LEVEL_MAX, LEVEL_MIN};

/// Subsystems that can be upgraded in the workshop.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Part {
    Engine,
    Tires,
    Suspension,
}

impl Part {
    /// Get the translation key for this part
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Engine => "vehicle.parts.engine",
            Self::Tires => "vehicle.parts.tires",
            Self::Suspension => "vehicle.parts.suspension",
        }
    }
}

/// Paint color stored as an RGB hex string (`#RRGGBB`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaintColor(String);

impl PaintColor {
    #[must_use]
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode into RGB components when the value is a well-formed `#RRGGBB`
    /// string.
    #[must_use]
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        let hex = self.0.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some((r, g, b))
    }
}

impl From<&str> for PaintColor {
    fn from(hex: &str) -> Self {
        Self::new(hex)
    }
}

impl fmt::Display for PaintColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One vehicle: base stats plus current condition and upgrade levels.
///
/// Wire field names follow the catalog/save JSON produced by earlier builds,
/// so stored saves stay readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub price_base: i64,
    pub buy_price: i64,
    /// Wear percentage 0-100; restoring resets it to 100
    pub condition: u8,
    #[serde(rename = "baseTopSpeed")]
    pub base_top_speed: i64,
    #[serde(rename = "baseAcceleration")]
    pub base_acceleration: i64,
    #[serde(rename = "baseHandling")]
    pub base_handling: i64,
    #[serde(rename = "engineLevel", default = "Vehicle::default_level")]
    pub engine_level: u8,
    #[serde(rename = "tiresLevel", default = "Vehicle::default_level")]
    pub tires_level: u8,
    #[serde(rename = "suspensionLevel", default = "Vehicle::default_level")]
    pub suspension_level: u8,
    #[serde(default = "Vehicle::default_paint")]
    pub paint: PaintColor,
}

impl Vehicle {
    const fn default_level() -> u8 {
        LEVEL_MIN
    }

    fn default_paint() -> PaintColor {
        PaintColor::new("#FFFFFF")
    }

    /// Current level of the given part.
    #[must_use]
    pub const fn level_of(&self, part: Part) -> u8 {
        match part {
            Part::Engine => self.engine_level,
            Part::Tires => self.tires_level,
            Part::Suspension => self.suspension_level,
        }
    }

    /// Set the level of the given part, clamped within valid bounds.
    pub const fn set_level(&mut self, part: Part, level: u8) {
        let clamped = clamp_level(level);
        match part {
            Part::Engine => self.engine_level = clamped,
            Part::Tires => self.tires_level = clamped,
            Part::Suspension => self.suspension_level = clamped,
        }
    }

    /// Set the wear condition, clamped to the valid percentage range.
    pub fn set_condition(&mut self, condition: u8) {
        self.condition = condition.min(CONDITION_MAX);
    }

    /// Bring the vehicle back to pristine condition.
    pub fn restore(&mut self) {
        self.condition = CONDITION_MAX;
    }

    /// Sum of upgrade steps above stock across all parts.
    #[must_use]
    pub fn total_upgrades(&self) -> u8 {
        [self.engine_level, self.tires_level, self.suspension_level]
            .into_iter()
            .map(|level| level.saturating_sub(LEVEL_MIN))
            .sum()
    }

    /// Force all fields back inside their invariant ranges. Catalog and save
    /// payloads are clamped on entry so the math never sees wild values.
    pub fn clamp(&mut self) {
        self.condition = self.condition.min(CONDITION_MAX);
        self.engine_level = clamp_level(self.engine_level);
        self.tires_level = clamp_level(self.tires_level);
        self.suspension_level = clamp_level(self.suspension_level);
    }
}

const fn clamp_level(level: u8) -> u8 {
    if level < LEVEL_MIN {
        LEVEL_MIN
    } else if level > LEVEL_MAX {
        LEVEL_MAX
    } else {
        level
    }
}
