//! Centralized balance and tuning constants for Retrofit game logic.
//!
//! These values define the deterministic math for the workshop economy.
//! Keeping them together ensures that gameplay can only be adjusted via
//! code changes reviewed in version control, rather than through external
//! JSON assets.

use std::time::Duration;

// Session tuning -----------------------------------------------------------
pub const STARTING_BUDGET: i64 = 10_000;
pub const AUTOSAVE_INTERVAL: Duration = Duration::from_secs(30);

// Vehicle bounds -----------------------------------------------------------
pub const CONDITION_MAX: u8 = 100;
pub const LEVEL_MIN: u8 = 1;
pub const LEVEL_MAX: u8 = 5;

// Performance tuning -------------------------------------------------------
pub(crate) const ENGINE_SPEED_STEP: f64 = 0.08;
pub(crate) const ENGINE_ACCEL_STEP: f64 = 0.12;
pub(crate) const TIRES_HANDLING_STEP: f64 = 0.06;

// Pricing tuning -----------------------------------------------------------
pub(crate) const RESTORATION_RATE: f64 = 0.8;
pub(crate) const SELL_UPGRADE_BONUS: f64 = 0.05;
pub(crate) const ENGINE_UPGRADE_RATE: f64 = 0.10;
pub(crate) const TIRES_UPGRADE_RATE: f64 = 0.08;
pub(crate) const SUSPENSION_UPGRADE_RATE: f64 = 0.06;
pub(crate) const REPAINT_RATE: f64 = 0.05;
