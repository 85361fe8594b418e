//! Derived vehicle statistics and workshop pricing.
//!
//! Every function here is a pure view over a [`Vehicle`]: condition and
//! upgrade levels scale the base figures, and rounding happens once at the
//! end of each formula.
use serde::{Deserialize, Serialize};

use crate::constants::{
    CONDITION_MAX, ENGINE_ACCEL_STEP, ENGINE_SPEED_STEP, ENGINE_UPGRADE_RATE, LEVEL_MIN,
    REPAINT_RATE, RESTORATION_RATE, SELL_UPGRADE_BONUS, SUSPENSION_UPGRADE_RATE,
    TIRES_HANDLING_STEP, TIRES_UPGRADE_RATE,
};
use crate::numbers::{i64_to_f64, round_f64_to_i64};
use crate::vehicle::{Part, Vehicle};

/// Snapshot of everything the presentation layer shows on a vehicle card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleStats {
    #[serde(rename = "topSpeed")]
    pub top_speed: i64,
    pub acceleration: i64,
    pub handling: i64,
    #[serde(rename = "sellPrice")]
    pub sell_price: i64,
    #[serde(rename = "restorationCost")]
    pub restoration_cost: i64,
}

/// Compute the full stat card for a vehicle.
#[must_use]
pub fn vehicle_stats(vehicle: &Vehicle) -> VehicleStats {
    VehicleStats {
        top_speed: top_speed(vehicle),
        acceleration: acceleration(vehicle),
        handling: handling(vehicle),
        sell_price: sell_price(vehicle),
        restoration_cost: restoration_cost(vehicle),
    }
}

/// Effective top speed after engine upgrades and wear.
#[must_use]
pub fn top_speed(vehicle: &Vehicle) -> i64 {
    round_f64_to_i64(
        i64_to_f64(vehicle.base_top_speed)
            * upgrade_factor(vehicle.engine_level, ENGINE_SPEED_STEP)
            * condition_factor(vehicle),
    )
}

/// Effective acceleration after engine upgrades and wear.
#[must_use]
pub fn acceleration(vehicle: &Vehicle) -> i64 {
    round_f64_to_i64(
        i64_to_f64(vehicle.base_acceleration)
            * upgrade_factor(vehicle.engine_level, ENGINE_ACCEL_STEP)
            * condition_factor(vehicle),
    )
}

/// Effective handling after tire upgrades and wear.
#[must_use]
pub fn handling(vehicle: &Vehicle) -> i64 {
    round_f64_to_i64(
        i64_to_f64(vehicle.base_handling)
            * upgrade_factor(vehicle.tires_level, TIRES_HANDLING_STEP)
            * condition_factor(vehicle),
    )
}

/// Cost of restoring the vehicle to pristine condition. Zero when the
/// vehicle is already at full condition.
#[must_use]
pub fn restoration_cost(vehicle: &Vehicle) -> i64 {
    let missing = f64::from(CONDITION_MAX) - f64::from(vehicle.condition.min(CONDITION_MAX));
    round_f64_to_i64(missing * i64_to_f64(vehicle.price_base) / 100.0 * RESTORATION_RATE)
}

/// Resale price: purchase price scaled by wear, with a bonus per upgrade
/// step above stock.
#[must_use]
pub fn sell_price(vehicle: &Vehicle) -> i64 {
    let upgrade_bonus = 1.0 + SELL_UPGRADE_BONUS * f64::from(vehicle.total_upgrades());
    round_f64_to_i64(i64_to_f64(vehicle.buy_price) * condition_factor(vehicle) * upgrade_bonus)
}

/// Cost of raising a part to `new_level`. Negative when `new_level` is below
/// the current level; callers reject downgrades before charging.
#[must_use]
pub fn upgrade_cost(vehicle: &Vehicle, part: Part, new_level: u8) -> i64 {
    let rate = match part {
        Part::Engine => ENGINE_UPGRADE_RATE,
        Part::Tires => TIRES_UPGRADE_RATE,
        Part::Suspension => SUSPENSION_UPGRADE_RATE,
    };
    let increment = f64::from(new_level) - f64::from(vehicle.level_of(part));
    round_f64_to_i64(i64_to_f64(vehicle.price_base) * rate * increment)
}

/// Flat repaint cost derived from the vehicle's base price.
#[must_use]
pub fn repaint_cost(vehicle: &Vehicle) -> i64 {
    round_f64_to_i64(i64_to_f64(vehicle.price_base) * REPAINT_RATE)
}

fn condition_factor(vehicle: &Vehicle) -> f64 {
    f64::from(vehicle.condition.min(CONDITION_MAX)) / f64::from(CONDITION_MAX)
}

fn upgrade_factor(level: u8, step: f64) -> f64 {
    1.0 + step * f64::from(level.saturating_sub(LEVEL_MIN))
}
