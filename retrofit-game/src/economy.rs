//! Budget accounting and the vehicle trading rules.
//!
//! Every operation validates against *current* state and checks the budget
//! immediately before mutating, so a stale cost computed by the UI can never
//! overdraw the player. Business failures come back as [`EconomyError`]
//! values; nothing here panics on a bad request.
use thiserror::Error;

use crate::catalog::Catalog;
use crate::constants::{LEVEL_MAX, STARTING_BUDGET};
use crate::ledger::{TransactionKind, TransactionLog};
use crate::stats::{self, VehicleStats};
use crate::vehicle::{PaintColor, Part, Vehicle};

/// Expected business failures of economy operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EconomyError {
    #[error("vehicle not found in the expected pool")]
    NotFound,
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: i64, available: i64 },
    #[error("invalid upgrade level {requested} (current level {current})")]
    InvalidLevel { requested: u8, current: u8 },
}

/// Requested changes for one workshop "modify" action. Levels are absolute
/// targets, not deltas; `None` leaves the part untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModificationPlan {
    pub engine_level: Option<u8>,
    pub tires_level: Option<u8>,
    pub suspension_level: Option<u8>,
    pub paint: Option<PaintColor>,
}

impl ModificationPlan {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.engine_level.is_none()
            && self.tires_level.is_none()
            && self.suspension_level.is_none()
            && self.paint.is_none()
    }
}

/// The player economy: budget, vehicle pools, and the transaction ledger.
///
/// The available pool and the garage are disjoint by construction; a
/// purchase moves an independent copy out of the available pool and the
/// catalog seed stays untouched for `reset`.
#[derive(Debug, Clone, PartialEq)]
pub struct Economy {
    budget: i64,
    available: Vec<Vehicle>,
    garage: Vec<Vehicle>,
    ledger: TransactionLog,
    catalog: Catalog,
}

impl Economy {
    /// Start a fresh session seeded from the given catalog.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            budget: STARTING_BUDGET,
            available: catalog.vehicles().to_vec(),
            garage: Vec::new(),
            ledger: TransactionLog::new(),
            catalog,
        }
    }

    /// Resume a session from persisted budget, garage, and ledger. Vehicles
    /// already owned are removed from the offered pool so the two stay
    /// disjoint.
    #[must_use]
    pub fn resume(
        catalog: Catalog,
        budget: i64,
        mut garage: Vec<Vehicle>,
        ledger: TransactionLog,
    ) -> Self {
        for vehicle in &mut garage {
            vehicle.clamp();
        }
        let available = catalog
            .vehicles()
            .iter()
            .filter(|vehicle| !garage.iter().any(|owned| owned.id == vehicle.id))
            .cloned()
            .collect();
        Self {
            budget: budget.max(0),
            available,
            garage,
            ledger,
            catalog,
        }
    }

    #[must_use]
    pub const fn budget(&self) -> i64 {
        self.budget
    }

    #[must_use]
    pub fn available(&self) -> &[Vehicle] {
        &self.available
    }

    #[must_use]
    pub fn garage(&self) -> &[Vehicle] {
        &self.garage
    }

    #[must_use]
    pub const fn ledger(&self) -> &TransactionLog {
        &self.ledger
    }

    #[must_use]
    pub fn available_vehicle(&self, id: &str) -> Option<&Vehicle> {
        self.available.iter().find(|vehicle| vehicle.id == id)
    }

    #[must_use]
    pub fn vehicle_in_garage(&self, id: &str) -> Option<&Vehicle> {
        self.garage.iter().find(|vehicle| vehicle.id == id)
    }

    /// Full stat card for a vehicle; no mutation.
    #[must_use]
    pub fn stats_of(vehicle: &Vehicle) -> VehicleStats {
        stats::vehicle_stats(vehicle)
    }

    /// Buy a vehicle out of the available pool. The pool loses the entry
    /// permanently; there is no restock.
    ///
    /// # Errors
    ///
    /// `NotFound` when the id is not offered, `InsufficientFunds` when the
    /// budget does not cover the purchase price.
    pub fn buy(&mut self, id: &str) -> Result<i64, EconomyError> {
        let index = self
            .available
            .iter()
            .position(|vehicle| vehicle.id == id)
            .ok_or(EconomyError::NotFound)?;
        let price = self.available[index].buy_price;
        self.ensure_affordable(price)?;

        let vehicle = self.available.remove(index);
        self.budget -= price;
        self.ledger
            .record(TransactionKind::Purchase, vehicle.name.clone(), -price);
        self.garage.push(vehicle);
        Ok(price)
    }

    /// Sell a garage vehicle at its current resale price. Never fails on
    /// funds; the vehicle is gone afterwards, not returned to the offer
    /// pool.
    ///
    /// # Errors
    ///
    /// `NotFound` when the id is not in the garage.
    pub fn sell(&mut self, id: &str) -> Result<i64, EconomyError> {
        let index = self
            .garage
            .iter()
            .position(|vehicle| vehicle.id == id)
            .ok_or(EconomyError::NotFound)?;
        let price = stats::sell_price(&self.garage[index]);

        let vehicle = self.garage.remove(index);
        self.budget += price;
        self.ledger
            .record(TransactionKind::Sale, vehicle.name, price);
        Ok(price)
    }

    /// Restore a garage vehicle to full condition. Succeeds at cost 0 when
    /// the vehicle is already pristine.
    ///
    /// # Errors
    ///
    /// `NotFound` or `InsufficientFunds`.
    pub fn restore(&mut self, id: &str) -> Result<i64, EconomyError> {
        let index = self.garage_index(id)?;
        let cost = stats::restoration_cost(&self.garage[index]);
        self.ensure_affordable(cost)?;

        self.garage[index].restore();
        self.budget -= cost;
        let name = self.garage[index].name.clone();
        self.ledger.record(TransactionKind::Restoration, name, -cost);
        Ok(cost)
    }

    /// Raise one part of a garage vehicle to `new_level`.
    ///
    /// # Errors
    ///
    /// `NotFound`, `InvalidLevel` when the target is not strictly above the
    /// current level or exceeds the maximum, or `InsufficientFunds`.
    pub fn upgrade(&mut self, id: &str, part: Part, new_level: u8) -> Result<i64, EconomyError> {
        let index = self.garage_index(id)?;
        let current = self.garage[index].level_of(part);
        if new_level <= current || new_level > LEVEL_MAX {
            return Err(EconomyError::InvalidLevel {
                requested: new_level,
                current,
            });
        }
        let cost = stats::upgrade_cost(&self.garage[index], part, new_level);
        self.ensure_affordable(cost)?;

        self.garage[index].set_level(part, new_level);
        self.budget -= cost;
        let name = self.garage[index].name.clone();
        self.ledger.record(TransactionKind::from(part), name, -cost);
        Ok(cost)
    }

    /// Repaint a garage vehicle.
    ///
    /// # Errors
    ///
    /// `NotFound` or `InsufficientFunds`.
    pub fn repaint(&mut self, id: &str, color: PaintColor) -> Result<i64, EconomyError> {
        let index = self.garage_index(id)?;
        let cost = stats::repaint_cost(&self.garage[index]);
        self.ensure_affordable(cost)?;

        self.garage[index].paint = color;
        self.budget -= cost;
        let name = self.garage[index].name.clone();
        self.ledger.record(TransactionKind::Paint, name, -cost);
        Ok(cost)
    }

    /// Apply a workshop modification batch as a unit: every requested level
    /// is validated and the combined cost checked against the budget before
    /// anything changes. Partial application on partial affordability never
    /// happens. A repaint to the current color is a no-op and costs nothing.
    ///
    /// # Errors
    ///
    /// `NotFound`, the first `InvalidLevel` among the requested targets, or
    /// `InsufficientFunds` for the combined cost.
    pub fn apply_modifications(
        &mut self,
        id: &str,
        plan: &ModificationPlan,
    ) -> Result<i64, EconomyError> {
        let index = self.garage_index(id)?;
        let vehicle = &self.garage[index];

        let mut total = 0;
        for (part, target) in [
            (Part::Engine, plan.engine_level),
            (Part::Tires, plan.tires_level),
            (Part::Suspension, plan.suspension_level),
        ] {
            if let Some(new_level) = target {
                let current = vehicle.level_of(part);
                if new_level <= current || new_level > LEVEL_MAX {
                    return Err(EconomyError::InvalidLevel {
                        requested: new_level,
                        current,
                    });
                }
                total += stats::upgrade_cost(vehicle, part, new_level);
            }
        }
        let repaint_requested = plan
            .paint
            .as_ref()
            .is_some_and(|color| *color != vehicle.paint);
        if repaint_requested {
            total += stats::repaint_cost(vehicle);
        }
        self.ensure_affordable(total)?;

        // The batch check covers every partial sum below, so the per-step
        // affordability checks inside the individual operations cannot fail.
        for (part, target) in [
            (Part::Engine, plan.engine_level),
            (Part::Tires, plan.tires_level),
            (Part::Suspension, plan.suspension_level),
        ] {
            if let Some(new_level) = target {
                self.upgrade(id, part, new_level)?;
            }
        }
        if repaint_requested {
            if let Some(color) = plan.paint.clone() {
                self.repaint(id, color)?;
            }
        }
        Ok(total)
    }

    /// Revert to the initial seeded state: starting budget, empty garage and
    /// ledger, and the full catalog back on offer.
    pub fn reset(&mut self) {
        self.budget = STARTING_BUDGET;
        self.garage.clear();
        self.ledger.clear();
        self.available = self.catalog.vehicles().to_vec();
    }

    fn garage_index(&self, id: &str) -> Result<usize, EconomyError> {
        self.garage
            .iter()
            .position(|vehicle| vehicle.id == id)
            .ok_or(EconomyError::NotFound)
    }

    fn ensure_affordable(&self, cost: i64) -> Result<(), EconomyError> {
        if self.budget < cost {
            return Err(EconomyError::InsufficientFunds {
                needed: cost,
                available: self.budget,
            });
        }
        Ok(())
    }
}
