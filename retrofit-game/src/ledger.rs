//! Append-only transaction history for budget-affecting actions.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::vehicle::Part;

/// Kind of budget-affecting action being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Purchase,
    Sale,
    Restoration,
    EngineUpgrade,
    TiresUpgrade,
    SuspensionUpgrade,
    Paint,
}

impl TransactionKind {
    /// Get the translation key for this transaction kind
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Purchase => "ledger.kind.purchase",
            Self::Sale => "ledger.kind.sale",
            Self::Restoration => "ledger.kind.restoration",
            Self::EngineUpgrade => "ledger.kind.upgrade-engine",
            Self::TiresUpgrade => "ledger.kind.upgrade-tires",
            Self::SuspensionUpgrade => "ledger.kind.upgrade-suspension",
            Self::Paint => "ledger.kind.paint",
        }
    }
}

impl From<Part> for TransactionKind {
    fn from(part: Part) -> Self {
        match part {
            Part::Engine => Self::EngineUpgrade,
            Part::Tires => Self::TiresUpgrade,
            Part::Suspension => Self::SuspensionUpgrade,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Purchase => "purchase",
            Self::Sale => "sale",
            Self::Restoration => "restoration",
            Self::EngineUpgrade => "engine_upgrade",
            Self::TiresUpgrade => "tires_upgrade",
            Self::SuspensionUpgrade => "suspension_upgrade",
            Self::Paint => "paint",
        };
        f.write_str(label)
    }
}

/// One ledger entry. Amounts are signed: spending is negative, income is
/// positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(rename = "carName")]
    pub vehicle_name: String,
    pub amount: i64,
    pub timestamp: DateTime<Utc>,
}

/// Ordered, append-only sequence of transactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionLog {
    entries: Vec<Transaction>,
}

impl TransactionLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry stamped with the current time.
    pub fn record(&mut self, kind: TransactionKind, vehicle_name: impl Into<String>, amount: i64) {
        self.entries.push(Transaction {
            kind,
            vehicle_name: vehicle_name.into(),
            amount,
            timestamp: Utc::now(),
        });
    }

    #[must_use]
    pub fn entries(&self) -> &[Transaction] {
        &self.entries
    }

    #[must_use]
    pub fn last(&self) -> Option<&Transaction> {
        self.entries.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Net budget movement across the whole log.
    #[must_use]
    pub fn net_total(&self) -> i64 {
        self.entries.iter().map(|entry| entry.amount).sum()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
