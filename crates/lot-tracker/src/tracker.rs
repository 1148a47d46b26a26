use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LotError;
use crate::lot::LotMatch;
use crate::position::{Position, PositionSnapshot};

/// A position is owned by one holding in one account; neither alone is
/// unique (the same fund can sit in two demat accounts).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionKey {
    pub holding: String,
    pub account: String,
}

impl PositionKey {
    pub fn new(holding: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            holding: holding.into(),
            account: account.into(),
        }
    }
}

/// All open positions, keyed by `(holding, account)`.
#[derive(Debug, Default)]
pub struct LotTracker {
    positions: HashMap<PositionKey, Position>,
}

impl LotTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_lot(
        &mut self,
        key: &PositionKey,
        acquisition_date: NaiveDate,
        quantity: Decimal,
        unit_cost: Decimal,
    ) -> Result<(), LotError> {
        self.positions
            .entry(key.clone())
            .or_default()
            .add_lot(acquisition_date, quantity, unit_cost)
    }

    /// FIFO-match a sale against the keyed position. A holding with no
    /// recorded lots simply has nothing available.
    pub fn match_sale(
        &mut self,
        key: &PositionKey,
        sale_date: NaiveDate,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Result<Vec<LotMatch>, LotError> {
        match self.positions.get_mut(key) {
            Some(position) => position.match_sale(sale_date, quantity, unit_price),
            None => Err(LotError::InsufficientLots {
                requested: quantity,
                available: Decimal::ZERO,
            }),
        }
    }

    /// Snapshot of the keyed position; an unknown key is an empty position.
    pub fn snapshot(&self, key: &PositionKey) -> PositionSnapshot {
        match self.positions.get(key) {
            Some(position) => position.snapshot(),
            None => PositionSnapshot {
                total_quantity: Decimal::ZERO,
                weighted_average_cost: Decimal::ZERO,
            },
        }
    }

    pub fn position(&self, key: &PositionKey) -> Option<&Position> {
        self.positions.get(key)
    }

    /// Open positions, for reporting walks.
    pub fn positions(&self) -> impl Iterator<Item = (&PositionKey, &Position)> {
        self.positions.iter().filter(|(_, p)| !p.is_empty())
    }
}
