use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One acquisition, held until sales consume it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    pub acquisition_date: NaiveDate,
    /// Quantity originally acquired.
    pub quantity: Decimal,
    pub unit_cost: Decimal,
    /// Quantity not yet consumed by sales.
    pub remaining_quantity: Decimal,
}

impl Lot {
    pub fn new(acquisition_date: NaiveDate, quantity: Decimal, unit_cost: Decimal) -> Self {
        Self {
            acquisition_date,
            quantity,
            unit_cost,
            remaining_quantity: quantity,
        }
    }

    /// Cost of the unconsumed remainder.
    pub fn remaining_cost(&self) -> Decimal {
        self.remaining_quantity * self.unit_cost
    }
}

/// The slice of one lot consumed by one sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotMatch {
    pub acquisition_date: NaiveDate,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
    /// This slice's share of the sale proceeds (quantity x sale unit price).
    pub proceeds: Decimal,
}

impl LotMatch {
    /// Unadjusted cost of the matched slice.
    pub fn cost(&self) -> Decimal {
        self.quantity * self.unit_cost
    }
}
