//! Grandfathered cost basis
//!
//! For holdings acquired on or before a regulatory cutoff date, the cost
//! basis may be stepped up to the fair market value at the cutoff, capped
//! at the sale price. The stored lot cost is never mutated; the override
//! is computed at disposal time.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fair market value captured at the cutoff for one holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrandfatheredCostRecord {
    pub cutoff_date: NaiveDate,
    pub fmv_per_unit: Decimal,
}

/// Cost basis for a disposal, with the grandfathering override applied
/// when the acquisition predates the cutoff.
///
/// The FMV is capped at the sale price, so the override can turn a gain
/// into a smaller gain but never into a loss; and it never drops below
/// the real purchase cost.
pub fn adjusted_cost(
    actual_cost: Decimal,
    acquisition_date: NaiveDate,
    cutoff_date: NaiveDate,
    fmv_at_cutoff: Decimal,
    sale_price: Decimal,
) -> Decimal {
    if acquisition_date > cutoff_date {
        return actual_cost;
    }
    actual_cost.max(fmv_at_cutoff.min(sale_price))
}

/// Cutoff FMV records keyed by holding identity.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct GrandfatherRegistry {
    records: HashMap<String, GrandfatheredCostRecord>,
}

impl GrandfatherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, holding: impl Into<String>, record: GrandfatheredCostRecord) {
        self.records.insert(holding.into(), record);
    }

    pub fn record(&self, holding: &str) -> Option<&GrandfatheredCostRecord> {
        self.records.get(holding)
    }

    /// Per-unit cost for a matched lot, FMV-adjusted when this holding has
    /// a record and the lot predates its cutoff; the actual cost otherwise.
    pub fn adjusted_unit_cost(
        &self,
        holding: &str,
        actual_unit_cost: Decimal,
        acquisition_date: NaiveDate,
        sale_unit_price: Decimal,
    ) -> Decimal {
        match self.records.get(holding) {
            Some(record) => adjusted_cost(
                actual_unit_cost,
                acquisition_date,
                record.cutoff_date,
                record.fmv_per_unit,
                sale_unit_price,
            ),
            None => actual_unit_cost,
        }
    }
}
