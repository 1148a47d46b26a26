use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LotError;
use crate::lot::{Lot, LotMatch};

/// FIFO-ordered lots for one holding in one account.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Position {
    lots: Vec<Lot>,
}

/// Read-only rollup of a position. Never drives matching order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub total_quantity: Decimal,
    pub weighted_average_cost: Decimal,
}

impl Position {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an acquisition at the tail of the lot sequence.
    pub fn add_lot(
        &mut self,
        acquisition_date: NaiveDate,
        quantity: Decimal,
        unit_cost: Decimal,
    ) -> Result<(), LotError> {
        if quantity <= Decimal::ZERO {
            return Err(LotError::InvalidQuantity(quantity));
        }
        self.lots.push(Lot::new(acquisition_date, quantity, unit_cost));
        Ok(())
    }

    /// Consume `quantity` oldest-first and return one match per lot slice.
    ///
    /// The consumption plan is built against the stored lots before
    /// anything is mutated; if total remaining quantity cannot cover the
    /// request, the position is left exactly as it was.
    pub fn match_sale(
        &mut self,
        sale_date: NaiveDate,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Result<Vec<LotMatch>, LotError> {
        if quantity <= Decimal::ZERO {
            return Err(LotError::InvalidQuantity(quantity));
        }

        let available: Decimal = self.lots.iter().map(|l| l.remaining_quantity).sum();
        if available < quantity {
            return Err(LotError::InsufficientLots {
                requested: quantity,
                available,
            });
        }

        let mut plan: Vec<(usize, Decimal)> = Vec::new();
        let mut needed = quantity;
        for (idx, lot) in self.lots.iter().enumerate() {
            if needed.is_zero() {
                break;
            }
            let take = lot.remaining_quantity.min(needed);
            plan.push((idx, take));
            needed -= take;
        }
        debug_assert!(needed.is_zero());

        let mut matches = Vec::with_capacity(plan.len());
        for (idx, take) in plan {
            let lot = &mut self.lots[idx];
            lot.remaining_quantity -= take;
            debug!(
                acquired = %lot.acquisition_date,
                sold = %sale_date,
                taken = %take,
                left = %lot.remaining_quantity,
                "consumed lot slice"
            );
            matches.push(LotMatch {
                acquisition_date: lot.acquisition_date,
                quantity: take,
                unit_cost: lot.unit_cost,
                proceeds: take * unit_price,
            });
        }
        self.lots.retain(|l| !l.remaining_quantity.is_zero());

        Ok(matches)
    }

    pub fn snapshot(&self) -> PositionSnapshot {
        let total_quantity: Decimal = self.lots.iter().map(|l| l.remaining_quantity).sum();
        let total_cost: Decimal = self.lots.iter().map(|l| l.remaining_cost()).sum();
        let weighted_average_cost = if total_quantity.is_zero() {
            Decimal::ZERO
        } else {
            (total_cost / total_quantity).round_dp(4)
        };
        PositionSnapshot {
            total_quantity,
            weighted_average_cost,
        }
    }

    /// Open lots in FIFO order.
    pub fn lots(&self) -> &[Lot] {
        &self.lots
    }

    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn seeded() -> Position {
        let mut position = Position::new();
        position.add_lot(d(2024, 1, 1), dec!(10), dec!(100)).unwrap();
        position.add_lot(d(2024, 2, 1), dec!(5), dec!(110)).unwrap();
        position
    }

    #[test]
    fn sale_consumes_oldest_lots_first() {
        let mut position = seeded();

        let matches = position
            .match_sale(d(2024, 6, 1), dec!(12), dec!(130))
            .unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].acquisition_date, d(2024, 1, 1));
        assert_eq!(matches[0].quantity, dec!(10));
        assert_eq!(matches[0].unit_cost, dec!(100));
        assert_eq!(matches[1].acquisition_date, d(2024, 2, 1));
        assert_eq!(matches[1].quantity, dec!(2));
        assert_eq!(matches[1].unit_cost, dec!(110));

        let lots = position.lots();
        assert_eq!(lots.len(), 1);
        assert_eq!(lots[0].acquisition_date, d(2024, 2, 1));
        assert_eq!(lots[0].remaining_quantity, dec!(3));
        assert_eq!(lots[0].unit_cost, dec!(110));
    }

    #[test]
    fn proceeds_split_by_matched_quantity() {
        let mut position = seeded();

        let matches = position
            .match_sale(d(2024, 6, 1), dec!(12), dec!(130))
            .unwrap();

        assert_eq!(matches[0].proceeds, dec!(1300));
        assert_eq!(matches[1].proceeds, dec!(260));
        assert_eq!(matches[0].cost(), dec!(1000));
        assert_eq!(matches[1].cost(), dec!(220));
    }

    #[test]
    fn insufficient_lots_mutates_nothing() {
        let mut position = Position::new();
        position.add_lot(d(2024, 1, 1), dec!(8), dec!(50)).unwrap();

        let err = position
            .match_sale(d(2024, 6, 1), dec!(10), dec!(60))
            .unwrap_err();

        assert!(matches!(
            err,
            LotError::InsufficientLots {
                requested,
                available,
            } if requested == dec!(10) && available == dec!(8)
        ));
        assert_eq!(position.lots().len(), 1);
        assert_eq!(position.lots()[0].remaining_quantity, dec!(8));
    }

    #[test]
    fn fully_consumed_lots_are_removed() {
        let mut position = seeded();
        position
            .match_sale(d(2024, 6, 1), dec!(15), dec!(130))
            .unwrap();

        assert!(position.is_empty());
        assert_eq!(position.snapshot().total_quantity, dec!(0));
    }

    #[test]
    fn partial_consumption_keeps_remainder_at_head() {
        let mut position = seeded();
        position
            .match_sale(d(2024, 6, 1), dec!(4), dec!(130))
            .unwrap();

        let lots = position.lots();
        assert_eq!(lots[0].acquisition_date, d(2024, 1, 1));
        assert_eq!(lots[0].remaining_quantity, dec!(6));
        assert_eq!(lots[1].remaining_quantity, dec!(5));
    }

    #[test]
    fn zero_or_negative_quantities_rejected() {
        let mut position = Position::new();
        assert!(matches!(
            position.add_lot(d(2024, 1, 1), dec!(0), dec!(100)),
            Err(LotError::InvalidQuantity(_))
        ));
        assert!(matches!(
            position.match_sale(d(2024, 1, 2), dec!(-1), dec!(100)),
            Err(LotError::InvalidQuantity(_))
        ));
    }

    #[test]
    fn snapshot_reports_weighted_average_cost() {
        let position = seeded();
        let snap = position.snapshot();

        assert_eq!(snap.total_quantity, dec!(15));
        // (10*100 + 5*110) / 15 = 103.3333
        assert_eq!(snap.weighted_average_cost, dec!(103.3333));
    }
}
