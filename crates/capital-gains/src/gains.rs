//! Gain computation and aggregation

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::classifier::HoldingPeriod;

/// One matched-lot disposal, fully resolved: cost adjusted, term
/// classified, amounts in the settlement currency. Derived data, not
/// stored state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalGainEvent {
    pub holding: String,
    pub disposal_date: NaiveDate,
    pub acquisition_date: NaiveDate,
    pub quantity: Decimal,
    pub proceeds: Decimal,
    pub adjusted_cost: Decimal,
    pub incidental_costs: Decimal,
    pub holding_days: i64,
    pub term: HoldingPeriod,
    pub gain: Decimal,
}

/// Gain on one matched lot: proceeds net of adjusted cost and the
/// disposal's attributable charges.
pub fn compute_gain(
    proceeds: Decimal,
    adjusted_cost: Decimal,
    incidental_costs: Decimal,
) -> Decimal {
    proceeds - adjusted_cost - incidental_costs
}

/// Term-bucketed totals for a set of gain events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GainsSummary {
    pub short_term_total: Decimal,
    pub long_term_total: Decimal,
    /// Short-term gains are taxable in full.
    pub taxable_short_term: Decimal,
    /// Long-term gains above the exemption threshold.
    pub taxable_long_term: Decimal,
    pub long_term_exemption: Decimal,
    pub event_count: usize,
}

/// Pure fold over gain events. For long-term gains, taxable is the excess
/// over `long_term_exemption`, floored at zero; short-term is taxed in
/// full (a net short-term loss stays negative for set-off by the caller).
pub fn aggregate(events: &[CapitalGainEvent], long_term_exemption: Decimal) -> GainsSummary {
    let mut short_term_total = Decimal::ZERO;
    let mut long_term_total = Decimal::ZERO;

    for event in events {
        match event.term {
            HoldingPeriod::ShortTerm => short_term_total += event.gain,
            HoldingPeriod::LongTerm => long_term_total += event.gain,
        }
    }

    GainsSummary {
        short_term_total,
        long_term_total,
        taxable_short_term: short_term_total,
        taxable_long_term: (long_term_total - long_term_exemption).max(Decimal::ZERO),
        long_term_exemption,
        event_count: events.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn event(term: HoldingPeriod, gain: Decimal) -> CapitalGainEvent {
        CapitalGainEvent {
            holding: "NIFTYBEES".to_string(),
            disposal_date: d(2024, 6, 1),
            acquisition_date: d(2022, 1, 1),
            quantity: dec!(10),
            proceeds: dec!(0),
            adjusted_cost: dec!(0),
            incidental_costs: dec!(0),
            holding_days: 0,
            term,
            gain,
        }
    }

    #[test]
    fn gain_nets_out_cost_and_charges() {
        assert_eq!(compute_gain(dec!(2600), dec!(2200), dec!(35)), dec!(365));
        assert_eq!(compute_gain(dec!(1000), dec!(1200), dec!(10)), dec!(-210));
    }

    #[test]
    fn aggregate_buckets_by_term() {
        let events = vec![
            event(HoldingPeriod::ShortTerm, dec!(5000)),
            event(HoldingPeriod::ShortTerm, dec!(-1500)),
            event(HoldingPeriod::LongTerm, dec!(120000)),
            event(HoldingPeriod::LongTerm, dec!(30000)),
        ];

        let summary = aggregate(&events, dec!(100000));

        assert_eq!(summary.short_term_total, dec!(3500));
        assert_eq!(summary.long_term_total, dec!(150000));
        assert_eq!(summary.taxable_short_term, dec!(3500));
        assert_eq!(summary.taxable_long_term, dec!(50000));
        assert_eq!(summary.event_count, 4);
    }

    #[test]
    fn exemption_never_creates_negative_taxable() {
        let events = vec![event(HoldingPeriod::LongTerm, dec!(40000))];
        let summary = aggregate(&events, dec!(100000));
        assert_eq!(summary.taxable_long_term, dec!(0));
    }

    #[test]
    fn empty_fold_is_all_zero() {
        let summary = aggregate(&[], dec!(100000));
        assert_eq!(summary.short_term_total, dec!(0));
        assert_eq!(summary.long_term_total, dec!(0));
        assert_eq!(summary.event_count, 0);
    }
}
