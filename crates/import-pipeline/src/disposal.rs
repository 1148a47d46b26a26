use tracing::debug;

use capital_gains::{compute_gain, CapitalGainEvent, GainsError, GrandfatherRegistry, HoldingPolicy};
use fx_converter::RateBook;
use lot_tracker::{LotTracker, PositionKey};

use crate::error::ImportError;
use crate::intent::DisposalIntent;

/// Runs one disposal through the full chain: FIFO lot match, grandfathered
/// cost adjustment, holding-period classification, settlement-currency
/// conversion. Emits one gain event per matched lot slice.
pub struct DisposalProcessor<'a> {
    lots: &'a mut LotTracker,
    grandfathered: &'a GrandfatherRegistry,
    policy: &'a HoldingPolicy,
    rates: &'a RateBook,
}

impl<'a> DisposalProcessor<'a> {
    pub fn new(
        lots: &'a mut LotTracker,
        grandfathered: &'a GrandfatherRegistry,
        policy: &'a HoldingPolicy,
        rates: &'a RateBook,
    ) -> Self {
        Self {
            lots,
            grandfathered,
            policy,
            rates,
        }
    }

    pub fn process(
        &mut self,
        disposal: &DisposalIntent,
    ) -> Result<Vec<CapitalGainEvent>, ImportError> {
        // Anything that can fail without touching lot state is checked
        // before matching, so a rejected disposal leaves the position
        // intact.
        if self.policy.threshold_days(disposal.asset_class).is_none() {
            return Err(GainsError::MissingHoldingPolicy(disposal.asset_class).into());
        }
        self.rates.rate(disposal.date, &disposal.currency)?;

        let key = PositionKey::new(disposal.holding.clone(), disposal.account_code.clone());
        for hint in &disposal.acquisition_hints {
            self.lots
                .add_lot(&key, hint.date, hint.quantity, hint.unit_cost)?;
        }
        let matches = self.lots.match_sale(
            &key,
            disposal.date,
            disposal.quantity,
            disposal.unit_price,
        )?;

        let mut events = Vec::with_capacity(matches.len());
        for matched in &matches {
            let adjusted_unit_cost = self.grandfathered.adjusted_unit_cost(
                &disposal.holding,
                matched.unit_cost,
                matched.acquisition_date,
                disposal.unit_price,
            );
            let cost = adjusted_unit_cost * matched.quantity;
            let incidental = disposal.incidental_costs * matched.quantity / disposal.quantity;
            let term =
                self.policy
                    .classify(matched.acquisition_date, disposal.date, disposal.asset_class)?;

            let proceeds = self
                .rates
                .convert(matched.proceeds, &disposal.currency, disposal.date)?;
            let adjusted_cost = self.rates.convert(cost, &disposal.currency, disposal.date)?;
            let incidental_costs =
                self.rates
                    .convert(incidental, &disposal.currency, disposal.date)?;
            let gain = compute_gain(proceeds, adjusted_cost, incidental_costs);

            debug!(
                holding = %disposal.holding,
                acquired = %matched.acquisition_date,
                quantity = %matched.quantity,
                %gain,
                "gain event"
            );
            events.push(CapitalGainEvent {
                holding: disposal.holding.clone(),
                disposal_date: disposal.date,
                acquisition_date: matched.acquisition_date,
                quantity: matched.quantity,
                proceeds,
                adjusted_cost,
                incidental_costs,
                holding_days: (disposal.date - matched.acquisition_date).num_days(),
                term,
                gain,
            });
        }
        Ok(events)
    }
}
