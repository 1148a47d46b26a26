//! Capital Gains
//!
//! Holding-period classification, grandfathered cost-basis adjustment and
//! gain aggregation for disposals matched by the lot tracker. Gains are
//! reported in the settlement currency.

pub mod classifier;
pub mod error;
pub mod gains;
pub mod grandfather;

pub use classifier::{AssetClass, HoldingPeriod, HoldingPolicy};
pub use error::GainsError;
pub use gains::{aggregate, compute_gain, CapitalGainEvent, GainsSummary};
pub use grandfather::{adjusted_cost, GrandfatherRegistry, GrandfatheredCostRecord};
