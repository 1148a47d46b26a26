//! Holding-period classification
//!
//! Each asset class carries its own day threshold for long-term
//! treatment. Thresholds are configuration injected per classification,
//! never branched on inside the classifier.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::GainsError;

/// Asset categories with distinct holding-period rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetClass {
    ListedEquity,
    EquityFund,
    DebtFund,
    /// Mixed equity/debt funds. Deliberately has no default threshold:
    /// treatment follows the fund's equity exposure, which the caller must
    /// decide and register.
    HybridFund,
    ForeignEquity,
    UnlistedShares,
}

impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetClass::ListedEquity => write!(f, "listed equity"),
            AssetClass::EquityFund => write!(f, "equity fund"),
            AssetClass::DebtFund => write!(f, "debt fund"),
            AssetClass::HybridFund => write!(f, "hybrid fund"),
            AssetClass::ForeignEquity => write!(f, "foreign equity"),
            AssetClass::UnlistedShares => write!(f, "unlisted shares"),
        }
    }
}

/// Holding period classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoldingPeriod {
    ShortTerm,
    LongTerm,
}

/// Per-asset-class day thresholds for long-term treatment.
///
/// Strictly more than the threshold is long term; exactly the threshold
/// is still short term.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HoldingPolicy {
    thresholds: HashMap<AssetClass, i64>,
}

impl HoldingPolicy {
    /// A policy with no registered classes; every classification fails
    /// until thresholds are set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Thresholds for Indian capital-gains classification: 12 months for
    /// listed equity and equity funds, 24 for unlisted shares, 36 for
    /// debt funds and foreign equity. Hybrid funds are absent on purpose.
    pub fn india() -> Self {
        let mut policy = Self::empty();
        policy.set_threshold(AssetClass::ListedEquity, 365);
        policy.set_threshold(AssetClass::EquityFund, 365);
        policy.set_threshold(AssetClass::UnlistedShares, 730);
        policy.set_threshold(AssetClass::DebtFund, 1095);
        policy.set_threshold(AssetClass::ForeignEquity, 1095);
        policy
    }

    pub fn set_threshold(&mut self, class: AssetClass, days: i64) {
        self.thresholds.insert(class, days);
    }

    pub fn threshold_days(&self, class: AssetClass) -> Option<i64> {
        self.thresholds.get(&class).copied()
    }

    /// Bucket one disposal by holding period. An unregistered asset class
    /// is a hard error, never a guessed bucket.
    pub fn classify(
        &self,
        acquisition_date: NaiveDate,
        disposal_date: NaiveDate,
        class: AssetClass,
    ) -> Result<HoldingPeriod, GainsError> {
        if disposal_date < acquisition_date {
            return Err(GainsError::DisposalBeforeAcquisition {
                acquired: acquisition_date,
                disposed: disposal_date,
            });
        }
        let threshold = self
            .threshold_days(class)
            .ok_or(GainsError::MissingHoldingPolicy(class))?;

        let held = (disposal_date - acquisition_date).num_days();
        if held > threshold {
            Ok(HoldingPeriod::LongTerm)
        } else {
            Ok(HoldingPeriod::ShortTerm)
        }
    }
}
