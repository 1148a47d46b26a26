use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use capital_gains::AssetClass;
use ledger_core::Reference;

/// One side of a journal line as a parser emits it: the amount in the
/// line's own currency, conversion resolved at posting time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LineAmount {
    Debit(Decimal),
    Credit(Decimal),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentLine {
    pub account_code: String,
    pub amount: LineAmount,
    pub currency: String,
    pub narration: Option<String>,
}

/// A normalized transaction from an upstream parser, addressed by account
/// code rather than internal id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionIntent {
    pub date: NaiveDate,
    pub description: String,
    pub reference: Option<Reference>,
    pub lines: Vec<IntentLine>,
}

/// A buy leg a parser saw alongside a sale (contract notes and fund
/// statements often carry both). Applied as an ordinary acquisition
/// before the sale is matched; deduplication is the parser's job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquisitionHint {
    pub date: NaiveDate,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
}

/// A sale of part of a holding, to be run through lot matching and gain
/// classification. `incidental_costs` carries the disposal's attributable
/// charges (brokerage, duty) in the sale currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisposalIntent {
    pub holding: String,
    pub account_code: String,
    pub date: NaiveDate,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub currency: String,
    pub incidental_costs: Decimal,
    pub asset_class: AssetClass,
    pub acquisition_hints: Vec<AcquisitionHint>,
}
