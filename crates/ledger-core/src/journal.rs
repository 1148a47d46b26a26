use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::account::AccountId;

pub type JournalId = i64;

/// Opaque pointer to the upstream document a journal was booked from
/// (a parsed statement row, a contract note, another journal).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub entity: String,
    pub id: String,
}

impl Reference {
    pub fn new(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// One side of one account in a journal. Exactly one of debit/credit is
/// nonzero; `exchange_rate` converts the line amount to INR for the
/// balance check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalLine {
    pub account_id: AccountId,
    pub debit: Decimal,
    pub credit: Decimal,
    pub currency: String,
    pub exchange_rate: Decimal,
    pub narration: Option<String>,
}

impl JournalLine {
    pub fn debit(
        account_id: AccountId,
        amount: Decimal,
        currency: impl Into<String>,
        exchange_rate: Decimal,
    ) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
            currency: currency.into(),
            exchange_rate,
            narration: None,
        }
    }

    pub fn credit(
        account_id: AccountId,
        amount: Decimal,
        currency: impl Into<String>,
        exchange_rate: Decimal,
    ) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
            currency: currency.into(),
            exchange_rate,
            narration: None,
        }
    }

    pub fn with_narration(mut self, narration: impl Into<String>) -> Self {
        self.narration = Some(narration.into());
        self
    }

    /// The line with debit and credit swapped, for reversals.
    pub fn mirrored(&self) -> Self {
        Self {
            account_id: self.account_id,
            debit: self.credit,
            credit: self.debit,
            currency: self.currency.clone(),
            exchange_rate: self.exchange_rate,
            narration: self.narration.clone(),
        }
    }
}

/// A posted, immutable journal. Corrections happen through a mirrored
/// reversal journal, never by editing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journal {
    pub id: JournalId,
    pub date: NaiveDate,
    pub description: String,
    pub reference: Option<Reference>,
    pub lines: Vec<JournalLine>,
    pub is_reversed: bool,
    pub reversal_of: Option<JournalId>,
}
