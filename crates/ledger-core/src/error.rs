use rust_decimal::Decimal;
use thiserror::Error;

use crate::journal::JournalId;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("{0}")]
    Validation(String),

    #[error("journal does not balance: debits {debits} vs credits {credits} in INR")]
    UnbalancedEntry { debits: Decimal, credits: Decimal },

    #[error("journal {0} is already reversed or is itself a reversal")]
    AlreadyReversed(JournalId),

    #[error("unknown account: {0}")]
    UnknownAccount(String),

    #[error("account {0} is inactive")]
    InactiveAccount(String),

    #[error("unknown journal: {0}")]
    UnknownJournal(JournalId),
}
