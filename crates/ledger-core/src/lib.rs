//! Double-Entry Ledger
//!
//! Account tree, balanced journal posting, reversal and on-demand balance
//! queries. Journals are immutable once posted; every committed mutation
//! is announced through an audit sink.

pub mod account;
pub mod audit;
pub mod error;
pub mod journal;
pub mod ledger;

pub use account::{Account, AccountId, AccountType, ChartOfAccounts};
pub use audit::{AuditSink, ChangeAction, ChangeNotification, MemoryAuditSink, TracingAuditSink};
pub use error::LedgerError;
pub use journal::{Journal, JournalId, JournalLine, Reference};
pub use ledger::{Ledger, BALANCE_TOLERANCE};
