//! Import Pipeline
//!
//! Takes normalized transaction intents from upstream parsers, posts them
//! to the ledger, and runs disposals through lot matching, grandfathered
//! cost adjustment, term classification and settlement-currency
//! conversion. Batches record failures and keep going.

pub mod batch;
pub mod disposal;
pub mod error;
pub mod intent;

pub use batch::{BatchFailure, BatchReport, JournalImporter};
pub use disposal::DisposalProcessor;
pub use error::ImportError;
pub use intent::{AcquisitionHint, DisposalIntent, IntentLine, LineAmount, TransactionIntent};
