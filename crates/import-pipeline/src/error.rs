use thiserror::Error;

use capital_gains::GainsError;
use fx_converter::FxError;
use ledger_core::LedgerError;
use lot_tracker::LotError;

/// Everything a single intent can fail with, so batch callers match one
/// type at the edge.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Fx(#[from] FxError),

    #[error(transparent)]
    Lots(#[from] LotError),

    #[error(transparent)]
    Gains(#[from] GainsError),

    #[error("unknown account code: {0}")]
    UnknownAccountCode(String),
}
