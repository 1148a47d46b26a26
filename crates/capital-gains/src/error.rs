use chrono::NaiveDate;
use thiserror::Error;

use crate::classifier::AssetClass;

#[derive(Error, Debug)]
pub enum GainsError {
    #[error("no holding-period threshold registered for {0}")]
    MissingHoldingPolicy(AssetClass),

    #[error("disposal on {disposed} predates acquisition on {acquired}")]
    DisposalBeforeAcquisition {
        acquired: NaiveDate,
        disposed: NaiveDate,
    },
}
