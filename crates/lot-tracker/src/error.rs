use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LotError {
    #[error("lot quantity must be positive, got {0}")]
    InvalidQuantity(Decimal),

    #[error("insufficient lots: requested {requested}, available {available}")]
    InsufficientLots {
        requested: Decimal,
        available: Decimal,
    },
}
