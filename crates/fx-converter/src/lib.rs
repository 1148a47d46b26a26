//! Currency Converter
//!
//! Historical exchange-rate store quoted against INR, with an explicit
//! bounded fallback to the nearest earlier rate when a date is missing.

pub mod rates;

pub use rates::{
    ExchangeRate, FxError, RateBook, RateSource, DEFAULT_LOOKBACK_DAYS, SETTLEMENT_CURRENCY,
};
