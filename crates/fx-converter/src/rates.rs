use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// All balance checks and gain reporting settle in this currency.
pub const SETTLEMENT_CURRENCY: &str = "INR";

/// Default number of calendar days `rate` may walk back when the
/// requested date has no stored rate.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 7;

#[derive(Error, Debug)]
pub enum FxError {
    #[error("no {currency}/INR rate on {date} or within the {lookback_days} days before it")]
    RateNotFound {
        currency: String,
        date: NaiveDate,
        lookback_days: i64,
    },

    #[error("rejected {currency}/INR rate {rate} for {date}: rate must be positive")]
    InvalidRate {
        currency: String,
        date: NaiveDate,
        rate: Decimal,
    },
}

/// Where a stored rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateSource {
    Manual,
    Import,
}

impl std::fmt::Display for RateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RateSource::Manual => write!(f, "manual"),
            RateSource::Import => write!(f, "import"),
        }
    }
}

/// One `currency -> INR` rate for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub date: NaiveDate,
    pub currency: String,
    pub rate: Decimal,
    pub source: RateSource,
}

/// Historical rate store, unique per `(date, currency)`.
///
/// Rates are upserted, never edited in place; a second `add_rate` for the
/// same key replaces the stored entry and hands the old one back.
#[derive(Debug)]
pub struct RateBook {
    rates: HashMap<String, BTreeMap<NaiveDate, ExchangeRate>>,
    lookback_days: i64,
}

impl Default for RateBook {
    fn default() -> Self {
        Self::new()
    }
}

impl RateBook {
    pub fn new() -> Self {
        Self::with_lookback_days(DEFAULT_LOOKBACK_DAYS)
    }

    /// A book whose fallback window differs from [`DEFAULT_LOOKBACK_DAYS`].
    pub fn with_lookback_days(lookback_days: i64) -> Self {
        Self {
            rates: HashMap::new(),
            lookback_days,
        }
    }

    /// Upsert the rate for `(date, currency)`. Returns the entry this call
    /// replaced, if any, so callers can record the change.
    pub fn add_rate(
        &mut self,
        date: NaiveDate,
        currency: impl Into<String>,
        rate: Decimal,
        source: RateSource,
    ) -> Result<Option<ExchangeRate>, FxError> {
        let currency = currency.into();
        if rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate {
                currency,
                date,
                rate,
            });
        }

        let entry = ExchangeRate {
            date,
            currency: currency.clone(),
            rate,
            source,
        };
        let replaced = self.rates.entry(currency).or_default().insert(date, entry);
        Ok(replaced)
    }

    /// The `currency -> INR` rate effective on `date`.
    ///
    /// Exact-date lookup first; otherwise the nearest earlier rate within
    /// the lookback window. A missing rate is an error, never a silent 1.0.
    /// The settlement currency itself always converts at 1.
    pub fn rate(&self, date: NaiveDate, currency: &str) -> Result<Decimal, FxError> {
        if currency == SETTLEMENT_CURRENCY {
            return Ok(Decimal::ONE);
        }

        let not_found = || FxError::RateNotFound {
            currency: currency.to_string(),
            date,
            lookback_days: self.lookback_days,
        };

        let by_date = self.rates.get(currency).ok_or_else(not_found)?;
        if let Some(entry) = by_date.get(&date) {
            return Ok(entry.rate);
        }

        if let Some((found_date, entry)) = by_date.range(..=date).next_back() {
            let age_days = (date - *found_date).num_days();
            if age_days <= self.lookback_days {
                debug!(
                    currency,
                    requested = %date,
                    used = %found_date,
                    age_days,
                    "no exact rate, using nearest earlier"
                );
                return Ok(entry.rate);
            }
        }

        Err(not_found())
    }

    /// Convert `amount` of `currency` to INR at the rate effective on
    /// `date`, rounded to 2 decimal places, half up.
    pub fn convert(
        &self,
        amount: Decimal,
        currency: &str,
        date: NaiveDate,
    ) -> Result<Decimal, FxError> {
        let rate = self.rate(date, currency)?;
        Ok((amount * rate).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    /// The stored entry for `(date, currency)`, exact date only.
    pub fn entry(&self, date: NaiveDate, currency: &str) -> Option<&ExchangeRate> {
        self.rates.get(currency)?.get(&date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn exact_date_lookup() {
        let mut book = RateBook::new();
        book.add_rate(d(2024, 3, 1), "USD", dec!(83.50), RateSource::Manual)
            .unwrap();

        assert_eq!(book.rate(d(2024, 3, 1), "USD").unwrap(), dec!(83.50));
    }

    #[test]
    fn convert_rounds_half_up_to_paise() {
        let mut book = RateBook::new();
        book.add_rate(d(2024, 3, 1), "USD", dec!(83.50), RateSource::Manual)
            .unwrap();

        assert_eq!(
            book.convert(dec!(100), "USD", d(2024, 3, 1)).unwrap(),
            dec!(8350.00)
        );

        book.add_rate(d(2024, 3, 1), "GBP", dec!(105.125), RateSource::Manual)
            .unwrap();
        // 1.50 * 105.125 = 157.6875 -> 157.69
        assert_eq!(
            book.convert(dec!(1.50), "GBP", d(2024, 3, 1)).unwrap(),
            dec!(157.69)
        );
    }

    #[test]
    fn falls_back_to_nearest_earlier_rate_within_window() {
        let mut book = RateBook::new();
        book.add_rate(d(2024, 3, 1), "USD", dec!(83.00), RateSource::Import)
            .unwrap();
        book.add_rate(d(2024, 3, 4), "USD", dec!(83.75), RateSource::Import)
            .unwrap();

        // Weekend gap: the 6th falls back to the 4th, not the 1st.
        assert_eq!(book.rate(d(2024, 3, 6), "USD").unwrap(), dec!(83.75));
    }

    #[test]
    fn fallback_is_bounded_by_lookback_window() {
        let mut book = RateBook::with_lookback_days(3);
        book.add_rate(d(2024, 3, 1), "USD", dec!(83.00), RateSource::Import)
            .unwrap();

        assert_eq!(book.rate(d(2024, 3, 4), "USD").unwrap(), dec!(83.00));
        assert!(matches!(
            book.rate(d(2024, 3, 5), "USD"),
            Err(FxError::RateNotFound { .. })
        ));
    }

    #[test]
    fn no_earlier_rate_is_an_error() {
        let mut book = RateBook::new();
        book.add_rate(d(2024, 3, 10), "USD", dec!(83.00), RateSource::Manual)
            .unwrap();

        assert!(matches!(
            book.rate(d(2024, 3, 5), "USD"),
            Err(FxError::RateNotFound { .. })
        ));
        assert!(matches!(
            book.rate(d(2024, 3, 5), "EUR"),
            Err(FxError::RateNotFound { .. })
        ));
    }

    #[test]
    fn upsert_replaces_instead_of_duplicating() {
        let mut book = RateBook::new();
        book.add_rate(d(2024, 3, 1), "USD", dec!(83.00), RateSource::Import)
            .unwrap();
        let replaced = book
            .add_rate(d(2024, 3, 1), "USD", dec!(83.20), RateSource::Manual)
            .unwrap();

        assert_eq!(replaced.unwrap().rate, dec!(83.00));
        assert_eq!(book.rate(d(2024, 3, 1), "USD").unwrap(), dec!(83.20));
        assert_eq!(book.entry(d(2024, 3, 1), "USD").unwrap().source, RateSource::Manual);
    }

    #[test]
    fn settlement_currency_is_identity() {
        let book = RateBook::new();
        assert_eq!(book.rate(d(2024, 3, 1), "INR").unwrap(), Decimal::ONE);
        assert_eq!(
            book.convert(dec!(250.555), "INR", d(2024, 3, 1)).unwrap(),
            dec!(250.56)
        );
    }

    #[test]
    fn nonpositive_rates_are_rejected() {
        let mut book = RateBook::new();
        assert!(matches!(
            book.add_rate(d(2024, 3, 1), "USD", dec!(0), RateSource::Manual),
            Err(FxError::InvalidRate { .. })
        ));
        assert!(matches!(
            book.add_rate(d(2024, 3, 1), "USD", dec!(-1.5), RateSource::Manual),
            Err(FxError::InvalidRate { .. })
        ));
    }
}
