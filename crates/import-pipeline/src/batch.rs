use tracing::warn;

use fx_converter::RateBook;
use ledger_core::{JournalId, JournalLine, Ledger};

use crate::error::ImportError;
use crate::intent::{LineAmount, TransactionIntent};

/// Outcome of a batch run. Failures carry the intent's position in the
/// batch; committed postings are never rolled back by later failures.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub posted: Vec<JournalId>,
    pub failures: Vec<BatchFailure>,
}

#[derive(Debug)]
pub struct BatchFailure {
    pub index: usize,
    pub description: String,
    pub error: ImportError,
}

/// Resolves intents against the chart of accounts and the rate book and
/// posts them to the ledger.
pub struct JournalImporter<'a> {
    ledger: &'a mut Ledger,
    rates: &'a RateBook,
}

impl<'a> JournalImporter<'a> {
    pub fn new(ledger: &'a mut Ledger, rates: &'a RateBook) -> Self {
        Self { ledger, rates }
    }

    /// Post one intent as one atomic journal.
    pub fn post_intent(&mut self, intent: &TransactionIntent) -> Result<JournalId, ImportError> {
        let mut lines = Vec::with_capacity(intent.lines.len());
        for line in &intent.lines {
            let account_id = self
                .ledger
                .chart()
                .by_code(&line.account_code)
                .map(|account| account.id)
                .ok_or_else(|| ImportError::UnknownAccountCode(line.account_code.clone()))?;
            let rate = self.rates.rate(intent.date, &line.currency)?;

            let journal_line = match line.amount {
                LineAmount::Debit(amount) => {
                    JournalLine::debit(account_id, amount, line.currency.clone(), rate)
                }
                LineAmount::Credit(amount) => {
                    JournalLine::credit(account_id, amount, line.currency.clone(), rate)
                }
            };
            lines.push(match &line.narration {
                Some(narration) => journal_line.with_narration(narration.clone()),
                None => journal_line,
            });
        }

        let id = self.ledger.post_journal(
            intent.date,
            intent.description.clone(),
            lines,
            intent.reference.clone(),
        )?;
        Ok(id)
    }

    /// Post every intent, recording failures and continuing. One bad
    /// statement row never takes down the rest of the import.
    pub fn import_batch(&mut self, intents: &[TransactionIntent]) -> BatchReport {
        let mut report = BatchReport::default();
        for (index, intent) in intents.iter().enumerate() {
            match self.post_intent(intent) {
                Ok(id) => report.posted.push(id),
                Err(error) => {
                    warn!(
                        index,
                        description = %intent.description,
                        %error,
                        "intent rejected, continuing batch"
                    );
                    report.failures.push(BatchFailure {
                        index,
                        description: intent.description.clone(),
                        error,
                    });
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ledger_core::AccountType;
    use rust_decimal_macros::dec;

    use crate::intent::IntentLine;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn transfer_intent(date: NaiveDate, description: &str, to: &str, from: &str) -> TransactionIntent {
        TransactionIntent {
            date,
            description: description.to_string(),
            reference: None,
            lines: vec![
                IntentLine {
                    account_code: to.to_string(),
                    amount: LineAmount::Debit(dec!(5000)),
                    currency: "INR".to_string(),
                    narration: None,
                },
                IntentLine {
                    account_code: from.to_string(),
                    amount: LineAmount::Credit(dec!(5000)),
                    currency: "INR".to_string(),
                    narration: Some("monthly sweep".to_string()),
                },
            ],
        }
    }

    #[test]
    fn batch_keeps_going_past_failures() {
        let mut ledger = Ledger::new();
        ledger
            .add_account("1100", "Bank", AccountType::Asset, None, "INR")
            .unwrap();
        ledger
            .add_account("1110", "Savings", AccountType::Asset, None, "INR")
            .unwrap();
        let rates = RateBook::new();

        let intents = vec![
            transfer_intent(d(2024, 5, 1), "sweep 1", "1110", "1100"),
            transfer_intent(d(2024, 5, 2), "bad code", "9999", "1100"),
            transfer_intent(d(2024, 5, 3), "sweep 2", "1110", "1100"),
        ];

        let mut importer = JournalImporter::new(&mut ledger, &rates);
        let report = importer.import_batch(&intents);

        assert_eq!(report.posted.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 1);
        assert!(matches!(
            report.failures[0].error,
            ImportError::UnknownAccountCode(_)
        ));
        assert_eq!(ledger.journals().len(), 2);
    }

    #[test]
    fn missing_rate_fails_the_single_intent() {
        let mut ledger = Ledger::new();
        ledger
            .add_account("1100", "Bank", AccountType::Asset, None, "INR")
            .unwrap();
        ledger
            .add_account("4100", "Salary", AccountType::Income, None, "USD")
            .unwrap();
        let rates = RateBook::new();

        let intent = TransactionIntent {
            date: d(2024, 5, 1),
            description: "USD salary".to_string(),
            reference: None,
            lines: vec![
                IntentLine {
                    account_code: "1100".to_string(),
                    amount: LineAmount::Debit(dec!(8350)),
                    currency: "INR".to_string(),
                    narration: None,
                },
                IntentLine {
                    account_code: "4100".to_string(),
                    amount: LineAmount::Credit(dec!(100)),
                    currency: "USD".to_string(),
                    narration: None,
                },
            ],
        };

        let mut importer = JournalImporter::new(&mut ledger, &rates);
        let err = importer.post_intent(&intent).unwrap_err();
        assert!(matches!(err, ImportError::Fx(_)));
        assert!(ledger.journals().is_empty());
    }
}
