use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::account::{AccountId, AccountType, ChartOfAccounts};
use crate::audit::{AuditSink, ChangeAction, ChangeNotification, TracingAuditSink};
use crate::error::LedgerError;
use crate::journal::{Journal, JournalId, JournalLine, Reference};

/// Converted debit and credit totals may differ by at most one paisa.
pub const BALANCE_TOLERANCE: Decimal = dec!(0.01);

/// The system of record: account tree plus an append-only journal store.
///
/// Balances are always folded from posted lines on demand; there is no
/// mutable running-balance field to race against.
pub struct Ledger {
    chart: ChartOfAccounts,
    journals: Vec<Journal>,
    reversal_log: Vec<(JournalId, JournalId)>,
    next_journal_id: JournalId,
    audit: Arc<dyn AuditSink>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::with_audit_sink(Arc::new(TracingAuditSink))
    }

    /// A ledger announcing every committed mutation to `sink`.
    pub fn with_audit_sink(sink: Arc<dyn AuditSink>) -> Self {
        Self {
            chart: ChartOfAccounts::new(),
            journals: Vec::new(),
            reversal_log: Vec::new(),
            next_journal_id: 1,
            audit: sink,
        }
    }

    pub fn chart(&self) -> &ChartOfAccounts {
        &self.chart
    }

    pub fn add_account(
        &mut self,
        code: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
        parent: Option<AccountId>,
        currency: impl Into<String>,
    ) -> Result<AccountId, LedgerError> {
        let id = self
            .chart
            .add_account(code, name, account_type, parent, currency)?;
        self.notify("account", id, ChangeAction::Created, None, self.chart.account(id));
        Ok(id)
    }

    pub fn deactivate_account(&mut self, id: AccountId) -> Result<(), LedgerError> {
        let old = self.chart.account(id).cloned();
        self.chart.set_active(id, false)?;
        self.notify(
            "account",
            id,
            ChangeAction::Updated,
            old.as_ref(),
            self.chart.account(id),
        );
        Ok(())
    }

    pub fn set_account_parent(
        &mut self,
        id: AccountId,
        new_parent: Option<AccountId>,
    ) -> Result<(), LedgerError> {
        let old = self.chart.account(id).cloned();
        self.chart.set_parent(id, new_parent)?;
        self.notify(
            "account",
            id,
            ChangeAction::Updated,
            old.as_ref(),
            self.chart.account(id),
        );
        Ok(())
    }

    /// Post a balanced journal. Validation runs to completion before any
    /// state changes, so a rejected journal leaves no partial lines.
    pub fn post_journal(
        &mut self,
        date: NaiveDate,
        description: impl Into<String>,
        lines: Vec<JournalLine>,
        reference: Option<Reference>,
    ) -> Result<JournalId, LedgerError> {
        self.validate_lines(&lines)?;

        let id = self.next_journal_id;
        self.next_journal_id += 1;
        let journal = Journal {
            id,
            date,
            description: description.into(),
            reference,
            lines,
            is_reversed: false,
            reversal_of: None,
        };
        self.notify("journal", id, ChangeAction::Created, None, Some(&journal));
        self.journals.push(journal);
        Ok(id)
    }

    fn validate_lines(&self, lines: &[JournalLine]) -> Result<(), LedgerError> {
        if lines.len() < 2 {
            return Err(LedgerError::Validation(
                "a journal needs at least two lines".to_string(),
            ));
        }

        let mut debits = Decimal::ZERO;
        let mut credits = Decimal::ZERO;
        for line in lines {
            if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
                return Err(LedgerError::Validation(format!(
                    "negative amount on account {}",
                    line.account_id
                )));
            }
            if line.debit.is_zero() == line.credit.is_zero() {
                return Err(LedgerError::Validation(format!(
                    "exactly one of debit/credit must be set on account {}",
                    line.account_id
                )));
            }
            if line.exchange_rate <= Decimal::ZERO {
                return Err(LedgerError::Validation(format!(
                    "exchange rate must be positive on account {}",
                    line.account_id
                )));
            }
            let account = self
                .chart
                .account(line.account_id)
                .ok_or_else(|| LedgerError::UnknownAccount(line.account_id.to_string()))?;
            if !account.active {
                return Err(LedgerError::InactiveAccount(account.code.clone()));
            }

            debits += line.debit * line.exchange_rate;
            credits += line.credit * line.exchange_rate;
        }

        if (debits - credits).abs() > BALANCE_TOLERANCE {
            return Err(LedgerError::UnbalancedEntry { debits, credits });
        }
        Ok(())
    }

    /// Create the mirrored correction journal for `id` and mark the
    /// original reversed. A journal can be reversed once, and a reversal
    /// cannot itself be reversed.
    pub fn reverse_journal(&mut self, id: JournalId) -> Result<JournalId, LedgerError> {
        let index = self
            .journals
            .iter()
            .position(|j| j.id == id)
            .ok_or(LedgerError::UnknownJournal(id))?;
        if self.journals[index].is_reversed || self.journals[index].reversal_of.is_some() {
            return Err(LedgerError::AlreadyReversed(id));
        }

        let original = self.journals[index].clone();
        let reversal_id = self.next_journal_id;
        self.next_journal_id += 1;
        let reversal = Journal {
            id: reversal_id,
            date: original.date,
            description: format!("Reversal of: {}", original.description),
            reference: Some(Reference::new("journal", id.to_string())),
            lines: original.lines.iter().map(JournalLine::mirrored).collect(),
            is_reversed: false,
            reversal_of: Some(id),
        };

        self.journals[index].is_reversed = true;
        self.notify(
            "journal",
            id,
            ChangeAction::Updated,
            Some(&original),
            Some(&self.journals[index]),
        );
        self.notify(
            "journal",
            reversal_id,
            ChangeAction::Created,
            None,
            Some(&reversal),
        );
        self.journals.push(reversal);
        self.reversal_log.push((id, reversal_id));
        Ok(reversal_id)
    }

    /// Balance as of `as_of`, inclusive: `debit - credit` over posted
    /// lines, sign flipped for credit-normal account types. With
    /// `include_descendants`, the whole subtree is folded in; subtree
    /// accounts are expected to share the queried account's currency.
    pub fn account_balance(
        &self,
        account_id: AccountId,
        as_of: NaiveDate,
        include_descendants: bool,
    ) -> Result<Decimal, LedgerError> {
        if self.chart.account(account_id).is_none() {
            return Err(LedgerError::UnknownAccount(account_id.to_string()));
        }

        let mut scope: HashSet<AccountId> = HashSet::new();
        scope.insert(account_id);
        if include_descendants {
            scope.extend(self.chart.descendants(account_id));
        }

        let mut balance = Decimal::ZERO;
        for journal in &self.journals {
            if journal.date > as_of {
                continue;
            }
            for line in &journal.lines {
                if !scope.contains(&line.account_id) {
                    continue;
                }
                // Posting validated the account and accounts are never
                // deleted, so the lookup cannot miss.
                let Some(account) = self.chart.account(line.account_id) else {
                    continue;
                };
                balance += if account.account_type.is_debit_normal() {
                    line.debit - line.credit
                } else {
                    line.credit - line.debit
                };
            }
        }
        Ok(balance)
    }

    pub fn journal(&self, id: JournalId) -> Option<&Journal> {
        self.journals.iter().find(|j| j.id == id)
    }

    /// Posted journals in posting order.
    pub fn journals(&self) -> &[Journal] {
        &self.journals
    }

    /// Original/reversal id pairs, in reversal order.
    pub fn reversal_log(&self) -> &[(JournalId, JournalId)] {
        &self.reversal_log
    }

    fn notify<T: Serialize>(
        &self,
        entity: &str,
        id: impl ToString,
        action: ChangeAction,
        old: Option<&T>,
        new: Option<&T>,
    ) {
        self.audit.record(ChangeNotification {
            entity: entity.to_string(),
            id: id.to_string(),
            action,
            old_value: old.and_then(|v| serde_json::to_value(v).ok()),
            new_value: new.and_then(|v| serde_json::to_value(v).ok()),
        });
    }
}
