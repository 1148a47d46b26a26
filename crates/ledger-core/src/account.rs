use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

pub type AccountId = i64;

/// The five fundamental account categories. Closed set: a new category is
/// a code change, not a new string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    Asset,
    Liability,
    Income,
    Expense,
    Equity,
}

impl AccountType {
    /// Whether balances grow on the debit side. Liability, income and
    /// equity accounts are credit-normal.
    pub fn is_debit_normal(&self) -> bool {
        matches!(self, AccountType::Asset | AccountType::Expense)
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountType::Asset => write!(f, "asset"),
            AccountType::Liability => write!(f, "liability"),
            AccountType::Income => write!(f, "income"),
            AccountType::Expense => write!(f, "expense"),
            AccountType::Equity => write!(f, "equity"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    /// Unique, immutable handle; there is no API to change a code once
    /// the account exists.
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub parent: Option<AccountId>,
    pub currency: String,
    pub active: bool,
}

/// The account tree. Parent links are cycle-checked on every change.
#[derive(Debug)]
pub struct ChartOfAccounts {
    accounts: HashMap<AccountId, Account>,
    by_code: HashMap<String, AccountId>,
    next_id: AccountId,
}

impl Default for ChartOfAccounts {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartOfAccounts {
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
            by_code: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn add_account(
        &mut self,
        code: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
        parent: Option<AccountId>,
        currency: impl Into<String>,
    ) -> Result<AccountId, LedgerError> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(LedgerError::Validation("account code is empty".to_string()));
        }
        if self.by_code.contains_key(&code) {
            return Err(LedgerError::Validation(format!(
                "account code {code} already exists"
            )));
        }
        if let Some(parent_id) = parent {
            if !self.accounts.contains_key(&parent_id) {
                return Err(LedgerError::UnknownAccount(parent_id.to_string()));
            }
        }

        let id = self.next_id;
        self.next_id += 1;
        let account = Account {
            id,
            code: code.clone(),
            name: name.into(),
            account_type,
            parent,
            currency: currency.into(),
            active: true,
        };
        self.accounts.insert(id, account);
        self.by_code.insert(code, id);
        Ok(id)
    }

    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(&id)
    }

    pub fn by_code(&self, code: &str) -> Option<&Account> {
        self.by_code.get(code).and_then(|id| self.accounts.get(id))
    }

    /// Move an account under a new parent (or to the root). Rejects a
    /// parent chain that would loop back through the account itself.
    pub fn set_parent(
        &mut self,
        id: AccountId,
        new_parent: Option<AccountId>,
    ) -> Result<(), LedgerError> {
        if !self.accounts.contains_key(&id) {
            return Err(LedgerError::UnknownAccount(id.to_string()));
        }
        if let Some(parent_id) = new_parent {
            if !self.accounts.contains_key(&parent_id) {
                return Err(LedgerError::UnknownAccount(parent_id.to_string()));
            }
            let mut cursor = Some(parent_id);
            while let Some(current) = cursor {
                if current == id {
                    return Err(LedgerError::Validation(format!(
                        "account {id} cannot be its own ancestor"
                    )));
                }
                cursor = self.accounts.get(&current).and_then(|a| a.parent);
            }
        }
        // Checked above.
        if let Some(account) = self.accounts.get_mut(&id) {
            account.parent = new_parent;
        }
        Ok(())
    }

    pub fn set_active(&mut self, id: AccountId, active: bool) -> Result<(), LedgerError> {
        let account = self
            .accounts
            .get_mut(&id)
            .ok_or_else(|| LedgerError::UnknownAccount(id.to_string()))?;
        account.active = active;
        Ok(())
    }

    /// Transitive closure of child accounts, excluding `id` itself.
    pub fn descendants(&self, id: AccountId) -> Vec<AccountId> {
        let mut found = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            for account in self.accounts.values() {
                if account.parent == Some(current) {
                    found.push(account.id);
                    stack.push(account.id);
                }
            }
        }
        found
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }
}
