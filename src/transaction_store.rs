//! The transaction ledger and the figures derived from it.

use crate::dates;
use crate::error::{LoadStatus, StoreError, StoreResult};
use crate::filter::TransactionQuery;
use crate::model::category::capitalize;
use crate::model::{Amount, Transaction, TransactionDraft, TransactionId};
use crate::storage::Storage;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// The default storage key for the transaction list.
pub const TRANSACTIONS_KEY: &str = "financeTransactions";

/// Income, expense and balance over every transaction.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DashboardTotals {
    pub total_income: Amount,
    pub total_expenses: Amount,
    /// `total_income - total_expenses`; negative when spending exceeds income.
    pub balance: Amount,
}

/// The summed expenses of one category.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CategoryTotal {
    pub category: String,
    pub total: Amount,
}

impl CategoryTotal {
    /// The category as a chart label, e.g. `Food`.
    pub fn label(&self) -> String {
        capitalize(&self.category)
    }
}

/// Owns the flat list of transactions, unique by id, in insertion order.
#[derive(Debug, Clone)]
pub struct TransactionStore<S> {
    storage: S,
    key: String,
    transactions: Vec<Transaction>,
    last_issued: u64,
}

impl<S: Storage> TransactionStore<S> {
    /// Creates an empty store that persists under `TRANSACTIONS_KEY`. Call `load` to read existing
    /// data.
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, TRANSACTIONS_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            transactions: Vec::new(),
            last_issued: 0,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Replaces the in-memory list with what is stored. Missing data yields an empty store;
    /// data that is not a JSON array resets the store to empty and is reported as
    /// `LoadStatus::Reset`. Records that cannot be read on their own are skipped and counted in
    /// `LoadStatus::Partial`; the rest load.
    pub fn load(&mut self) -> LoadStatus {
        self.transactions.clear();
        let raw = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored transactions found under '{}'", self.key);
                return LoadStatus::Missing;
            }
            Err(e) => {
                warn!("Error loading transactions: {e:#}");
                return LoadStatus::Reset(StoreError::load(&self.key, format!("{e:#}")));
            }
        };
        let records = match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    "Stored transactions under '{}' are unreadable, starting empty: {e}",
                    self.key
                );
                return LoadStatus::Reset(StoreError::load(&self.key, e.to_string()));
            }
        };
        let mut skipped = 0;
        for (index, record) in records.into_iter().enumerate() {
            match serde_json::from_value::<Transaction>(record) {
                Ok(t) if self.get(t.id()).is_some() => {
                    warn!("Skipping stored transaction {index}: duplicate id {}", t.id());
                    skipped += 1;
                }
                Ok(t) => self.transactions.push(t),
                Err(e) => {
                    warn!("Skipping stored transaction {index}: {e}");
                    skipped += 1;
                }
            }
        }
        let loaded = self.transactions.len();
        debug!("Loaded {loaded} transactions");
        if skipped > 0 {
            LoadStatus::Partial { loaded, skipped }
        } else {
            LoadStatus::Loaded(loaded)
        }
    }

    /// Writes the whole list to storage. On failure the in-memory list is kept.
    pub fn save(&self) -> StoreResult<()> {
        let json = serde_json::to_string(&self.transactions)
            .map_err(|e| StoreError::persist(&self.key, &e.into()))?;
        self.storage.set_item(&self.key, &json).map_err(|e| {
            warn!("Error saving transactions: {e:#}");
            StoreError::persist(&self.key, &e)
        })?;
        trace!("Saved {} transactions", self.transactions.len());
        Ok(())
    }

    /// Validates and appends a new transaction, then persists. Assigns an id and creation time
    /// unless the draft carries them.
    ///
    /// # Errors
    /// - `Validation` if the date is empty, the amount is not greater than zero, or the draft's id
    ///   is already taken. Nothing is changed.
    /// - `Persist` if storage rejects the write. The transaction stays in memory.
    pub fn add(&mut self, draft: TransactionDraft) -> StoreResult<Transaction> {
        let transaction = self.append(draft)?;
        self.save()?;
        Ok(transaction)
    }

    /// The in-memory half of `add`.
    pub(crate) fn append(&mut self, draft: TransactionDraft) -> StoreResult<Transaction> {
        draft.validate()?;
        let id = match draft.id {
            Some(id) if self.get(id).is_some() => {
                return Err(StoreError::validation(format!(
                    "A transaction with id {id} already exists"
                )))
            }
            Some(id) => {
                self.last_issued = self.last_issued.max(id.value());
                id
            }
            None => self.next_id()?,
        };
        let created_at = Some(draft.created_at.unwrap_or_else(Utc::now));
        let transaction = draft.into_transaction(id, created_at);
        debug!(
            "Adding {} transaction {id} of {} on {}",
            transaction.r#type(),
            transaction.amount(),
            transaction.date()
        );
        self.transactions.push(transaction.clone());
        Ok(transaction)
    }

    /// Replaces the fields of transaction `id` with `draft`, keeping its id and creation time and
    /// its position in the list, then persists. Returns the updated record.
    ///
    /// # Errors
    /// - `NotFound` if no transaction has `id`.
    /// - `Validation` if the draft is invalid.
    /// - `Persist` if storage rejects the write. The update stays in memory.
    pub fn update(&mut self, id: TransactionId, draft: TransactionDraft) -> StoreResult<Transaction> {
        let index = self.index_of(id).ok_or(StoreError::NotFound(id))?;
        draft.validate()?;
        let created_at = self.transactions[index].created_at();
        let updated = draft.into_transaction(id, created_at);
        debug!("Updating transaction {id}");
        self.transactions[index] = updated.clone();
        self.save()?;
        Ok(updated)
    }

    /// Removes transaction `id` and persists. Returns the removed record so that its calendar
    /// mirror can be removed too.
    ///
    /// # Errors
    /// - `NotFound` if no transaction has `id`. Nothing is changed.
    /// - `Persist` if storage rejects the write. The removal stays in memory.
    pub fn remove(&mut self, id: TransactionId) -> StoreResult<Transaction> {
        let removed = self.take(id)?;
        self.save()?;
        Ok(removed)
    }

    /// The in-memory half of `remove`.
    pub(crate) fn take(&mut self, id: TransactionId) -> StoreResult<Transaction> {
        let index = self.index_of(id).ok_or(StoreError::NotFound(id))?;
        debug!("Removing transaction {id}");
        Ok(self.transactions.remove(index))
    }

    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id() == id)
    }

    /// Every transaction in insertion order.
    pub fn all(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Sums income and expenses over all transactions.
    pub fn dashboard_totals(&self) -> DashboardTotals {
        let (income, expenses): (Vec<&Transaction>, Vec<&Transaction>) =
            self.transactions.iter().partition(|t| t.is_income());
        let total_income: Amount = income.iter().map(|t| t.amount()).sum();
        let total_expenses: Amount = expenses.iter().map(|t| t.amount()).sum();
        DashboardTotals {
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
        }
    }

    /// The transactions passing `query` relative to today's local date, newest date first.
    pub fn filtered_view(&self, query: &TransactionQuery) -> Vec<&Transaction> {
        self.filtered_view_on(query, dates::today())
    }

    /// Like `filtered_view`, with `today` supplied. Transactions on the same date keep their
    /// insertion order; undated ones come last.
    pub fn filtered_view_on(&self, query: &TransactionQuery, today: NaiveDate) -> Vec<&Transaction> {
        let mut view: Vec<(Option<NaiveDate>, &Transaction)> = self
            .transactions
            .iter()
            .filter(|t| query.matches(t, today))
            .map(|t| (dates::parse_date_key(t.date()), t))
            .collect();
        view.sort_by(|(a, _), (b, _)| b.cmp(a));
        trace!("Filtered to {} transactions", view.len());
        view.into_iter().map(|(_, t)| t).collect()
    }

    /// Expense totals per category, largest first. Income is not included. Categories with equal
    /// totals keep the order in which they first appear.
    pub fn category_totals(&self) -> Vec<CategoryTotal> {
        let mut totals: Vec<CategoryTotal> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for t in self.transactions.iter().filter(|t| t.is_expense()) {
            match index.get(t.category()) {
                Some(&i) => totals[i].total = totals[i].total + t.amount(),
                None => {
                    index.insert(t.category(), totals.len());
                    totals.push(CategoryTotal {
                        category: t.category().to_string(),
                        total: t.amount(),
                    });
                }
            }
        }
        totals.sort_by(|a, b| b.total.cmp(&a.total));
        totals
    }

    fn index_of(&self, id: TransactionId) -> Option<usize> {
        self.transactions.iter().position(|t| t.id() == id)
    }

    /// Ids follow the clock in milliseconds but never repeat or go backwards, even for two
    /// transactions added within the same millisecond. Fails once the largest id in use is
    /// `u64::MAX`.
    fn next_id(&mut self) -> StoreResult<TransactionId> {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        let max_existing = self
            .transactions
            .iter()
            .map(|t| t.id().value())
            .max()
            .unwrap_or_default();
        let floor = self
            .last_issued
            .max(max_existing)
            .checked_add(1)
            .ok_or_else(|| StoreError::validation("No transaction ids are left to assign"))?;
        let id = now.max(floor);
        self.last_issued = id;
        Ok(TransactionId::new(id))
    }
}
