//! The composition root: one event store and one transaction store over the same storage, with
//! the calendar bridge wired between them.

use crate::bridge::CalendarBridge;
use crate::error::{LoadStatus, StoreResult};
use crate::event_store::{EventStore, EVENTS_KEY};
use crate::model::{CalendarEvent, EventDraft, EventId, Transaction, TransactionDraft, TransactionId};
use crate::storage::Storage;
use crate::transaction_store::{TransactionStore, TRANSACTIONS_KEY};
use tracing::{debug, warn};

/// What `Organizer::load` found for each store.
#[derive(Debug)]
pub struct OrganizerLoad {
    pub events: LoadStatus,
    pub transactions: LoadStatus,
}

impl OrganizerLoad {
    /// One message per store whose data was not fully read.
    pub fn warnings(&self) -> Vec<String> {
        [
            self.events.warning("events"),
            self.transactions.warning("transactions"),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Owns both stores and keeps recurring transactions mirrored on the calendar.
///
/// Transaction mutations go through the organizer rather than the store so that the mirror is
/// added before the ledger is persisted and removed when its transaction is deleted.
#[derive(Debug)]
pub struct Organizer<S> {
    storage: S,
    events: EventStore<S>,
    transactions: TransactionStore<S>,
}

impl<S: Storage + Clone> Organizer<S> {
    /// Creates empty stores under the default keys. Call `load` to read existing data.
    pub fn new(storage: S) -> Self {
        Self::with_keys(storage, EVENTS_KEY, TRANSACTIONS_KEY)
    }

    pub fn with_keys(storage: S, events_key: &str, transactions_key: &str) -> Self {
        Self {
            events: EventStore::with_key(storage.clone(), events_key),
            transactions: TransactionStore::with_key(storage.clone(), transactions_key),
            storage,
        }
    }

    /// Loads both stores. Unavailable storage is logged and the organizer keeps working in
    /// memory.
    pub fn load(&mut self) -> OrganizerLoad {
        if !self.storage.is_available() {
            warn!("Storage is not available, events will not persist");
        }
        let load = OrganizerLoad {
            events: self.events.load(),
            transactions: self.transactions.load(),
        };
        debug!(
            "Loaded {} events and {} transactions",
            load.events.count(),
            load.transactions.count()
        );
        load
    }

    pub fn events(&self) -> &EventStore<S> {
        &self.events
    }

    pub fn transactions(&self) -> &TransactionStore<S> {
        &self.transactions
    }

    /// Adds a transaction. A recurring one is also put on the calendar. Calendar failures are
    /// logged and do not fail the add.
    ///
    /// # Errors
    /// `Validation` leaves everything unchanged. `Persist` means the transaction is held in memory
    /// but was not written.
    pub fn add_transaction(&mut self, draft: TransactionDraft) -> StoreResult<Transaction> {
        let transaction = self.transactions.append(draft)?;
        if transaction.recurring() {
            CalendarBridge::new(&mut self.events).mirror(&transaction);
        }
        self.transactions.save()?;
        Ok(transaction)
    }

    /// Replaces a transaction's fields. The calendar is not touched: changing the date or the
    /// recurring flag of an existing transaction does not add, move or remove its mirror.
    pub fn update_transaction(
        &mut self,
        id: TransactionId,
        draft: TransactionDraft,
    ) -> StoreResult<Transaction> {
        self.transactions.update(id, draft)
    }

    /// Deletes a transaction and its calendar mirror, if any. Confirming the deletion with the
    /// user is up to the caller.
    pub fn delete_transaction(&mut self, id: TransactionId) -> StoreResult<Transaction> {
        let removed = self.transactions.take(id)?;
        if removed.recurring() || self.events.contains(&EventId::for_transaction(id)) {
            CalendarBridge::new(&mut self.events).unmirror(&removed);
        }
        self.transactions.save()?;
        Ok(removed)
    }

    /// Adds a user-entered event and saves the calendar.
    pub fn add_event(&mut self, date_key: &str, draft: EventDraft) -> StoreResult<CalendarEvent> {
        let event = self.events.add_plain(date_key, draft)?;
        self.events.save()?;
        Ok(event)
    }

    /// Removes events by id from one date and saves the calendar. Returns how many were removed.
    pub fn remove_event(&mut self, date_key: &str, event_id: &EventId) -> StoreResult<usize> {
        let removed = self.events.remove(date_key, event_id);
        if removed > 0 {
            self.events.save()?;
        }
        Ok(removed)
    }
}
