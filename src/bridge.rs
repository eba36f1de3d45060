//! Mirrors recurring transactions into the calendar.
//!
//! A recurring transaction gets one calendar event with the deterministic id
//! `finance_<transaction id>` on the transaction's date. Nothing here can fail the transaction
//! mutation that triggered it: every error is logged and dropped.

use crate::event_store::EventStore;
use crate::model::{CalendarEvent, EventId, FinanceData, Transaction, TransactionType};
use crate::storage::Storage;
use tracing::{debug, warn};

const NO_DESCRIPTION: &str = "Recurring transaction";

/// Operates on an event store it borrows for the duration of one transaction mutation.
pub struct CalendarBridge<'a, S> {
    events: &'a mut EventStore<S>,
}

impl<'a, S: Storage> CalendarBridge<'a, S> {
    pub fn new(events: &'a mut EventStore<S>) -> Self {
        Self { events }
    }

    /// Adds the mirror event for `transaction` under its date and saves the event store. Does
    /// nothing if an event with the mirror id already exists on any date.
    pub fn mirror(&mut self, transaction: &Transaction) {
        let event_id = EventId::for_transaction(transaction.id());
        if let Some((date, _)) = self.events.find(&event_id) {
            debug!("Mirror event '{event_id}' already exists on {date}, not adding another");
            return;
        }
        let event = mirror_event(transaction);
        debug!("Adding '{}' on {}", event.title(), transaction.date());
        self.events.add(transaction.date(), event);
        if let Err(e) = self.events.save() {
            warn!("Error adding transaction to calendar: {e}");
        }
    }

    /// Removes the mirror event of `transaction` and saves the event store. The event is looked
    /// for under the transaction's date first, then on whichever date holds it.
    pub fn unmirror(&mut self, transaction: &Transaction) {
        let event_id = EventId::for_transaction(transaction.id());
        let mut removed = self.events.remove(transaction.date(), &event_id);
        if removed == 0 {
            let elsewhere = self
                .events
                .find(&event_id)
                .map(|(date, _)| date.to_string());
            if let Some(date) = elsewhere {
                removed = self.events.remove(&date, &event_id);
            }
        }
        if removed == 0 {
            debug!("No mirror event '{event_id}' to remove");
            return;
        }
        debug!("Removed mirror event '{event_id}'");
        if let Err(e) = self.events.save() {
            warn!("Error removing transaction from calendar: {e}");
        }
    }
}

/// Builds the event that represents `transaction` on the calendar.
pub fn mirror_event(transaction: &Transaction) -> CalendarEvent {
    let verb = match transaction.r#type() {
        TransactionType::Income => "Income",
        TransactionType::Expense => "Payment",
    };
    let title = format!("{verb}: {}", transaction.amount());
    let description = format!(
        "{}: {}",
        transaction.category(),
        transaction.description().unwrap_or(NO_DESCRIPTION)
    );
    CalendarEvent::mirrored(
        EventId::for_transaction(transaction.id()),
        title,
        description,
        FinanceData {
            transaction_id: transaction.id(),
            r#type: transaction.r#type(),
            amount: transaction.amount(),
        },
    )
}
