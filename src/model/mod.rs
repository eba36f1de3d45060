//! Types that represent the core data model, such as `Transaction` and `CalendarEvent`.
mod amount;
pub mod category;
mod event;
mod transaction;

pub use amount::{Amount, AmountError};
pub use category::{categories_for, CategoryOption};
pub use event::{CalendarEvent, EventDraft, EventId, FinanceData, FINANCE_EVENT_PREFIX};
pub use transaction::{
    RecurringFrequency, Transaction, TransactionDraft, TransactionId, TransactionType,
};
