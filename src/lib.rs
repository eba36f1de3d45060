//! daybook: a local personal organizer.
//!
//! A month calendar of date-keyed events (`EventStore`) and a ledger of income and expense
//! transactions with reporting (`TransactionStore`) share one key-value `Storage`. The
//! `Organizer` owns both and mirrors recurring transactions onto the calendar through the
//! `CalendarBridge`.

pub mod args;
pub mod bridge;
pub mod calendar;
pub mod commands;
mod config;
pub mod dates;
mod error;
mod event_store;
pub mod filter;
pub mod model;
mod organizer;
pub mod storage;
mod transaction_store;
mod utils;

#[cfg(test)]
mod test;

pub use bridge::CalendarBridge;
pub use config::Config;
pub use error::{Error, LoadStatus, Result, StoreError, StoreResult};
pub use event_store::{EventStore, EVENTS_KEY};
pub use organizer::{Organizer, OrganizerLoad};
pub use transaction_store::{CategoryTotal, DashboardTotals, TransactionStore, TRANSACTIONS_KEY};
