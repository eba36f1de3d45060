//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::model::{Amount, RecurringFrequency, TransactionDraft, TransactionType};
use crate::storage::FileStorage;
use crate::{Config, Organizer};
use std::str::FromStr;
use tempfile::TempDir;

/// Test environment that sets up a daybook home directory with a Config and empty storage.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::create(temp_dir.path().join("daybook")).unwrap();
        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// A freshly loaded organizer over this environment's storage.
    pub fn organizer(&self) -> Organizer<FileStorage> {
        self.config.organizer().unwrap()
    }

    /// Adds a recurring monthly salary of $1,000.00 on 2024-03-01 with id 123, and a $42.50 food
    /// expense on 2024-03-15.
    pub fn insert_test_transactions(&self) {
        let mut organizer = self.organizer();
        organizer
            .add_transaction(
                TransactionDraft::new(
                    TransactionType::Income,
                    Amount::from_str("1000").unwrap(),
                    "salary",
                    "2024-03-01",
                )
                .recurring(RecurringFrequency::Monthly)
                .id(123),
            )
            .unwrap();
        organizer
            .add_transaction(
                TransactionDraft::new(
                    TransactionType::Expense,
                    Amount::from_str("42.50").unwrap(),
                    "food",
                    "2024-03-15",
                )
                .description("Groceries"),
            )
            .unwrap();
    }
}
