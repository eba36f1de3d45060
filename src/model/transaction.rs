use crate::error::{StoreError, StoreResult};
use crate::model::Amount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The unique id of a transaction. Ids come from a monotonic, time-derived source, so they are
/// milliseconds-since-epoch-like integers.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TransactionId(u64);

impl TransactionId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<u64> for TransactionId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Whether money came in or went out.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
}

serde_plain::derive_display_from_serialize!(TransactionType);
serde_plain::derive_fromstr_from_deserialize!(TransactionType);

/// How often a recurring transaction repeats. This is informational only, nothing schedules
/// future occurrences.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringFrequency {
    Weekly,
    Monthly,
    Yearly,
    #[serde(other)]
    Unknown,
}

serde_plain::derive_display_from_serialize!(RecurringFrequency);
serde_plain::derive_fromstr_from_deserialize!(RecurringFrequency);

/// A single ledger entry as it is stored.
///
/// Field names match the stored JSON records, e.g.
///
/// ```json
/// {
///   "id": 1709251200000,
///   "type": "income",
///   "amount": 1000,
///   "category": "salary",
///   "date": "2024-03-01",
///   "description": "March pay",
///   "recurring": true,
///   "recurringFrequency": "monthly",
///   "createdAt": "2024-03-01T08:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub(crate) id: TransactionId,
    pub(crate) r#type: TransactionType,
    pub(crate) amount: Amount,
    #[serde(default)]
    pub(crate) category: String,
    #[serde(default)]
    pub(crate) date: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) recurring: bool,
    #[serde(default)]
    pub(crate) recurring_frequency: Option<RecurringFrequency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) created_at: Option<DateTime<Utc>>,
}

impl Transaction {
    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn r#type(&self) -> TransactionType {
        self.r#type
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    /// The description, treating an empty string the same as no description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }

    pub fn recurring(&self) -> bool {
        self.recurring
    }

    pub fn recurring_frequency(&self) -> Option<RecurringFrequency> {
        self.recurring_frequency
    }

    /// When the record was created. Records written without a timestamp have none.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn is_income(&self) -> bool {
        self.r#type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.r#type == TransactionType::Expense
    }

    /// The headline shown in a transaction list: the description, or the category when there is
    /// none.
    pub fn title(&self) -> &str {
        self.description().unwrap_or(&self.category)
    }
}

/// The field set a caller submits to create or replace a transaction.
///
/// `id` and `created_at` are normally left empty and assigned by the store. An edit carries them
/// forward from the existing record.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct TransactionDraft {
    pub r#type: TransactionType,
    pub amount: Amount,
    pub category: String,
    pub date: String,
    pub description: Option<String>,
    pub recurring: bool,
    pub recurring_frequency: Option<RecurringFrequency>,
    pub id: Option<TransactionId>,
    pub created_at: Option<DateTime<Utc>>,
}

impl TransactionDraft {
    /// Starts a draft with the required fields.
    pub fn new(
        r#type: TransactionType,
        amount: Amount,
        category: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            r#type,
            amount,
            category: category.into(),
            date: date.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn recurring(mut self, frequency: RecurringFrequency) -> Self {
        self.recurring = true;
        self.recurring_frequency = Some(frequency);
        self
    }

    pub fn id(mut self, id: impl Into<TransactionId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Checks the fields a store requires before it applies any mutation: a non-empty date and an
    /// amount greater than zero.
    pub fn validate(&self) -> StoreResult<()> {
        if self.date.trim().is_empty() {
            return Err(StoreError::validation("A transaction requires a date"));
        }
        if !self.amount.is_positive() {
            return Err(StoreError::validation(format!(
                "A transaction amount must be greater than zero, got {}",
                self.amount.value()
            )));
        }
        Ok(())
    }

    /// Builds the stored record. The frequency is dropped for non-recurring transactions.
    pub(crate) fn into_transaction(
        self,
        id: TransactionId,
        created_at: Option<DateTime<Utc>>,
    ) -> Transaction {
        let recurring_frequency = if self.recurring {
            self.recurring_frequency
        } else {
            None
        };
        Transaction {
            id,
            r#type: self.r#type,
            amount: self.amount,
            category: self.category,
            date: self.date.trim().to_string(),
            description: self.description,
            recurring: self.recurring,
            recurring_frequency,
            created_at,
        }
    }
}

impl From<&Transaction> for TransactionDraft {
    /// Prefills a draft from an existing record, as an edit form does.
    fn from(t: &Transaction) -> Self {
        Self {
            r#type: t.r#type,
            amount: t.amount,
            category: t.category.clone(),
            date: t.date.clone(),
            description: t.description.clone(),
            recurring: t.recurring,
            recurring_frequency: t.recurring_frequency,
            id: Some(t.id),
            created_at: t.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn amount(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    #[test]
    fn test_validate_requires_date() {
        let draft = TransactionDraft::new(TransactionType::Expense, amount("5"), "food", "  ");
        assert!(matches!(draft.validate(), Err(StoreError::Validation(_))));
    }

    #[test]
    fn test_validate_requires_positive_amount() {
        let zero = TransactionDraft::new(TransactionType::Expense, Amount::ZERO, "food", "2024-03-15");
        assert!(zero.validate().is_err());
        let negative =
            TransactionDraft::new(TransactionType::Expense, amount("-1"), "food", "2024-03-15");
        assert!(negative.validate().is_err());
        let ok = TransactionDraft::new(TransactionType::Expense, amount("0.01"), "food", "2024-03-15");
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_frequency_dropped_when_not_recurring() {
        let mut draft =
            TransactionDraft::new(TransactionType::Income, amount("10"), "gift", "2024-03-15");
        draft.recurring_frequency = Some(RecurringFrequency::Monthly);
        let t = draft.into_transaction(TransactionId::new(1), Some(Utc::now()));
        assert!(!t.recurring());
        assert_eq!(t.recurring_frequency(), None);
    }

    #[test]
    fn test_deserialize_stored_record() {
        let json = r#"{
            "id": 1709251200000,
            "type": "income",
            "amount": 1000,
            "category": "salary",
            "date": "2024-03-01",
            "description": "",
            "recurring": true,
            "recurringFrequency": "monthly",
            "createdAt": "2024-03-01T08:00:00.000Z"
        }"#;
        let t: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(t.id(), TransactionId::new(1709251200000));
        assert!(t.is_income());
        assert_eq!(t.amount(), amount("1000"));
        assert_eq!(t.description(), None);
        assert_eq!(t.title(), "salary");
        assert_eq!(t.recurring_frequency(), Some(RecurringFrequency::Monthly));
    }

    #[test]
    fn test_deserialize_without_created_at_or_date() {
        let json = r#"{"id": 7, "type": "expense", "amount": 12, "category": "food"}"#;
        let t: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(t.created_at(), None);
        assert_eq!(t.date(), "");
        let out = serde_json::to_value(&t).unwrap();
        assert!(out.get("createdAt").is_none());
    }

    #[test]
    fn test_deserialize_null_frequency_and_unknown_frequency() {
        let json = r#"{"id": 1, "type": "expense", "amount": 3.5, "category": "food",
            "date": "2024-03-01", "recurring": false, "recurringFrequency": null,
            "createdAt": "2024-03-01T08:00:00Z"}"#;
        let t: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(t.recurring_frequency(), None);

        let json = json.replace("null", "\"fortnightly\"");
        let t: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(t.recurring_frequency(), Some(RecurringFrequency::Unknown));
    }

    #[test]
    fn test_type_display_and_parse() {
        assert_eq!(TransactionType::Income.to_string(), "income");
        assert_eq!(
            TransactionType::from_str("expense").unwrap(),
            TransactionType::Expense
        );
        assert!(TransactionType::from_str("transfer").is_err());
    }
}
