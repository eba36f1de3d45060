use crate::error::{StoreError, StoreResult};
use crate::model::{Amount, TransactionId, TransactionType};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};

/// The prefix of every event id that mirrors a recurring transaction.
pub const FINANCE_EVENT_PREFIX: &str = "finance_";

/// The id of a calendar event.
///
/// Plain events get a random id. Events mirrored from a transaction get `finance_<transaction id>`
/// so that they can be found again by id alone.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh id for a plain event.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// The deterministic id of the event mirroring `transaction_id`.
    pub fn for_transaction(transaction_id: TransactionId) -> Self {
        Self(format!("{FINANCE_EVENT_PREFIX}{transaction_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_finance(&self) -> bool {
        self.0.starts_with(FINANCE_EVENT_PREFIX)
    }
}

impl Display for EventId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Older data stored plain event ids as numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawEventId {
    Number(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawEventId::deserialize(deserializer)? {
            RawEventId::Number(n) => EventId(n.to_string()),
            RawEventId::Text(s) => EventId(s),
        })
    }
}

/// Back-reference from a mirrored event to the transaction it was created from.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceData {
    pub transaction_id: TransactionId,
    pub r#type: TransactionType,
    pub amount: Amount,
}

/// A single entry on the calendar.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub(crate) id: EventId,
    pub(crate) title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) finance_data: Option<FinanceData>,
}

impl CalendarEvent {
    /// Creates a plain, user-entered event.
    pub fn new(id: EventId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            time: None,
            description: None,
            recurring: false,
            finance_data: None,
        }
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub(crate) fn mirrored(
        id: EventId,
        title: String,
        description: String,
        finance_data: FinanceData,
    ) -> Self {
        Self {
            id,
            title,
            time: None,
            description: Some(description),
            recurring: true,
            finance_data: Some(finance_data),
        }
    }

    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn time(&self) -> Option<&str> {
        self.time.as_deref().filter(|t| !t.is_empty())
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }

    pub fn recurring(&self) -> bool {
        self.recurring
    }

    pub fn finance_data(&self) -> Option<&FinanceData> {
        self.finance_data.as_ref()
    }

    /// The text of the event indicator in a day cell: `"09:30 - Dentist"`, or just the title when
    /// no time is set.
    pub fn label(&self) -> String {
        match self.time() {
            Some(time) => format!("{time} - {}", self.title),
            None => self.title.clone(),
        }
    }
}

/// The field set a user submits to create a plain event.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct EventDraft {
    pub title: String,
    pub time: Option<String>,
    pub description: Option<String>,
}

impl EventDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Builds an event with a generated id, failing when the date or title is missing.
    pub(crate) fn into_event(self, date_key: &str) -> StoreResult<CalendarEvent> {
        if date_key.trim().is_empty() {
            return Err(StoreError::validation("An event requires a date"));
        }
        if self.title.trim().is_empty() {
            return Err(StoreError::validation("An event requires a title"));
        }
        Ok(CalendarEvent {
            id: EventId::generate(),
            title: self.title,
            time: self.time.filter(|t| !t.is_empty()),
            description: self.description.filter(|d| !d.is_empty()),
            recurring: false,
            finance_data: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_id_for_transaction() {
        let id = EventId::for_transaction(TransactionId::new(123));
        assert_eq!(id.as_str(), "finance_123");
        assert!(id.is_finance());
        assert!(!EventId::generate().is_finance());
    }

    #[test]
    fn test_numeric_event_id_is_accepted() {
        let json = r#"{"id": 1710460800000, "title": "Dentist", "time": "09:30", "description": ""}"#;
        let event: CalendarEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.id().as_str(), "1710460800000");
        assert_eq!(event.description(), None);
        assert!(!event.recurring());
    }

    #[test]
    fn test_label() {
        let plain = CalendarEvent::new(EventId::new("a"), "Dentist");
        assert_eq!(plain.label(), "Dentist");
        assert_eq!(plain.with_time("09:30").label(), "09:30 - Dentist");
    }

    #[test]
    fn test_draft_requires_title_and_date() {
        assert!(EventDraft::new("Dentist").into_event("").is_err());
        assert!(EventDraft::new(" ").into_event("2024-03-15").is_err());
        let event = EventDraft::new("Dentist").into_event("2024-03-15").unwrap();
        assert_eq!(event.title(), "Dentist");
        assert!(event.finance_data().is_none());
    }

    #[test]
    fn test_mirrored_serializes_camel_case() {
        let event = CalendarEvent::mirrored(
            EventId::for_transaction(TransactionId::new(7)),
            "Payment: $5.00".to_string(),
            "food: Recurring transaction".to_string(),
            FinanceData {
                transaction_id: TransactionId::new(7),
                r#type: TransactionType::Expense,
                amount: Amount::new(rust_decimal::Decimal::new(5, 0)),
            },
        );
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""financeData":{"transactionId":7,"type":"expense","amount":5.0}"#));
        assert!(json.contains(r#""recurring":true"#));
        assert!(!json.contains("time"));
    }
}
