//! Calendar events grouped by date.

use crate::error::{LoadStatus, StoreError, StoreResult};
use crate::model::{CalendarEvent, EventDraft, EventId};
use crate::storage::Storage;
use std::collections::BTreeMap;
use tracing::{debug, trace, warn};

/// The default storage key for the event mapping.
pub const EVENTS_KEY: &str = "calendarEvents";

/// Owns the calendar events, keyed by `YYYY-MM-DD` date. Events on one date keep their insertion
/// order, which is their display order. A date with no events has no entry.
#[derive(Debug, Clone)]
pub struct EventStore<S> {
    storage: S,
    key: String,
    events: BTreeMap<String, Vec<CalendarEvent>>,
}

impl<S: Storage> EventStore<S> {
    /// Creates an empty store that persists under `EVENTS_KEY`. Call `load` to read existing data.
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, EVENTS_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            events: BTreeMap::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Replaces the in-memory events with what is stored. Missing data yields an empty store;
    /// data that is not a JSON object of event lists resets the store to empty and is reported
    /// as `LoadStatus::Reset`. Single events that cannot be read are skipped and counted in
    /// `LoadStatus::Partial`.
    pub fn load(&mut self) -> LoadStatus {
        self.events.clear();
        let raw = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored events found under '{}'", self.key);
                return LoadStatus::Missing;
            }
            Err(e) => {
                warn!("Error loading events: {e:#}");
                return LoadStatus::Reset(StoreError::load(&self.key, format!("{e:#}")));
            }
        };
        let dated = match serde_json::from_str::<BTreeMap<String, Vec<serde_json::Value>>>(&raw) {
            Ok(dated) => dated,
            Err(e) => {
                warn!("Stored events under '{}' are unreadable, starting empty: {e}", self.key);
                return LoadStatus::Reset(StoreError::load(&self.key, e.to_string()));
            }
        };
        let mut skipped = 0;
        for (date, records) in dated {
            let mut list = Vec::with_capacity(records.len());
            for record in records {
                match serde_json::from_value::<CalendarEvent>(record) {
                    Ok(event) => list.push(event),
                    Err(e) => {
                        warn!("Skipping stored event on {date}: {e}");
                        skipped += 1;
                    }
                }
            }
            if !list.is_empty() {
                self.events.insert(date, list);
            }
        }
        let loaded = self.event_count();
        debug!("Loaded {loaded} events for {} dates", self.events.len());
        if skipped > 0 {
            LoadStatus::Partial { loaded, skipped }
        } else {
            LoadStatus::Loaded(loaded)
        }
    }

    /// Writes the whole mapping to storage. On failure the in-memory events are kept.
    pub fn save(&self) -> StoreResult<()> {
        let json = serde_json::to_string(&self.events)
            .map_err(|e| StoreError::persist(&self.key, &e.into()))?;
        self.storage.set_item(&self.key, &json).map_err(|e| {
            warn!("Error saving events: {e:#}");
            StoreError::persist(&self.key, &e)
        })?;
        trace!("Saved {} events", self.event_count());
        Ok(())
    }

    /// Appends `event` to `date_key`. Ids are not checked for duplicates.
    pub fn add(&mut self, date_key: &str, event: CalendarEvent) {
        trace!("Adding event '{}' on {date_key}", event.id());
        self.events
            .entry(date_key.to_string())
            .or_default()
            .push(event);
    }

    /// Validates a user-entered event, gives it a fresh id and appends it to `date_key`. Returns
    /// the stored event. Nothing is persisted; call `save`.
    pub fn add_plain(&mut self, date_key: &str, draft: EventDraft) -> StoreResult<CalendarEvent> {
        let event = draft.into_event(date_key)?;
        self.add(date_key.trim(), event.clone());
        Ok(event)
    }

    /// Removes every event under `date_key` whose id is `event_id`, and drops the date if that
    /// leaves it empty. Returns the number of events removed; a missing date or id removes none.
    pub fn remove(&mut self, date_key: &str, event_id: &EventId) -> usize {
        let Some(list) = self.events.get_mut(date_key) else {
            return 0;
        };
        let before = list.len();
        list.retain(|e| e.id() != event_id);
        let removed = before - list.len();
        if list.is_empty() {
            self.events.remove(date_key);
        }
        if removed > 0 {
            trace!("Removed {removed} event(s) '{event_id}' from {date_key}");
        }
        removed
    }

    /// The events on `date_key` in display order.
    pub fn list(&self, date_key: &str) -> &[CalendarEvent] {
        self.events.get(date_key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Finds the first event with `event_id` on any date, returning its date key with it.
    pub fn find(&self, event_id: &EventId) -> Option<(&str, &CalendarEvent)> {
        self.events.iter().find_map(|(date, list)| {
            list.iter()
                .find(|e| e.id() == event_id)
                .map(|e| (date.as_str(), e))
        })
    }

    pub fn contains(&self, event_id: &EventId) -> bool {
        self.find(event_id).is_some()
    }

    /// The dates that have at least one event, ascending.
    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.events.keys().map(String::as_str)
    }

    /// The total number of events across all dates.
    pub fn event_count(&self) -> usize {
        self.events.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn event(id: &str, title: &str) -> CalendarEvent {
        CalendarEvent::new(EventId::new(id), title)
    }

    #[test]
    fn test_add_preserves_order_and_allows_duplicate_ids() {
        let mut store = EventStore::new(MemoryStorage::new());
        store.add("2024-03-15", event("a", "First"));
        store.add("2024-03-15", event("b", "Second"));
        store.add("2024-03-15", event("a", "Again"));
        let titles: Vec<&str> = store.list("2024-03-15").iter().map(|e| e.title()).collect();
        assert_eq!(titles, vec!["First", "Second", "Again"]);
        assert_eq!(store.event_count(), 3);
    }

    #[test]
    fn test_remove_all_matching_and_drop_empty_date() {
        let mut store = EventStore::new(MemoryStorage::new());
        store.add("2024-03-15", event("a", "First"));
        store.add("2024-03-15", event("a", "Again"));
        store.add("2024-03-16", event("b", "Other"));

        assert_eq!(store.remove("2024-03-15", &EventId::new("a")), 2);
        assert!(store.list("2024-03-15").is_empty());
        assert_eq!(store.dates().collect::<Vec<_>>(), vec!["2024-03-16"]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut store = EventStore::new(MemoryStorage::new());
        store.add("2024-03-15", event("a", "First"));
        assert_eq!(store.remove("2024-01-01", &EventId::new("a")), 0);
        assert_eq!(store.remove("2024-03-15", &EventId::new("zzz")), 0);
        assert_eq!(store.list("2024-03-15").len(), 1);
    }

    #[test]
    fn test_list_unknown_date_is_empty() {
        let store = EventStore::new(MemoryStorage::new());
        assert!(store.list("2024-03-15").is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let storage = MemoryStorage::new();
        let mut store = EventStore::new(storage.clone());
        store.add("2024-03-15", event("a", "Dentist").with_time("09:30"));
        store.add("2024-03-15", event("b", "Lunch").with_description("with Sam"));
        store.add("2024-04-01", event("c", "Rent"));
        store.save().unwrap();

        let mut fresh = EventStore::new(storage);
        let status = fresh.load();
        assert_eq!(status.count(), 3);
        assert_eq!(fresh.list("2024-03-15"), store.list("2024-03-15"));
        assert_eq!(fresh.list("2024-04-01"), store.list("2024-04-01"));
    }

    #[test]
    fn test_load_missing() {
        let mut store = EventStore::new(MemoryStorage::new());
        assert!(matches!(store.load(), LoadStatus::Missing));
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_corrupt_resets() {
        let storage = MemoryStorage::new();
        storage.set_item(EVENTS_KEY, "{not json").unwrap();
        let mut store = EventStore::new(storage);
        store.add("2024-03-15", event("a", "Stale"));
        let status = store.load();
        assert!(status.is_reset());
        assert!(matches!(status, LoadStatus::Reset(StoreError::Load { .. })));
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_skips_unreadable_event() {
        let storage = MemoryStorage::new();
        storage
            .set_item(
                EVENTS_KEY,
                r#"{
                    "2024-03-15": [{"id":"a","title":"Dentist"},{"id":"b"}],
                    "2024-03-16": [{"title":"No id"}]
                }"#,
            )
            .unwrap();
        let mut store = EventStore::new(storage);
        let status = store.load();
        assert!(matches!(status, LoadStatus::Partial { loaded: 1, skipped: 2 }));
        assert_eq!(store.list("2024-03-15").len(), 1);
        assert!(store.list("2024-03-16").is_empty());
        assert_eq!(store.dates().count(), 1);
    }

    #[test]
    fn test_save_failure_keeps_memory() {
        let storage = MemoryStorage::with_quota(0);
        let mut store = EventStore::new(storage);
        store.add("2024-03-15", event("a", "Dentist"));
        let err = store.save().unwrap_err();
        assert!(matches!(err, StoreError::Persist { .. }));
        assert_eq!(store.list("2024-03-15").len(), 1);
    }

    #[test]
    fn test_add_plain_validates() {
        let mut store = EventStore::new(MemoryStorage::new());
        assert!(store.add_plain("2024-03-15", EventDraft::new("")).is_err());
        assert!(store.is_empty());
        let stored = store
            .add_plain("2024-03-15", EventDraft::new("Dentist"))
            .unwrap();
        assert_eq!(store.find(stored.id()).map(|(d, _)| d), Some("2024-03-15"));
    }
}
