//! The month view: which month is shown and what each day cell holds.

use crate::dates;
use crate::event_store::EventStore;
use crate::model::CalendarEvent;
use crate::storage::Storage;
use anyhow::Context;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// The month currently shown. Months are 1-based.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
pub struct MonthCursor {
    year: i32,
    month: u32,
}

impl MonthCursor {
    /// Fails for a month outside `1..=12` or a year chrono cannot represent.
    pub fn new(year: i32, month: u32) -> crate::Result<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .with_context(|| format!("Invalid month {year}-{month:02}"))?;
        Ok(Self { year, month })
    }

    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Moves by `months`, which may be negative, wrapping across years.
    pub fn navigate(&self, months: i32) -> Self {
        let index = self.year * 12 + (self.month as i32 - 1) + months;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// The first day of the month.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// The heading of the month view, e.g. `March 2024`.
    pub fn title(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

/// One day of the month grid.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct DayCell {
    pub date_key: String,
    pub day: u32,
    pub is_weekend: bool,
    pub is_today: bool,
    /// The day's events in display order.
    pub events: Vec<CalendarEvent>,
}

/// A month laid out for a Sunday-first week grid.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct MonthGrid {
    pub title: String,
    /// Empty cells before the 1st; the weekday of the 1st with Sunday as 0.
    pub leading_blanks: u32,
    pub days: Vec<DayCell>,
}

impl MonthGrid {
    pub fn build<S: Storage>(cursor: MonthCursor, events: &EventStore<S>, today: NaiveDate) -> Self {
        let first = cursor.first_day();
        let len = dates::days_in_month(cursor.year(), cursor.month()).unwrap_or_default();
        let days = first
            .iter_days()
            .take(len as usize)
            .map(|date| {
                let date_key = dates::format_date_key(date);
                let events = events.list(&date_key).to_vec();
                DayCell {
                    day: date.day(),
                    is_weekend: dates::is_weekend(date),
                    is_today: date == today,
                    date_key,
                    events,
                }
            })
            .collect();
        Self {
            title: cursor.title(),
            leading_blanks: first.weekday().num_days_from_sunday(),
            days,
        }
    }

    /// Days that have at least one event.
    pub fn busy_days(&self) -> impl Iterator<Item = &DayCell> {
        self.days.iter().filter(|d| !d.events.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EventDraft, EventId};
    use crate::storage::MemoryStorage;

    #[test]
    fn test_navigate_wraps_years() {
        let march = MonthCursor::new(2024, 3).unwrap();
        assert_eq!(march.navigate(-3), MonthCursor::new(2023, 12).unwrap());
        assert_eq!(march.navigate(10), MonthCursor::new(2025, 1).unwrap());
        assert_eq!(march.navigate(0), march);
        assert_eq!(march.navigate(-15), MonthCursor::new(2022, 12).unwrap());
    }

    #[test]
    fn test_invalid_month() {
        assert!(MonthCursor::new(2024, 0).is_err());
        assert!(MonthCursor::new(2024, 13).is_err());
    }

    #[test]
    fn test_title() {
        assert_eq!(MonthCursor::new(2024, 3).unwrap().title(), "March 2024");
    }

    #[test]
    fn test_grid_layout() {
        let mut events = EventStore::new(MemoryStorage::new());
        events
            .add_plain("2024-03-15", EventDraft::new("Dentist"))
            .unwrap();
        events.add(
            "2024-04-01",
            crate::model::CalendarEvent::new(EventId::new("x"), "Next month"),
        );
        let today = dates::parse_date_key("2024-03-15").unwrap();
        let grid = MonthGrid::build(MonthCursor::containing(today), &events, today);

        // March 1st 2024 was a Friday.
        assert_eq!(grid.leading_blanks, 5);
        assert_eq!(grid.days.len(), 31);
        assert_eq!(grid.days[0].date_key, "2024-03-01");
        assert!(grid.days[1].is_weekend);
        assert!(!grid.days[3].is_weekend);

        let fifteenth = &grid.days[14];
        assert!(fifteenth.is_today);
        assert_eq!(fifteenth.events.len(), 1);
        assert_eq!(grid.busy_days().count(), 1);
    }

    #[test]
    fn test_grid_leap_february() {
        let events = EventStore::new(MemoryStorage::new());
        let today = dates::parse_date_key("2024-03-15").unwrap();
        let grid = MonthGrid::build(MonthCursor::new(2024, 2).unwrap(), &events, today);
        assert_eq!(grid.days.len(), 29);
        assert_eq!(grid.leading_blanks, 4);
        assert!(grid.days.iter().all(|d| !d.is_today));
    }
}
