//! Event command handlers.

use crate::args::{EventAddArgs, EventListArgs, EventRemoveArgs};
use crate::commands::{plural, Out};
use crate::dates;
use crate::model::{CalendarEvent, EventDraft, EventId};
use crate::{Config, Result};
use serde::Serialize;

/// An event together with the date it is on.
#[derive(Debug, Clone, Serialize)]
pub struct DatedEvent {
    pub date: String,
    pub event: CalendarEvent,
}

/// Adds a plain event to a date.
pub fn event_add(config: Config, args: EventAddArgs) -> Result<Out<CalendarEvent>> {
    let (mut organizer, load) = config.open()?;
    let draft = EventDraft {
        title: args.title().to_string(),
        time: args.time().map(str::to_string),
        description: args.description().map(str::to_string),
    };
    let event = organizer.add_event(args.date(), draft)?;
    let message = format!(
        "Added '{}' on {} with id {}",
        event.label(),
        dates::format_date_for_display(args.date()),
        event.id()
    );
    Ok(Out::new(message, event).with_warnings(load.warnings()))
}

/// Lists the events of one date, or of all dates in date order.
pub fn event_list(config: Config, args: EventListArgs) -> Result<Out<Vec<DatedEvent>>> {
    let (organizer, load) = config.open()?;
    let events = organizer.events();
    let dates: Vec<&str> = match args.date() {
        Some(date) => vec![date],
        None => events.dates().collect(),
    };
    let listed: Vec<DatedEvent> = dates
        .into_iter()
        .flat_map(|date| {
            events.list(date).iter().map(move |event| DatedEvent {
                date: date.to_string(),
                event: event.clone(),
            })
        })
        .collect();

    let mut message = format!("Found {}", plural(listed.len(), "event"));
    for item in &listed {
        let source = if item.event.id().is_finance() {
            "  (from a transaction)"
        } else {
            ""
        };
        message.push_str(&format!(
            "\n{}  {}  [{}]{source}",
            dates::format_date_for_display(&item.date),
            item.event.label(),
            item.event.id()
        ));
    }
    Ok(Out::new(message, listed).with_warnings(load.warnings()))
}

/// Removes an event from a date. Removing an event that does not exist is not an error.
pub fn event_remove(config: Config, args: EventRemoveArgs) -> Result<Out<usize>> {
    let (mut organizer, load) = config.open()?;
    let removed = organizer.remove_event(args.date(), &EventId::new(args.id()))?;
    let message = if removed == 0 {
        format!("No event '{}' found on {}", args.id(), args.date())
    } else {
        format!("Removed {} from {}", plural(removed, "event"), args.date())
    };
    Ok(Out::new(message, removed).with_warnings(load.warnings()))
}
