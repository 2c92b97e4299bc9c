pub mod busy;
pub mod calendars;
pub mod edit;
pub mod events;
pub mod export;
pub mod import;
pub mod new;
pub mod remove;
pub mod repeat;
pub mod series;

use anyhow::{Result, anyhow};
use chrono::{NaiveDate, NaiveTime};
use daybook_core::{Calendar, Event, Visibility};

/// Look up an event by subject, date and start time, or explain what is missing.
fn find_event(
    calendar: &Calendar,
    subject: &str,
    on: NaiveDate,
    start: Option<NaiveTime>,
) -> Result<Event> {
    calendar.get_event(subject, on, start).ok_or_else(|| {
        let at = start.map(|t| format!(" at {}", t.format("%H:%M"))).unwrap_or_default();
        anyhow!("No event '{}' on {}{} in '{}'", subject, on, at, calendar.title())
    })
}

fn visibility(private: bool) -> Option<Visibility> {
    private.then_some(Visibility::Private)
}
