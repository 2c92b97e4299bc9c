use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use owo_colors::OwoColorize;

use crate::render::print_events;
use crate::session::Session;

pub fn run(
    session: &Session,
    subject: &str,
    on: NaiveDate,
    start: Option<NaiveTime>,
    from: Option<NaiveDate>,
) -> Result<()> {
    let calendar = session.calendar();
    let event = super::find_event(calendar, subject, on, start)?;

    if !calendar.is_recurring(&event) {
        println!("{}", format!("{} is not part of a recurring series", event.key()).dimmed());
        return Ok(());
    }

    let members = match from {
        Some(from) => calendar.get_recurring_events_from_date(&event, from)?,
        None => calendar.get_recurring_events_all(&event)?,
    };
    print_events(&members);
    Ok(())
}
