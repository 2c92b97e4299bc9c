use anyhow::{Result, bail};
use chrono::{NaiveDate, Weekday};
use daybook_core::RecurrenceRequest;
use owo_colors::OwoColorize;

use crate::EventDetails;
use crate::render::Render;
use crate::session::Session;
use crate::utils::parse::resolve_end;

pub fn run(
    session: &mut Session,
    subject: String,
    from: NaiveDate,
    days: Vec<Weekday>,
    count: usize,
    details: EventDetails,
) -> Result<()> {
    let mut request = RecurrenceRequest::new(subject, from, days, count);

    if let Some(start) = details.start {
        let (end_date, end) =
            resolve_end(from, from, start, details.end, details.duration.as_deref())?;
        if end_date != from {
            bail!("Each occurrence must end on the day it starts");
        }
        request = request.times(start, end);
    }
    if let Some(visibility) = super::visibility(details.private) {
        request = request.visibility(visibility);
    }
    if let Some(description) = details.description {
        request = request.description(description);
    }
    if let Some(location) = details.location {
        request = request.location(location);
    }

    let created = session.calendar_mut().add_recurring_event(&request)?;

    println!(
        "{}",
        format!("  Created {} occurrences of '{}':", created.len(), request.subject).green()
    );
    for event in &created {
        println!("    {} {}", event.start_date().format("%a %b %-d"), event.render());
    }
    Ok(())
}
