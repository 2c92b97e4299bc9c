use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::OwoColorize;

use crate::EventDetails;
use crate::session::Session;
use crate::utils::parse::resolve_end;

pub fn run(
    session: &mut Session,
    subject: String,
    on: NaiveDate,
    until: Option<NaiveDate>,
    details: EventDetails,
) -> Result<()> {
    let calendar = session.calendar_mut();
    let mut builder = calendar.event_builder(subject, on);

    if let Some(until) = until {
        builder = builder.end_date(until);
    }
    if let Some(start) = details.start {
        let (end_date, end) = resolve_end(
            on,
            until.unwrap_or(on),
            start,
            details.end,
            details.duration.as_deref(),
        )?;
        builder = builder.start_time(start).end_date(end_date).end_time(end);
    }
    if let Some(visibility) = super::visibility(details.private) {
        builder = builder.visibility(visibility);
    }
    if let Some(description) = details.description {
        builder = builder.description(description);
    }
    if let Some(location) = details.location {
        builder = builder.location(location);
    }

    let event = builder.build()?;
    calendar.add_event(event.clone())?;

    println!("{}", format!("  Created: {}", event.key()).green());
    Ok(())
}
