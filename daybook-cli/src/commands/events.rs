use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use daybook_core::date_range::DateRange;

use crate::render::print_events;
use crate::session::Session;

pub fn run(
    session: &Session,
    on: Option<NaiveDate>,
    from: Option<&str>,
    to: Option<&str>,
    json: bool,
) -> Result<()> {
    let calendar = session.calendar();

    let events = match on {
        Some(day) => calendar.events_on_date(day),
        None => {
            let range = DateRange::from_args(from, to).map_err(|e| anyhow!(e))?;
            calendar.events_in_range(range.from, range.to)?
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&events)?);
    } else {
        print_events(&events);
    }
    Ok(())
}
