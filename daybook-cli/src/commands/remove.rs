use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use owo_colors::OwoColorize;

use crate::session::Session;

pub fn run(
    session: &mut Session,
    subject: &str,
    on: NaiveDate,
    start: Option<NaiveTime>,
) -> Result<()> {
    let event = super::find_event(session.calendar(), subject, on, start)?;
    let removed = session.calendar_mut().remove_event(&event)?;
    session.mark_changed();

    println!("{}", format!("  Removed: {}", removed.key()).red());
    Ok(())
}
