use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use owo_colors::OwoColorize;

use crate::session::Session;

pub fn run(session: &Session, on: NaiveDate, at: NaiveTime) -> Result<()> {
    let calendar = session.calendar();
    let moment = format!("{} {}", on, at.format("%H:%M"));

    if calendar.is_busy(on, at) {
        println!("{} {}", "Busy".red().bold(), moment);
        let at = on.and_time(at);
        for event in calendar.events_on_date(on).iter().filter(|e| e.contains(at)) {
            println!("  {}", event.key().to_string().dimmed());
        }
    } else {
        println!("{} {}", "Free".green().bold(), moment);
    }
    Ok(())
}
