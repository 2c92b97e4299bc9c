use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use clap::Args;
use daybook_core::{Event, Visibility};
use owo_colors::OwoColorize;

use crate::session::Session;
use crate::utils::parse::parse_time;

/// Changes applied by `daybook edit`. Anything left out is kept.
#[derive(Args, Default)]
pub struct Changes {
    /// New subject
    #[arg(long)]
    rename: Option<String>,

    /// New start date (YYYY-MM-DD)
    #[arg(long, value_parser = daybook_core::date_range::parse_date)]
    date: Option<NaiveDate>,

    /// New start time (HH:MM)
    #[arg(long, value_parser = parse_time, requires = "to", conflicts_with = "all_day")]
    from: Option<NaiveTime>,

    /// New end time (HH:MM)
    #[arg(long, value_parser = parse_time, requires = "from")]
    to: Option<NaiveTime>,

    /// Make the event all-day
    #[arg(long)]
    all_day: bool,

    /// New description (empty to clear)
    #[arg(long)]
    description: Option<String>,

    /// New location (empty to clear)
    #[arg(long)]
    location: Option<String>,

    /// Change visibility to private
    #[arg(long, conflicts_with = "public")]
    private: bool,

    /// Change visibility to public
    #[arg(long)]
    public: bool,
}

impl Changes {
    /// Apply the changes to a copy of `event`.
    fn apply(self, event: &Event) -> Result<Event> {
        let mut edited = event.clone();

        if let Some(subject) = self.rename {
            edited.set_subject(subject)?;
        }
        if let Some(date) = self.date {
            let end = date + (edited.end_date() - edited.start_date());
            // Moving forward, the end has to move first to keep start <= end.
            if date > edited.start_date() {
                edited.set_end_date(end)?;
                edited.set_start_date(date)?;
            } else {
                edited.set_start_date(date)?;
                edited.set_end_date(end)?;
            }
        }
        if self.all_day {
            edited.set_all_day();
        }
        if let (Some(from), Some(to)) = (self.from, self.to) {
            edited.set_times(from, to)?;
        }
        if let Some(description) = self.description {
            edited.set_description(Some(description));
        }
        if let Some(location) = self.location {
            edited.set_location(Some(location));
        }
        if self.private {
            edited.set_visibility(Visibility::Private);
        } else if self.public {
            edited.set_visibility(Visibility::Public);
        }

        Ok(edited)
    }
}

pub fn run(
    session: &mut Session,
    subject: &str,
    on: NaiveDate,
    start: Option<NaiveTime>,
    changes: Changes,
) -> Result<()> {
    let event = super::find_event(session.calendar(), subject, on, start)?;
    let edited = changes.apply(&event)?;
    let calendar = session.calendar_mut();

    if calendar.is_recurring(&event) {
        calendar.modify_recurring_event_instance(edited.clone())?;
        println!("{}", "  Occurrence detached from its series".dimmed());
    } else {
        calendar.update_event(&event, edited.clone())?;
    }

    println!("{}", format!("  Updated: {}", edited.key()).yellow());
    Ok(())
}
