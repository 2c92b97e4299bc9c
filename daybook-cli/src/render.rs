//! Colored terminal rendering for daybook types.

use chrono::{Local, NaiveDate, NaiveTime, Timelike};
use daybook_core::{Calendar, Event, Visibility};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for Calendar {
    fn render(&self) -> String {
        format!("📅 {}", self.title())
    }
}

impl Render for Event {
    fn render(&self) -> String {
        let mut line = format!("{} {}", render_time(self), self.subject());

        if self.end_date() != self.start_date() {
            let until = format!(" (until {})", self.end_date().format("%a %b %-d"));
            line.push_str(&until.dimmed().to_string());
        }
        if let Some(location) = self.location() {
            line.push_str(&format!(" @ {}", location).dimmed().to_string());
        }
        if self.visibility() == Visibility::Private {
            line.push_str(&format!(" {}", "private".yellow()));
        }
        line
    }
}

/// Print events grouped under one heading per start date.
pub fn print_events(events: &[Event]) {
    if events.is_empty() {
        println!("{}", "No events found".dimmed());
        return;
    }

    let mut events = events.to_vec();
    events.sort_by_key(|e| e.start_date_time());

    let mut current_date: Option<NaiveDate> = None;
    for event in &events {
        if current_date != Some(event.start_date()) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", date_label(event.start_date()).bold());
            current_date = Some(event.start_date());
        }
        println!("  {}", event.render());
    }
}

/// Format a date as a human-readable label (e.g. "Today", "Tomorrow", "Wed Feb 25")
fn date_label(date: NaiveDate) -> String {
    let today = Local::now().date_naive();

    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

fn render_time(event: &Event) -> String {
    match (event.start_time(), event.end_time()) {
        (Some(start), Some(end)) => format!("{}-{}", clock(start), clock(end)),
        _ => format!("{:>11}", "all-day"),
    }
}

fn clock(time: NaiveTime) -> String {
    if time.second() == 0 {
        time.format("%H:%M").to_string()
    } else {
        time.format("%H:%M:%S").to_string()
    }
}
