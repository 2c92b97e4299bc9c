mod commands;
mod render;
mod session;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime, Weekday};
use clap::{Args, Parser, Subcommand};
use daybook_core::date_range::parse_date;
use tracing_subscriber::EnvFilter;

use session::Session;
use utils::parse::{parse_time, parse_weekday_arg};

#[derive(Parser)]
#[command(name = "daybook")]
#[command(about = "Keep local calendars of events, stored as CSV files")]
struct Cli {
    /// Calendar directory (overrides calendar_dir from the config file)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Calendar to operate on (by title); created if it does not exist
    #[arg(short, long, global = true)]
    calendar: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Fields shared by `new` and `repeat`.
#[derive(Args)]
pub struct EventDetails {
    /// Start time (HH:MM); omit for an all-day event
    #[arg(long, value_parser = parse_time, requires = "timing")]
    start: Option<NaiveTime>,

    /// End time (HH:MM)
    #[arg(long, value_parser = parse_time, group = "timing", requires = "start")]
    end: Option<NaiveTime>,

    /// Length of the event instead of an end time (e.g. "1h 30m")
    #[arg(long, group = "timing", requires = "start")]
    duration: Option<String>,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    location: Option<String>,

    /// Mark the event private (defaults to the calendar's visibility)
    #[arg(long)]
    private: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List calendars
    Calendars,
    /// Add a single event
    New {
        subject: String,

        /// Start date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        on: NaiveDate,

        /// Last day of a multi-day event (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        until: Option<NaiveDate>,

        #[command(flatten)]
        details: EventDetails,
    },
    /// Add a recurring event on fixed weekdays
    Repeat {
        subject: String,

        /// First day to consider (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        from: NaiveDate,

        /// Weekdays, comma separated (e.g. "mon,wed")
        #[arg(long, value_delimiter = ',', value_parser = parse_weekday_arg, required = true)]
        days: Vec<Weekday>,

        /// Total number of occurrences
        #[arg(long)]
        count: usize,

        #[command(flatten)]
        details: EventDetails,
    },
    /// Show events
    Events {
        /// Show a single day (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date, conflicts_with_all = ["from", "to"])]
        on: Option<NaiveDate>,

        /// Show events from this date (YYYY-MM-DD, or "start" for all past events)
        #[arg(long)]
        from: Option<String>,

        /// Show events until this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Print events as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check whether a moment is taken by an event
    Busy {
        #[arg(long, value_parser = parse_date)]
        on: NaiveDate,

        #[arg(long, value_parser = parse_time)]
        at: NaiveTime,
    },
    /// Remove an event
    Remove {
        subject: String,

        #[arg(long, value_parser = parse_date)]
        on: NaiveDate,

        /// Start time, for timed events
        #[arg(long, value_parser = parse_time)]
        start: Option<NaiveTime>,
    },
    /// Change an event (a recurring occurrence is detached from its series)
    Edit {
        subject: String,

        #[arg(long, value_parser = parse_date)]
        on: NaiveDate,

        /// Start time, for timed events
        #[arg(long, value_parser = parse_time)]
        start: Option<NaiveTime>,

        #[command(flatten)]
        changes: commands::edit::Changes,
    },
    /// Show the recurring series an event belongs to
    Series {
        subject: String,

        #[arg(long, value_parser = parse_date)]
        on: NaiveDate,

        #[arg(long, value_parser = parse_time)]
        start: Option<NaiveTime>,

        /// Only occurrences on or after this date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        from: Option<NaiveDate>,
    },
    /// Import events from a CSV file
    Import { file: PathBuf },
    /// Export events as CSV
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut session = Session::open(cli.dir, cli.calendar.as_deref())?;

    match cli.command {
        Commands::Calendars => commands::calendars::run(&session),
        Commands::New {
            subject,
            on,
            until,
            details,
        } => commands::new::run(&mut session, subject, on, until, details),
        Commands::Repeat {
            subject,
            from,
            days,
            count,
            details,
        } => commands::repeat::run(&mut session, subject, from, days, count, details),
        Commands::Events { on, from, to, json } => {
            commands::events::run(&session, on, from.as_deref(), to.as_deref(), json)
        }
        Commands::Busy { on, at } => commands::busy::run(&session, on, at),
        Commands::Remove { subject, on, start } => {
            commands::remove::run(&mut session, &subject, on, start)
        }
        Commands::Edit {
            subject,
            on,
            start,
            changes,
        } => commands::edit::run(&mut session, &subject, on, start, changes),
        Commands::Series {
            subject,
            on,
            start,
            from,
        } => commands::series::run(&session, &subject, on, start, from),
        Commands::Import { file } => commands::import::run(&mut session, &file),
        Commands::Export { output } => commands::export::run(&session, output.as_deref()),
    }?;

    session.save_if_changed()
}
