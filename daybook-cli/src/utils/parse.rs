//! Parsers for command-line values that clap hands to us as strings.

use anyhow::{Context, Result, bail};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use daybook_core::recurrence::parse_weekday;

/// Parse a wall-clock time such as `09:30` or `09:30:15`.
pub fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| format!("Invalid time '{}': expected HH:MM", s))
}

pub fn parse_weekday_arg(s: &str) -> Result<Weekday, String> {
    parse_weekday(s).ok_or_else(|| format!("Invalid weekday '{}': expected e.g. mon, tue", s))
}

/// Resolve the end of a timed event from either an explicit end time or a
/// duration. Returns the end date and end time; a duration may carry the
/// event past midnight.
pub fn resolve_end(
    start_date: NaiveDate,
    end_date: NaiveDate,
    start: NaiveTime,
    end: Option<NaiveTime>,
    duration: Option<&str>,
) -> Result<(NaiveDate, NaiveTime)> {
    match (end, duration) {
        (Some(end), _) => Ok((end_date, end)),
        (None, Some(duration)) => {
            let end = apply_duration(NaiveDateTime::new(start_date, start), duration)?;
            Ok((end.date(), end.time()))
        }
        (None, None) => bail!("A timed event needs --end or --duration"),
    }
}

fn apply_duration(start: NaiveDateTime, input: &str) -> Result<NaiveDateTime> {
    let std_dur = humantime::parse_duration(input)
        .with_context(|| format!("Could not parse duration: \"{}\"", input))?;
    let chrono_dur = Duration::from_std(std_dur).context("Duration too large")?;

    start
        .checked_add_signed(chrono_dur)
        .context("Duration runs past the end of the calendar")
}
