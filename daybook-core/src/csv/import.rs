//! CSV row parsing.

use chrono::{NaiveDate, NaiveTime};
use csv::{ReaderBuilder, StringRecord};

use crate::csv::DATE_FORMAT;
use crate::error::{DaybookError, DaybookResult};
use crate::event::{Event, Visibility};

/// Columns up to and including Location must be present; Private may be missing.
const MIN_FIELDS: usize = 8;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Parse one CSV line (a single record, which may span lines inside quotes).
pub fn parse_row(
    line: &str,
    line_number: usize,
    default_visibility: Visibility,
) -> DaybookResult<Event> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    let record = reader.records().next().transpose()?.unwrap_or_default();

    parse_record(&record, line_number, default_visibility)
}

/// Turn one data record into an event.
///
/// All-day status comes from whether the time columns are filled in; the
/// "All Day Event" column is not consulted. A blank or missing Private column
/// falls back to `default_visibility`. Date, time and flag columns are
/// trimmed; subject, description and location are taken verbatim.
pub fn parse_record(
    record: &StringRecord,
    line_number: usize,
    default_visibility: Visibility,
) -> DaybookResult<Event> {
    let row_error = |reason: String| DaybookError::CsvRow {
        line: line_number,
        reason,
    };

    if record.len() < MIN_FIELDS {
        return Err(row_error(format!(
            "expected at least {} fields, got {}",
            MIN_FIELDS,
            record.len()
        )));
    }
    let field = |i: usize| record.get(i).unwrap_or_default();

    let start_date = parse_date(field(1).trim()).map_err(row_error)?;
    let end_date = parse_date(field(3).trim()).map_err(row_error)?;
    let start_time = parse_optional_time(field(2).trim()).map_err(row_error)?;
    let end_time = parse_optional_time(field(4).trim()).map_err(row_error)?;
    let visibility =
        parse_visibility(record.get(8).map(str::trim), default_visibility).map_err(row_error)?;

    let mut builder = Event::builder(field(0), start_date)
        .end_date(end_date)
        .visibility(visibility)
        .description(field(6))
        .location(field(7));
    if let Some(time) = start_time {
        builder = builder.start_time(time);
    }
    if let Some(time) = end_time {
        builder = builder.end_time(time);
    }

    builder.build().map_err(|e| row_error(e.to_string()))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|_| format!("invalid date '{}', expected MM/DD/YYYY", s))
}

/// Empty means no time; otherwise `HH:MM` or `HH:MM:SS`.
fn parse_optional_time(s: &str) -> Result<Option<NaiveTime>, String> {
    if s.is_empty() {
        return Ok(None);
    }

    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S%.f"))
        .map(Some)
        .map_err(|_| format!("invalid time '{}', expected HH:MM", s))
}

fn parse_visibility(field: Option<&str>, default: Visibility) -> Result<Visibility, String> {
    match field {
        None | Some("") => Ok(default),
        Some(s) if s.eq_ignore_ascii_case("true") => Ok(Visibility::Private),
        Some(s) if s.eq_ignore_ascii_case("false") => Ok(Visibility::Public),
        Some(s) => Err(format!("invalid Private value '{}'", s)),
    }
}
