//! Date range for filtering events.

use chrono::{Duration, Local, NaiveDate};

/// Number of days shown ahead of today when no end date is given.
pub const DEFAULT_RANGE_DAYS: i64 = 7;

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl Default for DateRange {
    /// Default range: today until DEFAULT_RANGE_DAYS from now
    fn default() -> Self {
        Self::starting(Local::now().date_naive())
    }
}

impl DateRange {
    fn starting(today: NaiveDate) -> Self {
        DateRange {
            from: today,
            to: today + Duration::days(DEFAULT_RANGE_DAYS),
        }
    }

    /// Parse command-line style bounds.
    /// - `from`: "start" for unbounded, or YYYY-MM-DD; defaults to today
    /// - `to`: YYYY-MM-DD; defaults to DEFAULT_RANGE_DAYS after `from`
    pub fn from_args(from: Option<&str>, to: Option<&str>) -> Result<Self, String> {
        Self::from_args_at(from, to, Local::now().date_naive())
    }

    fn from_args_at(from: Option<&str>, to: Option<&str>, today: NaiveDate) -> Result<Self, String> {
        let from = match from {
            Some("start") => NaiveDate::MIN,
            Some(s) => parse_date(s)?,
            None => today,
        };

        let to = match to {
            Some(s) => parse_date(s)?,
            None if from == NaiveDate::MIN => Self::starting(today).to,
            None => Self::starting(from).to,
        };

        if from > to {
            return Err(format!("Start date {} is after end date {}", from, to));
        }

        Ok(DateRange { from, to })
    }

    /// A range covering a single day.
    pub fn day(date: NaiveDate) -> Self {
        DateRange {
            from: date,
            to: date,
        }
    }
}

/// Parse YYYY-MM-DD
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
}
