//! Weekday recurrence: a fixed set of weekdays, repeated for N occurrences.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

use crate::error::{DaybookError, DaybookResult};
use crate::event::{Event, Visibility};

/// Everything needed to generate one recurring series.
#[derive(Debug, Clone)]
pub struct RecurrenceRequest {
    pub subject: String,
    pub start_date: NaiveDate,
    pub weekdays: HashSet<Weekday>,
    pub occurrences: usize,
    /// Start and end time of each occurrence. `None` makes every occurrence all-day.
    pub times: Option<(NaiveTime, NaiveTime)>,
    pub description: Option<String>,
    pub location: Option<String>,
    /// Falls back to the calendar's default visibility.
    pub visibility: Option<Visibility>,
}

impl RecurrenceRequest {
    pub fn new(
        subject: impl Into<String>,
        start_date: NaiveDate,
        weekdays: impl IntoIterator<Item = Weekday>,
        occurrences: usize,
    ) -> Self {
        RecurrenceRequest {
            subject: subject.into(),
            start_date,
            weekdays: weekdays.into_iter().collect(),
            occurrences,
            times: None,
            description: None,
            location: None,
            visibility: None,
        }
    }

    pub fn times(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.times = Some((start, end));
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// Build one single-day event per occurrence date, in date order.
    pub(crate) fn expand(&self, default_visibility: Visibility) -> DaybookResult<Vec<Event>> {
        let visibility = self.visibility.unwrap_or(default_visibility);

        occurrence_dates(self.start_date, &self.weekdays, self.occurrences)?
            .into_iter()
            .map(|day| {
                let mut builder = Event::builder(self.subject.clone(), day)
                    .end_date(day)
                    .visibility(visibility);
                if let Some((start, end)) = self.times {
                    builder = builder.start_time(start).end_time(end);
                }
                if let Some(description) = &self.description {
                    builder = builder.description(description.clone());
                }
                if let Some(location) = &self.location {
                    builder = builder.location(location.clone());
                }
                builder.build().map_err(DaybookError::from)
            })
            .collect()
    }
}

/// Walk forward from `start` (inclusive) one day at a time, collecting the
/// first `count` days whose weekday is in `weekdays`.
pub fn occurrence_dates(
    start: NaiveDate,
    weekdays: &HashSet<Weekday>,
    count: usize,
) -> DaybookResult<Vec<NaiveDate>> {
    if weekdays.is_empty() {
        return Err(DaybookError::NoWeekdays);
    }
    if count == 0 {
        return Err(DaybookError::NoOccurrences);
    }

    let dates: Vec<NaiveDate> = start
        .iter_days()
        .filter(|day| weekdays.contains(&day.weekday()))
        .take(count)
        .collect();

    if dates.len() < count {
        return Err(DaybookError::TooFewOccurrences {
            requested: count,
            found: dates.len(),
        });
    }
    Ok(dates)
}

/// Parse a weekday name such as "mon", "Tuesday" or "WED".
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    s.trim().parse().ok()
}
