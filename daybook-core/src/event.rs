//! Calendar events and their interval semantics.
//!
//! An event is either all-day (no times, spanning whole dates) or timed.
//! Equality and hashing use only the identity key (subject, start date,
//! start time); the [`EventId`] marks the underlying record so that two
//! equal-by-key events can still be told apart.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Stable marker for one event record. Clones share it; freshly built events never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(Uuid);

impl EventId {
    fn new() -> Self {
        EventId(Uuid::new_v4())
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "PUBLIC"),
            Visibility::Private => write!(f, "PRIVATE"),
        }
    }
}

/// The (subject, start date, start time) triple used for duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventKey {
    pub subject: String,
    pub start_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.start_time {
            Some(time) => write!(
                f,
                "'{}' on {} at {}",
                self.subject,
                self.start_date,
                display_time(time)
            ),
            None => write!(f, "'{}' on {}", self.subject, self.start_date),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Event {
    #[serde(skip)]
    id: EventId,
    subject: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
    visibility: Visibility,
    description: Option<String>,
    location: Option<String>,
}

/// Check the event rules in order and return the effective end date.
///
/// An all-day event given no end date ends on its start date.
pub fn validate(
    subject: &str,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
) -> Result<NaiveDate, ValidationError> {
    if subject.trim().is_empty() {
        return Err(ValidationError::BlankSubject);
    }

    let end_date = match (start_time, end_date) {
        (None, None) => Some(start_date),
        (_, end_date) => end_date,
    };

    if start_time.is_none() && end_time.is_some() {
        return Err(ValidationError::EndTimeWithoutStartTime);
    }

    let Some(end_date) = end_date else {
        return Err(ValidationError::StartTimeWithoutEndDate);
    };

    if start_time.is_some() && end_time.is_none() {
        return Err(ValidationError::StartTimeWithoutEndTime);
    }

    if end_date < start_date {
        return Err(ValidationError::EndDateBeforeStartDate);
    }

    if let (Some(start), Some(end)) = (start_time, end_time) {
        if start_date == end_date && end < start {
            return Err(ValidationError::EndTimeBeforeStartTime);
        }
    }

    Ok(end_date)
}

impl Event {
    pub fn builder(subject: impl Into<String>, start_date: NaiveDate) -> EventBuilder {
        EventBuilder {
            subject: subject.into(),
            start_date,
            end_date: None,
            start_time: None,
            end_time: None,
            visibility: Visibility::default(),
            description: None,
            location: None,
        }
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn key(&self) -> EventKey {
        EventKey {
            subject: self.subject.clone(),
            start_date: self.start_date,
            start_time: self.start_time,
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn start_time(&self) -> Option<NaiveTime> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<NaiveTime> {
        self.end_time
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn is_all_day(&self) -> bool {
        self.start_time.is_none()
    }

    /// Inclusive start instant (midnight of the start date for all-day events).
    pub fn start_date_time(&self) -> NaiveDateTime {
        self.start_date
            .and_time(self.start_time.unwrap_or(NaiveTime::MIN))
    }

    /// Exclusive end instant (midnight after the end date for all-day events).
    pub fn end_date_time(&self) -> NaiveDateTime {
        match self.end_time {
            Some(time) => self.end_date.and_time(time),
            None => self
                .end_date
                .succ_opt()
                .map_or(NaiveDateTime::MAX, |day| day.and_time(NaiveTime::MIN)),
        }
    }

    /// Whether the half-open intervals of the two events overlap.
    /// Back-to-back events do not conflict.
    pub fn conflicts_with(&self, other: &Event) -> bool {
        self.start_date_time() < other.end_date_time()
            && other.start_date_time() < self.end_date_time()
    }

    /// Whether `at` falls within `[start, end)`.
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start_date_time() <= at && at < self.end_date_time()
    }

    /// Whether `date` lies between the start and end dates, ignoring times.
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Whether the event's dates touch the inclusive range `[from, to]`.
    pub fn overlaps_dates(&self, from: NaiveDate, to: NaiveDate) -> bool {
        !(self.end_date < from || self.start_date > to)
    }

    // SETTERS:
    // Identity and interval fields are re-validated as a whole; on failure the
    // event is left exactly as it was.

    pub fn set_subject(&mut self, subject: impl Into<String>) -> Result<(), ValidationError> {
        let subject = subject.into();
        validate(
            &subject,
            self.start_date,
            Some(self.end_date),
            self.start_time,
            self.end_time,
        )?;
        self.subject = subject;
        Ok(())
    }

    pub fn set_start_date(&mut self, start_date: NaiveDate) -> Result<(), ValidationError> {
        validate(
            &self.subject,
            start_date,
            Some(self.end_date),
            self.start_time,
            self.end_time,
        )?;
        self.start_date = start_date;
        Ok(())
    }

    pub fn set_end_date(&mut self, end_date: NaiveDate) -> Result<(), ValidationError> {
        validate(
            &self.subject,
            self.start_date,
            Some(end_date),
            self.start_time,
            self.end_time,
        )?;
        self.end_date = end_date;
        Ok(())
    }

    pub fn set_start_time(&mut self, start_time: Option<NaiveTime>) -> Result<(), ValidationError> {
        validate(
            &self.subject,
            self.start_date,
            Some(self.end_date),
            start_time,
            self.end_time,
        )?;
        self.start_time = start_time;
        Ok(())
    }

    pub fn set_end_time(&mut self, end_time: Option<NaiveTime>) -> Result<(), ValidationError> {
        validate(
            &self.subject,
            self.start_date,
            Some(self.end_date),
            self.start_time,
            end_time,
        )?;
        self.end_time = end_time;
        Ok(())
    }

    /// Turn the event into a timed one (or re-time it) in a single step.
    pub fn set_times(&mut self, start: NaiveTime, end: NaiveTime) -> Result<(), ValidationError> {
        validate(
            &self.subject,
            self.start_date,
            Some(self.end_date),
            Some(start),
            Some(end),
        )?;
        self.start_time = Some(start);
        self.end_time = Some(end);
        Ok(())
    }

    /// Drop both times, keeping the dates.
    pub fn set_all_day(&mut self) {
        self.start_time = None;
        self.end_time = None;
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description.filter(|d| !d.is_empty());
    }

    pub fn set_location(&mut self, location: Option<String>) {
        self.location = location.filter(|l| !l.is_empty());
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.subject == other.subject
            && self.start_date == other.start_date
            && self.start_time == other.start_time
    }
}

impl Eq for Event {}

impl Hash for Event {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.subject.hash(state);
        self.start_date.hash(state);
        self.start_time.hash(state);
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Event[subject={}, startDate={}",
            self.subject, self.start_date
        )?;
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => write!(
                f,
                ", startTime={}, endDate={}, endTime={}",
                display_time(start),
                self.end_date,
                display_time(end)
            )?,
            _ => write!(f, ", endDate={} (All-Day)", self.end_date)?,
        }
        write!(f, ", visibility={}", self.visibility)?;
        if let Some(description) = &self.description {
            write!(f, ", description={}", description)?;
        }
        if let Some(location) = &self.location {
            write!(f, ", location={}", location)?;
        }
        write!(f, "]")
    }
}

/// `HH:MM`, `HH:MM:SS` when seconds are present, and `HH:MM:SS.fff` when
/// there is a fractional part. Parsing this back yields the same time.
pub(crate) fn display_time(time: NaiveTime) -> String {
    if time.nanosecond() != 0 {
        time.format("%H:%M:%S%.f").to_string()
    } else if time.second() != 0 {
        time.format("%H:%M:%S").to_string()
    } else {
        time.format("%H:%M").to_string()
    }
}

/// Collects event fields; validation happens once in [`EventBuilder::build`].
#[derive(Debug, Clone)]
pub struct EventBuilder {
    subject: String,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
    visibility: Visibility,
    description: Option<String>,
    location: Option<String>,
}

impl EventBuilder {
    pub fn end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn start_time(mut self, start_time: NaiveTime) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn end_time(mut self, end_time: NaiveTime) -> Self {
        self.end_time = Some(end_time);
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into()).filter(|d| !d.is_empty());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into()).filter(|l| !l.is_empty());
        self
    }

    pub fn build(self) -> Result<Event, ValidationError> {
        let end_date = validate(
            &self.subject,
            self.start_date,
            self.end_date,
            self.start_time,
            self.end_time,
        )?;

        Ok(Event {
            id: EventId::new(),
            subject: self.subject,
            start_date: self.start_date,
            end_date,
            start_time: self.start_time,
            end_time: self.end_time,
            visibility: self.visibility,
            description: self.description,
            location: self.location,
        })
    }
}
