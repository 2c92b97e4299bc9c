//! Error types for daybook.

use thiserror::Error;

/// A broken event rule, raised while building an event or applying a setter.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Subject cannot be blank")]
    BlankSubject,

    #[error("End time cannot be set without a start time")]
    EndTimeWithoutStartTime,

    #[error("End date is required when a start time is set")]
    StartTimeWithoutEndDate,

    #[error("End time is required when a start time is set")]
    StartTimeWithoutEndTime,

    #[error("End date cannot be before start date")]
    EndDateBeforeStartDate,

    #[error("End time cannot be before start time on the same day")]
    EndTimeBeforeStartTime,
}

/// Errors that can occur in daybook operations.
#[derive(Error, Debug)]
pub enum DaybookError {
    #[error("Title cannot be blank")]
    BlankTitle,

    #[error("Invalid event: {0}")]
    InvalidEvent(#[from] ValidationError),

    #[error("An event with the same subject, start date, and start time already exists: {0}")]
    Duplicate(String),

    #[error("Event conflicts with an existing event: {0}")]
    Conflict(String),

    #[error("Event is not in this calendar")]
    NotInCalendar,

    #[error("Event is not part of a recurring series")]
    NotRecurring,

    #[error("Days of week cannot be empty")]
    NoWeekdays,

    #[error("Number of occurrences must be positive")]
    NoOccurrences,

    #[error("Only {found} of {requested} occurrences fit before the end of the calendar")]
    TooFewOccurrences { requested: usize, found: usize },

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("CSV row {line}: {reason}")]
    CsvRow { line: usize, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for daybook operations.
pub type DaybookResult<T> = Result<T, DaybookError>;
