//! Core types for daybook.
//!
//! - `Event` and the interval rules every event obeys
//! - `Calendar`, the event store that rejects duplicates and conflicts
//! - `RecurrenceRequest` for weekday-based recurring series
//! - CSV export/import and directory persistence

pub mod calendar;
pub mod csv;
pub mod date_range;
pub mod daybook;
pub mod daybook_config;
pub mod error;
pub mod event;
pub mod listener;
pub mod recurrence;
pub mod utils;

pub use calendar::Calendar;
pub use error::{DaybookError, DaybookResult, ValidationError};
pub use event::{Event, EventBuilder, EventId, EventKey, Visibility};
pub use listener::{CalendarListener, ListenerResult};
pub use recurrence::RecurrenceRequest;
