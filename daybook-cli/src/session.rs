//! Loads the daybook, selects the calendar a command works on, and writes it
//! back when a command changed it.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result, bail};
use daybook_core::daybook::{Daybook, find_calendar};
use daybook_core::{Calendar, CalendarListener, Event, ListenerResult};

/// Title of the calendar created when the directory holds none.
const FIRST_CALENDAR: &str = "My Calendar";

/// Marks the selected calendar dirty whenever an event is added or modified.
#[derive(Debug, Default)]
pub struct ChangeTracker {
    dirty: AtomicBool,
}

impl ChangeTracker {
    pub fn mark(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }
}

impl CalendarListener for ChangeTracker {
    fn on_event_added(&self, event: &Event) -> ListenerResult {
        tracing::debug!(event = %event.key(), "Event added");
        self.mark();
        Ok(())
    }

    fn on_event_modified(&self, event: &Event) -> ListenerResult {
        tracing::debug!(event = %event.key(), "Event modified");
        self.mark();
        Ok(())
    }
}

pub struct Session {
    daybook: Daybook,
    calendars: Vec<Calendar>,
    selected: usize,
    /// The selected calendar did not exist on disk when the session opened.
    created: bool,
    changes: Arc<ChangeTracker>,
}

impl Session {
    pub fn open(dir: Option<PathBuf>, calendar: Option<&str>) -> Result<Self> {
        let mut daybook = Daybook::load().context("Failed to load config")?;
        if let Some(dir) = dir {
            daybook = daybook.with_calendar_dir(dir);
        }
        Self::with_daybook(daybook, calendar)
    }

    /// Restore every calendar and select `calendar` (matched the way its file
    /// is named), the configured default, or the first one. A calendar that
    /// does not exist yet is created in memory and only written once a
    /// command changes it.
    pub fn with_daybook(daybook: Daybook, calendar: Option<&str>) -> Result<Self> {
        let mut calendars = daybook.calendars()?;
        let visibility = daybook.config().default_visibility;

        let existing = match calendar {
            Some(title) => find_calendar(&calendars, title),
            None if calendars.is_empty() => None,
            None => Some(daybook.default_calendar_index(&calendars).unwrap_or(0)),
        };
        let (selected, created) = match existing {
            Some(index) => (index, false),
            None => {
                let title = calendar.unwrap_or(FIRST_CALENDAR);
                calendars.push(Calendar::with_default_visibility(title, visibility)?);
                (calendars.len() - 1, true)
            }
        };

        let changes = Arc::new(ChangeTracker::default());
        let listener: Arc<dyn CalendarListener> = changes.clone();
        calendars[selected].add_listener(listener);

        Ok(Session {
            daybook,
            calendars,
            selected,
            created,
            changes,
        })
    }

    pub fn daybook(&self) -> &Daybook {
        &self.daybook
    }

    pub fn calendars(&self) -> &[Calendar] {
        &self.calendars
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendars[self.selected]
    }

    pub fn calendar_mut(&mut self) -> &mut Calendar {
        &mut self.calendars[self.selected]
    }

    /// Removals are not announced to listeners, so commands that remove
    /// events flag the change themselves.
    pub fn mark_changed(&self) {
        self.changes.mark();
    }

    /// Write the selected calendar back if a command changed it. A calendar
    /// created by this session never replaces a file that appeared on disk
    /// without being restored.
    pub fn save_if_changed(&self) -> Result<()> {
        if !self.changes.is_dirty() {
            return Ok(());
        }
        let path = self.daybook.calendar_path(self.calendar());
        if self.created && path.exists() {
            bail!(
                "Not saving '{}': {} exists but could not be restored",
                self.calendar().title(),
                path.display()
            );
        }
        let path = self.daybook.save_calendar(self.calendar())?;
        tracing::info!(path = %path.display(), "Saved calendar");
        Ok(())
    }
}
