//! Daybook root directory management.
//!
//! Each calendar is persisted as `<calendar_dir>/<sanitized title>.csv`.
//! Restoring scans the directory for `.csv` files and names each calendar
//! after its file stem.

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::calendar::Calendar;
use crate::daybook_config::DaybookConfig;
use crate::error::DaybookResult;
use crate::event::Visibility;
use crate::utils::sanitize_filename;

#[derive(Debug, Clone)]
pub struct Daybook {
    config: DaybookConfig,
}

impl Daybook {
    pub fn load() -> DaybookResult<Self> {
        let config_path = DaybookConfig::config_path()?;
        Ok(Self::new(DaybookConfig::load_from(&config_path)?))
    }

    pub fn new(config: DaybookConfig) -> Self {
        Daybook { config }
    }

    /// Use a different calendar directory than the configured one.
    pub fn with_calendar_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.calendar_dir = dir.into();
        self
    }

    pub fn config(&self) -> &DaybookConfig {
        &self.config
    }

    pub fn data_path(&self) -> PathBuf {
        let full_path_str =
            shellexpand::tilde(&self.config.calendar_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    /// Returns the calendar directory path in display-friendly form,
    /// keeping `~` instead of expanding to the full home directory.
    pub fn display_path(&self) -> PathBuf {
        self.config.calendar_dir.clone()
    }

    pub fn calendar_path(&self, calendar: &Calendar) -> PathBuf {
        calendar_path(&self.data_path(), calendar.title())
    }

    /// Restore every calendar in the calendar directory, sorted by title.
    pub fn calendars(&self) -> DaybookResult<Vec<Calendar>> {
        restore_all(&self.data_path(), self.config.default_visibility)
    }

    /// The configured default calendar, if it exists among `calendars`.
    pub fn default_calendar_index(&self, calendars: &[Calendar]) -> Option<usize> {
        let title = self.config.default_calendar.as_deref()?;
        find_calendar(calendars, title)
    }

    pub fn save_calendar(&self, calendar: &Calendar) -> DaybookResult<PathBuf> {
        save_calendar(calendar, &self.data_path())
    }

    pub fn save_all(&self, calendars: &[Calendar]) -> DaybookResult<()> {
        save_all(calendars, &self.data_path())
    }
}

pub fn calendar_path(dir: &Path, title: &str) -> PathBuf {
    dir.join(format!("{}.csv", sanitize_filename(title)))
}

/// Find the calendar stored under the same file as `title`.
///
/// Restored calendars are named after their file stem, so a title such as
/// `Q1/Q2` comes back as `Q1_Q2`; both name the same calendar.
pub fn find_calendar(calendars: &[Calendar], title: &str) -> Option<usize> {
    let stem = sanitize_filename(title);
    calendars
        .iter()
        .position(|c| sanitize_filename(c.title()) == stem)
}

/// Write one calendar to `<dir>/<sanitized title>.csv`, creating `dir` if needed.
pub fn save_calendar(calendar: &Calendar, dir: &Path) -> DaybookResult<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let path = calendar_path(dir, calendar.title());
    calendar.export_csv(File::create(&path)?)?;

    tracing::debug!(path = %path.display(), "Saved {} events", calendar.len());
    Ok(path)
}

pub fn save_all(calendars: &[Calendar], dir: &Path) -> DaybookResult<()> {
    for calendar in calendars {
        save_calendar(calendar, dir)?;
    }
    Ok(())
}

/// Restore every `.csv` file in `dir`. A missing directory yields no
/// calendars; a file that cannot be restored is logged and skipped.
pub fn restore_all(dir: &Path, default_visibility: Visibility) -> DaybookResult<Vec<Calendar>> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Ok(Vec::new());
    };

    let mut calendars: Vec<Calendar> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
        })
        .filter_map(|path| match restore_calendar(&path, default_visibility) {
            Ok(calendar) => Some(calendar),
            Err(e) => {
                tracing::warn!(path = %path.display(), "Failed to restore calendar: {e}");
                None
            }
        })
        .collect();

    calendars.sort_by(|a, b| a.title().cmp(b.title()));
    Ok(calendars)
}

fn restore_calendar(path: &Path, default_visibility: Visibility) -> DaybookResult<Calendar> {
    let title = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut calendar = Calendar::with_default_visibility(title, default_visibility)?;
    let summary = calendar.import_csv(File::open(path)?)?;

    if summary.skipped > 0 {
        tracing::warn!(
            calendar = %calendar.title(),
            "Skipped {} malformed rows",
            summary.skipped
        );
    }
    Ok(calendar)
}
