//! Global daybook configuration.

use std::path::{Path, PathBuf};

use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::error::{DaybookError, DaybookResult};
use crate::event::Visibility;

static DEFAULT_CALENDAR_DIR: &str = "~/calendars";

fn default_calendar_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CALENDAR_DIR)
}

fn is_default_calendar_dir(p: &PathBuf) -> bool {
    *p == default_calendar_dir()
}

fn is_default_visibility(v: &Visibility) -> bool {
    *v == Visibility::default()
}

/// Global configuration at ~/.config/daybook/config.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DaybookConfig {
    /// Directory holding one `<title>.csv` file per calendar.
    #[serde(
        default = "default_calendar_dir",
        skip_serializing_if = "is_default_calendar_dir"
    )]
    pub calendar_dir: PathBuf,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_calendar: Option<String>,

    #[serde(default, skip_serializing_if = "is_default_visibility")]
    pub default_visibility: Visibility,
}

impl Default for DaybookConfig {
    fn default() -> Self {
        DaybookConfig {
            calendar_dir: default_calendar_dir(),
            default_calendar: None,
            default_visibility: Visibility::default(),
        }
    }
}

impl DaybookConfig {
    pub fn config_path() -> DaybookResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| DaybookError::Config("Could not determine config directory".into()))?
            .join("daybook");

        Ok(config_dir.join("config.toml"))
    }

    /// Read the config file, creating a commented-out default first if it
    /// does not exist yet.
    pub fn load_from(path: &Path) -> DaybookResult<Self> {
        if !path.exists() {
            Self::create_default_config(path)?;
        }

        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .build()
            .map_err(|e| DaybookError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| DaybookError::Config(e.to_string()))
    }

    pub fn save_to(&self, path: &Path) -> DaybookResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| DaybookError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| DaybookError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> DaybookResult<()> {
        let contents = format!(
            "\
# daybook configuration

# Where your calendars live (one CSV file per calendar):
# calendar_dir = \"{}\"

# Calendar used when none is given on the command line:
# default_calendar = \"My Calendar\"

# Visibility of new events: \"public\" or \"private\"
# default_visibility = \"public\"
",
            DEFAULT_CALENDAR_DIR
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DaybookError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| DaybookError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
