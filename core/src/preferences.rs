//! Panel display preferences
//!
//! Presentation settings are kept apart from timer bookkeeping so hosts
//! can persist and tweak how reports look without touching measurements.
//! Stored as TOML; a missing file yields the defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default rounding precision for formatted durations
fn default_precision() -> usize {
    4
}

/// Default threshold above which millisecond durations are flagged
fn default_elevated_threshold_ms() -> f64 {
    500.0
}

fn default_true() -> bool {
    true
}

/// Display preferences for a timer panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelPreferences {
    /// Decimal places durations are rounded to before display
    #[serde(default = "default_precision")]
    pub precision: usize,

    /// Millisecond durations at or above this are flagged elevated
    #[serde(default = "default_elevated_threshold_ms")]
    pub elevated_threshold_ms: f64,

    /// Colorize report durations by severity
    #[serde(default = "default_true")]
    pub colors: bool,

    /// Show the call site that started each timer
    #[serde(default = "default_true")]
    pub show_origin: bool,
}

impl Default for PanelPreferences {
    fn default() -> Self {
        Self {
            precision: default_precision(),
            elevated_threshold_ms: default_elevated_threshold_ms(),
            colors: default_true(),
            show_origin: default_true(),
        }
    }
}

impl PanelPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load preferences from a TOML file; a missing file is not an error
    pub fn load(path: &Path) -> Result<Self, PreferencesError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| PreferencesError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| PreferencesError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Save preferences to a TOML file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), PreferencesError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PreferencesError::Write {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        std::fs::write(path, content).map_err(|e| PreferencesError::Write {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Errors during preference file handling
#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("failed to read preferences file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse preferences TOML in {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to write preferences file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize preferences")]
    Serialize(#[from] toml::ser::Error),
}
