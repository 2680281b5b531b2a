//! Persisted application settings.
//!
//! # Responsibility
//! - Remember the chosen notes directory across launches.
//! - Resolve the platform config location for the settings file.
//!
//! # Invariants
//! - A missing settings file loads as defaults.
//! - A corrupt settings file is reported by `load`; only an explicit save
//!   replaces it.

use directories::ProjectDirs;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

const SETTINGS_FILE_NAME: &str = "settings.json";

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Settings load/save failure.
#[derive(Debug)]
pub enum SettingsError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "settings file `{}` I/O error: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "settings file `{}` is invalid: {source}", path.display())
            }
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// User preferences persisted as JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Last notes directory picked by the user.
    pub data_dir: Option<PathBuf>,
}

impl AppSettings {
    /// Loads settings from `path`, falling back to defaults when absent.
    pub fn load(path: &Path) -> SettingsResult<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("event=settings_load module=settings status=ok source=default");
                return Ok(Self::default());
            }
            Err(source) => {
                warn!("event=settings_load module=settings status=error error_code=io");
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let settings = serde_json::from_str(&raw).map_err(|source| {
            warn!("event=settings_load module=settings status=error error_code=parse");
            SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        info!("event=settings_load module=settings status=ok source=file");
        Ok(settings)
    }

    /// Loads settings, logging and discarding any read or parse failure.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|err| {
            warn!("event=settings_load module=settings status=fallback error={err}");
            Self::default()
        })
    }

    /// Writes settings to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> SettingsResult<()> {
        let io_error = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(io_error)?;
        info!("event=settings_save module=settings status=ok");
        Ok(())
    }
}

/// Platform settings location, e.g. `~/.config/inknote/settings.json`.
///
/// Returns `None` when no home directory can be determined.
pub fn default_settings_path() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("app", "InkNote", "InkNote")?;
    Some(dirs.config_dir().join(SETTINGS_FILE_NAME))
}
