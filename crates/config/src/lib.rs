//! Settings persistence and backup for inkdex.
//!
//! Settings are a single JSON document with load-or-create-default
//! semantics; backups are timestamped copies of the settings snapshot and
//! the catalog database. Platform-appropriate default locations come from
//! the `directories` crate.

pub mod backup;
pub mod error;
mod settings;

pub use crate::backup::{BackupPaths, export, import};
pub use crate::settings::Settings;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::OptionExt;
use std::path::PathBuf;

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "inkdex").ok_or_raise(|| ErrorKind::DataDir)
}

/// Default location of the settings document.
pub fn default_settings_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.json"))
}

/// Default location of the catalog database.
pub fn default_database_path() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().join("catalog.db"))
}

/// Default location for user-facing backup exports.
pub fn default_export_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().join("exports"))
}
