//! Backup export and import.
//!
//! Export writes a timestamped settings snapshot plus a copy of the catalog
//! database into a user-facing backup folder. Import goes the other way,
//! dispatching on the source file's extension; it reports failure as a
//! plain `false` rather than an error, since the user picked the file and
//! "that didn't work" is the whole story.

use crate::error::{ErrorKind, Result};
use crate::settings::Settings;
use exn::ResultExt;
use std::fs;
use std::path::{Path, PathBuf};
use time::UtcDateTime;
use time::macros::format_description;

/// Where the live settings document and catalog database are.
#[derive(Debug, Clone)]
pub struct BackupPaths {
    pub settings: PathBuf,
    pub database: PathBuf,
}

/// Export the current settings and catalog database to `export_dir`.
///
/// Writes `inkdex_backup_{timestamp}.json` (the settings snapshot, loaded
/// through the usual load-or-default path) and, if the database file
/// exists, `inkdex_backup_{timestamp}.db`. Returns the export folder.
pub fn export(paths: &BackupPaths, export_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let export_dir = export_dir.as_ref();
    fs::create_dir_all(export_dir).or_raise(|| ErrorKind::Io)?;
    let format = format_description!("[year][month][day]_[hour][minute][second]");
    let stamp = UtcDateTime::now().format(&format).or_raise(|| ErrorKind::Serialize)?;

    let settings = Settings::load(&paths.settings)?;
    settings.save(export_dir.join(format!("inkdex_backup_{stamp}.json")))?;
    if paths.database.exists() {
        fs::copy(&paths.database, export_dir.join(format!("inkdex_backup_{stamp}.db")))
            .or_raise(|| ErrorKind::Io)?;
    }
    tracing::info!(dir = %export_dir.display(), "exported backup");
    Ok(export_dir.to_path_buf())
}

/// Import a backup file, dispatching on its extension.
///
/// A `.json` file replaces the current settings; a `.db` file overwrites
/// the catalog database. Anything else, and any I/O or parse failure, is a
/// `false` return, never a panic or an error.
pub fn import(source: impl AsRef<Path>, paths: &BackupPaths) -> bool {
    let source = source.as_ref();
    match source.extension().and_then(|ext| ext.to_str()) {
        Some("json") => import_settings(source, &paths.settings),
        Some("db") => import_database(source, &paths.database),
        _ => {
            tracing::warn!(source = %source.display(), "unsupported backup file extension");
            false
        },
    }
}

fn import_settings(source: &Path, dest: &Path) -> bool {
    let Ok(json) = fs::read_to_string(source) else {
        tracing::warn!(source = %source.display(), "could not read settings backup");
        return false;
    };
    let Ok(settings) = serde_json::from_str::<Settings>(&json) else {
        tracing::warn!(source = %source.display(), "settings backup is not valid");
        return false;
    };
    settings.save(dest).is_ok()
}

fn import_database(source: &Path, dest: &Path) -> bool {
    if let Some(parent) = dest.parent()
        && fs::create_dir_all(parent).is_err()
    {
        return false;
    }
    fs::copy(source, dest).is_ok()
}
