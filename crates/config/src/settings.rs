//! Application settings: a single JSON document with a fixed option set.
//!
//! Load semantics are load-or-create-default: a missing file is created
//! with defaults, a partial file is merged over defaults, and a corrupt
//! file is silently replaced with defaults (which are then persisted).
//! Corruption is never an error the caller has to handle.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Format, Json, Serialized};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Root of the library the scanner indexes.
    pub manga_directory: PathBuf,
    pub is_dark_mode: bool,
    pub language: String,
    pub auto_scan_on_startup: bool,
    pub show_splash_screen: bool,
    pub items_per_page: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            manga_directory: PathBuf::new(),
            is_dark_mode: false,
            language: "en".to_string(),
            auto_scan_on_startup: true,
            show_splash_screen: true,
            items_per_page: 20,
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to (and persisting) defaults
    /// when the file is missing or unreadable.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            let settings = Self::default();
            settings.save(path)?;
            return Ok(settings);
        }
        let loaded = Figment::from(Serialized::defaults(Self::default())).merge(Json::file(path)).extract::<Self>();
        match loaded {
            Ok(settings) => Ok(settings),
            Err(err) => {
                tracing::warn!(%err, path = %path.display(), "settings file unreadable, restoring defaults");
                let settings = Self::default();
                settings.save(path)?;
                Ok(settings)
            },
        }
    }

    /// Persist settings as pretty-printed JSON, creating parent directories
    /// as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).or_raise(|| ErrorKind::Io)?;
        }
        let json = serde_json::to_string_pretty(self).or_raise(|| ErrorKind::Serialize)?;
        fs::write(path, json).or_raise(|| ErrorKind::Io)
    }

    /// Replace whatever is at `path` with persisted defaults.
    pub fn reset(path: impl AsRef<Path>) -> Result<Self> {
        let settings = Self::default();
        settings.save(path)?;
        Ok(settings)
    }
}
