//! Config Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.
//!
//! A *corrupt* settings file is deliberately not represented here: it is
//! recovered by substituting defaults, never surfaced to the caller.

use derive_more::{Display, Error};

/// A config error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Reading or writing a settings/backup file failed.
    #[display("settings file i/o error")]
    Io,
    /// Settings could not be serialized for persistence.
    #[display("settings serialization error")]
    Serialize,
    /// No platform data directory could be determined.
    #[display("could not determine platform data directories")]
    DataDir,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
