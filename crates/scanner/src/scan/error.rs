//! Error types for the [`scan`](super) module.
//!
//! Uses [`exn`] for automatic location tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A scan error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for scan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of a scan failure.
///
/// Individual files that cannot be read are skipped, never surfaced; these
/// kinds cover the failures that terminate the whole scan.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Directory enumeration itself failed.
    #[display("failed to walk directory tree")]
    Walk,
    /// A catalog store lookup or insert failed.
    #[display("catalog store operation failed")]
    Catalog,
    /// The scan root does not exist and the caller opted into treating that
    /// as an error (see [`ScanOptions`](super::ScanOptions)).
    #[display("scan root does not exist: {}", _0.display())]
    MissingRoot(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
