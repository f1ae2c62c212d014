//! Scanner Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction. The module-specific kinds (see [`scan::error`](crate::scan))
//! sit underneath these crate-level categories in the error tree.

use derive_more::{Display, Error};

/// A scanner error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for scanner operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// A directory scan failed. Per-file problems never surface here; only
    /// enumeration and catalog failures are fatal to a scan.
    #[display("library scan failed")]
    Scan,
    /// The external scanning delegate could not be executed.
    #[display("external scanner delegate failed")]
    Delegate,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
