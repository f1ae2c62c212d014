//! Catalog Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction, categorised by what the caller should do about them.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A catalog error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories for the catalog store.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("database error")]
    Database,
    #[display("database migration error")]
    Migration,
    /// The referenced record id does not exist in the catalog.
    #[display("record not found: id {_0}")]
    RecordNotFound(#[error(not(source))] i64),
    /// Inserting or moving a record would violate path uniqueness.
    #[display("duplicate path: {}", _0.display())]
    DuplicatePath(#[error(not(source))] PathBuf),
    /// A value could not cross the model/row boundary.
    #[display("invalid catalog data: {_0}")]
    InvalidData(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
