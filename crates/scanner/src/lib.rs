//! Filesystem scanner for the inkdex catalog.
//!
//! Walks a directory tree looking for comic/manga archives, derives
//! heuristic metadata from their filenames, and inserts records for files
//! the catalog store has not seen before. Progress is reported through an
//! event stream so an interactive caller is never blocked.

pub mod delegate;
pub mod error;
pub mod scan;

pub use crate::delegate::{DelegateOutcome, delegate_scan};
pub use crate::scan::{SUPPORTED_EXTENSIONS, ScanEvent, ScanOptions, scan};
