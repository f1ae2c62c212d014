//! SQLite catalog store for library records.
//!
//! This crate is the durable entity store for the catalog: one row per
//! indexed archive file plus the singleton user profile. Unlike a cache it
//! *is* the source of truth: reading state, ratings and reviews exist
//! nowhere else.
//!
//! # Architecture
//! - **Records**: one per archive file, keyed by a surrogate id with a
//!   UNIQUE constraint on the absolute file path. The constraint, not any
//!   caller-side probe, is what makes concurrent indexing of the same file
//!   safe.
//! - **Profile**: a single row created lazily on first access. Aggregate
//!   reading statistics are never stored on it; they are recomputed from
//!   the records table on demand.

mod db;
pub mod error;
pub mod models;
mod repo;

pub use crate::db::Database;
pub use crate::repo::Repository;
