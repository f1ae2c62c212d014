//! Derived views over the inkdex catalog.
//!
//! Nothing here owns data: the [`Projection`] filters a snapshot of the
//! record list, and [`Statistics`] summarises the store on demand. Both are
//! recomputed explicitly: after a mutation the caller reloads/recollects,
//! and until it does the views are knowingly stale.

mod projection;
mod stats;

pub use crate::projection::Projection;
pub use crate::stats::{ProfileOverview, Statistics};
