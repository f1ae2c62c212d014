//! Aggregate reading statistics, derived from the catalog on demand.

use inkdex_catalog::Repository;
use inkdex_catalog::error::Result;
use inkdex_catalog::models::{Profile, ReadingStatus, Record};

/// A point-in-time summary of the catalog.
///
/// Statistics are a snapshot: they reflect the catalog as of the last
/// [`collect`](Self::collect) call, not the current state after later
/// mutations. Callers that need freshness collect again; nothing here
/// refreshes automatically.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Statistics {
    pub total: u64,
    pub plan_to_read: u64,
    pub reading: u64,
    pub completed: u64,
    pub on_hold: u64,
    pub dropped: u64,
    /// Mean over rated records only; 0 when nothing is rated.
    pub average_rating: f64,
}

impl Statistics {
    /// Compute a fresh snapshot from the store.
    pub async fn collect(repo: &Repository) -> Result<Self> {
        let counts = repo.count_by_status().await?;
        let count = |status: ReadingStatus| counts.get(&status).copied().unwrap_or(0);
        Ok(Self {
            total: counts.values().sum(),
            plan_to_read: count(ReadingStatus::PlanToRead),
            reading: count(ReadingStatus::Reading),
            completed: count(ReadingStatus::Completed),
            on_hold: count(ReadingStatus::OnHold),
            dropped: count(ReadingStatus::Dropped),
            average_rating: repo.average_rating().await?,
        })
    }

    /// The count for a single status.
    pub fn count(&self, status: ReadingStatus) -> u64 {
        match status {
            ReadingStatus::PlanToRead => self.plan_to_read,
            ReadingStatus::Reading => self.reading,
            ReadingStatus::Completed => self.completed,
            ReadingStatus::OnHold => self.on_hold,
            ReadingStatus::Dropped => self.dropped,
        }
    }

    /// Formatted average, e.g. `"8.5/10"`, or `"N/A"` when nothing is rated.
    pub fn average_rating_text(&self) -> String {
        if self.average_rating > 0.0 { format!("{:.1}/10", self.average_rating) } else { "N/A".to_string() }
    }
}

/// Everything the profile screen needs, loaded in one call: the profile
/// itself, a statistics snapshot, and the top-rated records.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileOverview {
    pub profile: Profile,
    pub statistics: Statistics,
    pub top_rated: Vec<Record>,
}

impl ProfileOverview {
    pub async fn load(repo: &Repository, top_n: usize) -> Result<Self> {
        Ok(Self {
            profile: repo.profile().await?,
            statistics: Statistics::collect(repo).await?,
            top_rated: repo.top_rated(top_n).await?,
        })
    }
}
