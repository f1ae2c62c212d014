//! Live filtered view over the full catalog.

use inkdex_catalog::models::{ReadingStatus, Record};

/// A filtered, searchable view of the catalog.
///
/// Holds a snapshot of the full record list (in store order) plus the
/// current filter state, and recomputes the visible subset whenever either
/// changes. Recomputation is synchronous and explicit: change a filter or
/// [`reload`](Self::reload) the snapshot after mutating the store, and the
/// view is immediately consistent. Relative order of visible records always
/// matches the source order; nothing is re-sorted.
#[derive(Debug, Default)]
pub struct Projection {
    search_text: String,
    status_filter: Option<ReadingStatus>,
    source: Vec<Record>,
    visible: Vec<Record>,
}

impl Projection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the underlying snapshot (after any add/update/delete/scan)
    /// and recompute.
    pub fn reload(&mut self, records: Vec<Record>) {
        self.source = records;
        self.recompute();
    }

    /// Set the free-text query and recompute. Matches title, author and
    /// genre case-insensitively; empty text matches everything.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.recompute();
    }

    /// Set or clear the status filter and recompute.
    pub fn set_status(&mut self, filter: Option<ReadingStatus>) {
        self.status_filter = filter;
        self.recompute();
    }

    /// Reset both filters to their defaults and recompute.
    pub fn clear_filters(&mut self) {
        self.search_text.clear();
        self.status_filter = None;
        self.recompute();
    }

    /// The records matching the current filters, in source order.
    pub fn visible(&self) -> &[Record] {
        &self.visible
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn status_filter(&self) -> Option<ReadingStatus> {
        self.status_filter
    }

    fn recompute(&mut self) {
        let query = self.search_text.trim().to_lowercase();
        let visible: Vec<Record> =
            self.source.iter().filter(|record| Self::matches(record, self.status_filter, &query)).cloned().collect();
        tracing::debug!(visible = visible.len(), source = self.source.len(), "projection recomputed");
        self.visible = visible;
    }

    fn matches(record: &Record, status_filter: Option<ReadingStatus>, query: &str) -> bool {
        if let Some(status) = status_filter
            && record.status != status
        {
            return false;
        }
        if query.is_empty() {
            return true;
        }
        record.title.to_lowercase().contains(query)
            || record.author.to_lowercase().contains(query)
            || record.genre.to_lowercase().contains(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use time::UtcDateTime;

    fn record(title: &str, status: ReadingStatus) -> Record {
        Record {
            id: 0,
            title: title.to_string(),
            author: "Unknown".to_string(),
            path: PathBuf::from(format!("/library/{title}.cbz")),
            cover_path: None,
            status,
            rating: 0.0,
            review: String::new(),
            current_chapter: 0,
            total_chapters: 0,
            date_added: UtcDateTime::now(),
            last_read: None,
            genre: "Unknown".to_string(),
            file_format: "CBZ".to_string(),
            file_size: 0,
        }
    }

    fn titles(projection: &Projection) -> Vec<&str> {
        projection.visible().iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn test_empty_filters_show_everything_in_source_order() {
        let mut projection = Projection::new();
        projection.reload(vec![
            record("Gamma", ReadingStatus::PlanToRead),
            record("Alpha", ReadingStatus::Reading),
        ]);
        assert_eq!(titles(&projection), ["Gamma", "Alpha"]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let mut projection = Projection::new();
        projection.reload(vec![
            record("Alpha", ReadingStatus::PlanToRead),
            record("Beta", ReadingStatus::PlanToRead),
            record("Gamma", ReadingStatus::PlanToRead),
        ]);
        // Every one of these titles contains an "a" somewhere.
        projection.set_search("a");
        assert_eq!(titles(&projection), ["Alpha", "Beta", "Gamma"]);
        projection.set_search("GAMM");
        assert_eq!(titles(&projection), ["Gamma"]);
    }

    #[test]
    fn test_status_filter_combines_with_search() {
        let mut projection = Projection::new();
        projection.reload(vec![
            record("Alpha", ReadingStatus::PlanToRead),
            record("Beta", ReadingStatus::PlanToRead),
            record("Gamma", ReadingStatus::PlanToRead),
        ]);
        projection.set_search("a");
        projection.set_status(Some(ReadingStatus::Completed));
        assert!(projection.visible().is_empty());
    }

    #[test]
    fn test_search_matches_author_and_genre() {
        let mut projection = Projection::new();
        let mut by_author = record("Monster", ReadingStatus::Completed);
        by_author.author = "Urasawa".to_string();
        let mut by_genre = record("Yotsuba", ReadingStatus::Reading);
        by_genre.genre = "Slice of Life".to_string();
        projection.reload(vec![by_author, by_genre]);
        projection.set_search("urasawa");
        assert_eq!(titles(&projection), ["Monster"]);
        projection.set_search("slice");
        assert_eq!(titles(&projection), ["Yotsuba"]);
    }

    #[test]
    fn test_clear_filters_restores_everything() {
        let mut projection = Projection::new();
        projection.reload(vec![
            record("Alpha", ReadingStatus::PlanToRead),
            record("Beta", ReadingStatus::Reading),
        ]);
        projection.set_search("alpha");
        projection.set_status(Some(ReadingStatus::PlanToRead));
        assert_eq!(titles(&projection), ["Alpha"]);
        projection.clear_filters();
        assert_eq!(titles(&projection), ["Alpha", "Beta"]);
        assert!(projection.search_text().is_empty());
        assert!(projection.status_filter().is_none());
    }

    #[test]
    fn test_reload_keeps_filters_applied() {
        let mut projection = Projection::new();
        projection.set_status(Some(ReadingStatus::Reading));
        projection.reload(vec![
            record("Alpha", ReadingStatus::PlanToRead),
            record("Beta", ReadingStatus::Reading),
        ]);
        assert_eq!(titles(&projection), ["Beta"]);
    }
}
