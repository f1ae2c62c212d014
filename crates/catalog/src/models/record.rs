use std::path::PathBuf;
use time::UtcDateTime;

use crate::models::ReadingStatus;

/// Ratings live on a 0-10 scale where zero means "unrated".
pub const RATING_MAX: f64 = 10.0;

/// Clamp a raw rating into the storable range. NaN collapses to unrated.
pub(crate) fn clamp_rating(rating: f64) -> f64 {
    if rating.is_nan() { 0.0 } else { rating.clamp(0.0, RATING_MAX) }
}

/// One indexed archive file and its reading metadata.
///
/// The `id` is assigned by the store on insert and is stable for the lifetime
/// of the record; `date_added` is likewise set at insert and never updated.
/// Everything else is mutable through [`Repository::update`](crate::Repository::update).
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: i64,
    pub title: String,
    pub author: String,
    /// Absolute path of the archive on disk; globally unique across the catalog.
    pub path: PathBuf,
    pub cover_path: Option<PathBuf>,
    pub status: ReadingStatus,
    /// 0-10, clamped on every store write; 0 means unrated.
    pub rating: f64,
    pub review: String,
    pub current_chapter: u32,
    pub total_chapters: u32,
    pub date_added: UtcDateTime,
    pub last_read: Option<UtcDateTime>,
    pub genre: String,
    /// Upper-cased file extension without the dot, e.g. `CBZ`.
    pub file_format: String,
    pub file_size: u64,
}

impl Record {
    /// Set the rating, clamping it into `[0, 10]`.
    pub fn set_rating(&mut self, rating: f64) {
        self.rating = clamp_rating(rating);
    }

    /// Reading progress as a percentage of total chapters.
    ///
    /// A record with no known chapter count has zero progress, whatever the
    /// current chapter says.
    pub fn progress(&self) -> f64 {
        match self.total_chapters {
            0 => 0.0,
            total => f64::from(self.current_chapter) / f64::from(total) * 100.0,
        }
    }

    /// Formatted rating, e.g. `"8.5/10"`, or `"Unrated"` for a zero rating.
    pub fn rating_text(&self) -> String {
        if self.rating > 0.0 { format!("{:.1}/10", self.rating) } else { "Unrated".to_string() }
    }

    /// Human-readable file size with one decimal place.
    pub fn file_size_text(&self) -> String {
        const KIB: u64 = 1024;
        const MIB: u64 = KIB * 1024;
        const GIB: u64 = MIB * 1024;
        match self.file_size {
            size if size < KIB => format!("{size} B"),
            size if size < MIB => format!("{:.1} KB", size as f64 / KIB as f64),
            size if size < GIB => format!("{:.1} MB", size as f64 / MIB as f64),
            size => format!("{:.1} GB", size as f64 / GIB as f64),
        }
    }
}

/// A record that has not been inserted yet: everything a [`Record`] has
/// except the store-assigned `id` and `date_added`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub title: String,
    pub author: String,
    pub path: PathBuf,
    pub cover_path: Option<PathBuf>,
    pub status: ReadingStatus,
    pub rating: f64,
    pub review: String,
    pub current_chapter: u32,
    pub total_chapters: u32,
    pub last_read: Option<UtcDateTime>,
    pub genre: String,
    pub file_format: String,
    pub file_size: u64,
}

impl NewRecord {
    /// A fresh, unread entry for the given archive path.
    pub fn new(path: impl Into<PathBuf>, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            path: path.into(),
            cover_path: None,
            status: ReadingStatus::PlanToRead,
            rating: 0.0,
            review: String::new(),
            current_chapter: 0,
            total_chapters: 0,
            last_read: None,
            genre: String::new(),
            file_format: String::new(),
            file_size: 0,
        }
    }

    /// Set the rating, clamping it into `[0, 10]`.
    pub fn set_rating(&mut self, rating: f64) {
        self.rating = clamp_rating(rating);
    }
}

/// Derived (computed, never stored) fields of a [`Record`].
///
/// Updates report which of these their field changes invalidated, replacing
/// the per-property change broadcasts of a reactive model with an explicit
/// return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivedField {
    /// [`Record::progress`], which depends on current and total chapters.
    Progress,
    /// [`Record::rating_text`], which depends on the rating.
    RatingText,
    /// [`ReadingStatus::label`], which depends on the status.
    StatusLabel,
    /// [`ReadingStatus::color`], which depends on the status.
    StatusColor,
    /// [`Record::file_size_text`], which depends on the file size.
    FileSizeText,
}

/// The result of a successful update: the record as now stored, plus the
/// derived fields invalidated by the changes that were applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Updated {
    pub record: Record,
    pub invalidated: Vec<DerivedField>,
}
