use crate::error::{Error, ErrorKind};
use crate::models::record::clamp_rating;
use crate::models::{NewRecord, Profile, ReadingStatus, Record};
use exn::{OptionExt, ResultExt};
use std::path::PathBuf;
use time::UtcDateTime;

/// Raw database row for a catalog record.
///
/// Timestamps are Unix seconds, the status is its discriminant, and paths
/// are stored as strings. The rating is clamped on the way *in* so the
/// invariant holds no matter what the caller set on the model.
#[derive(sqlx::FromRow)]
pub(crate) struct RecordRow {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) path: String,
    pub(crate) cover_path: Option<String>,
    pub(crate) status: i64,
    pub(crate) rating: f64,
    pub(crate) review: String,
    pub(crate) current_chapter: i64,
    pub(crate) total_chapters: i64,
    pub(crate) date_added: i64,
    pub(crate) last_read: Option<i64>,
    pub(crate) genre: String,
    pub(crate) file_format: String,
    pub(crate) file_size: i64,
}

pub(crate) fn path_to_string(path: &std::path::Path) -> Result<String, Error> {
    Ok(path.to_str().ok_or_raise(|| ErrorKind::InvalidData("path"))?.to_string())
}

impl RecordRow {
    /// Row for inserting a not-yet-persisted record. The id column is
    /// ignored on insert; `date_added` is fixed at this point and never
    /// written again.
    pub(crate) fn from_new(record: &NewRecord, date_added: UtcDateTime) -> Result<Self, Error> {
        Ok(Self {
            id: 0,
            title: record.title.clone(),
            author: record.author.clone(),
            path: path_to_string(&record.path)?,
            cover_path: record.cover_path.as_deref().map(path_to_string).transpose()?,
            status: record.status.into(),
            rating: clamp_rating(record.rating),
            review: record.review.clone(),
            current_chapter: i64::from(record.current_chapter),
            total_chapters: i64::from(record.total_chapters),
            date_added: date_added.unix_timestamp(),
            last_read: record.last_read.map(|at| at.unix_timestamp()),
            genre: record.genre.clone(),
            file_format: record.file_format.clone(),
            file_size: i64::try_from(record.file_size).or_raise(|| ErrorKind::InvalidData("file size"))?,
        })
    }
}

impl TryFrom<&Record> for RecordRow {
    type Error = Error;
    fn try_from(record: &Record) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.id,
            title: record.title.clone(),
            author: record.author.clone(),
            path: path_to_string(&record.path)?,
            cover_path: record.cover_path.as_deref().map(path_to_string).transpose()?,
            status: record.status.into(),
            rating: clamp_rating(record.rating),
            review: record.review.clone(),
            current_chapter: i64::from(record.current_chapter),
            total_chapters: i64::from(record.total_chapters),
            date_added: record.date_added.unix_timestamp(),
            last_read: record.last_read.map(|at| at.unix_timestamp()),
            genre: record.genre.clone(),
            file_format: record.file_format.clone(),
            file_size: i64::try_from(record.file_size).or_raise(|| ErrorKind::InvalidData("file size"))?,
        })
    }
}

impl TryFrom<RecordRow> for Record {
    type Error = Error;
    fn try_from(row: RecordRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            title: row.title,
            author: row.author,
            path: PathBuf::from(row.path),
            cover_path: row.cover_path.map(PathBuf::from),
            status: ReadingStatus::try_from(row.status)?,
            // An imported database could contain anything.
            rating: clamp_rating(row.rating),
            review: row.review,
            current_chapter: u32::try_from(row.current_chapter)
                .or_raise(|| ErrorKind::InvalidData("current chapter"))?,
            total_chapters: u32::try_from(row.total_chapters)
                .or_raise(|| ErrorKind::InvalidData("total chapters"))?,
            date_added: UtcDateTime::from_unix_timestamp(row.date_added)
                .or_raise(|| ErrorKind::InvalidData("date added"))?,
            last_read: row
                .last_read
                .map(UtcDateTime::from_unix_timestamp)
                .transpose()
                .or_raise(|| ErrorKind::InvalidData("last read"))?,
            genre: row.genre,
            file_format: row.file_format,
            file_size: u64::try_from(row.file_size).or_raise(|| ErrorKind::InvalidData("file size"))?,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct ProfileRow {
    pub(crate) username: String,
    pub(crate) member_since: i64,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = Error;
    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        Ok(Self {
            username: row.username,
            member_since: UtcDateTime::from_unix_timestamp(row.member_since)
                .or_raise(|| ErrorKind::InvalidData("member since"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_to_model() {
        let added = UtcDateTime::now();
        let row = RecordRow {
            id: 7,
            title: "Naruto".to_string(),
            author: "Kishimoto".to_string(),
            path: "/library/Naruto - Kishimoto.cbz".to_string(),
            cover_path: None,
            status: 1,
            rating: 8.5,
            review: String::new(),
            current_chapter: 12,
            total_chapters: 72,
            date_added: added.unix_timestamp(),
            last_read: None,
            genre: "Unknown".to_string(),
            file_format: "CBZ".to_string(),
            file_size: 1024,
        };
        let record = Record::try_from(row).unwrap();
        assert_eq!(record.status, ReadingStatus::Reading);
        assert_eq!(record.path, PathBuf::from("/library/Naruto - Kishimoto.cbz"));
        // Unix timestamps are measured in seconds, which strips nanoseconds.
        assert_eq!(record.date_added, added.replace_nanosecond(0).unwrap());
    }

    #[test]
    fn test_model_to_row_clamps_rating() {
        let mut draft = NewRecord::new("/library/a.cbz", "A", "Unknown");
        draft.rating = 99.0;
        let row = RecordRow::from_new(&draft, UtcDateTime::now()).unwrap();
        assert_eq!(row.rating, 10.0);
    }

    #[test]
    fn test_row_with_invalid_status_is_rejected() {
        let row = RecordRow {
            id: 1,
            title: String::new(),
            author: String::new(),
            path: "/a".to_string(),
            cover_path: None,
            status: 9,
            rating: 0.0,
            review: String::new(),
            current_chapter: 0,
            total_chapters: 0,
            date_added: 0,
            last_read: None,
            genre: String::new(),
            file_format: String::new(),
            file_size: 0,
        };
        assert!(Record::try_from(row).is_err());
    }
}
