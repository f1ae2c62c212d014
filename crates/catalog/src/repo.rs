//! Repository for catalog records and the profile singleton.
//!
//! Every method is a short-lived operation against the pool: acquire, query,
//! release. There are no cross-call transactions, so multi-step sequences
//! (insert then reload, for example) are not atomic with respect to
//! concurrent writers, and don't need to be.

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::{
    DEFAULT_USERNAME, DerivedField, NewRecord, Profile, ProfileRow, ReadingStatus, Record, RecordRow, Updated,
    path_to_string,
};
use exn::ResultExt;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::path::Path;
use time::UtcDateTime;

/// Repository over the catalog database.
///
/// Path uniqueness is enforced here by the store itself: [`add`](Self::add)
/// and [`update`](Self::update) surface the UNIQUE constraint as
/// [`ErrorKind::DuplicatePath`]. Callers may probe [`exists`](Self::exists)
/// as an optimisation, but the constraint is the authoritative dedupe
/// signal: two concurrent inserts of the same path cannot both succeed.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}
impl From<&Database> for Repository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}
impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Records
    // =========================================================================

    /// All catalog records, ordered by title ascending.
    pub async fn get_all(&self) -> Result<Vec<Record>> {
        let rows: Vec<RecordRow> = sqlx::query_as("SELECT * FROM records ORDER BY title")
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Record::try_from).collect()
    }

    /// A single record by id, if it exists.
    pub async fn get(&self, id: i64) -> Result<Option<Record>> {
        let row: Option<RecordRow> = sqlx::query_as("SELECT * FROM records WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.map(Record::try_from).transpose()
    }

    /// Insert a new record, assigning its id and `date_added`.
    ///
    /// Returns [`ErrorKind::DuplicatePath`] if a record already exists at
    /// the same path. The rejection is atomic (the UNIQUE constraint), so
    /// concurrent scans racing on the same file resolve safely here.
    pub async fn add(&self, record: &NewRecord) -> Result<Record> {
        let mut row = RecordRow::from_new(record, UtcDateTime::now())?;
        let result = sqlx::query(
            r#"
            INSERT INTO records (title, author, path, cover_path, status, rating, review,
                                 current_chapter, total_chapters, date_added, last_read,
                                 genre, file_format, file_size)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.title)
        .bind(&row.author)
        .bind(&row.path)
        .bind(&row.cover_path)
        .bind(row.status)
        .bind(row.rating)
        .bind(&row.review)
        .bind(row.current_chapter)
        .bind(row.total_chapters)
        .bind(row.date_added)
        .bind(row.last_read)
        .bind(&row.genre)
        .bind(&row.file_format)
        .bind(row.file_size)
        .execute(&self.pool)
        .await;
        let result = match result {
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                exn::bail!(ErrorKind::DuplicatePath(record.path.clone()))
            },
            other => other.or_raise(|| ErrorKind::Database)?,
        };
        row.id = result.last_insert_rowid();
        Record::try_from(row)
    }

    /// Overwrite all mutable fields of the record with the given id.
    ///
    /// `date_added` is immutable and is never written. Returns the record as
    /// stored together with the derived fields the change invalidated.
    /// Fails with [`ErrorKind::RecordNotFound`] if the id is absent, or
    /// [`ErrorKind::DuplicatePath`] if the update would move the record onto
    /// another record's path.
    pub async fn update(&self, record: &Record) -> Result<Updated> {
        let previous: Option<RecordRow> = sqlx::query_as("SELECT * FROM records WHERE id = ?")
            .bind(record.id)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        let Some(previous) = previous else {
            exn::bail!(ErrorKind::RecordNotFound(record.id));
        };
        let mut row = RecordRow::try_from(record)?;
        row.date_added = previous.date_added;
        let result = sqlx::query(
            r#"
            UPDATE records SET
                title = ?, author = ?, path = ?, cover_path = ?, status = ?,
                rating = ?, review = ?, current_chapter = ?, total_chapters = ?,
                last_read = ?, genre = ?, file_format = ?, file_size = ?
            WHERE id = ?
            "#,
        )
        .bind(&row.title)
        .bind(&row.author)
        .bind(&row.path)
        .bind(&row.cover_path)
        .bind(row.status)
        .bind(row.rating)
        .bind(&row.review)
        .bind(row.current_chapter)
        .bind(row.total_chapters)
        .bind(row.last_read)
        .bind(&row.genre)
        .bind(&row.file_format)
        .bind(row.file_size)
        .bind(row.id)
        .execute(&self.pool)
        .await;
        match result {
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                exn::bail!(ErrorKind::DuplicatePath(record.path.clone()))
            },
            other => other.or_raise(|| ErrorKind::Database)?,
        };
        let invalidated = Self::invalidated_by(&previous, &row);
        Ok(Updated { record: Record::try_from(row)?, invalidated })
    }

    /// Which derived fields a field-level change invalidates.
    fn invalidated_by(old: &RecordRow, new: &RecordRow) -> Vec<DerivedField> {
        let mut invalidated = Vec::new();
        if old.current_chapter != new.current_chapter || old.total_chapters != new.total_chapters {
            invalidated.push(DerivedField::Progress);
        }
        if old.rating != new.rating {
            invalidated.push(DerivedField::RatingText);
        }
        if old.status != new.status {
            invalidated.push(DerivedField::StatusLabel);
            invalidated.push(DerivedField::StatusColor);
        }
        if old.file_size != new.file_size {
            invalidated.push(DerivedField::FileSizeText);
        }
        invalidated
    }

    /// Delete a record by id.
    ///
    /// Returns `false` (not an error) if the id was absent. The id is never
    /// reassigned to a later record.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM records WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether a record exists at the given path.
    pub async fn exists(&self, path: impl AsRef<Path>) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM records WHERE path = ?")
            .bind(path_to_string(path.as_ref())?)
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(count > 0)
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// The singleton profile, created with defaults on first access.
    pub async fn profile(&self) -> Result<Profile> {
        sqlx::query("INSERT OR IGNORE INTO profile (id, username, member_since) VALUES (1, ?, ?)")
            .bind(DEFAULT_USERNAME)
            .bind(UtcDateTime::now().unix_timestamp())
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        let row: ProfileRow = sqlx::query_as("SELECT username, member_since FROM profile WHERE id = 1")
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Profile::try_from(row)
    }

    /// Update the profile's username. Nothing else on the profile is mutable.
    pub async fn update_username(&self, username: impl AsRef<str>) -> Result<()> {
        // Make sure the row exists before updating it.
        self.profile().await?;
        sqlx::query("UPDATE profile SET username = ? WHERE id = 1")
            .bind(username.as_ref())
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(())
    }

    // =========================================================================
    // Aggregates
    // =========================================================================

    /// Record counts per status, only for statuses with at least one record.
    pub async fn count_by_status(&self) -> Result<HashMap<ReadingStatus, u64>> {
        let rows: Vec<(i64, i64)> = sqlx::query_as("SELECT status, COUNT(*) FROM records GROUP BY status")
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        let mut counts = HashMap::with_capacity(rows.len());
        for (status, count) in rows {
            let status = ReadingStatus::try_from(status)?;
            let count = u64::try_from(count).or_raise(|| ErrorKind::InvalidData("status count"))?;
            counts.insert(status, count);
        }
        Ok(counts)
    }

    /// Mean rating over rated records. Unrated records (rating 0) are
    /// excluded from the mean; returns 0 when nothing is rated.
    pub async fn average_rating(&self) -> Result<f64> {
        let average: Option<f64> = sqlx::query_scalar("SELECT AVG(rating) FROM records WHERE rating > 0")
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(average.unwrap_or(0.0))
    }

    /// Up to `limit` rated records, best first.
    pub async fn top_rated(&self, limit: usize) -> Result<Vec<Record>> {
        let limit = i64::try_from(limit).or_raise(|| ErrorKind::InvalidData("limit"))?;
        let rows: Vec<RecordRow> =
            sqlx::query_as("SELECT * FROM records WHERE rating > 0 ORDER BY rating DESC LIMIT ?")
                .bind(limit)
                .fetch_all(&self.pool)
                .await
                .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Record::try_from).collect()
    }

    /// Delete every record and reinitialise the profile with defaults and a
    /// fresh `member_since`. Record ids are not recycled afterwards.
    pub async fn reset(&self) -> Result<()> {
        let mut tx = self.pool.begin().await.or_raise(|| ErrorKind::Database)?;
        sqlx::query("DELETE FROM records").execute(&mut *tx).await.or_raise(|| ErrorKind::Database)?;
        sqlx::query("DELETE FROM profile").execute(&mut *tx).await.or_raise(|| ErrorKind::Database)?;
        sqlx::query("INSERT INTO profile (id, username, member_since) VALUES (1, ?, ?)")
            .bind(DEFAULT_USERNAME)
            .bind(UtcDateTime::now().unix_timestamp())
            .execute(&mut *tx)
            .await
            .or_raise(|| ErrorKind::Database)?;
        tx.commit().await.or_raise(|| ErrorKind::Database)?;
        tracing::info!("catalog reset: all records deleted, profile reinitialised");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn repo() -> Repository {
        let db = Database::connect_in_memory().await.unwrap();
        Repository::from(&db)
    }

    fn draft(path: &str, title: &str) -> NewRecord {
        let mut record = NewRecord::new(path, title, "Unknown");
        record.genre = "Unknown".to_string();
        record.file_format = "CBZ".to_string();
        record
    }

    #[tokio::test]
    async fn test_add_assigns_id_and_date_added() {
        let repo = repo().await;
        let record = repo.add(&draft("/library/a.cbz", "A")).await.unwrap();
        assert!(record.id > 0);
        assert!(record.date_added.unix_timestamp() > 0);
        assert_eq!(repo.get(record.id).await.unwrap().unwrap(), record);
    }

    #[tokio::test]
    async fn test_add_rejects_duplicate_path() {
        let repo = repo().await;
        repo.add(&draft("/library/a.cbz", "A")).await.unwrap();
        let err = repo.add(&draft("/library/a.cbz", "Other Title")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::DuplicatePath(_)));
        // The failed insert must not have left a row behind.
        assert_eq!(repo.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_all_is_ordered_by_title() {
        let repo = repo().await;
        repo.add(&draft("/library/c.cbz", "Gamma")).await.unwrap();
        repo.add(&draft("/library/a.cbz", "Alpha")).await.unwrap();
        repo.add(&draft("/library/b.cbz", "Beta")).await.unwrap();
        let titles: Vec<_> = repo.get_all().await.unwrap().into_iter().map(|r| r.title).collect();
        assert_eq!(titles, ["Alpha", "Beta", "Gamma"]);
    }

    #[tokio::test]
    async fn test_rating_is_clamped_on_write() {
        let repo = repo().await;
        let mut record = draft("/library/a.cbz", "A");
        record.rating = 42.0;
        let stored = repo.add(&record).await.unwrap();
        assert_eq!(stored.rating, 10.0);
        let mut stored = stored;
        stored.rating = -3.0;
        let updated = repo.update(&stored).await.unwrap();
        assert_eq!(updated.record.rating, 0.0);
    }

    #[tokio::test]
    async fn test_update_reports_invalidated_derived_fields() {
        let repo = repo().await;
        let mut record = repo.add(&draft("/library/a.cbz", "A")).await.unwrap();
        record.status = ReadingStatus::Completed;
        record.set_rating(9.0);
        record.current_chapter = 10;
        record.total_chapters = 10;
        let updated = repo.update(&record).await.unwrap();
        assert!(updated.invalidated.contains(&DerivedField::Progress));
        assert!(updated.invalidated.contains(&DerivedField::RatingText));
        assert!(updated.invalidated.contains(&DerivedField::StatusLabel));
        assert!(updated.invalidated.contains(&DerivedField::StatusColor));
        assert!(!updated.invalidated.contains(&DerivedField::FileSizeText));
    }

    #[tokio::test]
    async fn test_update_preserves_date_added() {
        let repo = repo().await;
        let mut record = repo.add(&draft("/library/a.cbz", "A")).await.unwrap();
        let original_date = record.date_added;
        record.date_added = UtcDateTime::from_unix_timestamp(0).unwrap();
        record.review = "great".to_string();
        let updated = repo.update(&record).await.unwrap();
        assert_eq!(updated.record.date_added, original_date);
    }

    #[tokio::test]
    async fn test_update_missing_record_is_not_found() {
        let repo = repo().await;
        let mut record = repo.add(&draft("/library/a.cbz", "A")).await.unwrap();
        repo.delete(record.id).await.unwrap();
        record.review = "gone".to_string();
        let err = repo.update(&record).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::RecordNotFound(_)));
    }

    #[tokio::test]
    async fn test_update_onto_existing_path_is_duplicate() {
        let repo = repo().await;
        repo.add(&draft("/library/a.cbz", "A")).await.unwrap();
        let mut other = repo.add(&draft("/library/b.cbz", "B")).await.unwrap();
        other.path = "/library/a.cbz".into();
        let err = repo.update(&other).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::DuplicatePath(_)));
    }

    #[tokio::test]
    async fn test_delete_is_a_noop_when_absent() {
        let repo = repo().await;
        let record = repo.add(&draft("/library/a.cbz", "A")).await.unwrap();
        assert!(repo.delete(record.id).await.unwrap());
        assert!(!repo.delete(record.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = repo().await;
        let first = repo.add(&draft("/library/a.cbz", "A")).await.unwrap();
        repo.delete(first.id).await.unwrap();
        let second = repo.add(&draft("/library/b.cbz", "B")).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_exists() {
        let repo = repo().await;
        assert!(!repo.exists("/library/a.cbz").await.unwrap());
        repo.add(&draft("/library/a.cbz", "A")).await.unwrap();
        assert!(repo.exists("/library/a.cbz").await.unwrap());
    }

    #[tokio::test]
    async fn test_profile_is_created_lazily() {
        let repo = repo().await;
        let profile = repo.profile().await.unwrap();
        assert_eq!(profile.username, DEFAULT_USERNAME);
        // Second access returns the same row, not a fresh one.
        let again = repo.profile().await.unwrap();
        assert_eq!(again.member_since, profile.member_since);
    }

    #[tokio::test]
    async fn test_update_username_only_touches_username() {
        let repo = repo().await;
        let before = repo.profile().await.unwrap();
        repo.update_username("Reader").await.unwrap();
        let after = repo.profile().await.unwrap();
        assert_eq!(after.username, "Reader");
        assert_eq!(after.member_since, before.member_since);
    }

    #[tokio::test]
    async fn test_count_by_status_omits_empty_statuses() {
        let repo = repo().await;
        let mut reading = draft("/library/a.cbz", "A");
        reading.status = ReadingStatus::Reading;
        repo.add(&reading).await.unwrap();
        repo.add(&draft("/library/b.cbz", "B")).await.unwrap();
        let counts = repo.count_by_status().await.unwrap();
        assert_eq!(counts.get(&ReadingStatus::Reading), Some(&1));
        assert_eq!(counts.get(&ReadingStatus::PlanToRead), Some(&1));
        assert!(!counts.contains_key(&ReadingStatus::Dropped));
    }

    #[tokio::test]
    async fn test_average_rating_excludes_unrated() {
        let repo = repo().await;
        for (path, rating) in [("/library/a.cbz", 0.0), ("/library/b.cbz", 8.0), ("/library/c.cbz", 9.0)] {
            let mut record = draft(path, path);
            record.rating = rating;
            repo.add(&record).await.unwrap();
        }
        assert_eq!(repo.average_rating().await.unwrap(), 8.5);
    }

    #[tokio::test]
    async fn test_average_rating_with_no_rated_records_is_zero() {
        let repo = repo().await;
        repo.add(&draft("/library/a.cbz", "A")).await.unwrap();
        assert_eq!(repo.average_rating().await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_top_rated_orders_and_limits() {
        let repo = repo().await;
        for (path, rating) in
            [("/library/a.cbz", 6.0), ("/library/b.cbz", 9.5), ("/library/c.cbz", 0.0), ("/library/d.cbz", 8.0)]
        {
            let mut record = draft(path, path);
            record.rating = rating;
            repo.add(&record).await.unwrap();
        }
        let top = repo.top_rated(2).await.unwrap();
        let ratings: Vec<_> = top.iter().map(|r| r.rating).collect();
        assert_eq!(ratings, [9.5, 8.0]);
    }

    #[tokio::test]
    async fn test_reset_clears_records_and_reinitialises_profile() {
        let repo = repo().await;
        repo.add(&draft("/library/a.cbz", "A")).await.unwrap();
        repo.update_username("Reader").await.unwrap();
        repo.reset().await.unwrap();
        assert!(repo.get_all().await.unwrap().is_empty());
        let profile = repo.profile().await.unwrap();
        assert_eq!(profile.username, DEFAULT_USERNAME);
    }
}
