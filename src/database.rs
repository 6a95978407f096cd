use rusqlite::Connection;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::{sample_memos, Memo, MemoFormData, CATEGORY_ALL};
use crate::utils::current_timestamp;

/// One coarse error per storage operation. The underlying sqlite fault is
/// carried as the source and logged where it happens; callers only see
/// which operation failed.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to create database directory: {0}")]
    DirectoryError(String),
    #[error("Failed to open database")]
    OpenError(#[source] rusqlite::Error),
    #[error("Failed to load memos")]
    FetchError(#[source] rusqlite::Error),
    #[error("Failed to create memo")]
    CreateError(#[source] rusqlite::Error),
    #[error("Failed to update memo")]
    UpdateError(#[source] rusqlite::Error),
    #[error("Failed to delete memo")]
    DeleteError(#[source] rusqlite::Error),
    #[error("Failed to count memos")]
    CountError(#[source] rusqlite::Error),
}

const MEMO_COLUMNS: &str = "id, title, content, category, tags, created_at, updated_at";

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Create a new database connection and initialize the schema
    pub fn new(path: &str) -> Result<Self, DatabaseError> {
        let db_path = PathBuf::from(path);

        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DatabaseError::DirectoryError(e.to_string()))?;
            }
        }

        let conn = Connection::open(&db_path).map_err(DatabaseError::OpenError)?;

        let db = Database { conn };
        db.initialize_schema()?;

        Ok(db)
    }

    /// Open an in-memory database with the same schema. Useful for tests
    /// and throwaway sessions.
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::OpenError)?;
        let db = Database { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Initialize the database schema (table and indexes)
    fn initialize_schema(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS memos (
                    id          INTEGER PRIMARY KEY AUTOINCREMENT,
                    title       TEXT NOT NULL,
                    content     TEXT NOT NULL,
                    category    TEXT NOT NULL DEFAULT 'other',
                    tags        TEXT NOT NULL DEFAULT '[]',
                    created_at  TEXT NOT NULL,
                    updated_at  TEXT NOT NULL
                )",
                [],
            )
            .map_err(DatabaseError::OpenError)?;

        self.conn
            .execute(
                "CREATE INDEX IF NOT EXISTS idx_memos_created_at ON memos(created_at)",
                [],
            )
            .map_err(DatabaseError::OpenError)?;

        self.conn
            .execute(
                "CREATE INDEX IF NOT EXISTS idx_memos_category ON memos(category)",
                [],
            )
            .map_err(DatabaseError::OpenError)?;

        Ok(())
    }

    /// Get a reference to the underlying connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Helper function to map a row to a Memo
    fn row_to_memo(row: &rusqlite::Row) -> Result<Memo, rusqlite::Error> {
        let tags_json: String = row.get(4)?;
        let tags: Vec<String> = serde_json::from_str(&tags_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;
        Ok(Memo {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            category: row.get(3)?,
            tags,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }

    /// Fetch a single row by id, raising QueryReturnedNoRows when absent
    fn fetch_row(&self, id: i64) -> Result<Memo, rusqlite::Error> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {MEMO_COLUMNS} FROM memos WHERE id = ?1"))?;
        stmt.query_row(rusqlite::params![id], Self::row_to_memo)
    }

    /// Get all memos ordered by created_at DESC (newest first). Ids break
    /// ties between identical timestamps.
    pub fn get_all_memos(&self) -> Result<Vec<Memo>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {MEMO_COLUMNS} FROM memos ORDER BY created_at DESC, id DESC"
            ))
            .map_err(|e| {
                log::error!("failed to load memos: {e}");
                DatabaseError::FetchError(e)
            })?;
        let memos = stmt
            .query_map([], Self::row_to_memo)
            .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
            .map_err(|e| {
                log::error!("failed to load memos: {e}");
                DatabaseError::FetchError(e)
            })?;
        Ok(memos)
    }

    /// Get a single memo by id. A missing row is Ok(None), not an error.
    pub fn get_memo(&self, id: i64) -> Result<Option<Memo>, DatabaseError> {
        match self.fetch_row(id) {
            Ok(memo) => Ok(Some(memo)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => {
                log::error!("failed to load memo {id}: {e}");
                Err(DatabaseError::FetchError(e))
            }
        }
    }

    /// Insert a new memo and return the persisted row, so store-assigned
    /// fields (id, timestamps) are visible to the caller.
    pub fn insert_memo(&self, form: &MemoFormData) -> Result<Memo, DatabaseError> {
        let now = current_timestamp();
        self.conn
            .execute(
                "INSERT INTO memos (title, content, category, tags, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                rusqlite::params![
                    form.title,
                    form.content,
                    form.category,
                    tags_to_json(&form.tags),
                    now
                ],
            )
            .map_err(|e| {
                log::error!("failed to create memo: {e}");
                DatabaseError::CreateError(e)
            })?;

        let id = self.conn.last_insert_rowid();
        self.fetch_row(id).map_err(|e| {
            log::error!("failed to read back created memo {id}: {e}");
            DatabaseError::CreateError(e)
        })
    }

    /// Replace all mutable fields of an existing memo and return the row as
    /// read back from storage. A missing id surfaces as an update error:
    /// the read-back of the row fails rather than silently doing nothing.
    pub fn update_memo(&self, id: i64, form: &MemoFormData) -> Result<Memo, DatabaseError> {
        let now = current_timestamp();
        self.conn
            .execute(
                "UPDATE memos SET title = ?1, content = ?2, category = ?3, tags = ?4, updated_at = ?5
                 WHERE id = ?6",
                rusqlite::params![
                    form.title,
                    form.content,
                    form.category,
                    tags_to_json(&form.tags),
                    now,
                    id
                ],
            )
            .map_err(|e| {
                log::error!("failed to update memo {id}: {e}");
                DatabaseError::UpdateError(e)
            })?;

        self.fetch_row(id).map_err(|e| {
            log::error!("failed to read back updated memo {id}: {e}");
            DatabaseError::UpdateError(e)
        })
    }

    /// Delete a memo by id. Deleting a missing id is not an error.
    pub fn delete_memo(&self, id: i64) -> Result<(), DatabaseError> {
        self.conn
            .execute("DELETE FROM memos WHERE id = ?1", rusqlite::params![id])
            .map_err(|e| {
                log::error!("failed to delete memo {id}: {e}");
                DatabaseError::DeleteError(e)
            })?;
        Ok(())
    }

    /// Delete every memo in the store
    pub fn delete_all_memos(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute("DELETE FROM memos WHERE id IS NOT NULL", [])
            .map_err(|e| {
                log::error!("failed to delete all memos: {e}");
                DatabaseError::DeleteError(e)
            })?;
        Ok(())
    }

    /// Count the memos in the store
    pub fn count_memos(&self) -> Result<i64, DatabaseError> {
        let count: Option<i64> = self
            .conn
            .query_row("SELECT COUNT(*) FROM memos", [], |row| row.get(0))
            .map_err(|e| {
                log::error!("failed to count memos: {e}");
                DatabaseError::CountError(e)
            })?;
        Ok(count.unwrap_or(0))
    }

    /// Get all memos with the given category, newest first. The "all"
    /// sentinel applies no filter and behaves exactly like get_all_memos.
    pub fn get_memos_by_category(&self, category: &str) -> Result<Vec<Memo>, DatabaseError> {
        if category == CATEGORY_ALL {
            return self.get_all_memos();
        }

        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {MEMO_COLUMNS} FROM memos WHERE category = ?1
                 ORDER BY created_at DESC, id DESC"
            ))
            .map_err(|e| {
                log::error!("failed to load memos by category: {e}");
                DatabaseError::FetchError(e)
            })?;
        let memos = stmt
            .query_map(rusqlite::params![category], Self::row_to_memo)
            .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
            .map_err(|e| {
                log::error!("failed to load memos by category: {e}");
                DatabaseError::FetchError(e)
            })?;
        Ok(memos)
    }

    /// Case-insensitive substring search over title and content, newest
    /// first. Tags are not searched here; the in-memory view has a broader
    /// filter that covers them.
    pub fn search_memos(&self, query: &str) -> Result<Vec<Memo>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {MEMO_COLUMNS} FROM memos
                 WHERE lower(title) LIKE '%' || lower(?1) || '%'
                    OR lower(content) LIKE '%' || lower(?1) || '%'
                 ORDER BY created_at DESC, id DESC"
            ))
            .map_err(|e| {
                log::error!("failed to search memos: {e}");
                DatabaseError::FetchError(e)
            })?;
        let memos = stmt
            .query_map(rusqlite::params![query], Self::row_to_memo)
            .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
            .map_err(|e| {
                log::error!("failed to search memos: {e}");
                DatabaseError::FetchError(e)
            })?;
        Ok(memos)
    }

    /// Insert the sample memos if the store is empty. Returns false when
    /// data already exists or the bulk insert fails, true when the seed
    /// actually ran. Idempotent once any memo is present.
    pub fn seed_sample_data(&self) -> Result<bool, DatabaseError> {
        if self.count_memos()? > 0 {
            return Ok(false);
        }

        let result = (|| -> Result<(), rusqlite::Error> {
            let tx = self.conn.unchecked_transaction()?;
            for form in sample_memos() {
                let now = current_timestamp();
                tx.execute(
                    "INSERT INTO memos (title, content, category, tags, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                    rusqlite::params![
                        form.title,
                        form.content,
                        form.category,
                        tags_to_json(&form.tags),
                        now
                    ],
                )?;
            }
            tx.commit()
        })();

        match result {
            Ok(()) => Ok(true),
            Err(e) => {
                log::warn!("failed to seed sample data: {e}");
                Ok(false)
            }
        }
    }
}

/// Tags are persisted as a JSON array in a TEXT column, preserving order
/// and duplicates.
fn tags_to_json(tags: &[String]) -> String {
    serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn form(title: &str, category: &str, tags: &[&str]) -> MemoFormData {
        MemoFormData::new(
            title.to_string(),
            format!("{title} body"),
            category.to_string(),
            tags.iter().map(|t| t.to_string()).collect(),
        )
    }

    #[test]
    fn new_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("memos.db");
        let db = Database::new(path.to_str().unwrap()).unwrap();
        assert_eq!(db.count_memos().unwrap(), 0);
        assert!(path.exists());
    }

    #[test]
    fn insert_assigns_id_and_equal_timestamps() {
        let db = open();
        let memo = db.insert_memo(&form("First", "work", &["a"])).unwrap();
        assert!(memo.id > 0);
        assert_eq!(memo.created_at, memo.updated_at);
        assert_eq!(memo.title, "First");
        assert_eq!(memo.tags, vec!["a".to_string()]);
    }

    #[test]
    fn insert_then_independent_fetch_round_trips() {
        let db = open();
        let created = db.insert_memo(&form("Round trip", "idea", &["x", "y"])).unwrap();
        let fetched = db.get_memo(created.id).unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn get_missing_memo_is_none() {
        let db = open();
        assert_eq!(db.get_memo(9999).unwrap(), None);
    }

    #[test]
    fn list_orders_newest_first() {
        let db = open();
        db.insert_memo(&form("oldest", "work", &[])).unwrap();
        db.insert_memo(&form("middle", "work", &[])).unwrap();
        let newest = db.insert_memo(&form("newest", "work", &[])).unwrap();

        let memos = db.get_all_memos().unwrap();
        assert_eq!(memos.len(), 3);
        assert_eq!(memos[0], newest);
        assert_eq!(memos[2].title, "oldest");
    }

    #[test]
    fn empty_store_lists_empty_not_error() {
        let db = open();
        assert!(db.get_all_memos().unwrap().is_empty());
    }

    #[test]
    fn update_replaces_fields_and_keeps_created_at() {
        let db = open();
        let created = db.insert_memo(&form("Before", "work", &["old"])).unwrap();
        let updated = db
            .update_memo(created.id, &form("After", "idea", &["new"]))
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "After");
        assert_eq!(updated.category, "idea");
        assert_eq!(updated.tags, vec!["new".to_string()]);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= updated.created_at);
    }

    #[test]
    fn update_missing_id_is_an_update_error() {
        let db = open();
        let err = db.update_memo(42, &form("Ghost", "other", &[])).unwrap_err();
        assert!(matches!(err, DatabaseError::UpdateError(_)));
    }

    #[test]
    fn delete_removes_row_and_missing_id_is_ok() {
        let db = open();
        let memo = db.insert_memo(&form("Doomed", "other", &[])).unwrap();
        db.delete_memo(memo.id).unwrap();
        assert_eq!(db.get_memo(memo.id).unwrap(), None);

        // Deleting again is not existence-checked
        db.delete_memo(memo.id).unwrap();
    }

    #[test]
    fn delete_all_empties_the_store() {
        let db = open();
        db.insert_memo(&form("a", "work", &[])).unwrap();
        db.insert_memo(&form("b", "idea", &[])).unwrap();
        db.delete_all_memos().unwrap();
        assert_eq!(db.count_memos().unwrap(), 0);
    }

    #[test]
    fn count_is_zero_on_empty_store() {
        let db = open();
        assert_eq!(db.count_memos().unwrap(), 0);
        db.insert_memo(&form("one", "work", &[])).unwrap();
        assert_eq!(db.count_memos().unwrap(), 1);
    }

    #[test]
    fn category_filter_matches_exactly() {
        let db = open();
        db.insert_memo(&form("w1", "work", &[])).unwrap();
        db.insert_memo(&form("p1", "personal", &[])).unwrap();
        db.insert_memo(&form("w2", "work", &[])).unwrap();

        let work = db.get_memos_by_category("work").unwrap();
        assert_eq!(work.len(), 2);
        assert!(work.iter().all(|m| m.category == "work"));
    }

    #[test]
    fn category_all_behaves_like_list_all() {
        let db = open();
        db.insert_memo(&form("w1", "work", &[])).unwrap();
        db.insert_memo(&form("p1", "personal", &[])).unwrap();

        assert_eq!(
            db.get_memos_by_category(CATEGORY_ALL).unwrap(),
            db.get_all_memos().unwrap()
        );
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_content() {
        let db = open();
        db.insert_memo(&MemoFormData::new(
            "Grocery Run".to_string(),
            "buy milk and bread".to_string(),
            "personal".to_string(),
            vec![],
        ))
        .unwrap();
        db.insert_memo(&MemoFormData::new(
            "Standup".to_string(),
            "Discuss the MILK initiative".to_string(),
            "work".to_string(),
            vec![],
        ))
        .unwrap();

        let hits = db.search_memos("milk").unwrap();
        assert_eq!(hits.len(), 2);

        let hits = db.search_memos("grocery").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Grocery Run");
    }

    #[test]
    fn empty_query_matches_every_memo() {
        let db = open();
        db.insert_memo(&form("a", "work", &[])).unwrap();
        db.insert_memo(&form("b", "idea", &[])).unwrap();

        assert_eq!(db.search_memos("").unwrap().len(), 2);
    }

    #[test]
    fn search_does_not_look_at_tags() {
        let db = open();
        db.insert_memo(&MemoFormData::new(
            "Untitled".to_string(),
            "nothing to see".to_string(),
            "other".to_string(),
            vec!["secret".to_string()],
        ))
        .unwrap();

        assert!(db.search_memos("secret").unwrap().is_empty());
    }

    #[test]
    fn seed_populates_once_then_skips() {
        let db = open();
        let expected = sample_memos().len() as i64;

        assert!(db.seed_sample_data().unwrap());
        assert_eq!(db.count_memos().unwrap(), expected);

        assert!(!db.seed_sample_data().unwrap());
        assert_eq!(db.count_memos().unwrap(), expected);
    }
}
