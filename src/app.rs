use std::collections::HashMap;

use crate::database::{Database, DatabaseError};
use crate::models::{Memo, MemoFormData, CATEGORY_ALL};

/// Aggregate counts over the session's memo list.
#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    pub total: usize,
    /// Category value to memo count. Categories with no memos are absent,
    /// not present with a zero.
    pub by_category: HashMap<String, usize>,
    /// Length of the currently filtered view.
    pub filtered: usize,
}

/// Session state over the memo store: the last-known-good list of memos
/// plus the active search and category filters.
///
/// The list is a cache. It is overwritten wholesale only by the initial
/// load and `refresh`, and patched incrementally by local mutations; a
/// writer in another session will not be reflected until the next refresh.
/// Filtering and statistics never touch storage.
pub struct App {
    db: Database,
    memos: Vec<Memo>,
    search_query: String,
    selected_category: String,
    loading: bool,
}

impl App {
    /// Build the session state: seed the store if it is empty, then load
    /// every memo. Seeding must finish before the first load so the load
    /// cannot miss the sample rows.
    pub fn new(db: Database) -> Self {
        let mut app = Self {
            db,
            memos: Vec::new(),
            search_query: String::new(),
            selected_category: CATEGORY_ALL.to_string(),
            loading: true,
        };
        if let Err(e) = app.db.seed_sample_data() {
            log::error!("failed to seed sample data: {e}");
        }
        app.reload();
        app
    }

    /// Wholesale load shared by startup and refresh. Failures here are
    /// logged and swallowed, keeping whatever list we already have: a full
    /// reload has no better fallback. User-triggered mutations, by
    /// contrast, always propagate their errors to the caller.
    fn reload(&mut self) {
        self.loading = true;
        match self.db.get_all_memos() {
            Ok(memos) => self.memos = memos,
            Err(e) => log::error!("failed to load memos: {e}"),
        }
        self.loading = false;
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// The cached memo list, newest first.
    pub fn memos(&self) -> &[Memo] {
        &self.memos
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn selected_category(&self) -> &str {
        &self.selected_category
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Look up a memo in the cached list without a storage round trip.
    pub fn memo(&self, id: i64) -> Option<&Memo> {
        self.memos.iter().find(|m| m.id == id)
    }

    /// Create a memo and prepend it to the cached list. New memos carry
    /// the newest timestamp, so prepending preserves the ordering.
    pub fn create_memo(&mut self, form: &MemoFormData) -> Result<Memo, DatabaseError> {
        let memo = self.db.insert_memo(form)?;
        self.memos.insert(0, memo.clone());
        Ok(memo)
    }

    /// Update a memo and replace its cached entry in place. The list is
    /// sorted by creation time, which an update does not change, so the
    /// entry keeps its position rather than being re-sorted.
    pub fn update_memo(&mut self, id: i64, form: &MemoFormData) -> Result<Memo, DatabaseError> {
        let updated = self.db.update_memo(id, form)?;
        if let Some(slot) = self.memos.iter_mut().find(|m| m.id == id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    /// Delete a memo and drop it from the cached list.
    pub fn delete_memo(&mut self, id: i64) -> Result<(), DatabaseError> {
        self.db.delete_memo(id)?;
        self.memos.retain(|m| m.id != id);
        Ok(())
    }

    /// Delete every memo and reset the filters to their defaults.
    pub fn clear_all(&mut self) -> Result<(), DatabaseError> {
        self.db.delete_all_memos()?;
        self.memos.clear();
        self.search_query.clear();
        self.selected_category = CATEGORY_ALL.to_string();
        Ok(())
    }

    /// Re-read the full list from storage, discarding any local drift. On
    /// failure the stale list is kept.
    pub fn refresh(&mut self) {
        self.reload();
    }

    pub fn set_search_query(&mut self, query: String) {
        self.search_query = query;
    }

    pub fn set_category(&mut self, category: String) {
        self.selected_category = category;
    }

    /// The filtered view of the cached list: category filter first (the
    /// "all" sentinel skips it), then a case-insensitive substring match
    /// against title, content or any tag. A whitespace-only query filters
    /// nothing. Tags make this deliberately broader than the store's own
    /// search, which only looks at title and content.
    pub fn filtered_memos(&self) -> Vec<Memo> {
        let query = self.search_query.trim().to_lowercase();
        self.memos
            .iter()
            .filter(|memo| {
                self.selected_category == CATEGORY_ALL
                    || memo.category == self.selected_category
            })
            .filter(|memo| {
                if query.is_empty() {
                    return true;
                }
                memo.title.to_lowercase().contains(&query)
                    || memo.content.to_lowercase().contains(&query)
                    || memo.tags.iter().any(|t| t.to_lowercase().contains(&query))
            })
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> Stats {
        let mut by_category: HashMap<String, usize> = HashMap::new();
        for memo in &self.memos {
            *by_category.entry(memo.category.clone()).or_insert(0) += 1;
        }
        Stats {
            total: self.memos.len(),
            by_category,
            filtered: self.filtered_memos().len(),
        }
    }
}
