use serde::{Deserialize, Serialize};

/// The fixed set of memo categories. Stored as plain text; values are
/// validated at the CLI layer, never by the database layer.
pub const CATEGORIES: [&str; 5] = ["personal", "work", "study", "idea", "other"];

/// Sentinel category value meaning "no category filter".
pub const CATEGORY_ALL: &str = "all";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memo {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
    pub created_at: String, // RFC 3339
    pub updated_at: String, // RFC 3339
}

/// The mutable subset of a memo, used for both create and update.
/// Ids and timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoFormData {
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
}

impl MemoFormData {
    pub fn new(title: String, content: String, category: String, tags: Vec<String>) -> Self {
        Self {
            title,
            content,
            category,
            tags,
        }
    }
}

/// Example memos inserted once when the store is empty, so a first launch
/// has something to show.
pub fn sample_memos() -> Vec<MemoFormData> {
    vec![
        MemoFormData::new(
            "Kickoff meeting prep".to_string(),
            "Things to have ready before Monday's 10am kickoff:\n\n\
             - Draft the project scope document\n\
             - Assign roles across the team\n\
             - Rough schedule with milestones\n\
             - List of resources we still need"
                .to_string(),
            "work".to_string(),
            vec!["meeting".to_string(), "project".to_string()],
        ),
        MemoFormData::new(
            "Async Rust study plan".to_string(),
            "Topics to work through next:\n\n\
             1. Futures and the executor model\n\
             2. Pinning\n\
             3. Structured concurrency patterns\n\
             4. Cancellation and timeouts\n\n\
             Read the async book this weekend and build a small example for each chapter."
                .to_string(),
            "study".to_string(),
            vec!["rust".to_string(), "learning".to_string()],
        ),
        MemoFormData::new(
            "App idea: habit tracker".to_string(),
            "A small app for tracking daily habits.\n\n\
             Core features:\n\
             - Register and manage habits\n\
             - Daily check-in\n\
             - Progress visualization\n\
             - Streak statistics\n\n\
             Target: a working prototype in three months."
                .to_string(),
            "idea".to_string(),
            vec!["apps".to_string(), "habits".to_string()],
        ),
        MemoFormData::new(
            "Weekend trip plan".to_string(),
            "Saturday:\n\
             - Morning hike\n\
             - Afternoon at the coast\n\
             - Dinner in the old town\n\n\
             Sunday:\n\
             - Market in the morning\n\
             - Drive back after lunch\n\n\
             Pack: boots, camera, sunscreen."
                .to_string(),
            "personal".to_string(),
            vec!["travel".to_string(), "weekend".to_string()],
        ),
        MemoFormData::new(
            "Reading list".to_string(),
            "Books to get through this year:\n\n\
             Work-related:\n\
             - Clean Code\n\
             - Refactoring, 2nd edition\n\n\
             Everything else:\n\
             - Atomic Habits\n\
             - The Midnight Library"
                .to_string(),
            "personal".to_string(),
            vec!["books".to_string(), "reading".to_string()],
        ),
        MemoFormData::new(
            "Performance tuning notes".to_string(),
            "Ideas for speeding up the web app:\n\n\
             Frontend:\n\
             - Image optimization and lazy loading\n\
             - Code splitting\n\
             - Bundle size audit\n\n\
             Backend:\n\
             - Query optimization\n\
             - Response caching\n\
             - CDN for static assets"
                .to_string(),
            "idea".to_string(),
            vec!["performance".to_string(), "web".to_string()],
        ),
    ]
}
