use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::app::App;
use crate::config::Config;
use crate::database::DatabaseError;
use crate::models::{MemoFormData, CATEGORIES, CATEGORY_ALL};
use crate::summary::{SummaryClient, SummaryError};

#[derive(Parser)]
#[command(name = "memopad")]
#[command(about = "Personal memos with categories, tags and AI summaries")]
#[command(version)]
pub struct Cli {
    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new memo
    Add {
        /// Memo title
        title: String,
        /// Memo content (markdown is fine)
        #[arg(long)]
        content: Option<String>,
        /// Category: personal, work, study, idea or other
        #[arg(long, default_value = "other", value_parser = parse_category)]
        category: String,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// List memos, optionally filtered by category and search text
    List {
        /// Category filter ("all" lists every category)
        #[arg(long, default_value = CATEGORY_ALL, value_parser = parse_category_filter)]
        category: String,
        /// Case-insensitive search over title, content and tags
        #[arg(long)]
        search: Option<String>,
    },
    /// Show a single memo in full
    Show {
        /// Memo id
        id: i64,
    },
    /// Edit a memo. Omitted fields keep their current value
    Edit {
        /// Memo id
        id: i64,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New content
        #[arg(long)]
        content: Option<String>,
        /// New category
        #[arg(long, value_parser = parse_category)]
        category: Option<String>,
        /// New comma-separated tags (replaces the old set)
        #[arg(long)]
        tags: Option<String>,
    },
    /// Delete a memo
    Delete {
        /// Memo id
        id: i64,
    },
    /// Delete every memo
    Clear {
        /// Skip the safety check
        #[arg(long)]
        yes: bool,
    },
    /// Show memo counts, overall and per category
    Stats,
    /// Summarize a memo's content with the configured AI model
    Summarize {
        /// Memo id
        id: i64,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),
    #[error("Summary error: {0}")]
    SummaryError(#[from] SummaryError),
    #[error("Memo {0} not found")]
    MemoNotFound(i64),
    #[error("GEMINI_API_KEY environment variable is not set")]
    MissingApiKey,
}

/// Category validation lives here in the presentation layer; the database
/// layer stores whatever it is given.
fn parse_category(value: &str) -> Result<String, String> {
    if CATEGORIES.contains(&value) {
        Ok(value.to_string())
    } else {
        Err(format!(
            "unknown category '{}' (expected one of: {})",
            value,
            CATEGORIES.join(", ")
        ))
    }
}

fn parse_category_filter(value: &str) -> Result<String, String> {
    if value == CATEGORY_ALL {
        Ok(value.to_string())
    } else {
        parse_category(value)
    }
}

fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

/// Handle the add command
pub fn handle_add(
    title: String,
    content: Option<String>,
    category: String,
    tags: Option<String>,
    app: &mut App,
) -> Result<(), CliError> {
    let form = MemoFormData::new(
        title,
        content.unwrap_or_default(),
        category,
        tags.as_deref().map(parse_tags).unwrap_or_default(),
    );

    let memo = app.create_memo(&form)?;
    println!("Memo created successfully (ID: {})", memo.id);

    Ok(())
}

/// Handle the list command
pub fn handle_list(
    category: String,
    search: Option<String>,
    app: &mut App,
) -> Result<(), CliError> {
    app.set_category(category);
    app.set_search_query(search.unwrap_or_default());

    let memos = app.filtered_memos();
    if memos.is_empty() {
        println!("No memos found.");
        return Ok(());
    }

    for memo in &memos {
        let tags = if memo.tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", memo.tags.join(", "))
        };
        println!("{:>4}  {:<10}  {}{}", memo.id, memo.category, memo.title, tags);
    }
    println!("{} memo(s)", memos.len());

    Ok(())
}

/// Handle the show command
pub fn handle_show(id: i64, app: &App) -> Result<(), CliError> {
    let memo = app.db().get_memo(id)?.ok_or(CliError::MemoNotFound(id))?;

    println!("Title:    {}", memo.title);
    println!("Category: {}", memo.category);
    if !memo.tags.is_empty() {
        println!("Tags:     {}", memo.tags.join(", "));
    }
    println!("Created:  {}", memo.created_at);
    println!("Updated:  {}", memo.updated_at);
    println!();
    println!("{}", memo.content);

    Ok(())
}

/// Handle the edit command. The update is a full replace at the store, so
/// omitted flags are pre-filled from the current memo, the same way an
/// edit form would be.
pub fn handle_edit(
    id: i64,
    title: Option<String>,
    content: Option<String>,
    category: Option<String>,
    tags: Option<String>,
    app: &mut App,
) -> Result<(), CliError> {
    let existing = app.db().get_memo(id)?.ok_or(CliError::MemoNotFound(id))?;

    let form = MemoFormData::new(
        title.unwrap_or(existing.title),
        content.unwrap_or(existing.content),
        category.unwrap_or(existing.category),
        tags.as_deref().map(parse_tags).unwrap_or(existing.tags),
    );

    app.update_memo(id, &form)?;
    println!("Memo updated successfully (ID: {})", id);

    Ok(())
}

/// Handle the delete command
pub fn handle_delete(id: i64, app: &mut App) -> Result<(), CliError> {
    app.delete_memo(id)?;
    println!("Memo deleted (ID: {})", id);

    Ok(())
}

/// Handle the clear command
pub fn handle_clear(yes: bool, app: &mut App) -> Result<(), CliError> {
    if !yes {
        println!("Refusing to delete all memos without --yes.");
        return Ok(());
    }

    app.clear_all()?;
    println!("All memos deleted.");

    Ok(())
}

/// Handle the stats command
pub fn handle_stats(app: &App) -> Result<(), CliError> {
    let stats = app.stats();
    println!("Total memos: {}", stats.total);

    let mut categories: Vec<_> = stats.by_category.iter().collect();
    categories.sort();
    for (category, count) in categories {
        println!("  {:<10} {}", category, count);
    }

    Ok(())
}

/// Handle the summarize command
pub fn handle_summarize(id: i64, app: &App, config: &Config) -> Result<(), CliError> {
    let memo = app.db().get_memo(id)?.ok_or(CliError::MemoNotFound(id))?;

    let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| CliError::MissingApiKey)?;
    let client = SummaryClient::new(api_key, &config.summary)?;

    let summary = client.summarize(&memo.content)?;
    println!("{summary}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_split_on_commas_and_trim() {
        assert_eq!(
            parse_tags(" rust , cli ,,notes "),
            vec!["rust".to_string(), "cli".to_string(), "notes".to_string()]
        );
        assert!(parse_tags("  ").is_empty());
    }

    #[test]
    fn known_categories_parse_and_unknown_are_rejected() {
        assert_eq!(parse_category("work").unwrap(), "work");
        assert!(parse_category("all").is_err());
        assert!(parse_category("misc").is_err());
    }

    #[test]
    fn category_filter_additionally_accepts_all() {
        assert_eq!(parse_category_filter("all").unwrap(), "all");
        assert_eq!(parse_category_filter("idea").unwrap(), "idea");
        assert!(parse_category_filter("misc").is_err());
    }
}
