//! Storage module for persisting harvested articles
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Deduplicated article inserts keyed by source URL
//! - The start-of-run id sequence reset
//! - Read queries for statistics

mod schema;
mod sqlite;
mod traits;

pub use schema::ARTICLES_TABLE;
pub use sqlite::SqliteStorage;
pub use traits::{ArticleStore, StorageError, StorageResult};

use chrono::{DateTime, FixedOffset};

/// An article ready to be inserted
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub news_source_url: String,
    pub title: String,
    pub slug: String,
    /// Local path of the downloaded lead image
    pub image_path: Option<String>,
    pub byline_author: String,
    pub article_detail: String,
    /// `<lastmod>` of the section sitemap, verbatim
    pub article_date: Option<String>,
    /// The article's own `<lastmod>`
    pub article_date_and_time: DateTime<FixedOffset>,
}

/// Represents an article row in the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    pub id: i64,
    pub news_source_url: String,
    pub title: String,
    pub slug: String,
    pub image_path: Option<String>,
    pub byline_author: String,
    pub article_detail: String,
    pub article_date: Option<String>,
    pub article_date_and_time: DateTime<FixedOffset>,
    pub created_at: String,
}
