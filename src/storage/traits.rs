//! Storage traits and error types
//!
//! This module defines the trait interface for the article store and its
//! error types.

use crate::storage::{ArticleRecord, NewArticle};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Article already stored: {0}")]
    DuplicateArticle(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for article store implementations
pub trait ArticleStore {
    /// Returns true if an article with this source URL is already stored
    fn article_exists(&self, url: &str) -> StorageResult<bool>;

    /// Inserts a new article and returns its row id
    ///
    /// Fails with `StorageError::DuplicateArticle` if the source URL is
    /// already present; existing rows are never updated.
    fn insert_article(&mut self, article: &NewArticle) -> StorageResult<i64>;

    /// Gets a stored article by source URL
    fn get_article_by_url(&self, url: &str) -> StorageResult<Option<ArticleRecord>>;

    /// Counts stored articles
    fn count_articles(&self) -> StorageResult<u64>;

    /// Counts stored articles that have a local image
    fn count_articles_with_images(&self) -> StorageResult<u64>;

    /// Returns the most recently stored articles, newest first
    fn recent_articles(&self, limit: usize) -> StorageResult<Vec<ArticleRecord>>;

    /// Resets the id sequence to start at 1 when the table is empty
    ///
    /// # Returns
    ///
    /// * `true` - The table was empty and the sequence was reset
    /// * `false` - The table has rows; nothing was changed
    fn reset_sequence_if_empty(&mut self) -> StorageResult<bool>;
}
