//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the ArticleStore trait.

use crate::storage::schema::{initialize_schema, ARTICLES_TABLE};
use crate::storage::traits::{ArticleStore, StorageError, StorageResult};
use crate::storage::{ArticleRecord, NewArticle};
use crate::HarvestError;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{ffi, params, Connection, ErrorCode, OptionalExtension, Row};
use std::path::Path;

const ARTICLE_COLUMNS: &str = "id, news_source_url, title, slug, image_path, byline_author,
     article_detail, article_date, article_date_and_time, created_at";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(HarvestError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, HarvestError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        ",
        )?;

        initialize_schema(&conn)?;

        tracing::debug!("Opened article database at {}", path.display());
        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, HarvestError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn row_to_article(row: &Row<'_>) -> rusqlite::Result<ArticleRecord> {
    let raw_time: String = row.get(8)?;
    let article_date_and_time = DateTime::parse_from_rfc3339(&raw_time)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?;

    Ok(ArticleRecord {
        id: row.get(0)?,
        news_source_url: row.get(1)?,
        title: row.get(2)?,
        slug: row.get(3)?,
        image_path: row.get(4)?,
        byline_author: row.get(5)?,
        article_detail: row.get(6)?,
        article_date: row.get(7)?,
        article_date_and_time,
        created_at: row.get(9)?,
    })
}

/// Only UNIQUE failures; NOT NULL and CHECK failures share the primary code
fn is_unique_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

impl ArticleStore for SqliteStorage {
    fn article_exists(&self, url: &str) -> StorageResult<bool> {
        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM news_articles WHERE news_source_url = ?1",
                params![url],
                |row| row.get(0),
            )
            .optional()?;
        Ok(existing.is_some())
    }

    fn insert_article(&mut self, article: &NewArticle) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        let result = self.conn.execute(
            "INSERT INTO news_articles (news_source_url, title, slug, image_path, byline_author,
             article_detail, article_date, article_date_and_time, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                article.news_source_url,
                article.title,
                article.slug,
                article.image_path,
                article.byline_author,
                article.article_detail,
                article.article_date,
                article.article_date_and_time.to_rfc3339(),
                now
            ],
        );

        match result {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(e) if is_unique_violation(&e) => Err(StorageError::DuplicateArticle(
                article.news_source_url.clone(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    fn get_article_by_url(&self, url: &str) -> StorageResult<Option<ArticleRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM news_articles WHERE news_source_url = ?1",
            ARTICLE_COLUMNS
        ))?;

        let article = stmt.query_row(params![url], row_to_article).optional()?;
        Ok(article)
    }

    fn count_articles(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM news_articles", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_articles_with_images(&self) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM news_articles WHERE image_path IS NOT NULL",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn recent_articles(&self, limit: usize) -> StorageResult<Vec<ArticleRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM news_articles ORDER BY id DESC LIMIT ?1",
            ARTICLE_COLUMNS
        ))?;

        let articles = stmt
            .query_map(params![limit as i64], row_to_article)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(articles)
    }

    fn reset_sequence_if_empty(&mut self) -> StorageResult<bool> {
        if self.count_articles()? > 0 {
            return Ok(false);
        }

        // With AUTOINCREMENT the next id is max(seq) + 1; no row means 1
        self.conn.execute(
            "DELETE FROM sqlite_sequence WHERE name = ?1",
            params![ARTICLES_TABLE],
        )?;
        Ok(true)
    }
}
