//! Database schema definitions
//!
//! This module contains the SQL schema for the article store. Tables are
//! created with `IF NOT EXISTS`; there are no migrations.

/// Name of the article table
pub const ARTICLES_TABLE: &str = "news_articles";

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per unique article URL
CREATE TABLE IF NOT EXISTS news_articles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    news_source_url TEXT NOT NULL UNIQUE,
    title TEXT NOT NULL,
    slug TEXT NOT NULL,
    image_path TEXT,
    byline_author TEXT NOT NULL,
    article_detail TEXT NOT NULL,
    article_date TEXT,
    article_date_and_time TEXT NOT NULL,
    created_at TEXT NOT NULL
);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
