//! Crawler module for the article harvest
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching for text and binary payloads
//! - Article page parsing
//! - Lead image downloads
//! - The sequential pipeline tying them together

mod article;
mod coordinator;
mod fetcher;
mod images;

pub use article::{parse_article, ParsedArticle};
pub use coordinator::{
    parse_lastmod, run_harvest, ArticleOutcome, Harvester, RunSummary, MAX_ARTICLES_PER_SECTION,
    MAX_SECTIONS_PER_INDEX,
};
pub use fetcher::{build_http_client, fetch_bytes, fetch_text};
pub use images::{daily_image_dir, download_image, generate_image_filename, image_extension};
