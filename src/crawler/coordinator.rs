//! Harvest coordinator - the sequential scrape pipeline
//!
//! The pipeline for each configured site is:
//! - robots.txt → sitemap index URL
//! - sitemap index → first two section sitemaps
//! - section sitemap → first two article URLs
//! - article page → parsed fields → lead image on disk → stored record
//!
//! Every request is awaited before the next one is issued. Failures are
//! logged and the item skipped; only storage setup is fatal.

use crate::config::Config;
use crate::crawler::article::{parse_article, ParsedArticle};
use crate::crawler::images::download_image;
use crate::crawler::{build_http_client, fetch_text};
use crate::robots::fetch_sitemap_url;
use crate::sitemap::{fetch_sitemap, SitemapEntry};
use crate::storage::{ArticleStore, NewArticle, SqliteStorage};
use crate::{HarvestError, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime};
use reqwest::Client;
use std::path::{Path, PathBuf};
use url::Url;

/// Number of section sitemaps followed from each sitemap index
pub const MAX_SECTIONS_PER_INDEX: usize = 2;

/// Number of articles fetched from each section sitemap
pub const MAX_ARTICLES_PER_SECTION: usize = 2;

/// Counters for a single harvest run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub sites_visited: usize,
    pub sections_visited: usize,
    pub articles_stored: usize,
    pub duplicates_skipped: usize,
    pub incomplete_skipped: usize,
    pub images_saved: usize,
    pub failures: usize,
}

/// What happened to a single article
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleOutcome {
    /// A new record was inserted with this row id
    Stored { id: i64, image_path: Option<PathBuf> },
    /// The source URL was already stored
    Duplicate,
    /// The page lacked one or more required fields
    Incomplete,
}

/// Main harvester structure
pub struct Harvester {
    config: Config,
    storage: SqliteStorage,
    client: Client,
}

impl Harvester {
    /// Creates a new harvester from configuration
    ///
    /// Opens (and if needed creates) the SQLite database and builds the
    /// HTTP client.
    pub fn new(config: Config) -> Result<Self> {
        let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
        Self::with_storage(config, storage)
    }

    /// Creates a harvester around an already opened storage
    pub fn with_storage(config: Config, storage: SqliteStorage) -> Result<Self> {
        let client = build_http_client(&config)?;
        Ok(Self {
            config,
            storage,
            client,
        })
    }

    /// Returns the underlying storage
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// Runs the full pipeline over every configured site
    ///
    /// The auto-increment sequence is reset first when the article table is
    /// empty.
    pub async fn run(&mut self) -> Result<RunSummary> {
        match self.storage.reset_sequence_if_empty() {
            Ok(true) => tracing::info!("Article table is empty, id sequence reset to 1"),
            Ok(false) => tracing::debug!("Article table is not empty, sequence left as is"),
            Err(e) => tracing::error!("Failed to reset id sequence: {}", e),
        }

        let mut summary = RunSummary::default();
        let start_time = std::time::Instant::now();

        let sites = self.config.harvest.sites.clone();
        for site in &sites {
            if let Err(e) = self.process_site(site, &mut summary).await {
                tracing::error!("Error processing site {}: {}", site, e);
                summary.failures += 1;
            }
        }

        tracing::info!(
            "Harvest finished in {:?}: {} stored, {} duplicates, {} incomplete, {} images, {} failures",
            start_time.elapsed(),
            summary.articles_stored,
            summary.duplicates_skipped,
            summary.incomplete_skipped,
            summary.images_saved,
            summary.failures
        );

        Ok(summary)
    }

    /// Resolves a site's sitemap index and walks its first sections
    async fn process_site(
        &mut self,
        site: &str,
        summary: &mut RunSummary,
    ) -> Result<()> {
        summary.sites_visited += 1;

        let Some(index_url) = fetch_sitemap_url(&self.client, site).await? else {
            tracing::warn!("No sitemap found in robots.txt for {}", site);
            return Ok(());
        };

        tracing::info!("Visiting sitemap: {}", index_url);
        let sections = fetch_sitemap(&self.client, &index_url).await?;
        if sections.is_empty() {
            tracing::warn!("No <loc> entries found in sitemap {}", index_url);
            return Ok(());
        }

        for section in sections.iter().take(MAX_SECTIONS_PER_INDEX) {
            if let Err(e) = self.process_section(section, summary).await {
                tracing::error!("Error processing sitemap {}: {}", section.loc, e);
                summary.failures += 1;
            }
        }

        Ok(())
    }

    /// Walks the first articles of one section sitemap
    ///
    /// The section's own `<lastmod>` becomes the stored sitemap date of each
    /// of its articles.
    async fn process_section(
        &mut self,
        section: &SitemapEntry,
        summary: &mut RunSummary,
    ) -> Result<()> {
        tracing::info!("Visiting section sitemap {}", section.loc);
        let articles = fetch_sitemap(&self.client, &section.loc).await?;
        summary.sections_visited += 1;

        if articles.is_empty() {
            tracing::warn!("No <loc> entries found in sitemap {}", section.loc);
            return Ok(());
        }

        for (i, entry) in articles.iter().take(MAX_ARTICLES_PER_SECTION).enumerate() {
            tracing::info!(
                "Found article URL {}: {} (lastmod {})",
                i + 1,
                entry.loc,
                entry.lastmod.as_deref().unwrap_or("-")
            );

            let Some(raw_lastmod) = entry.lastmod.as_deref() else {
                tracing::warn!("Article {} has no <lastmod>, skipping", entry.loc);
                summary.incomplete_skipped += 1;
                continue;
            };

            let article_time = match parse_lastmod(raw_lastmod) {
                Ok(time) => time,
                Err(e) => {
                    tracing::warn!("Skipping article {}: {}", entry.loc, e);
                    summary.failures += 1;
                    continue;
                }
            };

            match self
                .process_article(&entry.loc, section.lastmod.as_deref(), article_time)
                .await
            {
                Ok(ArticleOutcome::Stored { id, image_path }) => {
                    tracing::info!("Article stored with id {}: {}", id, entry.loc);
                    summary.articles_stored += 1;
                    if image_path.is_some() {
                        summary.images_saved += 1;
                    }
                }
                Ok(ArticleOutcome::Duplicate) => summary.duplicates_skipped += 1,
                Ok(ArticleOutcome::Incomplete) => summary.incomplete_skipped += 1,
                Err(e) => {
                    tracing::error!("Error processing article {}: {}", entry.loc, e);
                    summary.failures += 1;
                }
            }
        }

        Ok(())
    }

    /// Fetches, parses and stores a single article
    ///
    /// # Arguments
    ///
    /// * `url` - The article URL (the unique key of the stored record)
    /// * `sitemap_date` - The `<lastmod>` of the section sitemap, verbatim
    /// * `article_time` - The article's own parsed `<lastmod>`
    pub async fn process_article(
        &mut self,
        url: &str,
        sitemap_date: Option<&str>,
        article_time: DateTime<FixedOffset>,
    ) -> Result<ArticleOutcome> {
        if self.storage.article_exists(url)? {
            tracing::info!("Article already exists: {}", url);
            return Ok(ArticleOutcome::Duplicate);
        }

        let page_url = Url::parse(url)?;
        let html = fetch_text(&self.client, url).await?;

        let Some(parsed) = parse_article(&html, &page_url) else {
            return Ok(ArticleOutcome::Incomplete);
        };

        let image_path = self.save_lead_image(&parsed).await;

        let id = self.storage.insert_article(&NewArticle {
            news_source_url: url.to_string(),
            title: parsed.title,
            slug: parsed.slug,
            image_path: image_path
                .as_ref()
                .map(|path| path.to_string_lossy().into_owned()),
            byline_author: parsed.byline_author,
            article_detail: parsed.body,
            article_date: sitemap_date.map(str::to_string),
            article_date_and_time: article_time,
        })?;

        Ok(ArticleOutcome::Stored { id, image_path })
    }

    /// Downloads the lead image into today's folder
    ///
    /// A failed download is logged and yields `None`; the article is still
    /// stored without an image.
    async fn save_lead_image(&self, parsed: &ParsedArticle) -> Option<PathBuf> {
        let today: NaiveDate = Local::now().date_naive();
        let root = Path::new(&self.config.output.image_dir);

        match download_image(&self.client, &parsed.image_url, root, today).await {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("Failed to download image {}: {}", parsed.image_url, e);
                None
            }
        }
    }
}

/// Parses a sitemap `<lastmod>` value into a timestamp
///
/// Accepts RFC 3339 (`2024-05-01T10:15:00+05:30`, `...Z`), date-times
/// without an offset (taken as UTC), and bare dates (midnight UTC).
pub fn parse_lastmod(value: &str) -> Result<DateTime<FixedOffset>> {
    let value = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed);
    }

    let utc = FixedOffset::east_opt(0).ok_or_else(|| invalid_date(value, "bad offset"))?;

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(DateTime::from_naive_utc_and_offset(naive, utc));
        }
    }

    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => {
            let midnight = date
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| invalid_date(value, "no midnight"))?;
            Ok(DateTime::from_naive_utc_and_offset(midnight, utc))
        }
        Err(e) => Err(invalid_date(value, &e.to_string())),
    }
}

fn invalid_date(value: &str, message: &str) -> HarvestError {
    HarvestError::InvalidDate {
        value: value.to_string(),
        message: message.to_string(),
    }
}

/// Runs a harvest with the given configuration
///
/// # Example
///
/// ```no_run
/// use news_harvest::config::Config;
/// use news_harvest::crawler::run_harvest;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = run_harvest(Config::default()).await?;
/// println!("Stored {} articles", summary.articles_stored);
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest(config: Config) -> Result<RunSummary> {
    let mut harvester = Harvester::new(config)?;
    harvester.run().await
}
