//! Sitemap fetching and parsing
//!
//! A site's robots.txt names a sitemap index; each index entry points at a
//! section sitemap whose entries are article pages. Both levels share the
//! same `<loc>`/`<lastmod>` shape and are read by the same parser.

mod parser;

pub use parser::{parse_sitemap, SitemapEntry, SitemapError};

use crate::crawler::fetch_text;
use crate::{HarvestError, Result};
use reqwest::Client;

/// Fetches a sitemap and returns its entries in document order
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - URL of the sitemap or sitemap index
///
/// # Returns
///
/// * `Ok(Vec<SitemapEntry>)` - The parsed entries (possibly empty)
/// * `Err(HarvestError)` - The fetch failed or the XML was malformed
pub async fn fetch_sitemap(client: &Client, url: &str) -> Result<Vec<SitemapEntry>> {
    let body = fetch_text(client, url).await?;

    let entries = parse_sitemap(&body).map_err(|source| HarvestError::Sitemap {
        url: url.to_string(),
        source,
    })?;

    tracing::info!("Found {} entries in sitemap {}", entries.len(), url);
    for entry in &entries {
        tracing::debug!(
            "URL: {}, Lastmod: {}",
            entry.loc,
            entry.lastmod.as_deref().unwrap_or("-")
        );
    }

    Ok(entries)
}
