//! Robots.txt handling module
//!
//! The harvest starts from a site's robots.txt, which names the sitemap index
//! through its `Sitemap:` directive.

mod parser;

pub use parser::{extract_sitemap_url, robots_url};

use crate::crawler::fetch_text;
use crate::Result;
use reqwest::Client;

/// Fetches robots.txt for a site and returns its sitemap directive
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `site` - Site root, or a full robots.txt URL
///
/// # Returns
///
/// * `Ok(Some(String))` - The sitemap URL named in robots.txt
/// * `Ok(None)` - robots.txt was fetched but names no sitemap
/// * `Err(HarvestError)` - robots.txt could not be fetched
pub async fn fetch_sitemap_url(client: &Client, site: &str) -> Result<Option<String>> {
    let url = robots_url(site);
    let content = fetch_text(client, &url).await?;
    tracing::debug!("robots.txt content from {}:\n{}", url, content);

    Ok(extract_sitemap_url(&content))
}
