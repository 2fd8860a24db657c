//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester:
//! - Building the HTTP client with the configured user agent
//! - GET requests for text documents (robots.txt, sitemaps, article HTML)
//! - GET requests for binary payloads (lead images)
//!
//! Requests are never retried. Any non-success status is reported as
//! `HarvestError::HttpStatus` so the caller can log and skip the item.

use crate::config::Config;
use crate::{HarvestError, Result};
use reqwest::{Client, Response};
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use news_harvest::config::Config;
/// use news_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client> {
    let client = Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(Duration::from_secs(config.harvest.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()?;
    Ok(client)
}

/// Sends a GET request and rejects non-success statuses
async fn get_checked(client: &Client, url: &str) -> Result<Response> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| HarvestError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(HarvestError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response)
}

/// Fetches a URL and returns the decoded body text
pub async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let response = get_checked(client, url).await?;
    response.text().await.map_err(|source| HarvestError::Http {
        url: url.to_string(),
        source,
    })
}

/// Fetches a URL and returns the raw body bytes
pub async fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>> {
    let response = get_checked(client, url).await?;
    let bytes = response.bytes().await.map_err(|source| HarvestError::Http {
        url: url.to_string(),
        source,
    })?;
    Ok(bytes.to_vec())
}
