//! Lead image downloads
//!
//! Images land in `<root>/<YYYY-MM-DD>/<32 hex chars><ext>`, partitioned by
//! the day of the download. Files are written once and never cleaned up.

use crate::crawler::fetch_bytes;
use crate::Result;
use chrono::NaiveDate;
use reqwest::Client;
use std::path::{Path, PathBuf};
use url::Url;

const DEFAULT_EXTENSION: &str = ".jpg";

/// Returns the directory for images downloaded on `date`
pub fn daily_image_dir(root: &Path, date: NaiveDate) -> PathBuf {
    root.join(date.format("%Y-%m-%d").to_string())
}

/// Returns the file extension of an image URL, including the leading dot
///
/// Only the final path segment is inspected, so query strings and dots in
/// host names are ignored. Falls back to `.jpg`.
pub fn image_extension(image_url: &str) -> String {
    let segment = match Url::parse(image_url) {
        Ok(url) => url
            .path_segments()
            .and_then(|mut segments| segments.next_back().map(str::to_string))
            .unwrap_or_default(),
        Err(_) => image_url
            .split(['?', '#'])
            .next()
            .and_then(|path| path.rsplit('/').next())
            .unwrap_or_default()
            .to_string(),
    };

    match segment.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            format!(".{}", ext)
        }
        _ => DEFAULT_EXTENSION.to_string(),
    }
}

/// Generates a random file name for an image
pub fn generate_image_filename(image_url: &str) -> String {
    let id: [u8; 16] = rand::random();
    format!("{}{}", hex::encode(id), image_extension(image_url))
}

/// Downloads an image into the daily directory for `date`
///
/// The directory is created when missing. Nothing is written if the fetch
/// fails.
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written file, under `root`
/// * `Err(HarvestError)` - The fetch or the write failed
pub async fn download_image(
    client: &Client,
    image_url: &str,
    root: &Path,
    date: NaiveDate,
) -> Result<PathBuf> {
    let bytes = fetch_bytes(client, image_url).await?;

    let dir = daily_image_dir(root, date);
    if !dir.exists() {
        tracing::debug!("Creating image folder {}", dir.display());
        std::fs::create_dir_all(&dir)?;
    }

    let path = dir.join(generate_image_filename(image_url));
    std::fs::write(&path, &bytes)?;

    tracing::info!("Image saved: {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}
