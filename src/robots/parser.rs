//! Robots.txt directive parsing
//!
//! Only the `Sitemap:` directive is consumed; allow/disallow groups are not
//! interpreted.

/// Builds the robots.txt URL for a site root
///
/// A URL that already points at `/robots.txt` is returned unchanged,
/// otherwise trailing slashes are stripped and `/robots.txt` is appended.
pub fn robots_url(site: &str) -> String {
    if site.ends_with("/robots.txt") {
        site.to_string()
    } else {
        format!("{}/robots.txt", site.trim_end_matches('/'))
    }
}

/// Extracts the first `Sitemap:` directive from robots.txt content
///
/// The directive name is matched case-insensitively. The value is everything
/// after the first colon, so the `:` inside `https://` is preserved.
///
/// # Returns
///
/// * `Some(String)` - The sitemap URL from the first non-empty directive
/// * `None` - If no sitemap directive is present
pub fn extract_sitemap_url(content: &str) -> Option<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| {
            line.get(..8)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("sitemap:"))
        })
        .filter_map(|line| line.split_once(':').map(|(_, value)| value.trim()))
        .find(|value| !value.is_empty())
        .map(str::to_string)
}
