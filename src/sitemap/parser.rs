//! Streaming sitemap XML parser
//!
//! Handles both `<urlset>` sitemaps and `<sitemapindex>` documents. Element
//! names are matched on their local name, so namespace prefixes are ignored.

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

/// A single `<loc>`/`<lastmod>` pair from a sitemap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    /// The page or child sitemap URL
    pub loc: String,

    /// The raw `<lastmod>` value, if the entry carries one
    pub lastmod: Option<String>,
}

/// Errors raised while reading sitemap XML
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Malformed sitemap XML: {0}")]
    Xml(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Loc,
    Lastmod,
}

#[derive(Debug, Default)]
struct PendingEntry {
    loc: String,
    lastmod: String,
}

impl PendingEntry {
    fn push_text(&mut self, field: Field, text: &str) {
        match field {
            Field::Loc => self.loc.push_str(text),
            Field::Lastmod => self.lastmod.push_str(text),
        }
    }

    fn finish(self) -> Option<SitemapEntry> {
        let loc = self.loc.trim();
        if loc.is_empty() {
            return None;
        }

        let lastmod = self.lastmod.trim();
        Some(SitemapEntry {
            loc: loc.to_string(),
            lastmod: (!lastmod.is_empty()).then(|| lastmod.to_string()),
        })
    }
}

fn pending_mut<'a>(
    container: &'a mut Option<(usize, PendingEntry)>,
    loose: &'a mut Option<PendingEntry>,
) -> Option<&'a mut PendingEntry> {
    match container {
        Some((_, pending)) => Some(pending),
        None => loose.as_mut(),
    }
}

/// Parses sitemap XML into its entries, in document order
///
/// Each `<url>` or `<sitemap>` element yields one entry whose `loc` and
/// `lastmod` come from that same element. Entries without a `<loc>` are
/// dropped. A `<loc>` found outside any container becomes an entry without
/// a last-modified date.
///
/// # Example
///
/// ```
/// use news_harvest::sitemap::parse_sitemap;
///
/// let xml = r#"<urlset><url><loc>https://example.com/a</loc><lastmod>2024-05-01</lastmod></url></urlset>"#;
/// let entries = parse_sitemap(xml).unwrap();
/// assert_eq!(entries[0].loc, "https://example.com/a");
/// assert_eq!(entries[0].lastmod.as_deref(), Some("2024-05-01"));
/// ```
pub fn parse_sitemap(xml: &str) -> Result<Vec<SitemapEntry>, SitemapError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut depth: usize = 0;
    // Depth of the open <url>/<sitemap> element, and its pending entry
    let mut container: Option<(usize, PendingEntry)> = None;
    let mut loose: Option<PendingEntry> = None;
    let mut field: Option<Field> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| SitemapError::Xml(e.to_string()))?;

        match event {
            Event::Start(start) => {
                depth += 1;
                let direct_child = matches!(&container, Some((d, _)) if depth == d + 1);

                match start.local_name().as_ref() {
                    b"url" | b"sitemap" if container.is_none() => {
                        container = Some((depth, PendingEntry::default()));
                    }
                    b"loc" if container.is_none() => {
                        field = Some(Field::Loc);
                        loose = Some(PendingEntry::default());
                    }
                    b"loc" if direct_child => field = Some(Field::Loc),
                    b"lastmod" if direct_child => field = Some(Field::Lastmod),
                    _ => {}
                }
            }
            Event::Text(text) => {
                if let Some(current) = field {
                    let value = text
                        .unescape()
                        .map_err(|e| SitemapError::Xml(e.to_string()))?;
                    if let Some(pending) = pending_mut(&mut container, &mut loose) {
                        pending.push_text(current, &value);
                    }
                }
            }
            Event::CData(data) => {
                if let Some(current) = field {
                    let value = String::from_utf8_lossy(&data);
                    if let Some(pending) = pending_mut(&mut container, &mut loose) {
                        pending.push_text(current, &value);
                    }
                }
            }
            Event::End(_) => {
                field = None;

                if matches!(&container, Some((d, _)) if *d == depth) {
                    if let Some(entry) = container.take().and_then(|(_, p)| p.finish()) {
                        entries.push(entry);
                    }
                } else if let Some(entry) = loose.take().and_then(PendingEntry::finish) {
                    entries.push(entry);
                }

                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(entries)
}
