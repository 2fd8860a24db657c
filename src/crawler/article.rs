//! Article page parser
//!
//! Extracts the structured fields of an article page using the fixed CSS
//! classes of the ABP article template:
//!
//! | Field  | Selector                        |
//! |--------|---------------------------------|
//! | title  | `h1.abp-article-title`          |
//! | slug   | `h2.abp-article-slug`           |
//! | byline | `div.abp-article-byline-author` |
//! | body   | `div.abp-story-detail`          |
//! | image  | first `img[src]` in the first `div.lead-image` |

use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use url::Url;

const TITLE_SELECTOR: &str = "h1.abp-article-title";
const SLUG_SELECTOR: &str = "h2.abp-article-slug";
const BYLINE_SELECTOR: &str = "div.abp-article-byline-author";
const BODY_SELECTOR: &str = "div.abp-story-detail";
const LEAD_IMAGE_SELECTOR: &str = "div.lead-image";

/// Classes whose subtrees are dropped from the article body
const BODY_EXCLUDED_CLASSES: &[&str] = &["readMore", "twitter-tweet", "abp-crick-wrap"];

/// Elements whose text content is code or markup, never prose
const NON_TEXT_ELEMENTS: &[&str] = &["script", "style", "template"];

/// Structured fields extracted from an article page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArticle {
    pub title: String,
    pub slug: String,
    /// Absolute URL of the lead image
    pub image_url: String,
    pub byline_author: String,
    pub body: String,
}

/// Parses an article page
///
/// Every field is required. When any of them is missing or empty the page is
/// logged and `None` is returned, so the caller can skip it without storing a
/// partial record.
///
/// # Arguments
///
/// * `html` - The article HTML
/// * `page_url` - The article URL, used to resolve a relative image `src`
pub fn parse_article(html: &str, page_url: &Url) -> Option<ParsedArticle> {
    let document = Html::parse_document(html);

    let title = extract_class_text(&document, TITLE_SELECTOR, &[]);
    let slug = extract_class_text(&document, SLUG_SELECTOR, &[]);
    let image_url = extract_lead_image(&document, page_url);
    let byline_author = extract_class_text(&document, BYLINE_SELECTOR, &[]);
    let body = extract_class_text(&document, BODY_SELECTOR, BODY_EXCLUDED_CLASSES);

    match (title, slug, image_url, byline_author, body) {
        (Some(title), Some(slug), Some(image_url), Some(byline_author), Some(body)) => {
            Some(ParsedArticle {
                title,
                slug,
                image_url,
                byline_author,
                body,
            })
        }
        (title, slug, image_url, byline_author, body) => {
            let missing: Vec<&str> = [
                ("title", title.is_none()),
                ("slug", slug.is_none()),
                ("image", image_url.is_none()),
                ("byline", byline_author.is_none()),
                ("body", body.is_none()),
            ]
            .into_iter()
            .filter_map(|(name, absent)| absent.then_some(name))
            .collect();

            tracing::warn!(
                "Missing required fields for article {}: {}",
                page_url,
                missing.join(", ")
            );
            None
        }
    }
}

/// Collects the text of every element matching `selector`
///
/// Texts of separate matches are joined by a single space and the result is
/// trimmed. Descendants carrying any of `excluded` classes are skipped.
/// Returns `None` when nothing matches or only whitespace remains.
fn extract_class_text(document: &Html, selector: &str, excluded: &[&str]) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;

    let parts: Vec<String> = document
        .select(&selector)
        .map(|element| {
            let mut text = String::new();
            collect_text(element, excluded, &mut text);
            text
        })
        .collect();

    let joined = parts.join(" ");
    let trimmed = joined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn collect_text(element: ElementRef<'_>, excluded: &[&str], out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                let Some(child_element) = ElementRef::wrap(child) else {
                    continue;
                };
                let value = child_element.value();
                if NON_TEXT_ELEMENTS.contains(&value.name())
                    || value.classes().any(|class| excluded.contains(&class))
                {
                    continue;
                }
                collect_text(child_element, excluded, out);
            }
            _ => {}
        }
    }
}

/// Finds the lead image `src` and resolves it against the page URL
fn extract_lead_image(document: &Html, page_url: &Url) -> Option<String> {
    let container_selector = Selector::parse(LEAD_IMAGE_SELECTOR).ok()?;
    let img_selector = Selector::parse("img").ok()?;

    let container = document.select(&container_selector).next()?;
    let src = container
        .select(&img_selector)
        .next()?
        .value()
        .attr("src")?
        .trim();

    if src.is_empty() {
        return None;
    }

    page_url.join(src).ok().map(|url| url.to_string())
}
