//! HTML link extraction
//!
//! Pulls outbound links out of a fetched page. Links come back in document
//! order, resolved to absolute URLs, with duplicates kept: deduplication is
//! the visit map's job, not the parser's.

use scraper::{Html, Selector};
use url::Url;

/// Extracts every followable `<a href>` link from an HTML document
///
/// # Exclusions
///
/// - empty and fragment-only (`#section`) hrefs
/// - `javascript:`, `mailto:`, `tel:` and `data:` hrefs
/// - anything that does not resolve to an `http` or `https` URL
///
/// # Example
///
/// ```
/// use ripple_crawl::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<a href="/a">A</a><a href="/a">A again</a>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let links = extract_links(html, &base_url);
/// assert_eq!(links, vec!["https://example.com/a", "https://example.com/a"]);
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);

    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves an href against the page URL, or returns None if it is not followable
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    const SKIPPED_SCHEMES: [&str; 4] = ["javascript:", "mailto:", "tel:", "data:"];
    let lowered = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES.iter().any(|scheme| lowered.starts_with(scheme)) {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url.to_string()),
        _ => None,
    }
}
