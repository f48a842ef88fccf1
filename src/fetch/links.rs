// src/fetch/links.rs
// =============================================================================
// This module extracts links from HTML pages.
//
// We use the `scraper` crate to find every <a href> element and the `url`
// crate to resolve relative hrefs against the page URL.
//
// Only http/https links survive. Fragments are stripped, so "/docs#intro" and
// "/docs" resolve to the same URL, and each URL appears once.
// =============================================================================

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

// Extracts all absolute http(s) links from HTML content
//
// Parameters:
//   html: the HTML content to parse
//   base: the URL of the page (for resolving relative links)
//
// Returns: links in document order, without duplicates
//
// Example:
//   html = "<a href='/docs'>Docs</a>"
//   base = "https://example.com"
//   result = ["https://example.com/docs"]
pub fn extract_links(html: &str, base: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    links_of(&document, base)
}

fn links_of(document: &Html, base: &Url) -> Vec<Url> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(url) = resolve_link(base, href) else {
            continue;
        };
        if seen.insert(url.clone()) {
            links.push(url);
        }
    }

    links
}

// Drops the fragment: two URLs that differ only after '#' are the same page
pub fn normalize_url(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}

// Resolves a link (possibly relative) to an absolute http(s) URL
fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    // Skip anchors and special protocols
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    let url = base.join(href).ok()?;
    if is_crawlable_scheme(&url) {
        Some(normalize_url(url))
    } else {
        None
    }
}

pub(crate) fn is_crawlable_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}
