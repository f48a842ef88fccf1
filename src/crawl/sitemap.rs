// src/crawl/sitemap.rs
// =============================================================================
// Sitemap support for the sitemap-seeded crawl mode.
//
// The sitemap always lives at the site root: {scheme}://{host}[:port]/sitemap.xml
// Every <loc> entry becomes a candidate page. Entries are read with the same
// HTML parser used for pages, which is lenient enough for sitemap XML and
// decodes entities like &amp; for us.
// =============================================================================

use crate::fetch::{is_crawlable_scheme, normalize_url};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

// Location of the sitemap for the site a URL belongs to
pub fn sitemap_url(start: &Url) -> Option<Url> {
    start.join("/sitemap.xml").ok()
}

// Extracts the <loc> URLs of a sitemap
//
// Relative entries are resolved against the sitemap URL. Non-http(s)
// entries and repeats are dropped; document order is kept.
pub fn parse_sitemap(xml: &str, sitemap: &Url) -> Vec<Url> {
    let Ok(selector) = Selector::parse("loc") else {
        return Vec::new();
    };
    let document = Html::parse_document(xml);

    let mut seen = HashSet::new();
    document
        .select(&selector)
        .filter_map(|loc| {
            let text = loc.text().collect::<String>();
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            sitemap.join(text).ok()
        })
        .filter(is_crawlable_scheme)
        .map(normalize_url)
        .filter(|url| seen.insert(url.clone()))
        .collect()
}
