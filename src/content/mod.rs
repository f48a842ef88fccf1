// src/content/mod.rs
// =============================================================================
// This module turns raw page HTML into a clean page record.
//
// Submodules:
// - extract: finds the title and the main readable text of a page
// - normalize: canonical paragraph text + content fingerprint
// =============================================================================

mod extract;
mod normalize;

use scraper::Html;
use serde::{Deserialize, Serialize};

pub use extract::{extract_main_content, extract_title, ExtractionStrategy, EXTRACTION_ORDER};
pub use normalize::{fingerprint, normalize};

/// One unique, successfully extracted page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub title: String,
    pub content: String,
}

// Builds the record for a fetched page: title plus normalized main content
//
// The HTML is parsed once and shared by both extractors.
pub fn extract_page(url: &str, html: &str) -> PageRecord {
    let document = Html::parse_document(html);

    PageRecord {
        url: url.to_string(),
        title: extract::title_of(&document),
        content: normalize(&extract::main_content_of(&document)),
    }
}
