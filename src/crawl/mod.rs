// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Level-by-level breadth-first crawling from a start URL
// - Sitemap-seeded crawling (pages listed in /sitemap.xml, no link following)
// - Same-domain restriction (never leaves the start URL's host and port)
// - Page budget and depth limit
// - Bounded retry of timed-out pages
// - Content-based deduplication of the collected pages
//
// Submodules:
// - frontier: the Crawler itself
// - sitemap: sitemap.xml location and <loc> parsing
// =============================================================================

mod frontier;
mod sitemap;

pub use frontier::Crawler;
pub use sitemap::{parse_sitemap, sitemap_url};

use crate::content::PageRecord;
use crate::fetch::{is_crawlable_scheme, normalize_url, DEFAULT_MAX_CONCURRENCY};
use clap::ValueEnum;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

/// Link depth followed from the start page when none is configured
pub const DEFAULT_MAX_DEPTH: usize = 2;

/// Timeout retries per page when none is configured
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Errors that stop a crawl before it starts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CrawlError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid crawl configuration: {0}")]
    InvalidConfig(String),
}

/// How candidate URLs are discovered
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CrawlStrategy {
    /// Follow same-domain links level by level
    #[value(name = "iterative")]
    IterativeBfs,
    /// Fetch exactly the pages listed in /sitemap.xml
    #[value(name = "sitemap")]
    SitemapSeeded,
}

/// Called with the number of pages processed so far
///
/// The callback runs on the crawl task itself, between two pages. It must
/// return quickly and must not panic: a slow callback stalls the crawl and
/// a panicking one aborts it.
pub type ProgressCallback = Arc<dyn Fn(usize) + Send + Sync>;

/// Settings for one crawl run
#[derive(Clone)]
pub struct CrawlConfig {
    /// Maximum number of pages fetched in one run (>= 1)
    pub max_pages: usize,
    /// How many link hops to follow from the start page
    pub max_depth: usize,
    /// Maximum fetches in flight at once (>= 1)
    pub max_concurrency: usize,
    /// How often a timed-out page is retried before it is dropped
    pub max_retries: u32,
    pub strategy: CrawlStrategy,
    pub progress: Option<ProgressCallback>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_pages: 1,
            max_depth: DEFAULT_MAX_DEPTH,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            max_retries: DEFAULT_MAX_RETRIES,
            strategy: CrawlStrategy::IterativeBfs,
            progress: None,
        }
    }
}

impl CrawlConfig {
    pub fn validate(&self) -> Result<(), CrawlError> {
        if self.max_pages == 0 {
            return Err(CrawlError::InvalidConfig("max pages must be at least 1".into()));
        }
        if self.max_concurrency == 0 {
            return Err(CrawlError::InvalidConfig("concurrency must be at least 1".into()));
        }
        Ok(())
    }
}

/// Limits of one crawl run, derived from the start URL and the config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlScope {
    /// Network location (host, plus port when explicit) links must share
    pub allowed_domain: String,
    pub max_pages: usize,
    pub max_depth: usize,
}

impl CrawlScope {
    pub fn new(start: &Url, max_pages: usize, max_depth: usize) -> Result<Self, CrawlError> {
        let allowed_domain = netloc(start).ok_or_else(|| CrawlError::InvalidUrl {
            url: start.to_string(),
            reason: "URL has no host".into(),
        })?;

        Ok(Self {
            allowed_domain,
            max_pages,
            max_depth,
        })
    }

    // True for http(s) URLs on the allowed host and port
    pub fn contains(&self, url: &Url) -> bool {
        is_crawlable_scheme(url) && netloc(url).as_deref() == Some(self.allowed_domain.as_str())
    }
}

/// A URL waiting in the frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub url: Url,
    /// Remaining link depth: children get depth - 1, depth 0 has no children
    pub depth: usize,
    /// Number of earlier attempts that timed out
    pub attempt: u32,
}

impl CrawlTask {
    pub fn new(url: Url, depth: usize) -> Self {
        Self {
            url,
            depth,
            attempt: 0,
        }
    }

    // Same URL and depth, one more attempt
    pub fn retry(&self) -> Self {
        Self {
            url: self.url.clone(),
            depth: self.depth,
            attempt: self.attempt + 1,
        }
    }
}

/// What a finished crawl hands back to the caller
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    /// Unique pages in the order they were processed
    pub records: Vec<PageRecord>,
    /// Pages whose fetch cycle finished, successful or not
    pub pages_processed: usize,
}

// Prepends https:// to bare domains ("example.com" -> "https://example.com")
pub fn with_default_scheme(input: &str) -> String {
    let input = input.trim();
    if input.contains("://") {
        input.to_string()
    } else {
        format!("https://{}", input)
    }
}

// Parses and validates a crawl start URL: http(s) only, host required
pub fn parse_start_url(input: &str) -> Result<Url, CrawlError> {
    let invalid = |reason: String| CrawlError::InvalidUrl {
        url: input.to_string(),
        reason,
    };

    let url = Url::parse(input.trim()).map_err(|e| invalid(e.to_string()))?;
    if !is_crawlable_scheme(&url) {
        return Err(invalid(format!(
            "unsupported scheme '{}', expected http or https",
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(invalid("URL has no host".into()));
    }

    Ok(normalize_url(url))
}

// "host" or "host:port" when the port is not the scheme default
pub fn netloc(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}
