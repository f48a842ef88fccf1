// src/lib.rs
// =============================================================================
// site-scraper: crawl one website, keep its readable text.
//
// Modules:
// - crawl: the crawl engine (frontier, visited set, budget, sitemap mode)
// - fetch: page fetcher trait, reqwest fetcher, concurrency gate, link parsing
// - content: title/main-text extraction, normalization, fingerprints
// - output: deduplicating result collection and text/JSON export
//
// The binary in main.rs is a thin CLI over this library.
// =============================================================================

pub mod content;
pub mod crawl;
pub mod fetch;
pub mod output;

#[cfg(test)]
pub(crate) mod testing;

pub use content::PageRecord;
pub use crawl::{CrawlConfig, CrawlError, CrawlReport, CrawlStrategy, Crawler};
pub use fetch::{FetchGate, HttpFetcher, PageFetcher};
pub use output::{ExportFormat, ResultAggregator};
