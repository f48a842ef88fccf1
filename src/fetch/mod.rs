// src/fetch/mod.rs
// =============================================================================
// This module contains everything between the crawler and the network.
//
// Submodules:
// - http: the default page fetcher, built on reqwest
// - links: pulls absolute http(s) links out of a fetched page
// - gate: limits how many fetches run at once and classifies outcomes
//
// The crawler never talks to a fetcher directly. It goes through a FetchGate,
// which owns a PageFetcher behind a trait object, so tests can plug in an
// in-memory fetcher and the binary plugs in HttpFetcher.
// =============================================================================

mod gate;
mod http;
mod links;

pub use gate::{FetchGate, FetchOutcome, FetchResult, DEFAULT_MAX_CONCURRENCY};
pub use http::{HttpFetcher, DEFAULT_TIMEOUT};
pub use links::{extract_links, normalize_url};
pub(crate) use links::is_crawlable_scheme;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// Why a single page could not be fetched
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The fetch did not finish in time; the caller may retry
    #[error("request timed out")]
    Timeout,
    /// Anything else (HTTP error status, connection refused, bad body...)
    #[error("{0}")]
    Failed(String),
}

/// Something that can turn a URL into page HTML
///
/// Implementations handle their own timeouts and report them as
/// `FetchError::Timeout`.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}
