// src/fetch/gate.rs
// =============================================================================
// FetchGate puts a hard cap on concurrent fetches.
//
// How it works:
// - A tokio Semaphore holds K permits (default 10)
// - Every fetch waits for a permit, runs, and gives the permit back
// - Clones of a gate share the same semaphore, so the cap is global to
//   everything that uses that gate
//
// Outcomes are folded into one FetchResult: Success (with the HTML and its
// links), Timeout (the caller may retry) or Failure (the caller drops the
// URL). The gate itself never retries.
//
// Links are only parsed for pages whose links will be followed; fetch_leaf
// skips that parse for depth-0 pages and the sitemap.
// =============================================================================

use super::links::extract_links;
use super::{FetchError, PageFetcher};
use std::sync::Arc;
use tokio::sync::Semaphore;
use url::Url;

/// Concurrent fetches allowed when none is configured
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

/// How a single fetch ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success,
    Timeout,
    Failure(String),
}

/// Everything the crawler needs to know about one fetch
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// The URL that was fetched
    pub url: Url,
    /// Page HTML (empty unless the fetch succeeded)
    pub html: String,
    /// Absolute http(s) links found in the HTML
    pub links: Vec<Url>,
    pub outcome: FetchOutcome,
}

impl FetchResult {
    fn failed(url: Url, outcome: FetchOutcome) -> Self {
        Self {
            url,
            html: String::new(),
            links: Vec::new(),
            outcome,
        }
    }

    pub fn success(&self) -> bool {
        self.outcome == FetchOutcome::Success
    }

    pub fn is_timeout(&self) -> bool {
        self.outcome == FetchOutcome::Timeout
    }

    /// Error message for timeouts and failures
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            FetchOutcome::Success => None,
            FetchOutcome::Timeout => Some("request timed out"),
            FetchOutcome::Failure(message) => Some(message),
        }
    }
}

#[derive(Clone)]
pub struct FetchGate {
    fetcher: Arc<dyn PageFetcher>,
    permits: Arc<Semaphore>,
    max_concurrency: usize,
}

impl FetchGate {
    // A concurrency of 0 is bumped to 1 so the gate can always make progress
    pub fn new(fetcher: Arc<dyn PageFetcher>, max_concurrency: usize) -> Self {
        let max_concurrency = max_concurrency.max(1);
        Self {
            fetcher,
            permits: Arc::new(Semaphore::new(max_concurrency)),
            max_concurrency,
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Fetches a page and collects its links
    pub async fn fetch(&self, url: Url) -> FetchResult {
        self.request(url, true).await
    }

    /// Fetches a page whose links are not needed; `links` stays empty
    pub async fn fetch_leaf(&self, url: Url) -> FetchResult {
        self.request(url, false).await
    }

    async fn request(&self, url: Url, with_links: bool) -> FetchResult {
        let response = {
            let _permit = match self.permits.acquire().await {
                Ok(permit) => permit,
                Err(_) => {
                    return FetchResult::failed(url, FetchOutcome::Failure("fetch gate closed".into()))
                }
            };
            self.fetcher.fetch(&url).await
        };

        match response {
            Ok(html) => {
                let links = if !with_links || html.is_empty() {
                    Vec::new()
                } else {
                    extract_links(&html, &url)
                };
                FetchResult {
                    url,
                    html,
                    links,
                    outcome: FetchOutcome::Success,
                }
            }
            Err(FetchError::Timeout) => FetchResult::failed(url, FetchOutcome::Timeout),
            Err(FetchError::Failed(message)) => {
                FetchResult::failed(url, FetchOutcome::Failure(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeFetcher;
    use futures::future::join_all;
    use std::time::Duration;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_success_carries_html_and_links() {
        let fetcher = FakeFetcher::new().page(
            "https://example.com/",
            r#"<a href="/a">A</a><a href="https://other.com/b">B</a>"#,
        );
        let gate = FetchGate::new(Arc::new(fetcher), 2);

        let result = gate.fetch(url("https://example.com/")).await;
        assert!(result.success());
        assert_eq!(result.error(), None);
        assert_eq!(
            result.links,
            vec![url("https://example.com/a"), url("https://other.com/b")]
        );
    }

    #[tokio::test]
    async fn test_leaf_fetch_skips_links() {
        let fetcher = FakeFetcher::new().page(
            "https://example.com/",
            r#"<title>Leaf</title><a href="/a">A</a>"#,
        );
        let gate = FetchGate::new(Arc::new(fetcher), 2);

        let result = gate.fetch_leaf(url("https://example.com/")).await;
        assert!(result.success());
        assert!(result.html.contains("Leaf"));
        assert!(result.links.is_empty());
    }

    #[tokio::test]
    async fn test_timeout_and_failure_outcomes() {
        let fetcher = FakeFetcher::new()
            .timing_out("https://example.com/slow")
            .failing("https://example.com/broken", "HTTP 500");
        let gate = FetchGate::new(Arc::new(fetcher), 2);

        let slow = gate.fetch(url("https://example.com/slow")).await;
        assert!(slow.is_timeout());
        assert!(!slow.success());
        assert!(slow.html.is_empty());

        let broken = gate.fetch(url("https://example.com/broken")).await;
        assert_eq!(broken.outcome, FetchOutcome::Failure("HTTP 500".to_string()));
        assert_eq!(broken.error(), Some("HTTP 500"));
    }

    #[tokio::test]
    async fn test_never_exceeds_max_concurrency() {
        let mut fetcher = FakeFetcher::new().with_delay(Duration::from_millis(20));
        for i in 0..12 {
            fetcher = fetcher.page(&format!("https://example.com/{}", i), "<p>x</p>");
        }
        let fetcher = Arc::new(fetcher);
        let gate = FetchGate::new(fetcher.clone(), 3);

        // Clones share the same permits
        let fetches = (0..12).map(|i| {
            let gate = gate.clone();
            async move { gate.fetch(url(&format!("https://example.com/{}", i))).await }
        });
        let results = join_all(fetches).await;

        assert!(results.iter().all(|r| r.success()));
        assert!(fetcher.peak_in_flight() <= 3);
        assert!(fetcher.peak_in_flight() >= 2);
    }

    #[test]
    fn test_zero_concurrency_is_bumped_to_one() {
        let gate = FetchGate::new(Arc::new(FakeFetcher::new()), 0);
        assert_eq!(gate.max_concurrency(), 1);
    }
}
