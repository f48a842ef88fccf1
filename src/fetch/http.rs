// src/fetch/http.rs
// =============================================================================
// The default page fetcher: a plain HTTP GET with reqwest.
//
// Key functionality:
// - One shared Client (connection pooling) with a per-request timeout
// - Follows up to 10 redirects
// - Non-2xx responses count as failures ("HTTP 404")
// - reqwest timeouts are reported as FetchError::Timeout so the crawler can
//   retry them; every other error becomes FetchError::Failed
//
// No JavaScript is executed: what the server sends is what we extract.
// =============================================================================

use super::{FetchError, PageFetcher};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Per-request timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("site-scraper/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        debug!(%url, "GET");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(categorize_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Failed(format!("HTTP {}", status.as_u16())));
        }

        response.text().await.map_err(categorize_error)
    }
}

// Splits reqwest errors into "try again later" and "give up"
fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_redirect() {
        FetchError::Failed("Too many redirects".to_string())
    } else if error.is_connect() {
        FetchError::Failed(format!("Connection failed: {}", error))
    } else {
        FetchError::Failed(error.to_string())
    }
}
