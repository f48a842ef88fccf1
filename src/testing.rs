// src/testing.rs
// =============================================================================
// In-memory PageFetcher for unit tests.
//
// Pages are registered up front; unknown URLs fail with "HTTP 404". The fake
// records when each fetch starts and ends and how many fetches were in flight
// at the same time, so tests can check ordering and concurrency limits
// without touching the network.
// =============================================================================

use crate::fetch::{FetchError, PageFetcher};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
enum Response {
    Html(String),
    Fail(String),
    Timeout,
    // Times out this many times, then serves the HTML
    Flaky(usize, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    Start(String),
    End(String),
}

#[derive(Debug, Default)]
pub(crate) struct FakeFetcher {
    responses: Mutex<HashMap<String, Response>>,
    delay: Duration,
    events: Mutex<Vec<Event>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl FakeFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn page(self, url: &str, html: &str) -> Self {
        self.respond(url, Response::Html(html.to_string()))
    }

    pub(crate) fn failing(self, url: &str, message: &str) -> Self {
        self.respond(url, Response::Fail(message.to_string()))
    }

    pub(crate) fn timing_out(self, url: &str) -> Self {
        self.respond(url, Response::Timeout)
    }

    pub(crate) fn flaky(self, url: &str, timeouts: usize, html: &str) -> Self {
        self.respond(url, Response::Flaky(timeouts, html.to_string()))
    }

    fn respond(self, url: &str, response: Response) -> Self {
        let key = Url::parse(url).expect("test URL").to_string();
        self.responses.lock().unwrap().insert(key, response);
        self
    }

    pub(crate) fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    // URLs in the order their fetches started (retries included)
    pub(crate) fn fetched(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Start(url) => Some(url),
                Event::End(_) => None,
            })
            .collect()
    }

    pub(crate) fn fetch_count(&self, url: &str) -> usize {
        let key = Url::parse(url).expect("test URL").to_string();
        self.fetched().iter().filter(|u| **u == key).count()
    }

    pub(crate) fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn next_response(&self, key: &str) -> Option<Response> {
        let mut responses = self.responses.lock().unwrap();
        let response = responses.get_mut(key)?;
        match response {
            Response::Flaky(remaining, html) => {
                if *remaining == 0 {
                    Some(Response::Html(html.clone()))
                } else {
                    *remaining -= 1;
                    Some(Response::Timeout)
                }
            }
            other => Some(other.clone()),
        }
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let key = url.to_string();
        self.events.lock().unwrap().push(Event::Start(key.clone()));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        } else {
            tokio::task::yield_now().await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        let result = match self.next_response(&key) {
            Some(Response::Html(html)) => Ok(html),
            Some(Response::Fail(message)) => Err(FetchError::Failed(message)),
            Some(Response::Timeout) => Err(FetchError::Timeout),
            Some(Response::Flaky(..)) => unreachable!("resolved in next_response"),
            None => Err(FetchError::Failed("HTTP 404".to_string())),
        };

        self.events.lock().unwrap().push(Event::End(key));
        result
    }
}
