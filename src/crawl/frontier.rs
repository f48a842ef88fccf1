// src/crawl/frontier.rs
// =============================================================================
// This module implements the crawl engine.
//
// How the iterative (breadth-first) mode works:
// 1. The start URL forms level 0 with depth = max_depth
// 2. Every task of the current level is fetched concurrently (bounded by the
//    FetchGate), and each completed page is processed as soon as it arrives
// 3. Processing extracts the page record and, if depth > 0, admits the page's
//    same-domain links into the next level with depth - 1
// 4. Timed-out pages are retried (bounded) before the next level starts
// 5. Repeat until a level is empty
//
// Sitemap mode fetches /sitemap.xml and runs its <loc> entries as a single
// level with depth 0, so no links are followed.
//
// Invariants:
// - A URL is marked visited when it is admitted to the frontier, never when it
//   is fetched, so two parents discovering the same link schedule it once
// - Admission stops once the visited count reaches max_pages, so no run ever
//   fetches more than max_pages distinct URLs
// - Only the crawl task touches `visited` and the aggregator; fetch futures
//   just hand their FetchResult back, so no lock is needed
// =============================================================================

use super::sitemap::{parse_sitemap, sitemap_url};
use super::{
    parse_start_url, CrawlConfig, CrawlError, CrawlReport, CrawlScope, CrawlStrategy, CrawlTask,
};
use crate::content::extract_page;
use crate::fetch::{normalize_url, FetchGate, FetchOutcome, FetchResult, PageFetcher};
use crate::output::ResultAggregator;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

pub struct Crawler {
    gate: FetchGate,
    config: CrawlConfig,
    // Per-run state, reset at the start of every crawl
    visited: HashSet<Url>,
    results: ResultAggregator,
    processed: usize,
}

impl Crawler {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: CrawlConfig) -> Self {
        let gate = FetchGate::new(fetcher, config.max_concurrency);
        Self::with_gate(gate, config)
    }

    // Shares an existing gate (and its concurrency cap) with other crawlers
    pub fn with_gate(gate: FetchGate, config: CrawlConfig) -> Self {
        Self {
            gate,
            config,
            visited: HashSet::new(),
            results: ResultAggregator::new(),
            processed: 0,
        }
    }

    /// Crawls the site of `start_url` and returns its unique pages.
    ///
    /// Fails only when the URL or the configuration is invalid. Fetch
    /// failures of individual pages are logged and skipped; an unavailable
    /// sitemap gives an empty report.
    pub async fn crawl(&mut self, start_url: &str) -> Result<CrawlReport, CrawlError> {
        let start = parse_start_url(start_url)?;
        self.config.validate()?;
        let scope = CrawlScope::new(&start, self.config.max_pages, self.config.max_depth)?;

        self.reset();
        info!(
            url = %start,
            domain = %scope.allowed_domain,
            max_pages = scope.max_pages,
            max_depth = scope.max_depth,
            strategy = ?self.config.strategy,
            "starting crawl"
        );

        match self.config.strategy {
            CrawlStrategy::IterativeBfs => self.crawl_levels(&scope, start).await,
            CrawlStrategy::SitemapSeeded => self.crawl_sitemap(&scope, &start).await,
        }

        let records = std::mem::take(&mut self.results).into_records();
        info!(
            pages = records.len(),
            processed = self.processed,
            "crawl finished"
        );

        Ok(CrawlReport {
            records,
            pages_processed: self.processed,
        })
    }

    fn reset(&mut self) {
        self.visited.clear();
        self.results = ResultAggregator::new();
        self.processed = 0;
    }

    async fn crawl_levels(&mut self, scope: &CrawlScope, start: Url) {
        let mut level = Vec::new();
        self.admit(scope, start, scope.max_depth, &mut level);

        let mut number = 0;
        while !level.is_empty() {
            debug!(level = number, tasks = level.len(), "processing level");
            level = self.run_level(scope, level).await;
            number += 1;
        }
    }

    async fn crawl_sitemap(&mut self, scope: &CrawlScope, start: &Url) {
        let Some(sitemap) = sitemap_url(start) else {
            warn!(url = %start, "cannot build sitemap URL");
            return;
        };

        let result = self.fetch_with_retries(sitemap.clone()).await;
        if !result.success() || result.html.trim().is_empty() {
            warn!(
                sitemap = %sitemap,
                error = result.error().unwrap_or("empty response"),
                "sitemap unavailable, nothing to crawl"
            );
            return;
        }

        // admit() enforces domain, dedup and the page budget
        let mut batch = Vec::new();
        for url in parse_sitemap(&result.html, &sitemap) {
            self.admit(scope, url, 0, &mut batch);
        }
        if batch.is_empty() {
            warn!(sitemap = %sitemap, "sitemap lists no crawlable pages");
            return;
        }

        info!(pages = batch.len(), "seeded from sitemap");
        self.run_level(scope, batch).await;
    }

    // Fetches the tasks of one level and returns the tasks of the next one
    //
    // Retries of timed-out tasks are run as extra rounds of the same level, so
    // a level (retries included) always completes before the next one starts.
    async fn run_level(&mut self, scope: &CrawlScope, tasks: Vec<CrawlTask>) -> Vec<CrawlTask> {
        let mut next_level = Vec::new();
        let mut pending = tasks;

        while !pending.is_empty() {
            let mut retries = Vec::new();
            let gate = self.gate.clone();
            let concurrency = gate.max_concurrency();

            let mut fetches = stream::iter(pending.into_iter().map(|task| {
                let gate = gate.clone();
                async move {
                    // Depth-0 pages never queue children, so their links are skipped
                    let result = if task.depth > 0 {
                        gate.fetch(task.url.clone()).await
                    } else {
                        gate.fetch_leaf(task.url.clone()).await
                    };
                    (task, result)
                }
            }))
            .buffer_unordered(concurrency);

            while let Some((task, result)) = fetches.next().await {
                self.process(scope, task, result, &mut next_level, &mut retries);
            }

            pending = retries;
        }

        next_level
    }

    fn process(
        &mut self,
        scope: &CrawlScope,
        task: CrawlTask,
        result: FetchResult,
        next_level: &mut Vec<CrawlTask>,
        retries: &mut Vec<CrawlTask>,
    ) {
        match &result.outcome {
            FetchOutcome::Success => {}
            FetchOutcome::Timeout if task.attempt < self.config.max_retries => {
                warn!(
                    url = %task.url,
                    attempt = task.attempt + 1,
                    "timeout while scraping, retrying later"
                );
                retries.push(task.retry());
                return;
            }
            FetchOutcome::Timeout => {
                warn!(
                    url = %task.url,
                    attempts = task.attempt + 1,
                    "timeout while scraping, giving up"
                );
                self.finish_page();
                return;
            }
            FetchOutcome::Failure(message) => {
                warn!(url = %task.url, error = %message, "error scraping page");
                self.finish_page();
                return;
            }
        }

        if !result.html.is_empty() {
            let record = extract_page(task.url.as_str(), &result.html);
            if self.results.add(record) {
                debug!(url = %task.url, depth = task.depth, "page collected");
            } else {
                debug!(url = %task.url, "duplicate content, skipped");
            }
        }

        if task.depth > 0 {
            for link in result.links {
                if self.budget_reached(scope) {
                    break;
                }
                self.admit(scope, link, task.depth - 1, next_level);
            }
        }

        self.finish_page();
    }

    // Marks the URL visited and queues it, if it is in scope, new, and
    // within the page budget. Returns whether the URL was queued.
    fn admit(
        &mut self,
        scope: &CrawlScope,
        url: Url,
        depth: usize,
        queue: &mut Vec<CrawlTask>,
    ) -> bool {
        let url = normalize_url(url);
        if !scope.contains(&url) || self.visited.contains(&url) || self.budget_reached(scope) {
            return false;
        }

        self.visited.insert(url.clone());
        queue.push(CrawlTask::new(url, depth));
        true
    }

    fn budget_reached(&self, scope: &CrawlScope) -> bool {
        self.visited.len() >= scope.max_pages
    }

    fn finish_page(&mut self) {
        self.processed += 1;
        if let Some(progress) = &self.config.progress {
            progress(self.processed);
        }
    }

    async fn fetch_with_retries(&self, url: Url) -> FetchResult {
        let mut attempt = 0;
        loop {
            let result = self.gate.fetch_leaf(url.clone()).await;
            if result.is_timeout() && attempt < self.config.max_retries {
                attempt += 1;
                warn!(url = %url, attempt, "timeout, retrying");
                continue;
            }
            return result;
        }
    }
}
