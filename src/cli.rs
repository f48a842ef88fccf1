// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the Cli struct below *is* the argument list, and
// clap generates parsing, validation and --help from it.
// =============================================================================

use clap::Parser;
use site_scraper::{CrawlStrategy, ExportFormat};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "site-scraper",
    version,
    about = "Crawl a website and extract clean, deduplicated page text",
    long_about = "site-scraper crawls a website starting from one URL, stays on that site's domain, \
                  and extracts the readable text of every page it visits. Pages with identical \
                  content are kept once. The result is exported as plain text or JSON."
)]
pub struct Cli {
    /// URL to start crawling from (e.g., https://example.com)
    ///
    /// Bare domains like "example.com" are treated as https://example.com
    pub url: String,

    /// Maximum number of pages to scrape
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_pages: u64,

    /// How pages are discovered: follow links, or read /sitemap.xml
    #[arg(long, value_enum, default_value = "iterative")]
    pub mode: CrawlStrategy,

    /// How many link hops to follow from the start page
    ///
    /// Depth 0 = just the starting page
    /// Depth 1 = starting page + all pages it links to
    #[arg(long, default_value_t = site_scraper::crawl::DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Maximum number of pages fetched at the same time
    #[arg(long, default_value_t = site_scraper::fetch::DEFAULT_MAX_CONCURRENCY as u64, value_parser = clap::value_parser!(u64).range(1..))]
    pub concurrency: u64,

    /// How often a timed-out page is retried before it is dropped
    #[arg(long, default_value_t = site_scraper::crawl::DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = site_scraper::fetch::DEFAULT_TIMEOUT.as_secs(), value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: ExportFormat,

    /// Write the export to this file instead of stdout
    #[arg(long, short, conflicts_with = "save")]
    pub output: Option<PathBuf>,

    /// Write the export to scraped_<domain>.txt (or .json)
    #[arg(long)]
    pub save: bool,

    /// Log every fetch (same as RUST_LOG=site_scraper=debug)
    #[arg(long, short)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["site-scraper", "example.com"]).unwrap();
        assert_eq!(cli.url, "example.com");
        assert_eq!(cli.max_pages, 1);
        assert_eq!(cli.mode, CrawlStrategy::IterativeBfs);
        assert_eq!(cli.max_depth, 2);
        assert_eq!(cli.concurrency, 10);
        assert_eq!(cli.max_retries, 2);
        assert_eq!(cli.timeout_secs, 30);
        assert_eq!(cli.format, ExportFormat::Text);
        assert!(cli.output.is_none());
        assert!(!cli.save);
    }

    #[test]
    fn test_sitemap_json_options() {
        let cli = Cli::try_parse_from([
            "site-scraper",
            "https://example.com",
            "--mode",
            "sitemap",
            "--max-pages",
            "25",
            "--format",
            "json",
            "--output",
            "pages.json",
        ])
        .unwrap();
        assert_eq!(cli.mode, CrawlStrategy::SitemapSeeded);
        assert_eq!(cli.max_pages, 25);
        assert_eq!(cli.format, ExportFormat::Json);
        assert_eq!(cli.output, Some(PathBuf::from("pages.json")));
    }

    #[test]
    fn test_rejects_zero_pages() {
        assert!(Cli::try_parse_from(["site-scraper", "example.com", "--max-pages", "0"]).is_err());
        assert!(Cli::try_parse_from(["site-scraper", "example.com", "--concurrency", "0"]).is_err());
    }

    #[test]
    fn test_output_conflicts_with_save() {
        let parsed =
            Cli::try_parse_from(["site-scraper", "example.com", "--save", "--output", "x.txt"]);
        assert!(parsed.is_err());
    }
}
