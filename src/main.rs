// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, written to stderr)
// 3. Run the crawl with the default HTTP fetcher
// 4. Export the pages as text or JSON (stdout or a file)
// 5. Exit with proper code (0 = pages scraped, 1 = nothing scraped, 2 = error)
//
// Progress and summaries go to stderr so stdout only ever carries the export.
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use site_scraper::crawl::{netloc, parse_start_url, with_default_scheme, CrawlConfig, CrawlReport};
use site_scraper::output::{default_file_name, render_flat_text, render_json};
use site_scraper::{Crawler, ExportFormat, HttpFetcher};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// RUST_LOG wins when set; otherwise warnings only, or debug with --verbose
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "warn,site_scraper=debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// Returns:
//   Ok(0) = at least one page scraped
//   Ok(1) = crawl finished but nothing was scraped
//   Err   = invalid input or export failure
async fn run(cli: Cli) -> Result<i32> {
    let start_url = with_default_scheme(&cli.url);
    // Validate before building any HTTP machinery
    let start = parse_start_url(&start_url)?;

    eprintln!("🔍 Scraping website: {}", start);
    eprintln!("📊 Max pages: {}, max depth: {}", cli.max_pages, cli.max_depth);

    let fetcher = HttpFetcher::new(Duration::from_secs(cli.timeout_secs))
        .context("Failed to create HTTP client")?;

    let config = CrawlConfig {
        max_pages: usize::try_from(cli.max_pages).context("--max-pages is too large")?,
        max_depth: cli.max_depth,
        max_concurrency: usize::try_from(cli.concurrency).context("--concurrency is too large")?,
        max_retries: cli.max_retries,
        strategy: cli.mode,
        progress: Some(Arc::new(|count: usize| eprintln!("   Pages scraped so far: {}", count))),
    };

    let mut crawler = Crawler::new(Arc::new(fetcher), config);
    let report = crawler.crawl(start.as_str()).await?;

    eprintln!("✅ Scraped {} page(s).", report.records.len());

    if report.records.is_empty() {
        return Ok(1);
    }

    let target = if cli.save {
        Some(save_path(&start, cli.format))
    } else {
        cli.output
    };
    export(&report, cli.format, target)?;

    Ok(0)
}

// scraped_<host[:port]>.<ext> in the working directory
fn save_path(start: &Url, format: ExportFormat) -> PathBuf {
    PathBuf::from(default_file_name(netloc(start).as_deref(), format))
}

fn export(report: &CrawlReport, format: ExportFormat, target: Option<PathBuf>) -> Result<()> {
    let rendered = match format {
        ExportFormat::Text => render_flat_text(&report.records),
        ExportFormat::Json => render_json(&report.records)?,
    };

    match target {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("💾 Saved to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_path_keeps_port() {
        let start = Url::parse("http://localhost:8080/docs").unwrap();
        assert_eq!(
            save_path(&start, ExportFormat::Json),
            PathBuf::from("scraped_localhost:8080.json")
        );

        let start = Url::parse("https://example.com/").unwrap();
        assert_eq!(
            save_path(&start, ExportFormat::Text),
            PathBuf::from("scraped_example.com.txt")
        );
    }
}
