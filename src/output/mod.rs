// src/output/mod.rs
// =============================================================================
// This module owns the collected pages of a crawl and renders them for export.
//
// Formats:
// - Flat text: "Title: ...\nContent: ..." blocks separated by a blank line
// - JSON: pretty-printed array of {url, title, content}
// =============================================================================

mod aggregate;

pub use aggregate::{render_flat_text, render_json, ResultAggregator};

use clap::ValueEnum;

/// Export format of the aggregated result
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Title/Content text blocks
    Text,
    /// Pretty-printed JSON array
    Json,
}

impl ExportFormat {
    /// File extension used when saving this format
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Json => "json",
        }
    }
}

// Default export file name for a crawled domain
//
// Example: ("example.com", Json) -> "scraped_example.com.json"
pub fn default_file_name(domain: Option<&str>, format: ExportFormat) -> String {
    match domain {
        Some(domain) if !domain.is_empty() => {
            format!("scraped_{}.{}", domain, format.extension())
        }
        _ => format!("scraped_data.{}", format.extension()),
    }
}
