// src/output/aggregate.rs
// =============================================================================
// Collects page records in crawl order and drops pages whose content was
// already seen during this run.
//
// Two pages count as duplicates when the fingerprint (SHA-256) of their
// normalized content is equal, no matter what their URLs or titles are.
// =============================================================================

use crate::content::{fingerprint, PageRecord};
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct ResultAggregator {
    records: Vec<PageRecord>,
    seen: HashSet<String>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the record unless its content duplicates an earlier record.
    ///
    /// Returns true when the record was kept.
    pub fn add(&mut self, record: PageRecord) -> bool {
        if !self.seen.insert(fingerprint(&record.content)) {
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn records(&self) -> &[PageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<PageRecord> {
        self.records
    }

    /// Renders every record as a "Title/Content" block
    pub fn to_flat_text(&self) -> String {
        render_flat_text(&self.records)
    }

    /// Renders every record as a pretty-printed JSON array
    pub fn to_json(&self) -> serde_json::Result<String> {
        render_json(&self.records)
    }
}

// Blocks are separated by exactly one blank line, in insertion order
pub fn render_flat_text(records: &[PageRecord]) -> String {
    records
        .iter()
        .map(|r| format!("Title: {}\nContent: {}", r.title, r.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn render_json(records: &[PageRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}
