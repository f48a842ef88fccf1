// src/content/extract.rs
// =============================================================================
// This module pulls the title and the main readable text out of an HTML page.
//
// Main content is found by trying extraction strategies in a fixed order:
// 1. Readability: score containers by the paragraph text they hold
// 2. The first <article> element
// 3. The first <main> element
// 4. The whole document
// The first strategy that produces non-empty text wins.
//
// Text output uses one paragraph per block-level element, separated by a
// blank line, so the normalizer can dedupe paragraphs later.
//
// Rust concepts:
// - const arrays of enum values as a data-driven priority list
// - Option combinators (find_map, and_then, filter)
// - Recursion over the scraper DOM tree
// =============================================================================

use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashMap;

// Readability only wins when its best container holds at least this much text
const MIN_READABLE_CHARS: usize = 140;

// Paragraph-ish elements shorter than this don't contribute to scores
const MIN_PARAGRAPH_CHARS: usize = 25;

// Elements whose text is never part of the page content
const SKIPPED_TAGS: &[&str] = &[
    "head", "script", "style", "noscript", "template", "svg", "iframe", "object",
];

// Elements that start and end a paragraph
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table",
    "td", "th", "tr", "ul",
];

/// One way of locating the main content of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// Score-based article detection
    Readability,
    /// Text of the first element with this tag name
    Tag(&'static str),
    /// Text of the whole document
    WholeDocument,
}

/// Strategies in the order they are tried
pub const EXTRACTION_ORDER: [ExtractionStrategy; 4] = [
    ExtractionStrategy::Readability,
    ExtractionStrategy::Tag("article"),
    ExtractionStrategy::Tag("main"),
    ExtractionStrategy::WholeDocument,
];

impl ExtractionStrategy {
    // Returns None when the strategy finds nothing usable on this page
    fn apply(self, document: &Html) -> Option<String> {
        let text = match self {
            ExtractionStrategy::Readability => readability(document),
            ExtractionStrategy::Tag(tag) => first_element_text(document, tag),
            ExtractionStrategy::WholeDocument => Some(element_text(document.root_element())),
        }?;

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

// Returns the text of the first <title> element, or "" if there is none
pub fn extract_title(html: &str) -> String {
    let document = Html::parse_document(html);
    title_of(&document)
}

// Returns the main content text of the page (possibly empty)
pub fn extract_main_content(html: &str) -> String {
    let document = Html::parse_document(html);
    main_content_of(&document)
}

pub(crate) fn title_of(document: &Html) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };

    document
        .select(&selector)
        .next()
        .map(|title| title.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

pub(crate) fn main_content_of(document: &Html) -> String {
    EXTRACTION_ORDER
        .iter()
        .find_map(|strategy| strategy.apply(document))
        .unwrap_or_default()
}

fn first_element_text(document: &Html, tag: &str) -> Option<String> {
    let selector = Selector::parse(tag).ok()?;
    document.select(&selector).next().map(element_text)
}

// Readability-style detection
//
// Every paragraph-like element adds a score to its parent and half that score
// to its grandparent. Longer paragraphs and paragraphs with commas score
// higher. Candidates are then discounted by how much of their text is link
// text, which pushes navigation blocks and link lists down.
fn readability(document: &Html) -> Option<String> {
    let paragraphs = Selector::parse("p, pre, td").ok()?;
    let anchors = Selector::parse("a").ok()?;

    // Candidates in document order so ties resolve to the earliest container
    let mut candidates = Vec::new();
    let mut index = HashMap::new();

    for paragraph in document.select(&paragraphs) {
        let text = element_text(paragraph);
        let length = text.chars().count();
        if length < MIN_PARAGRAPH_CHARS {
            continue;
        }

        let commas = text.matches(',').count() as f64;
        let score = 1.0 + commas + (length as f64 / 100.0).min(3.0);

        let parent = paragraph.parent().and_then(ElementRef::wrap);
        let grandparent = parent.and_then(|p| p.parent()).and_then(ElementRef::wrap);

        for (ancestor, share) in [(parent, 1.0), (grandparent, 0.5)] {
            let Some(ancestor) = ancestor else { continue };
            let slot = *index.entry(ancestor.id()).or_insert_with(|| {
                candidates.push((ancestor, 0.0));
                candidates.len() - 1
            });
            candidates[slot].1 += score * share;
        }
    }

    let mut best: Option<(ElementRef, f64)> = None;
    for (candidate, score) in candidates {
        let adjusted = score * (1.0 - link_density(candidate, &anchors));
        if best.map_or(true, |(_, best_score)| adjusted > best_score) {
            best = Some((candidate, adjusted));
        }
    }

    let (element, _) = best?;
    let text = element_text(element);
    if text.chars().count() >= MIN_READABLE_CHARS {
        Some(text)
    } else {
        None
    }
}

// Fraction of an element's text that sits inside links (0.0 ..= 1.0)
fn link_density(element: ElementRef, anchors: &Selector) -> f64 {
    let total: usize = element.text().map(|t| t.trim().len()).sum();
    if total == 0 {
        return 1.0;
    }
    let linked: usize = element
        .select(anchors)
        .flat_map(|a| a.text())
        .map(|t| t.trim().len())
        .sum();
    (linked as f64 / total as f64).min(1.0)
}

// Collects the visible text of an element as blank-line separated paragraphs
pub(crate) fn element_text(element: ElementRef) -> String {
    let mut collector = TextCollector::default();
    collector.walk(element);
    collector.finish()
}

#[derive(Default)]
struct TextCollector {
    paragraphs: Vec<String>,
    current: String,
}

impl TextCollector {
    fn walk(&mut self, element: ElementRef) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => self.current.push_str(text),
                Node::Element(el) => {
                    let name = el.name();
                    if SKIPPED_TAGS.contains(&name) {
                        continue;
                    }
                    let Some(child_element) = ElementRef::wrap(child) else {
                        continue;
                    };

                    let is_block = BLOCK_TAGS.contains(&name);
                    if is_block {
                        self.flush();
                    }
                    self.walk(child_element);
                    if is_block {
                        self.flush();
                    }
                }
                _ => {}
            }
        }
    }

    fn flush(&mut self) {
        let paragraph = self.current.trim().to_string();
        if !paragraph.is_empty() {
            self.paragraphs.push(paragraph);
        }
        self.current.clear();
    }

    fn finish(mut self) -> String {
        self.flush();
        self.paragraphs.join("\n\n")
    }
}
