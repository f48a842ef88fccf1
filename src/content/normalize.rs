// src/content/normalize.rs
// =============================================================================
// This module turns extracted page text into canonical paragraph text and
// computes a content fingerprint for it.
//
// Normalized text looks like this:
// - Paragraphs are separated by exactly one blank line ("\n\n")
// - Inside a paragraph, every whitespace run is a single space
// - No empty paragraphs, no leading/trailing whitespace
// - A paragraph never repeats an earlier paragraph of the same page
//
// Rust concepts:
// - Iterators: split/filter/map chains instead of index loops
// - HashSet::insert returns false for values already present
// =============================================================================

use sha2::{Digest, Sha256};
use std::collections::HashSet;

// Normalizes extracted text into deduplicated paragraphs
//
// Example:
//   "  Hello \n  world\n\n\nHello world\n\nBye  "
//   -> "Hello world\n\nBye"
pub fn normalize(text: &str) -> String {
    let mut seen = HashSet::new();

    split_paragraphs(text)
        .into_iter()
        .map(collapse_whitespace)
        .filter(|para| !para.is_empty())
        .filter(|para| seen.insert(para.clone()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

// Computes the SHA-256 fingerprint of normalized text as lowercase hex
pub fn fingerprint(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    hex::encode(digest)
}

// Splits text on blank-line boundaries
//
// A "blank line" is a line containing only whitespace, so "a\n \nb" has two
// paragraphs just like "a\n\nb".
fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        } else {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    paragraphs
}

fn collapse_whitespace(paragraph: String) -> String {
    paragraph.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace_inside_paragraphs() {
        let text = "  Hello \t\n   world  ";
        assert_eq!(normalize(text), "Hello world");
    }

    #[test]
    fn test_keeps_paragraph_boundaries() {
        let text = "First paragraph.\n\n\n\nSecond   paragraph.";
        assert_eq!(normalize(text), "First paragraph.\n\nSecond paragraph.");
    }

    #[test]
    fn test_drops_duplicate_paragraphs_in_order() {
        let text = "Menu\n\nArticle body\n\nMenu\n\nFooter\n\nArticle   body";
        assert_eq!(normalize(text), "Menu\n\nArticle body\n\nFooter");
    }

    #[test]
    fn test_whitespace_only_lines_split_paragraphs() {
        let text = "one\n   \t \ntwo";
        assert_eq!(normalize(text), "one\n\ntwo");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\n \t "), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "  a  b \n\n c\n\n\n a  b  \n d\ne ",
            "single line",
            "\n\n\nleading blanks\n\ntrailing\n\n\n",
            "x\n\nx\n\nx",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_no_two_paragraphs_identical() {
        let text = "a\n\nb\n\na\n\n b \n\nc";
        let normalized = normalize(text);
        let paragraphs: Vec<_> = normalized.split("\n\n").collect();
        let unique: HashSet<_> = paragraphs.iter().collect();
        assert_eq!(paragraphs.len(), unique.len());
    }

    #[test]
    fn test_fingerprint_is_stable_hex() {
        let a = fingerprint("hello");
        assert_eq!(a, fingerprint("hello"));
        assert_eq!(a.len(), 64);
        assert_eq!(
            a,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert_ne!(a, fingerprint("hello "));
    }
}
