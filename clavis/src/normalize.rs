//! # Normalize Module - Raw Paragraphs to Practice Segments
//!
//! Turns the raw paragraphs supplied by a content loader into the ordered list of
//! [`Segment`]s a session is typed against.
//!
//! Per paragraph:
//! - every character in the Unicode punctuation (`P*`) or symbol (`S*`) categories is removed
//! - every run of whitespace collapses into a single ASCII space
//! - leading and trailing spaces are trimmed
//!
//! Paragraphs that end up empty are dropped and the remaining segments are re-indexed
//! contiguously. Each segment remembers which raw paragraph it came from, so callers can
//! still line up the original text or a translation for display.
//!
//! ```rust
//! use clavis::normalize::normalize;
//!
//! let segments = normalize(&["“Well,” she said —  fine.", "***", "Next  line"]);
//!
//! assert_eq!(segments.len(), 2);
//! assert_eq!(segments[0].text(), "Well she said fine");
//! assert_eq!(segments[1].index(), 1);
//! assert_eq!(segments[1].source_index(), 2);
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::char_len;

static PUNCTUATION_AND_SYMBOLS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{P}\p{S}]").expect("valid punctuation pattern"));
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// One normalized practice segment
///
/// Immutable once built. `text` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    index: usize,
    source_index: usize,
    text: String,
    len: usize,
}

impl Segment {
    /// Position of the segment in the practice sequence
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Index of the raw paragraph this segment was derived from
    pub const fn source_index(&self) -> usize {
        self.source_index
    }

    /// The comparison target
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the target in characters
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Always false, kept for API symmetry with `len`
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Normalize a single paragraph into its comparison form.
///
/// Returns an empty string if nothing typeable remains.
pub fn normalize_paragraph(paragraph: &str) -> String {
    let stripped = PUNCTUATION_AND_SYMBOLS.replace_all(paragraph, "");
    let collapsed = WHITESPACE_RUN.replace_all(&stripped, " ");
    collapsed.trim().to_string()
}

/// Normalize raw paragraphs into an ordered, gap-free list of segments
pub fn normalize<S: AsRef<str>>(paragraphs: &[S]) -> Vec<Segment> {
    paragraphs
        .iter()
        .enumerate()
        .filter_map(|(source_index, paragraph)| {
            let text = normalize_paragraph(paragraph.as_ref());
            (!text.is_empty()).then_some((source_index, text))
        })
        .enumerate()
        .map(|(index, (source_index, text))| Segment {
            index,
            source_index,
            len: char_len(&text),
            text,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_punctuation_and_symbols() {
        assert_eq!(normalize_paragraph("Hello, world!"), "Hello world");
        assert_eq!(normalize_paragraph("It's $5 + tax."), "Its 5 tax");
        assert_eq!(normalize_paragraph("café — naïve"), "café naïve");
        assert_eq!(normalize_paragraph("«quoted» ‘text’"), "quoted text");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize_paragraph("  a \t\n b   c  "), "a b c");
        // Full-width space counts as whitespace
        assert_eq!(normalize_paragraph("a\u{3000}\u{3000}b"), "a b");
        // Removing a symbol between spaces must not leave a double space
        assert_eq!(normalize_paragraph("left - right"), "left right");
    }

    #[test]
    fn test_drops_empty_paragraphs_and_reindexes() {
        let segments = normalize(&["", "First.", "!!!", "   ", "Second one"]);

        assert_eq!(segments.len(), 2);

        assert_eq!(segments[0].index(), 0);
        assert_eq!(segments[0].source_index(), 1);
        assert_eq!(segments[0].text(), "First");
        assert_eq!(segments[0].len(), 5);

        assert_eq!(segments[1].index(), 1);
        assert_eq!(segments[1].source_index(), 4);
        assert_eq!(segments[1].text(), "Second one");
    }

    #[test]
    fn test_empty_input() {
        let segments = normalize::<&str>(&[]);
        assert!(segments.is_empty());
    }

    #[test]
    fn test_length_counts_characters() {
        let segments = normalize(&["héllo wörld"]);
        assert_eq!(segments[0].len(), 11);
        assert!(!segments[0].is_empty());
    }

    #[test]
    fn test_owned_strings() {
        let paragraphs = vec![String::from("One."), String::from("Two.")];
        let segments = normalize(&paragraphs);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].text(), "Two");
    }
}
