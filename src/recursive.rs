//! Recursive character splitting (LangChain-style).
//!
//! Tries progressively finer separators until chunks fit within the size limit.
//!
//! ## The Algorithm
//!
//! Given separators `["\n\n", "\n", " ", ""]` and max_size `100`:
//!
//! ```text
//! 1. Split on "\n\n" (paragraphs), re-pack fragments greedily up to 100
//! 2. Any single paragraph > 100? Split *that paragraph* on "\n" (lines)
//! 3. Any single line still > 100? Split it on " " (words)
//! 4. "" reached (or separators exhausted): hard split every 100 chars,
//!    stepping by 100 - overlap
//! ```
//!
//! Only an oversized fragment descends a level; its neighbours stay packed at
//! the coarser level. The pass never copies text: every level works on byte
//! ranges of the original input, and the final spans are slices of it.
//!
//! ## Default Separators
//!
//! For general text:
//!
//! ```text
//! ["\n\n", "\n", " ", ""]
//! ```
//!
//! For Markdown:
//!
//! ```text
//! ["\n## ", "\n### ", "\n\n", "\n", ". ", " ", ""]
//! ```
//!
//! ## Overlap
//!
//! Overlap only applies at the hard-split level. Separator-level spans meet
//! at natural boundaries, so repeating text across them buys little.

use std::ops::Range;

use crate::capacity::{SizeBudget, SizeUnit};
use crate::slab::materialize;
use crate::splitter::{Piece, SeparatorSplitter, Separator};
use crate::{Chunker, Slab};

/// Separators used when none are configured, coarsest first.
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Recursive character splitter.
///
/// Splits text using a hierarchy of separators, trying the coarsest first.
///
/// ## Example
///
/// ```rust
/// use chunklab::{Chunker, RecursiveChunker};
///
/// let chunker = RecursiveChunker::new(50, &["\n\n", "\n", ". ", " "]);
/// let text = "Paragraph one.\n\nParagraph two is longer and might need splitting.";
/// let slabs = chunker.chunk(text);
///
/// assert_eq!(slabs[0].text, "Paragraph one.");
/// assert!(slabs.iter().all(|s| s.text.chars().count() <= 50));
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    budget: SizeBudget,
    overlap: usize,
    separators: Vec<Separator>,
}

impl RecursiveChunker {
    /// Create a new recursive chunker measuring in characters.
    ///
    /// # Arguments
    ///
    /// * `max_size` - Maximum chunk size in characters (0 is treated as 1)
    /// * `separators` - Hierarchy of separators, coarsest first
    #[must_use]
    pub fn new(max_size: usize, separators: &[&str]) -> Self {
        Self::with_budget(
            SizeBudget::chars(max_size),
            separators.iter().map(|&s| Separator::from(s)).collect(),
        )
    }

    /// Create a chunker from an explicit budget and separator list.
    #[must_use]
    pub fn with_budget(budget: SizeBudget, separators: Vec<Separator>) -> Self {
        Self {
            budget,
            overlap: 0,
            separators,
        }
    }

    /// Set the overlap used when hard splitting.
    ///
    /// Clamped below the maximum size so hard splitting always advances.
    #[must_use]
    pub fn with_overlap(mut self, overlap: usize) -> Self {
        self.overlap = overlap.min(self.budget.max() - 1);
        self
    }

    /// Create a chunker with default separators for prose.
    #[must_use]
    pub fn prose(max_size: usize) -> Self {
        Self::new(max_size, &DEFAULT_SEPARATORS)
    }

    /// Create a chunker with default separators for Markdown.
    #[must_use]
    pub fn markdown(max_size: usize) -> Self {
        Self::new(
            max_size,
            &["\n## ", "\n### ", "\n\n", "\n", ". ", " ", ""],
        )
    }

    /// The budget this chunker splits against.
    #[must_use]
    pub fn budget(&self) -> SizeBudget {
        self.budget
    }

    /// Split `source` into byte ranges.
    ///
    /// Ranges come back in source order. Blank ranges are still included;
    /// [`Chunker::chunk`] filters them.
    pub fn split_ranges(&self, source: &str) -> Vec<Range<usize>> {
        let mut out = Vec::new();
        if !source.is_empty() {
            self.split_recursive(source, 0..source.len(), &self.separators, &mut out);
        }
        out
    }

    /// Recursively split a range using the remaining separators.
    fn split_recursive(
        &self,
        source: &str,
        range: Range<usize>,
        separators: &[Separator],
        out: &mut Vec<Range<usize>>,
    ) {
        if self.budget.fits(&source[range.clone()]) {
            out.push(range);
            return;
        }

        let Some((head, tail)) = separators.split_first() else {
            out.extend(self.hard_split(source, range));
            return;
        };

        if head.is_hard_split() {
            out.extend(self.hard_split(source, range));
            return;
        }

        let splitter = SeparatorSplitter::new(self.budget);
        for piece in splitter.split(source, range, head) {
            match piece {
                Piece::Packed(r) => out.push(r),
                Piece::Oversized(r) => self.split_recursive(source, r, tail, out),
            }
        }
    }

    /// Force split when no separator works.
    ///
    /// Character windows for [`SizeUnit::Chars`], word windows for
    /// [`SizeUnit::Tokens`]. Windows step by `max - overlap`, at least one.
    fn hard_split(&self, source: &str, range: Range<usize>) -> Vec<Range<usize>> {
        match self.budget.unit() {
            SizeUnit::Chars => {
                let step = self.budget.max().saturating_sub(self.overlap).max(1);
                sliding_windows(&char_units(source, range), self.budget.max(), step)
            }
            SizeUnit::Tokens => {
                let est = self.budget.estimator();
                let size = est.words_within(self.budget.max());
                let overlap = (self.overlap as f32 / est.tokens_per_word()).floor() as usize;
                let step = size.saturating_sub(overlap).max(1);
                sliding_windows(&word_units(source, range), size, step)
            }
        }
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, text: &str) -> Vec<Slab> {
        materialize(text, self.split_ranges(text))
    }

    fn estimate_chunks(&self, text_len: usize) -> usize {
        (text_len / self.budget.max()).max(1)
    }
}

/// Byte range of every char in `range`.
pub(crate) fn char_units(source: &str, range: Range<usize>) -> Vec<Range<usize>> {
    source[range.clone()]
        .char_indices()
        .map(|(i, c)| range.start + i..range.start + i + c.len_utf8())
        .collect()
}

/// Byte range of every whitespace-delimited word in `range`.
pub(crate) fn word_units(source: &str, range: Range<usize>) -> Vec<Range<usize>> {
    let mut words = Vec::new();
    let mut start = None;
    for (i, c) in source[range.clone()].char_indices() {
        let at = range.start + i;
        match (c.is_whitespace(), start) {
            (false, None) => start = Some(at),
            (true, Some(s)) => {
                words.push(s..at);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        words.push(s..range.end);
    }
    words
}

/// Windows of `size` consecutive units, advancing `step` units at a time.
///
/// Stops once a window reaches the last unit, so no trailing window lies
/// entirely inside its predecessor.
pub(crate) fn sliding_windows(
    units: &[Range<usize>],
    size: usize,
    step: usize,
) -> Vec<Range<usize>> {
    let size = size.max(1);
    let step = step.max(1);
    let mut windows = Vec::new();
    let mut i = 0;

    while i < units.len() {
        let last = i.saturating_add(size).min(units.len()) - 1;
        windows.push(units[i].start..units[last].end);
        if last + 1 >= units.len() {
            break;
        }
        i = i.saturating_add(step);
    }

    windows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TokenEstimator;

    fn texts(slabs: &[Slab]) -> Vec<&str> {
        slabs.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_paragraph_split() {
        let chunker = RecursiveChunker::prose(50);
        let text = "Short.\n\nThis is a longer paragraph that might need splitting into smaller pieces.";
        let slabs = chunker.chunk(text);

        assert!(slabs.len() >= 2);
        assert_eq!(slabs[0].text, "Short.");
    }

    #[test]
    fn test_respects_max_size() {
        let chunker = RecursiveChunker::prose(20);
        let text = "The quick brown fox jumps over the lazy dog.";
        let slabs = chunker.chunk(text);

        for slab in &slabs {
            assert!(slab.text.chars().count() <= 20, "Chunk too large: {slab}");
        }
    }

    #[test]
    fn test_empty_text() {
        let chunker = RecursiveChunker::prose(100);
        assert!(chunker.chunk("").is_empty());
    }

    #[test]
    fn test_small_text_single_chunk() {
        let chunker = RecursiveChunker::prose(100);
        let slabs = chunker.chunk("Small text.");
        assert_eq!(texts(&slabs), vec!["Small text."]);
    }

    #[test]
    fn test_markdown_headers() {
        let chunker = RecursiveChunker::markdown(40);
        let text = "# Title\n\nIntro.\n\n## Section 1\n\nContent 1.\n\n## Section 2\n\nContent 2.";
        let slabs = chunker.chunk(text);

        assert!(slabs.len() >= 2);
        assert!(slabs.iter().any(|s| s.text.starts_with("Section 2")));
    }

    #[test]
    fn test_zero_size_clamped() {
        let chunker = RecursiveChunker::prose(0);
        let slabs = chunker.chunk("abc");
        assert_eq!(texts(&slabs), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_separators_hard_split() {
        let chunker = RecursiveChunker::new(4, &[]);
        let slabs = chunker.chunk("abcdefghij");
        assert_eq!(texts(&slabs), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_hard_split_overlap() {
        let chunker = RecursiveChunker::new(4, &[""]).with_overlap(2);
        let slabs = chunker.chunk("abcdefgh");
        assert_eq!(texts(&slabs), vec!["abcd", "cdef", "efgh"]);
    }

    #[test]
    fn test_overlap_clamped_below_size() {
        let chunker = RecursiveChunker::new(3, &[""]).with_overlap(10);
        let slabs = chunker.chunk("abcde");
        assert_eq!(texts(&slabs), vec!["abc", "bcd", "cde"]);
    }

    #[test]
    fn test_dot_separator_tiny_budget() {
        let text = "A. B. C.";
        let chunker = RecursiveChunker::new(2, &[". "]);
        let slabs = chunker.chunk(text);

        assert!(slabs.iter().all(|s| s.text.chars().count() <= 2));
        let joined: String = slabs.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(joined, text.replace(". ", ""));
    }

    #[test]
    fn test_only_oversized_fragment_descends() {
        let text = "tiny\n\nthis paragraph is far too long\n\nsmall";
        let chunker = RecursiveChunker::prose(12);
        let slabs = chunker.chunk(text);

        assert_eq!(slabs[0].text, "tiny");
        assert_eq!(slabs.last().map(|s| s.text.as_str()), Some("small"));
        for slab in &slabs {
            assert_eq!(&text[slab.span()], slab.text);
        }
    }

    #[test]
    fn test_token_unit_word_windows() {
        let budget = SizeBudget::new(3, SizeUnit::Tokens, TokenEstimator::new(1.0));
        let chunker = RecursiveChunker::with_budget(budget, vec![]);
        let slabs = chunker.chunk("one two three four five");
        assert_eq!(texts(&slabs), vec!["one two three", "four five"]);
    }

    #[test]
    fn test_multibyte_hard_split() {
        let chunker = RecursiveChunker::new(2, &[""]);
        let slabs = chunker.chunk("日本語です");
        assert_eq!(texts(&slabs), vec!["日本", "語で", "す"]);
    }

    #[test]
    fn test_windows_stop_at_end() {
        let units: Vec<Range<usize>> = (0..5).map(|i| i..i + 1).collect();
        assert_eq!(sliding_windows(&units, 3, 1), vec![0..3, 1..4, 2..5]);
        assert_eq!(sliding_windows(&units, 10, 1), vec![0..5]);
        assert!(sliding_windows(&[], 3, 1).is_empty());
    }
}
