//! Post-processing: coalesce undersized spans.
//!
//! Strategies that cut on structure (paragraphs, headers, regex matches)
//! happily emit one-line spans: a lone heading, a signature line, a list
//! item. Embedded on their own these carry almost no meaning. The merger
//! folds them into their neighbours.
//!
//! ## The Algorithm
//!
//! ```text
//! min = 10
//!
//! spans:   [3] [4] [8] [20] [2]
//! buffer:  3 -> 7 -> 15 (>= 10, flush)
//!                        20 (flush)
//!                             2 (trailing, too small)
//! output:  [15] [22]          <- trailing 2 folded into the previous span
//! ```
//!
//! Every output span is at least `min` except when there is only one span
//! and it is too small on its own.
//!
//! ## Joining
//!
//! Spans that are both exact slices of the source are joined by taking the
//! source range that covers them, so the original text between them
//! (blank lines, overlap) comes back verbatim and nothing is duplicated.
//! Anything else is joined with the configured separator.

use crate::capacity::SizeBudget;
use crate::Slab;

/// Merges adjacent spans that fall below a minimum size.
///
/// ```rust
/// use chunklab::{Slab, SizeBudget, SmallChunkMerger};
///
/// let source = "a\n\nbb\n\nlonger paragraph";
/// let spans = vec![
///     Slab::new("a", 0, 1, 0),
///     Slab::new("bb", 3, 5, 1),
///     Slab::new("longer paragraph", 7, 23, 2),
/// ];
/// let merger = SmallChunkMerger::new(SizeBudget::chars(10), "\n");
/// let merged = merger.merge(source, spans);
///
/// assert_eq!(merged.len(), 1);
/// assert_eq!(merged[0].text, source);
/// ```
#[derive(Debug, Clone)]
pub struct SmallChunkMerger {
    min: SizeBudget,
    separator: String,
}

impl SmallChunkMerger {
    /// Create a merger. `min.max()` is the minimum span size.
    pub fn new(min: SizeBudget, separator: impl Into<String>) -> Self {
        Self {
            min,
            separator: separator.into(),
        }
    }

    fn size(&self, slab: &Slab) -> usize {
        self.min.measure(&slab.text)
    }

    /// Join two adjacent spans.
    fn join(&self, source: &str, a: Slab, b: Slab) -> Slab {
        if a.is_anchored(source) && b.is_anchored(source) && a.start <= b.start {
            let end = a.end.max(b.end);
            return Slab::new(&source[a.start..end], a.start, end, a.index);
        }
        let text = format!("{}{}{}", a.text, self.separator, b.text);
        Slab::new(text, a.start, a.end.max(b.end), a.index)
    }

    /// Merge `spans` (in source order) so that no span but a lone one is
    /// below the minimum.
    pub fn merge(&self, source: &str, spans: Vec<Slab>) -> Vec<Slab> {
        let mut merged: Vec<Slab> = Vec::with_capacity(spans.len());
        let mut buffer: Option<Slab> = None;

        for span in spans {
            let current = match buffer.take() {
                Some(buf) => self.join(source, buf, span),
                None => span,
            };
            if self.size(&current) >= self.min.max() {
                merged.push(current);
            } else {
                buffer = Some(current);
            }
        }

        if let Some(tail) = buffer {
            match merged.pop() {
                Some(prev) => merged.push(self.join(source, prev, tail)),
                None => merged.push(tail),
            }
        }

        for (index, slab) in merged.iter_mut().enumerate() {
            slab.index = index;
        }

        tracing::debug!(out = merged.len(), "merged small spans");
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(source: &str, parts: &[&str]) -> Vec<Slab> {
        let mut cursor = 0;
        parts
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let start = cursor + source[cursor..].find(p).unwrap();
                cursor = start + p.len();
                Slab::new(*p, start, cursor, i)
            })
            .collect()
    }

    fn sizes(slabs: &[Slab]) -> Vec<usize> {
        slabs.iter().map(|s| s.text.chars().count()).collect()
    }

    #[test]
    fn test_trailing_folded_backward() {
        let source = "aaa bbbb cccccccc dddddddddddddddddddd ee";
        let input = spans(source, &["aaa", "bbbb", "cccccccc", "dddddddddddddddddddd", "ee"]);
        let merger = SmallChunkMerger::new(SizeBudget::chars(10), "\n");
        let merged = merger.merge(source, input);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].text, "aaa bbbb cccccccc");
        assert_eq!(merged[1].text, "dddddddddddddddddddd ee");
        assert_eq!(merged[1].index, 1);
    }

    #[test]
    fn test_at_most_one_small_span() {
        let source = "aaa cccccccc bbbbbbbbbbbbbbbbbbbb";
        let input = spans(source, &["aaa", "cccccccc", "bbbbbbbbbbbbbbbbbbbb"]);
        let merger = SmallChunkMerger::new(SizeBudget::chars(10), "\n");
        let merged = merger.merge(source, input);

        assert!(sizes(&merged).iter().all(|&s| s >= 10));
    }

    #[test]
    fn test_lone_small_span_survives() {
        let merger = SmallChunkMerger::new(SizeBudget::chars(10), "\n");
        let merged = merger.merge("tiny", vec![Slab::new("tiny", 0, 4, 0)]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "tiny");
    }

    #[test]
    fn test_large_spans_untouched() {
        let source = "0123456789 abcdefghij";
        let input = spans(source, &["0123456789", "abcdefghij"]);
        let merger = SmallChunkMerger::new(SizeBudget::chars(10), "\n");
        assert_eq!(merger.merge(source, input.clone()), input);
    }

    #[test]
    fn test_unanchored_joined_with_separator() {
        let merger = SmallChunkMerger::new(SizeBudget::chars(10), " | ");
        let input = vec![Slab::new("rewritten", 0, 0, 0), Slab::new("x", 0, 0, 1)];
        let merged = merger.merge("original text", input);
        assert_eq!(merged[0].text, "rewritten | x");
    }

    #[test]
    fn test_overlapping_spans_not_duplicated() {
        let source = "abcdef";
        let input = vec![Slab::new("abcd", 0, 4, 0), Slab::new("cdef", 2, 6, 1)];
        let merger = SmallChunkMerger::new(SizeBudget::chars(5), "\n");
        let merged = merger.merge(source, input);
        assert_eq!(merged[0].text, "abcdef");
    }

    #[test]
    fn test_empty_input() {
        let merger = SmallChunkMerger::new(SizeBudget::chars(5), "\n");
        assert!(merger.merge("", vec![]).is_empty());
    }
}
