//! Single-separator splitting with greedy re-packing.
//!
//! One level of the recursive algorithm: cut a range of the source on one
//! separator, then glue consecutive fragments back together while the glued
//! range still fits the budget.
//!
//! ```text
//! separator = " ", max = 10
//!
//! "the quick brown fox"
//!  fragments: [the] [quick] [brown] [fox]
//!  packed:    [the quick] [brown fox]
//! ```
//!
//! Everything is tracked as byte ranges into the source. A packed range
//! covers its fragments *and* the separators between them, so the text of a
//! packed piece is always a verbatim slice of the input.

use std::ops::Range;

use regex::Regex;

use crate::capacity::SizeBudget;

/// A boundary marker used to cut text.
#[derive(Debug, Clone)]
pub enum Separator {
    /// A literal string. The separator itself belongs to no fragment.
    ///
    /// The empty string is the "no separator left" sentinel: reaching it
    /// means hard splitting at character (or word) granularity.
    Literal(String),
    /// A zero-width boundary before every match of the pattern. The matched
    /// text stays at the head of the following fragment.
    Boundary(Regex),
}

impl Separator {
    /// A literal separator.
    pub fn literal(sep: impl Into<String>) -> Self {
        Self::Literal(sep.into())
    }

    /// A boundary separator from a regex pattern.
    pub fn boundary(pattern: &str) -> crate::Result<Self> {
        Ok(Self::Boundary(Regex::new(pattern)?))
    }

    /// Whether this is the hard-split sentinel.
    #[must_use]
    pub fn is_hard_split(&self) -> bool {
        matches!(self, Self::Literal(s) if s.is_empty())
    }

    /// Cut `range` of `source` into fragment ranges.
    ///
    /// Empty fragments (two separators back to back) are kept so that the
    /// caller sees the text's structure; they are dropped later only if the
    /// span they end up in is blank.
    pub fn fragments(&self, source: &str, range: Range<usize>) -> Vec<Range<usize>> {
        let slice = &source[range.clone()];
        let base = range.start;
        let mut out = Vec::new();
        let mut cursor = 0;

        match self {
            Self::Literal(sep) if sep.is_empty() => return vec![range],
            Self::Literal(sep) => {
                for (at, _) in slice.match_indices(sep.as_str()) {
                    out.push(base + cursor..base + at);
                    cursor = at + sep.len();
                }
            }
            Self::Boundary(re) => {
                for m in re.find_iter(slice) {
                    if m.start() > cursor {
                        out.push(base + cursor..base + m.start());
                        cursor = m.start();
                    }
                }
            }
        }

        out.push(base + cursor..range.end);
        out
    }
}

impl From<&str> for Separator {
    fn from(sep: &str) -> Self {
        Self::literal(sep)
    }
}

/// One output piece of a [`SeparatorSplitter`] pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    /// Consecutive fragments packed into a range that fits the budget.
    Packed(Range<usize>),
    /// A single fragment that alone exceeds the budget.
    Oversized(Range<usize>),
}

/// Splits on one separator and re-packs fragments into size-bounded buffers.
///
/// ```rust
/// use chunklab::{Piece, Separator, SeparatorSplitter, SizeBudget};
///
/// let splitter = SeparatorSplitter::new(SizeBudget::chars(10));
/// let text = "the quick brown fox";
/// let pieces = splitter.split(text, 0..text.len(), &Separator::literal(" "));
///
/// assert_eq!(pieces, vec![Piece::Packed(0..9), Piece::Packed(10..19)]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SeparatorSplitter {
    budget: SizeBudget,
}

impl SeparatorSplitter {
    /// Create a splitter for the given budget.
    #[must_use]
    pub fn new(budget: SizeBudget) -> Self {
        Self { budget }
    }

    /// Split `range` of `source` on `separator`.
    ///
    /// A fragment is appended to the running buffer while
    /// `buffer + separator + fragment` still fits; otherwise the buffer is
    /// flushed and the fragment starts a new one. An oversized fragment
    /// flushes the buffer and is passed through as [`Piece::Oversized`].
    pub fn split(&self, source: &str, range: Range<usize>, separator: &Separator) -> Vec<Piece> {
        let mut pieces = Vec::new();
        let mut buffer: Option<Range<usize>> = None;

        for frag in separator.fragments(source, range) {
            if !self.budget.fits(&source[frag.clone()]) {
                if let Some(buf) = buffer.take() {
                    pieces.push(Piece::Packed(buf));
                }
                pieces.push(Piece::Oversized(frag));
                continue;
            }

            buffer = Some(match buffer.take() {
                None => frag,
                Some(buf) => {
                    let joined = buf.start..frag.end;
                    if self.budget.fits(&source[joined.clone()]) {
                        joined
                    } else {
                        pieces.push(Piece::Packed(buf));
                        frag
                    }
                }
            });
        }

        if let Some(buf) = buffer {
            pieces.push(Piece::Packed(buf));
        }

        pieces
    }
}
