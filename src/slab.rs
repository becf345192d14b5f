//! The Slab type: a span of text with position metadata.

use std::ops::Range;

/// A span of text with its position in the original document.
///
/// Slabs are the raw output of every chunking strategy. They become
/// [`Chunk`](crate::Chunk) records only after the merge pass.
///
/// ## Byte Offsets
///
/// `start` and `end` are byte offsets into the original text, not character
/// indices. This matches Rust's string slicing semantics:
///
/// ```rust
/// use chunklab::Slab;
///
/// let text = "Hello, world!";
/// let slab = Slab::new("world", 7, 12, 0);
///
/// assert_eq!(&text[slab.start..slab.end], "world");
/// ```
///
/// A slab whose text was produced outside the source (for example by an
/// external splitter that rewrote whitespace) may not be *anchored*: its
/// range then only records where it was expected. See [`Slab::is_anchored`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slab {
    /// The span text.
    pub text: String,
    /// Byte offset where this span starts in the original document.
    pub start: usize,
    /// Byte offset where this span ends (exclusive) in the original document.
    pub end: usize,
    /// Zero-based index of this span in the sequence.
    pub index: usize,
}

impl Slab {
    /// Create a new slab.
    #[must_use]
    pub fn new(text: impl Into<String>, start: usize, end: usize, index: usize) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            index,
        }
    }

    /// Materialise a slab from a byte range of `source`.
    #[must_use]
    pub fn from_range(source: &str, range: Range<usize>, index: usize) -> Self {
        Self::new(&source[range.clone()], range.start, range.end, index)
    }

    /// The length of this span in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether this span is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether this span holds only whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// The byte span of this chunk in the original document.
    #[must_use]
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Whether `text` is exactly `source[start..end]`.
    #[must_use]
    pub fn is_anchored(&self, source: &str) -> bool {
        source.get(self.span()) == Some(self.text.as_str())
    }
}

impl std::fmt::Display for Slab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Slab {{ index: {}, span: {}..{}, len: {} }}",
            self.index,
            self.start,
            self.end,
            self.len()
        )
    }
}

/// Turn byte ranges into indexed slabs, dropping whitespace-only ranges.
pub(crate) fn materialize(source: &str, ranges: impl IntoIterator<Item = Range<usize>>) -> Vec<Slab> {
    ranges
        .into_iter()
        .filter(|r| !source[r.clone()].trim().is_empty())
        .enumerate()
        .map(|(index, r)| Slab::from_range(source, r, index))
        .collect()
}

/// Shrink a byte range so it excludes leading and trailing whitespace.
pub(crate) fn trim_range(source: &str, range: Range<usize>) -> Range<usize> {
    let slice = &source[range.clone()];
    let lead = slice.len() - slice.trim_start().len();
    let trail = slice.len() - slice.trim_end().len();
    if lead == slice.len() {
        return range.start..range.start;
    }
    (range.start + lead)..(range.end - trail)
}
