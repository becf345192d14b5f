//! Character windows with overlap.
//!
//! Windows start every `size - overlap` characters and hold at most `size`
//! characters:
//!
//! ```text
//! size = 8, overlap = 2
//!
//! "retrieval augmented"
//!  [0..8]   "retrieva"
//!  [6..14]  "val augm"
//!  [12..19] "gmented"
//! ```
//!
//! Windows that contain only whitespace are dropped and the survivors are
//! renumbered. Offsets are byte offsets even though sizes count characters.
//!
//! The token strategy runs this chunker with both numbers multiplied by the
//! configured chars-per-token ratio.

use crate::recursive::{char_units, sliding_windows};
use crate::slab::materialize;
use crate::{Chunker, Slab};

/// Fixed-size chunker with configurable overlap.
///
/// ## Example
///
/// ```rust
/// use chunklab::{Chunker, FixedChunker};
///
/// let chunker = FixedChunker::new(100, 20);
/// let text = "A".repeat(250);
/// let slabs = chunker.chunk(&text);
///
/// // step = 80: windows start at 0, 80, 160
/// assert_eq!(slabs.len(), 3);
/// assert_eq!(slabs[0].len(), 100);
/// assert_eq!(slabs[1].start, 80);
/// ```
#[derive(Debug, Clone)]
pub struct FixedChunker {
    size: usize,
    overlap: usize,
}

impl FixedChunker {
    /// Create a new fixed-size chunker.
    ///
    /// # Arguments
    ///
    /// * `size` - Maximum chunk size in characters (0 is treated as 1)
    /// * `overlap` - Characters shared by adjacent chunks, clamped below `size`
    #[must_use]
    pub fn new(size: usize, overlap: usize) -> Self {
        let size = size.max(1);
        Self {
            size,
            overlap: overlap.min(size - 1),
        }
    }

    /// Create a chunker with no overlap.
    #[must_use]
    pub fn no_overlap(size: usize) -> Self {
        Self::new(size, 0)
    }

    /// The step size between chunk starts.
    #[must_use]
    fn step(&self) -> usize {
        self.size - self.overlap
    }
}

impl Chunker for FixedChunker {
    fn chunk(&self, text: &str) -> Vec<Slab> {
        if text.is_empty() {
            return vec![];
        }
        let units = char_units(text, 0..text.len());
        materialize(text, sliding_windows(&units, self.size, self.step()))
    }

    fn estimate_chunks(&self, text_len: usize) -> usize {
        if text_len == 0 {
            return 0;
        }
        text_len.div_ceil(self.step())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_chunking() {
        let chunker = FixedChunker::new(10, 2);
        let text = "abcdefghijklmnopqrstuvwxyz";
        let slabs = chunker.chunk(text);

        assert_eq!(slabs[0].text, "abcdefghij");
        assert_eq!(slabs[0].start, 0);
        assert_eq!(slabs[0].end, 10);

        assert_eq!(slabs[1].start, 8); // 10 - 2 overlap
    }

    #[test]
    fn test_empty_text() {
        let chunker = FixedChunker::new(10, 2);
        assert!(chunker.chunk("").is_empty());
    }

    #[test]
    fn test_text_smaller_than_chunk() {
        let chunker = FixedChunker::new(100, 20);
        let slabs = chunker.chunk("small");
        assert_eq!(slabs.len(), 1);
        assert_eq!(slabs[0].text, "small");
    }

    #[test]
    fn test_unicode_counts_chars() {
        let chunker = FixedChunker::new(2, 0);
        let slabs = chunker.chunk("a日本語b");

        let texts: Vec<&str> = slabs.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["a日", "本語", "b"]);
        assert_eq!(slabs[1].start, 4);
    }

    #[test]
    fn test_zero_size_clamped() {
        let slabs = FixedChunker::new(0, 0).chunk("ab");
        assert_eq!(slabs.len(), 2);
    }

    #[test]
    fn test_overlap_clamped() {
        // overlap >= size would never advance; clamped to size - 1.
        let slabs = FixedChunker::new(3, 3).chunk("abcde");
        let texts: Vec<&str> = slabs.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["abc", "bcd", "cde"]);
    }

    #[test]
    fn test_blank_window_dropped() {
        let slabs = FixedChunker::new(3, 0).chunk("abc   def");
        let texts: Vec<&str> = slabs.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["abc", "def"]);
        assert_eq!(slabs[1].index, 1);
    }
}
