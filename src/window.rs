//! Sliding-window chunking over words.
//!
//! The window and step are configured in characters (like every other
//! strategy) and converted to word counts with a chars-per-word ratio:
//!
//! ```text
//! size = 100, step = 50, chars_per_word = 5
//!
//! window = 20 words, step = 10 words
//! [w0 .. w19]
//!           [w10 .. w29]
//!                     [w20 .. w39]
//! ```
//!
//! The ratio is a rough average for English prose and is configurable via
//! [`Heuristics`](crate::Heuristics).

use crate::recursive::{sliding_windows, word_units};
use crate::slab::materialize;
use crate::{Chunker, Slab};

/// Overlapping word windows.
///
/// ```rust
/// use chunklab::{Chunker, SlidingWindowChunker};
///
/// // 10 chars / 5 = 2 words per window, 5 chars / 5 = 1 word step
/// let chunker = SlidingWindowChunker::new(10, 5, 5.0);
/// let slabs = chunker.chunk("a b c d");
/// let texts: Vec<&str> = slabs.iter().map(|s| s.text.as_str()).collect();
/// assert_eq!(texts, vec!["a b", "b c", "c d"]);
/// ```
#[derive(Debug, Clone)]
pub struct SlidingWindowChunker {
    window_words: usize,
    step_words: usize,
}

impl SlidingWindowChunker {
    /// Create a chunker from character sizes and a chars-per-word ratio.
    ///
    /// Both word counts are at least one.
    #[must_use]
    pub fn new(window_chars: usize, step_chars: usize, chars_per_word: f32) -> Self {
        let ratio = if chars_per_word.is_finite() && chars_per_word > 0.0 {
            chars_per_word
        } else {
            crate::options::DEFAULT_CHARS_PER_WORD
        };
        let words = |chars: usize| ((chars as f32 / ratio).floor() as usize).max(1);
        Self {
            window_words: words(window_chars),
            step_words: words(step_chars),
        }
    }

    /// Words per window.
    #[must_use]
    pub fn window_words(&self) -> usize {
        self.window_words
    }

    /// Words the window advances by.
    #[must_use]
    pub fn step_words(&self) -> usize {
        self.step_words
    }
}

impl Chunker for SlidingWindowChunker {
    fn chunk(&self, text: &str) -> Vec<Slab> {
        let words = word_units(text, 0..text.len());
        materialize(
            text,
            sliding_windows(&words, self.window_words, self.step_words),
        )
    }

    fn estimate_chunks(&self, text_len: usize) -> usize {
        (text_len / 5 / self.step_words).max(1)
    }
}
