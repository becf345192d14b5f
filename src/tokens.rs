//! Token count estimation.
//!
//! There is no tokenizer here on purpose: chunk sizes only need to be in the
//! right ballpark for an embedding model's context window. The estimator
//! counts whitespace-separated words and scales by a tokens-per-word ratio.
//!
//! ```text
//! "The quick brown fox"  -> 4 words -> ceil(4 * 1.3) = 6 tokens
//! ```
//!
//! English prose averages about 1.3 BPE tokens per word. Code, CJK text and
//! numbers-heavy content drift far from that, which is why the ratio is a
//! parameter rather than a constant.

use serde::{Deserialize, Serialize};

/// Default tokens-per-word ratio.
pub const DEFAULT_TOKENS_PER_WORD: f32 = 1.3;

/// Word-count based token estimator.
///
/// ```rust
/// use chunklab::TokenEstimator;
///
/// let est = TokenEstimator::default();
/// assert_eq!(est.estimate("The quick brown fox"), 6);
/// assert_eq!(est.estimate(""), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TokenEstimator {
    tokens_per_word: f32,
}

impl TokenEstimator {
    /// Create an estimator with a custom ratio.
    ///
    /// Non-finite or non-positive ratios fall back to the default.
    #[must_use]
    pub fn new(tokens_per_word: f32) -> Self {
        let tokens_per_word = if tokens_per_word.is_finite() && tokens_per_word > 0.0 {
            tokens_per_word
        } else {
            DEFAULT_TOKENS_PER_WORD
        };
        Self { tokens_per_word }
    }

    /// The configured ratio.
    #[must_use]
    pub fn tokens_per_word(&self) -> f32 {
        self.tokens_per_word
    }

    /// Estimate the token count of `text`.
    #[must_use]
    pub fn estimate(&self, text: &str) -> usize {
        let words = text.split_whitespace().count();
        (words as f32 * self.tokens_per_word).ceil() as usize
    }

    /// Largest number of words whose estimate stays within `tokens`.
    ///
    /// Never returns less than one so that word windows always advance.
    #[must_use]
    pub fn words_within(&self, tokens: usize) -> usize {
        ((tokens as f32 / self.tokens_per_word).floor() as usize).max(1)
    }
}

impl Default for TokenEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_TOKENS_PER_WORD)
    }
}
