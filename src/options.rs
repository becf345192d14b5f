//! Chunking configuration.
//!
//! [`ChunkingOptions`] is an explicit value passed to every call; nothing in
//! the crate reads ambient configuration. It deserializes with defaults for
//! every missing field, so a partial JSON or TOML object is a valid config:
//!
//! ```rust
//! use chunklab::{ChunkingOptions, Strategy};
//!
//! let opts = ChunkingOptions::default()
//!     .with_strategy(Strategy::Sentence)
//!     .with_size(300)
//!     .with_overlap(30);
//! assert!(opts.validate().is_ok());
//! ```
//!
//! Sizes are UI-tunable, so a bad combination is a user's slider position,
//! not a programming error. [`ChunkingOptions::resolve`] clamps it into a
//! usable range and says what it changed; [`ChunkingOptions::validate`] is
//! the strict variant for callers that prefer to reject.

use serde::{Deserialize, Serialize};

use crate::capacity::{SizeBudget, SizeUnit};
use crate::error::{ChunkWarning, Error, Result};
use crate::hierarchy::DEFAULT_PARENT_CHUNK_SIZE;
use crate::strategy::Strategy;
use crate::tokens::{TokenEstimator, DEFAULT_TOKENS_PER_WORD};

/// Default chars-per-word ratio for word-window conversions.
pub const DEFAULT_CHARS_PER_WORD: f32 = 5.0;

/// Default chars-per-token ratio for the token strategy.
pub const DEFAULT_CHARS_PER_TOKEN: usize = 4;

/// Tunable ratios that stand in for a real tokenizer.
///
/// None of these come from a formal tokenizer; they are English-prose
/// averages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Heuristics {
    /// Tokens per whitespace-separated word (token estimates).
    pub tokens_per_word: f32,
    /// Characters per token (token strategy window scaling).
    pub chars_per_token: usize,
    /// Characters per word (sliding-window word counts).
    pub chars_per_word: f32,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            tokens_per_word: DEFAULT_TOKENS_PER_WORD,
            chars_per_token: DEFAULT_CHARS_PER_TOKEN,
            chars_per_word: DEFAULT_CHARS_PER_WORD,
        }
    }
}

/// Configuration for one chunking run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingOptions {
    /// Target (maximum) chunk size, in `size_unit`.
    pub chunk_size: usize,
    /// Overlap between adjacent windows, in `size_unit`. Must be below
    /// `chunk_size`.
    pub overlap: usize,
    /// Chunks smaller than this are merged with neighbours. 0 disables
    /// merging.
    pub min_chunk_size: usize,
    /// Unit for every size above.
    pub size_unit: SizeUnit,
    /// Which strategy to run.
    pub strategy: Strategy,
    /// Separator hierarchy for the recursive strategy. Empty means the
    /// default hierarchy.
    pub separators: Vec<String>,
    /// Pattern for the regex strategy.
    pub regex_pattern: Option<String>,
    /// Parent size; setting it turns on parent/child chunking.
    pub parent_chunk_size: Option<usize>,
    /// Joiner used when merging spans that are not contiguous in the source.
    pub merge_separator: String,
    /// Model identifier handed to the AI splitter.
    pub model_id: Option<String>,
    /// Extra instructions handed to the AI splitter.
    pub custom_prompt: Option<String>,
    /// Ratios used by size conversions.
    pub heuristics: Heuristics,
}

impl Default for ChunkingOptions {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            overlap: 50,
            min_chunk_size: 0,
            size_unit: SizeUnit::Chars,
            strategy: Strategy::Recursive,
            separators: Vec::new(),
            regex_pattern: None,
            parent_chunk_size: None,
            merge_separator: "\n".to_string(),
            model_id: None,
            custom_prompt: None,
            heuristics: Heuristics::default(),
        }
    }
}

impl ChunkingOptions {
    /// Set the strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the target chunk size.
    #[must_use]
    pub fn with_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the overlap.
    #[must_use]
    pub fn with_overlap(mut self, overlap: usize) -> Self {
        self.overlap = overlap;
        self
    }

    /// Set the minimum chunk size.
    #[must_use]
    pub fn with_min_size(mut self, min_chunk_size: usize) -> Self {
        self.min_chunk_size = min_chunk_size;
        self
    }

    /// Set the size unit.
    #[must_use]
    pub fn with_unit(mut self, size_unit: SizeUnit) -> Self {
        self.size_unit = size_unit;
        self
    }

    /// Set a custom separator hierarchy, coarsest first.
    #[must_use]
    pub fn with_separators<S: Into<String>>(mut self, separators: impl IntoIterator<Item = S>) -> Self {
        self.separators = separators.into_iter().map(Into::into).collect();
        self
    }

    /// Set the regex strategy's pattern.
    #[must_use]
    pub fn with_regex(mut self, pattern: impl Into<String>) -> Self {
        self.regex_pattern = Some(pattern.into());
        self
    }

    /// Enable parent/child chunking with the given parent size.
    #[must_use]
    pub fn with_parent_size(mut self, parent_chunk_size: usize) -> Self {
        self.parent_chunk_size = Some(parent_chunk_size);
        self
    }

    /// Enable parent/child chunking with the default parent size.
    #[must_use]
    pub fn hierarchical(self) -> Self {
        self.with_parent_size(DEFAULT_PARENT_CHUNK_SIZE)
    }

    /// Set the model identifier for AI strategies.
    #[must_use]
    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    /// Set extra instructions for AI strategies.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.custom_prompt = Some(prompt.into());
        self
    }

    /// Set the heuristics.
    #[must_use]
    pub fn with_heuristics(mut self, heuristics: Heuristics) -> Self {
        self.heuristics = heuristics;
        self
    }

    /// Whether parent/child chunking is on.
    #[must_use]
    pub fn is_hierarchical(&self) -> bool {
        self.parent_chunk_size.is_some()
    }

    /// The token estimator these options describe.
    #[must_use]
    pub fn estimator(&self) -> TokenEstimator {
        TokenEstimator::new(self.heuristics.tokens_per_word)
    }

    /// The size budget for `chunk_size`.
    #[must_use]
    pub fn budget(&self) -> SizeBudget {
        SizeBudget::new(self.chunk_size, self.size_unit, self.estimator())
    }

    /// Check every size invariant without changing anything.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk size must be > 0".into()));
        }
        if self.overlap >= self.chunk_size {
            return Err(Error::InvalidConfig(format!(
                "overlap {} must be below chunk size {}",
                self.overlap, self.chunk_size
            )));
        }
        if self.min_chunk_size > self.chunk_size {
            return Err(Error::InvalidConfig(format!(
                "minimum size {} exceeds chunk size {}",
                self.min_chunk_size, self.chunk_size
            )));
        }
        if let Some(parent) = self.parent_chunk_size {
            if parent < self.chunk_size {
                return Err(Error::InvalidConfig(format!(
                    "parent size {parent} is below chunk size {}",
                    self.chunk_size
                )));
            }
        }
        Ok(())
    }

    /// Clamp every size invariant into range, reporting each change.
    ///
    /// ```rust
    /// use chunklab::ChunkingOptions;
    ///
    /// let (opts, warnings) = ChunkingOptions::default()
    ///     .with_size(100)
    ///     .with_overlap(150)
    ///     .resolve();
    /// assert_eq!(opts.overlap, 99);
    /// assert_eq!(warnings.len(), 1);
    /// ```
    #[must_use]
    pub fn resolve(mut self) -> (Self, Vec<ChunkWarning>) {
        let mut warnings = Vec::new();
        let mut clamp = |what: String| {
            tracing::warn!(%what, "chunking options clamped");
            warnings.push(ChunkWarning::OptionsClamped(what));
        };

        if self.chunk_size == 0 {
            clamp("chunk size 0 raised to 1".into());
            self.chunk_size = 1;
        }
        if self.overlap >= self.chunk_size {
            let overlap = self.chunk_size - 1;
            clamp(format!("overlap {} lowered to {overlap}", self.overlap));
            self.overlap = overlap;
        }
        if self.min_chunk_size > self.chunk_size {
            clamp(format!(
                "minimum size {} lowered to {}",
                self.min_chunk_size, self.chunk_size
            ));
            self.min_chunk_size = self.chunk_size;
        }
        if let Some(parent) = self.parent_chunk_size {
            if parent < self.chunk_size {
                clamp(format!("parent size {parent} raised to {}", self.chunk_size));
                self.parent_chunk_size = Some(self.chunk_size);
            }
        }

        (self, warnings)
    }
}
