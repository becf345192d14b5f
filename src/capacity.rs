//! Size budgets: how big a span is, and how big it may get.
//!
//! ## The Problem
//!
//! Users think of chunk size in whichever unit their embedding model
//! documents: characters for some, tokens for others. Mixing the two in one
//! pipeline produces chunks that silently overflow or come out far too small.
//!
//! ```text
//! target = 500, unit = Tokens
//!
//! recursive pass measures chars   -> 500-char chunks (~90 tokens)   wrong
//! merge pass measures tokens      -> merges them into ~500 tokens   inconsistent
//! ```
//!
//! ## The Solution
//!
//! A [`SizeBudget`] pairs a maximum with the unit it is expressed in, and is
//! the only thing in the crate that measures text. Every pass of one run
//! shares the same budget unit, so a size means the same thing everywhere.

use serde::{Deserialize, Serialize};

use crate::tokens::TokenEstimator;

/// The unit chunk sizes are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeUnit {
    /// Unicode scalar values.
    #[default]
    Chars,
    /// Estimated tokens (see [`TokenEstimator`]).
    Tokens,
}

/// A maximum span size together with the unit it is measured in.
///
/// # Examples
///
/// ```rust
/// use chunklab::{SizeBudget, SizeUnit, TokenEstimator};
///
/// let budget = SizeBudget::chars(10);
/// assert_eq!(budget.measure("naïve"), 5);
/// assert!(budget.fits("0123456789"));
/// assert!(!budget.fits("0123456789a"));
///
/// let tokens = SizeBudget::new(4, SizeUnit::Tokens, TokenEstimator::default());
/// assert_eq!(tokens.measure("one two three"), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeBudget {
    max: usize,
    unit: SizeUnit,
    estimator: TokenEstimator,
}

impl SizeBudget {
    /// Create a budget. A zero maximum is clamped to one so splitting
    /// always terminates.
    #[must_use]
    pub fn new(max: usize, unit: SizeUnit, estimator: TokenEstimator) -> Self {
        Self {
            max: max.max(1),
            unit,
            estimator,
        }
    }

    /// A character budget with the default estimator.
    #[must_use]
    pub fn chars(max: usize) -> Self {
        Self::new(max, SizeUnit::Chars, TokenEstimator::default())
    }

    /// The same unit and estimator with a different maximum.
    #[must_use]
    pub fn with_max(self, max: usize) -> Self {
        Self::new(max, self.unit, self.estimator)
    }

    /// The maximum allowed span size.
    #[must_use]
    pub const fn max(&self) -> usize {
        self.max
    }

    /// The unit sizes are measured in.
    #[must_use]
    pub const fn unit(&self) -> SizeUnit {
        self.unit
    }

    /// The estimator used for [`SizeUnit::Tokens`].
    #[must_use]
    pub const fn estimator(&self) -> TokenEstimator {
        self.estimator
    }

    /// Size of `text` in this budget's unit.
    #[must_use]
    pub fn measure(&self, text: &str) -> usize {
        match self.unit {
            SizeUnit::Chars => text.chars().count(),
            SizeUnit::Tokens => self.estimator.estimate(text),
        }
    }

    /// Whether `text` fits within the maximum.
    #[must_use]
    pub fn fits(&self, text: &str) -> bool {
        self.measure(text) <= self.max
    }

    /// Check if adding `additional` to `current` would exceed the maximum.
    #[must_use]
    pub fn would_overflow(&self, current: usize, additional: usize) -> bool {
        current.saturating_add(additional) > self.max
    }
}

impl Default for SizeBudget {
    fn default() -> Self {
        Self::chars(500)
    }
}
