//! Strategy dispatch.
//!
//! The router maps a [`Strategy`] plus options onto a concrete chunker and
//! runs it. Deterministic strategies are plain function calls; AI strategies
//! go to the injected [`AiSplitter`].
//!
//! Recovery policy:
//!
//! | Problem | Result |
//! |---------|--------|
//! | Invalid regex | whole text as one span + warning |
//! | AI splitter error or empty answer | whole text as one span + warning |
//! | AI strategy, no splitter configured | [`Error::SplitterUnavailable`] |

use std::sync::Arc;

use crate::capacity::SizeUnit;
use crate::code::CodeChunker;
use crate::document::{DocumentChunker, MetadataChunker};
use crate::error::{ChunkWarning, Error, Result};
use crate::external::AiSplitter;
use crate::fenced::ContentAwareChunker;
use crate::fixed::FixedChunker;
use crate::options::ChunkingOptions;
use crate::paragraph::{HybridChunker, ParagraphChunker};
use crate::pattern::{RegexChunker, DEFAULT_PATTERN};
use crate::recursive::{RecursiveChunker, DEFAULT_SEPARATORS};
use crate::sentence::SentenceChunker;
use crate::splitter::Separator;
use crate::strategy::Strategy;
use crate::window::SlidingWindowChunker;
use crate::{Chunker, Slab};

/// Spans produced by one strategy run, plus anything recovered on the way.
#[derive(Debug, Clone, Default)]
pub struct Routed {
    /// Raw spans in source order.
    pub spans: Vec<Slab>,
    /// Recovered problems.
    pub warnings: Vec<ChunkWarning>,
}

impl Routed {
    fn whole(text: &str, warning: ChunkWarning) -> Self {
        tracing::warn!(%warning, "falling back to a single span");
        Self {
            spans: vec![Slab::new(text, 0, text.len(), 0)],
            warnings: vec![warning],
        }
    }
}

/// Dispatches text to the chunker for a strategy.
#[derive(Clone, Default)]
pub struct StrategyRouter {
    splitter: Option<Arc<dyn AiSplitter>>,
}

impl std::fmt::Debug for StrategyRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRouter")
            .field("splitter", &self.splitter.is_some())
            .finish()
    }
}

impl StrategyRouter {
    /// A router with no AI splitter. AI strategies will fail.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the AI splitter used by AI strategies.
    #[must_use]
    pub fn with_splitter(mut self, splitter: Arc<dyn AiSplitter>) -> Self {
        self.splitter = Some(splitter);
        self
    }

    /// Whether an AI splitter is configured.
    #[must_use]
    pub fn has_splitter(&self) -> bool {
        self.splitter.is_some()
    }

    /// Run a deterministic strategy with maximum size `size`.
    ///
    /// Returns `None` for strategies that need the AI splitter.
    ///
    /// ```rust
    /// use chunklab::{ChunkingOptions, Strategy, StrategyRouter};
    ///
    /// let router = StrategyRouter::new();
    /// let opts = ChunkingOptions::default();
    /// let routed = router
    ///     .split_deterministic("para1\n\npara2\n\npara3", Strategy::Paragraph, 500, &opts)
    ///     .unwrap();
    /// assert_eq!(routed.spans.len(), 3);
    ///
    /// assert!(router.split_deterministic("x", Strategy::Semantic, 500, &opts).is_none());
    /// ```
    pub fn split_deterministic(
        &self,
        text: &str,
        strategy: Strategy,
        size: usize,
        opts: &ChunkingOptions,
    ) -> Option<Routed> {
        let budget = opts.budget().with_max(size);
        let heur = opts.heuristics;
        let char_scale = match opts.size_unit {
            SizeUnit::Chars => 1,
            SizeUnit::Tokens => heur.chars_per_token.max(1),
        };

        let spans = match strategy {
            Strategy::FixedSize => {
                FixedChunker::new(
                    size.saturating_mul(char_scale),
                    opts.overlap.saturating_mul(char_scale),
                )
                .chunk(text)
            }
            Strategy::Token => {
                let scale = heur.chars_per_token.max(1);
                FixedChunker::new(size.saturating_mul(scale), opts.overlap.saturating_mul(scale))
                    .chunk(text)
            }
            Strategy::Sentence => SentenceChunker::new(budget).chunk(text),
            Strategy::Paragraph => ParagraphChunker.chunk(text),
            Strategy::Recursive => {
                let separators = if opts.separators.is_empty() {
                    DEFAULT_SEPARATORS.iter().map(|&s| Separator::from(s)).collect()
                } else {
                    opts.separators.iter().map(|s| Separator::literal(s.as_str())).collect()
                };
                RecursiveChunker::with_budget(budget, separators)
                    .with_overlap(opts.overlap)
                    .chunk(text)
            }
            Strategy::Document => DocumentChunker.chunk(text),
            Strategy::Metadata => MetadataChunker.chunk(text),
            Strategy::Code => CodeChunker::new(budget).chunk(text),
            Strategy::Regex => {
                let chunker = RegexChunker::new(opts.regex_pattern.as_deref().unwrap_or(DEFAULT_PATTERN));
                if let Some(err) = chunker.compile_error() {
                    return Some(Routed::whole(
                        text,
                        ChunkWarning::InvalidPattern {
                            pattern: chunker.pattern().to_string(),
                            message: err.to_string(),
                        },
                    ));
                }
                chunker.chunk(text)
            }
            Strategy::SlidingWindow => SlidingWindowChunker::new(
                size.saturating_mul(char_scale),
                opts.overlap.saturating_mul(char_scale),
                heur.chars_per_word,
            )
            .chunk(text),
            Strategy::ContentAware => ContentAwareChunker.chunk(text),
            Strategy::Hybrid => HybridChunker::new(budget).chunk(text),
            Strategy::Semantic | Strategy::Linguistic | Strategy::Llm => return None,
        };

        tracing::debug!(%strategy, spans = spans.len(), "strategy produced spans");
        Some(Routed {
            spans,
            warnings: Vec::new(),
        })
    }

    /// Run any strategy with maximum size `size`.
    ///
    /// AI strategies await the configured splitter. The only error is a
    /// missing splitter; every other failure is recovered.
    pub async fn split(
        &self,
        text: &str,
        strategy: Strategy,
        size: usize,
        opts: &ChunkingOptions,
    ) -> Result<Routed> {
        if let Some(routed) = self.split_deterministic(text, strategy, size, opts) {
            return Ok(routed);
        }

        let splitter = self
            .splitter
            .as_ref()
            .ok_or(Error::SplitterUnavailable(strategy))?;

        let answer = splitter
            .split(
                text,
                strategy,
                opts.model_id.as_deref(),
                opts.custom_prompt.as_deref(),
            )
            .await;

        let routed = match answer {
            Ok(pieces) => {
                let spans = anchor_spans(text, pieces);
                if spans.is_empty() {
                    Routed::whole(
                        text,
                        ChunkWarning::ExternalFallback {
                            strategy,
                            message: "splitter returned no spans".into(),
                        },
                    )
                } else {
                    Routed {
                        spans,
                        warnings: Vec::new(),
                    }
                }
            }
            Err(err) => Routed::whole(
                text,
                ChunkWarning::ExternalFallback {
                    strategy,
                    message: err.to_string(),
                },
            ),
        };

        tracing::debug!(%strategy, spans = routed.spans.len(), "AI splitter produced spans");
        Ok(routed)
    }
}

/// Locate externally produced pieces in `source`, in order.
///
/// Each trimmed piece is searched for from the end of the previous match.
/// A piece that cannot be found (the splitter rewrote it) keeps its text
/// with an empty range at the search position.
fn anchor_spans(source: &str, pieces: Vec<String>) -> Vec<Slab> {
    let mut cursor = 0;
    let mut spans = Vec::with_capacity(pieces.len());

    for piece in &pieces {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        let index = spans.len();
        match source[cursor..].find(piece) {
            Some(pos) => {
                let start = cursor + pos;
                cursor = start + piece.len();
                spans.push(Slab::new(piece, start, cursor, index));
            }
            None => spans.push(Slab::new(piece, cursor, cursor, index)),
        }
    }

    spans
}
