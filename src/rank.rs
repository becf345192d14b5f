//! Hybrid retrieval scoring.
//!
//! Scores each chunk against a query on two signals and blends them:
//!
//! ```text
//! vector  = cosine(query_embedding, chunk.embedding)      (0 if not embedded)
//! keyword = min(1, Σ_terms (1 + ln count) / n_terms)       (whole-word, case-folded)
//! hybrid  = alpha * vector + (1 - alpha) * keyword         (+ rerank adjustment)
//! ```
//!
//! `alpha = 1` is pure vector search, `alpha = 0` pure keyword search.
//!
//! ## Rerank adjustment
//!
//! A stand-in for a cross-encoder pass: chunks containing the whole query
//! verbatim get a bonus, chunks under a minimum length get a penalty.
//!
//! ## Ordering
//!
//! Descending hybrid score. Equal scores keep input order. Ranks are
//! 1-based. The scorer ignores chunk kinds; [`rank_retrievable`] is the
//! variant that leaves parents out.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::chunk::{Chunk, RetrievalStats};

/// Default vector weight.
pub const DEFAULT_ALPHA: f32 = 0.7;

/// Query terms must be longer than this many characters.
pub const MIN_TERM_CHARS: usize = 2;

/// Knobs for [`rank_for_query`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingOptions {
    /// Vector weight in `[0, 1]`.
    pub alpha: f32,
    /// Apply the rerank adjustment.
    pub rerank: bool,
    /// Added when the chunk contains the whole query.
    pub rerank_bonus: f32,
    /// Subtracted when the chunk is shorter than `short_threshold`.
    pub short_penalty: f32,
    /// Length in characters below which a chunk is penalised.
    pub short_threshold: usize,
    /// The query embedding came from an expanded (HyDE) query.
    pub hyde_generated: bool,
}

impl Default for RankingOptions {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            rerank: false,
            rerank_bonus: 0.1,
            short_penalty: 0.05,
            short_threshold: 50,
            hyde_generated: false,
        }
    }
}

impl RankingOptions {
    /// Set the vector weight, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = clamp_alpha(alpha);
        self
    }

    /// Turn the rerank adjustment on or off.
    #[must_use]
    pub fn with_rerank(mut self, rerank: bool) -> Self {
        self.rerank = rerank;
        self
    }

    /// Record that the query embedding came from an expanded query.
    #[must_use]
    pub fn with_hyde(mut self, hyde_generated: bool) -> Self {
        self.hyde_generated = hyde_generated;
        self
    }
}

fn clamp_alpha(alpha: f32) -> f32 {
    if alpha.is_nan() {
        DEFAULT_ALPHA
    } else {
        alpha.clamp(0.0, 1.0)
    }
}

/// Cosine similarity. Returns 0 for empty, mismatched or zero vectors, and
/// when a non-finite component makes the result non-finite.
///
/// ```rust
/// use chunklab::cosine_similarity;
///
/// assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
/// assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
/// ```
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let sim = dot / (norm_a * norm_b);
    if sim.is_finite() {
        sim
    } else {
        0.0
    }
}

/// A query compiled for keyword scoring.
///
/// Terms are the whitespace-separated words of the lower-cased query with
/// edge punctuation removed, kept when longer than [`MIN_TERM_CHARS`].
/// Repeated terms count once per occurrence in the query.
#[derive(Debug, Clone)]
pub struct KeywordQuery {
    matchers: Vec<Regex>,
    term_count: usize,
}

impl KeywordQuery {
    /// Compile `query`.
    pub fn new(query: &str) -> Self {
        let lower = query.to_lowercase();
        let terms: Vec<&str> = lower
            .split_whitespace()
            .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|t| t.chars().count() > MIN_TERM_CHARS)
            .collect();

        let matchers = terms
            .iter()
            .filter_map(|t| Regex::new(&format!(r"\b{}\b", regex::escape(t))).ok())
            .collect();

        Self {
            matchers,
            term_count: terms.len(),
        }
    }

    /// Number of valid terms.
    pub fn term_count(&self) -> usize {
        self.term_count
    }

    /// Whether the query has no valid terms.
    pub fn is_empty(&self) -> bool {
        self.term_count == 0
    }

    /// Keyword score of `content` in `[0, 1]`.
    pub fn score(&self, content: &str) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let lower = content.to_lowercase();
        let matched: f32 = self
            .matchers
            .iter()
            .map(|re| re.find_iter(&lower).count())
            .filter(|&count| count > 0)
            .map(|count| 1.0 + (count as f32).ln())
            .sum();
        (matched / self.term_count as f32).clamp(0.0, 1.0)
    }
}

/// Keyword score of `content` for `query`.
///
/// ```rust
/// use chunklab::keyword_score;
///
/// assert_eq!(keyword_score("rust borrow", "Rust has a borrow checker"), 1.0);
/// assert_eq!(keyword_score("a to", "a to b"), 0.0);
/// ```
pub fn keyword_score(query: &str, content: &str) -> f32 {
    KeywordQuery::new(query).score(content)
}

/// `alpha * vector + (1 - alpha) * keyword`, with alpha clamped to `[0, 1]`.
pub fn hybrid_score(vector: f32, keyword: f32, alpha: f32) -> f32 {
    let alpha = clamp_alpha(alpha);
    alpha * vector + (1.0 - alpha) * keyword
}

/// Score and rank `chunks` against a query.
///
/// Returns new chunks sorted by descending hybrid score with 1-based ranks;
/// the input is left untouched. Embeddings already on the chunks are kept.
/// `query` is the user's original text; `query_embedding` may come from an
/// expanded query.
pub fn rank_for_query(
    chunks: &[Chunk],
    query_embedding: &[f32],
    query: &str,
    options: &RankingOptions,
) -> Vec<Chunk> {
    let keywords = KeywordQuery::new(query);
    let phrase = query.to_lowercase();
    let has_phrase = !phrase.trim().is_empty();
    let alpha = clamp_alpha(options.alpha);

    let mut scored: Vec<Chunk> = chunks
        .iter()
        .map(|chunk| {
            let vector = chunk
                .embedding()
                .map_or(0.0, |e| cosine_similarity(query_embedding, e));
            let keyword = keywords.score(chunk.content());
            let mut hybrid = hybrid_score(vector, keyword, alpha);

            if options.rerank {
                if has_phrase && chunk.content().to_lowercase().contains(&phrase) {
                    hybrid += options.rerank_bonus;
                }
                if chunk.char_count() < options.short_threshold {
                    hybrid -= options.short_penalty;
                }
            }

            let mut chunk = chunk.clone();
            let previous = chunk.retrieval.take().unwrap_or_default();
            chunk.retrieval = Some(RetrievalStats {
                vector_score: Some(vector),
                keyword_score: Some(keyword),
                hybrid_score: Some(hybrid),
                rank: None,
                hyde_generated: options.hyde_generated,
                ..previous
            });
            chunk
        })
        .collect();

    scored.sort_by(|a, b| hybrid_of(b).total_cmp(&hybrid_of(a)));

    for (i, chunk) in scored.iter_mut().enumerate() {
        if let Some(retrieval) = chunk.retrieval.as_mut() {
            retrieval.rank = Some(i + 1);
        }
    }

    tracing::debug!(chunks = scored.len(), terms = keywords.term_count(), alpha, "ranked chunks");
    scored
}

/// Rank only non-parent chunks; parents come first, unscored, in input order.
pub fn rank_retrievable(
    chunks: &[Chunk],
    query_embedding: &[f32],
    query: &str,
    options: &RankingOptions,
) -> Vec<Chunk> {
    let (parents, retrievable): (Vec<Chunk>, Vec<Chunk>) =
        chunks.iter().cloned().partition(Chunk::is_parent);
    let mut out = parents;
    out.extend(rank_for_query(&retrievable, query_embedding, query, options));
    out
}

fn hybrid_of(chunk: &Chunk) -> f32 {
    chunk
        .retrieval
        .as_ref()
        .and_then(|r| r.hybrid_score)
        .unwrap_or(0.0)
}
