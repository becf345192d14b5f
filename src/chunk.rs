//! Chunk records: the output of a chunking run.
//!
//! A [`Slab`](crate::Slab) is a raw span; a [`Chunk`] is what callers keep.
//! It carries a stable id, derived size counts, a kind tag for parent/child
//! hierarchies, extracted keywords, and optional retrieval and enrichment
//! data attached by later stages.
//!
//! Chunks are snapshots. Later stages (embedding, enrichment, ranking)
//! return new collections instead of mutating the one they were given.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tokens::TokenEstimator;

/// Number of keywords kept per chunk.
pub const KEYWORD_LIMIT: usize = 5;

const STOPWORDS: &[&str] = &[
    "the", "is", "at", "of", "on", "and", "a", "an", "in", "to", "for", "with", "it", "this",
    "that", "as", "by", "are", "was",
];

/// Position of a chunk in a parent/child hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkKind {
    /// A chunk from a flat (non-hierarchical) run.
    #[default]
    Standalone,
    /// A coarse context chunk. Not counted in stats or ranked by default.
    Parent,
    /// A fine chunk inside a parent.
    Child,
}

impl ChunkKind {
    fn id_prefix(self) -> &'static str {
        match self {
            Self::Standalone => "chunk",
            Self::Parent => "parent",
            Self::Child => "child",
        }
    }
}

/// Retrieval-simulation data attached to a chunk.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RetrievalStats {
    /// The chunk's embedding, owned by the retrieval pipeline.
    pub embedding: Option<Vec<f32>>,
    /// Cosine similarity with the query embedding.
    pub vector_score: Option<f32>,
    /// Keyword overlap with the query text.
    pub keyword_score: Option<f32>,
    /// Blended score used for ranking.
    pub hybrid_score: Option<f32>,
    /// 1-based rank after sorting.
    pub rank: Option<usize>,
    /// The query was expanded (e.g. HyDE) before embedding.
    pub hyde_generated: bool,
}

/// A generated question with its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    /// The question.
    pub question: String,
    /// The answer.
    pub answer: String,
}

/// Annotations produced by an external [`Enricher`](crate::Enricher).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Enrichment {
    /// One-sentence summary.
    pub summary: Option<String>,
    /// Questions this chunk answers.
    pub qa_pairs: Vec<QaPair>,
    /// Topic labels.
    pub labels: Vec<String>,
    /// How well the chunk stands alone, 0-10 (10 = fully self-contained).
    pub standalone_score: Option<u8>,
    /// Why it got that score.
    pub standalone_reason: Option<String>,
}

/// A chunk of text produced by a chunking run.
///
/// ```rust
/// use chunklab::{Chunk, ChunkKind, TokenEstimator};
///
/// let est = TokenEstimator::default();
/// let parent = Chunk::parent("Retrieval needs context. Chunks give it.", &est);
/// let child = Chunk::child("Chunks give it.", &parent, &est);
///
/// assert_eq!(child.kind(), ChunkKind::Child);
/// assert_eq!(child.parent_id(), Some(parent.id()));
/// assert_eq!(child.char_count(), 15);
/// assert_eq!(child.token_count(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    id: String,
    content: String,
    char_count: usize,
    token_count: usize,
    kind: ChunkKind,
    parent_id: Option<String>,
    keywords: Vec<String>,
    start: Option<usize>,
    end: Option<usize>,
    /// Free-form metadata.
    pub metadata: BTreeMap<String, String>,
    /// Retrieval data, if the chunk has been embedded or scored.
    pub retrieval: Option<RetrievalStats>,
    /// Enrichment annotations, if any.
    pub enrichment: Option<Enrichment>,
    /// A user's 1-5 relevance rating.
    pub user_relevance: Option<u8>,
}

impl Chunk {
    fn build(
        content: String,
        kind: ChunkKind,
        parent_id: Option<String>,
        estimator: &TokenEstimator,
    ) -> Self {
        let mut chunk = Self {
            id: format!("{}-{}", kind.id_prefix(), Uuid::new_v4()),
            content: String::new(),
            char_count: 0,
            token_count: 0,
            kind,
            parent_id,
            keywords: Vec::new(),
            start: None,
            end: None,
            metadata: BTreeMap::new(),
            retrieval: None,
            enrichment: None,
            user_relevance: None,
        };
        chunk.set_content(content, estimator);
        chunk
    }

    /// A chunk from a flat run.
    ///
    /// `content` must contain non-whitespace text. The pipeline drops blank
    /// spans before building chunks; callers constructing chunks directly
    /// must do the same. Checked in debug builds.
    pub fn standalone(content: impl Into<String>, estimator: &TokenEstimator) -> Self {
        Self::build(content.into(), ChunkKind::Standalone, None, estimator)
    }

    /// A parent (context) chunk. Same content precondition as
    /// [`Chunk::standalone`].
    pub fn parent(content: impl Into<String>, estimator: &TokenEstimator) -> Self {
        Self::build(content.into(), ChunkKind::Parent, None, estimator)
    }

    /// A child chunk linked to `parent`. Same content precondition as
    /// [`Chunk::standalone`].
    pub fn child(content: impl Into<String>, parent: &Chunk, estimator: &TokenEstimator) -> Self {
        Self::build(
            content.into(),
            ChunkKind::Child,
            Some(parent.id.clone()),
            estimator,
        )
    }

    /// Record the byte range of this chunk in its source text.
    #[must_use]
    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Replace the content, recomputing every derived field.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>, estimator: &TokenEstimator) -> Self {
        self.set_content(content.into(), estimator);
        self.start = None;
        self.end = None;
        self
    }

    fn set_content(&mut self, content: String, estimator: &TokenEstimator) {
        debug_assert!(!content.trim().is_empty(), "chunk content must not be blank");
        self.char_count = content.chars().count();
        self.token_count = estimator.estimate(&content);
        self.keywords = extract_keywords(&content);
        self.content = content;
    }

    /// Unique id, stable for the chunk's lifetime.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The chunk text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Length in characters.
    pub fn char_count(&self) -> usize {
        self.char_count
    }

    /// Estimated token count.
    pub fn token_count(&self) -> usize {
        self.token_count
    }

    /// Hierarchy position.
    pub fn kind(&self) -> ChunkKind {
        self.kind
    }

    /// Whether this is a parent chunk.
    pub fn is_parent(&self) -> bool {
        self.kind == ChunkKind::Parent
    }

    /// Owning parent's id; set iff this is a child.
    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    /// Top keywords by frequency.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Byte range in the source text, when known.
    pub fn span(&self) -> Option<std::ops::Range<usize>> {
        Some(self.start?..self.end?)
    }

    /// The chunk's embedding, if one has been attached.
    pub fn embedding(&self) -> Option<&[f32]> {
        self.retrieval.as_ref()?.embedding.as_deref()
    }
}

fn keyword_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\w{4,}\b").expect("keyword pattern is valid"))
}

/// Most frequent words of four or more characters, stopwords excluded.
///
/// Ties keep first-occurrence order.
///
/// ```rust
/// use chunklab::extract_keywords;
///
/// let kws = extract_keywords("Rust rust borrow checker. The borrow rules, rust!");
/// assert_eq!(kws, vec!["rust", "borrow", "checker", "rules"]);
/// ```
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut order: Vec<(&str, usize)> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();

    for m in keyword_token().find_iter(&lower) {
        let word = m.as_str();
        if STOPWORDS.contains(&word) {
            continue;
        }
        match slot.get(word) {
            Some(&i) => order[i].1 += 1,
            None => {
                slot.insert(word, order.len());
                order.push((word, 1));
            }
        }
    }

    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
        .into_iter()
        .take(KEYWORD_LIMIT)
        .map(|(w, _)| w.to_string())
        .collect()
}
