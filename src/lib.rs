//! # chunklab
//!
//! Text chunking and hybrid retrieval ranking for RAG experiments.
//!
//! ## Why two halves
//!
//! A retrieval pipeline answers questions from whatever pieces the splitter
//! produced. Change the splitter and the answers change. Comparing splitters
//! therefore needs two things: a way to produce chunks under many
//! strategies with the same options, and a way to score those chunks
//! against a query.
//!
//! - **Chunking**: fifteen interchangeable strategies behind one pipeline,
//!   with small-chunk merging and parent/child hierarchies.
//! - **Ranking**: cosine similarity blended with a keyword score, an
//!   optional rerank adjustment, and stable rank assignment.
//!
//! ## Strategies
//!
//! ### Character windows
//!
//! `fixed-size` and `token` cut at a fixed character stride and ignore
//! structure (`sliding-window` does the same over words):
//!
//! ```text
//! size = 16, overlap = 4
//!
//! "parent chunks carry context"
//!  [0..16]  "parent chunks ca"
//!  [12..27] "s carry context"   <- repeats "s ca"
//! ```
//!
//! Cheap and predictable, and a useful baseline for everything else.
//!
//! ### Recursive (LangChain-style)
//!
//! Try paragraph breaks first; split only the pieces that are still too large
//! on line breaks, then words, then characters.
//!
//! ```text
//! Separators: ["\n\n", "\n", " ", ""]
//!
//! 1. Split on "\n\n", re-pack fragments up to max_size
//! 2. Fragment still > max_size? Split *that fragment* on "\n"
//! 3. Still > max_size? Split on " "
//! 4. "" reached: hard split, stepping by max_size - overlap
//! ```
//!
//! The default strategy.
//!
//! ### Structure-driven
//!
//! Sentence, paragraph, Markdown header, metadata marker, fenced code block,
//! code declaration and regex chunkers each cut on one kind of boundary.
//! See [`Strategy`] and [`STRATEGIES`] for the full catalog.
//!
//! ### AI-driven
//!
//! Semantic, linguistic and LLM strategies call an [`AiSplitter`] supplied
//! by the caller. The crate never talks to a model itself.
//!
//! ## Quick Start
//!
//! Individual chunkers are plain synchronous values:
//!
//! ```rust
//! use chunklab::{Chunker, FixedChunker, RecursiveChunker, SentenceChunker, SizeBudget};
//!
//! let text = "Hybrid ranking blends two scores. \
//!             Alpha weights the vector side.";
//!
//! let slabs = FixedChunker::new(50, 10).chunk(text);
//! let slabs = SentenceChunker::new(SizeBudget::chars(50)).chunk(text);
//! let slabs = RecursiveChunker::new(100, &["\n\n", "\n", ". ", " "]).chunk(text);
//! ```
//!
//! The full pipeline (options, merging, hierarchies, stats) goes through the
//! engine:
//!
//! ```rust
//! use chunklab::{ChunkingEngine, ChunkingOptions, Strategy};
//!
//! let opts = ChunkingOptions::default()
//!     .with_strategy(Strategy::Recursive)
//!     .with_size(40)
//!     .with_overlap(0)
//!     .with_parent_size(120);
//! let text = "First paragraph here.\n\nSecond paragraph here.\n\nThird one.";
//! let run = futures::executor::block_on(ChunkingEngine::new().chunk(text, &opts)).unwrap();
//!
//! assert!(run.chunks[0].is_parent());
//! assert!(run.retrievable().all(|c| c.parent_id().is_some()));
//! ```
//!
//! ## Ranking
//!
//! ```rust
//! use chunklab::{rank_for_query, RankingOptions};
//! # use chunklab::{Chunk, TokenEstimator};
//! # let chunks = vec![Chunk::standalone("borrow checker rules", &TokenEstimator::default())];
//!
//! let ranked = rank_for_query(&chunks, &[], "borrow checker", &RankingOptions::default().with_alpha(0.0));
//! assert_eq!(ranked[0].retrieval.as_ref().unwrap().rank, Some(1));
//! ```
//!
//! ## Cost
//!
//! Deterministic strategies are linear in the input apart from recursive
//! splitting, which revisits oversized fragments once per separator level.
//! AI strategies cost one splitter call per text (per parent in
//! hierarchical mode). Every deterministic strategy works on byte ranges
//! of the input and copies text once, when spans are materialized.

mod capacity;
mod chunk;
mod code;
mod document;
mod engine;
mod enrich;
mod error;
mod external;
mod fenced;
mod fixed;
mod hierarchy;
mod merge;
mod options;
mod paragraph;
mod pattern;
mod rank;
mod recursive;
mod router;
mod sentence;
mod slab;
mod splitter;
mod stats;
mod strategy;
mod tokens;
mod window;

pub use capacity::{SizeBudget, SizeUnit};
pub use chunk::{
    extract_keywords, Chunk, ChunkKind, Enrichment, QaPair, RetrievalStats, KEYWORD_LIMIT,
};
pub use code::{CodeChunker, DECLARATION_PATTERN};
pub use document::{DocumentChunker, MetadataChunker};
pub use engine::{ChunkRun, ChunkingEngine};
pub use enrich::{embed_chunks, enrich_chunks, EnrichmentLimits, EnrichmentOptions, EnrichmentRun};
pub use error::{ChunkWarning, Error, Result};
pub use external::{AiSplitter, Embedder, Enricher};
pub use fenced::ContentAwareChunker;
pub use fixed::FixedChunker;
pub use hierarchy::{
    Family, HierarchicalChunker, Hierarchy, DEFAULT_PARENT_CHUNK_SIZE, DEFAULT_PARENT_CONCURRENCY,
};
pub use merge::SmallChunkMerger;
pub use options::{ChunkingOptions, Heuristics, DEFAULT_CHARS_PER_TOKEN, DEFAULT_CHARS_PER_WORD};
pub use paragraph::{HybridChunker, ParagraphChunker};
pub use pattern::{RegexChunker, DEFAULT_PATTERN};
pub use rank::{
    cosine_similarity, hybrid_score, keyword_score, rank_for_query, rank_retrievable,
    KeywordQuery, RankingOptions, DEFAULT_ALPHA, MIN_TERM_CHARS,
};
pub use recursive::{RecursiveChunker, DEFAULT_SEPARATORS};
pub use router::{Routed, StrategyRouter};
pub use sentence::SentenceChunker;
pub use slab::Slab;
pub use splitter::{Piece, Separator, SeparatorSplitter};
pub use stats::{ChunkStats, SizeBucket, BUCKET_WIDTH};
pub use strategy::{Complexity, Strategy, StrategyDefinition, STRATEGIES};
pub use tokens::{TokenEstimator, DEFAULT_TOKENS_PER_WORD};
pub use window::SlidingWindowChunker;

/// A text chunking strategy.
///
/// All deterministic chunkers implement this trait, enabling polymorphic
/// usage:
///
/// ```rust
/// use chunklab::{Chunker, FixedChunker, ParagraphChunker};
///
/// fn chunk_document(chunker: &dyn Chunker, text: &str) -> Vec<chunklab::Slab> {
///     chunker.chunk(text)
/// }
///
/// let fixed = FixedChunker::new(100, 20);
/// let text = "Hello world.\n\nThis is a test.";
/// let slabs1 = chunk_document(&fixed, text);
/// let slabs2 = chunk_document(&ParagraphChunker, text);
/// assert_eq!(slabs2.len(), 2);
/// ```
pub trait Chunker: Send + Sync {
    /// Split text into chunks.
    ///
    /// Each chunk is a [`Slab`] containing the text and its byte offsets
    /// in the original document.
    fn chunk(&self, text: &str) -> Vec<Slab>;

    /// Estimate the number of chunks for a given text length.
    ///
    /// Useful for pre-allocation. May be approximate.
    fn estimate_chunks(&self, text_len: usize) -> usize {
        // Conservative default
        (text_len / 500).max(1)
    }
}
