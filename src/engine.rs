//! The chunking pipeline.
//!
//! ```text
//! text ──> resolve options ──> StrategyRouter ──> SmallChunkMerger ──> Chunk records
//!                                   │                                      │
//!                         (hierarchical: once per parent)             ChunkStats
//! ```
//!
//! [`ChunkingEngine::chunk`] is the single entry point. It only fails when
//! an AI strategy is selected and no [`AiSplitter`] was supplied; every
//! other problem is recovered and reported in [`ChunkRun::warnings`].

use std::sync::Arc;
use std::time::Instant;

use crate::chunk::Chunk;
use crate::error::{ChunkWarning, Result};
use crate::external::AiSplitter;
use crate::hierarchy::{place, HierarchicalChunker, DEFAULT_PARENT_CONCURRENCY};
use crate::merge::SmallChunkMerger;
use crate::options::ChunkingOptions;
use crate::router::{Routed, StrategyRouter};
use crate::stats::ChunkStats;
use crate::strategy::Strategy;

/// Result of one chunking run.
#[derive(Debug, Clone)]
pub struct ChunkRun {
    /// Chunks in source order. In hierarchical mode each parent is
    /// followed by its children.
    pub chunks: Vec<Chunk>,
    /// Recovered problems, in the order they happened.
    pub warnings: Vec<ChunkWarning>,
    /// Statistics over the retrievable (non-parent) chunks.
    pub stats: ChunkStats,
}

impl ChunkRun {
    /// Chunks that take part in retrieval (everything but parents).
    pub fn retrievable(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter().filter(|c| !c.is_parent())
    }
}

/// Runs the full chunking pipeline.
///
/// ```rust
/// use chunklab::{ChunkingEngine, ChunkingOptions, Strategy};
///
/// let engine = ChunkingEngine::new();
/// let opts = ChunkingOptions::default().with_strategy(Strategy::Paragraph);
/// let run = futures::executor::block_on(engine.chunk("para1\n\npara2\n\npara3", &opts)).unwrap();
///
/// let texts: Vec<&str> = run.chunks.iter().map(|c| c.content()).collect();
/// assert_eq!(texts, vec!["para1", "para2", "para3"]);
/// assert_eq!(run.stats.total_chunks, 3);
/// ```
#[derive(Debug, Clone)]
pub struct ChunkingEngine {
    router: StrategyRouter,
    parent_concurrency: usize,
}

impl Default for ChunkingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkingEngine {
    /// An engine for deterministic strategies only.
    #[must_use]
    pub fn new() -> Self {
        Self {
            router: StrategyRouter::new(),
            parent_concurrency: DEFAULT_PARENT_CONCURRENCY,
        }
    }

    /// Attach the AI splitter used by semantic, linguistic and LLM strategies.
    #[must_use]
    pub fn with_splitter(mut self, splitter: Arc<dyn AiSplitter>) -> Self {
        self.router = self.router.with_splitter(splitter);
        self
    }

    /// Limit concurrent child passes in hierarchical mode.
    #[must_use]
    pub fn with_parent_concurrency(mut self, concurrency: usize) -> Self {
        self.parent_concurrency = concurrency.max(1);
        self
    }

    /// The router this engine dispatches through.
    pub fn router(&self) -> &StrategyRouter {
        &self.router
    }

    /// Chunk `text` with `options`.
    ///
    /// Options are clamped first (see [`ChunkingOptions::resolve`]).
    /// Whitespace-only input produces no chunks.
    pub async fn chunk(&self, text: &str, options: &ChunkingOptions) -> Result<ChunkRun> {
        let started = Instant::now();
        let (options, mut warnings) = options.clone().resolve();

        let chunks = if text.trim().is_empty() {
            Vec::new()
        } else if options.is_hierarchical() {
            let hierarchy = HierarchicalChunker::new(self.router.clone())
                .with_concurrency(self.parent_concurrency)
                .split(text, &options)
                .await?;
            warnings.extend(hierarchy.warnings.iter().cloned());
            hierarchy.into_chunks()
        } else {
            let estimator = options.estimator();
            let pass = run_pass(&self.router, text, options.strategy, options.chunk_size, &options).await?;
            warnings.extend(pass.warnings);
            pass.spans
                .iter()
                .map(|slab| place(Chunk::standalone(slab.text.as_str(), &estimator), slab, text, Some(0)))
                .collect()
        };

        let stats = ChunkStats::from_chunks(&chunks, started.elapsed());
        tracing::info!(
            strategy = %options.strategy,
            chunks = chunks.len(),
            warnings = warnings.len(),
            elapsed_ms = stats.processing_time.as_millis() as u64,
            "chunking complete"
        );

        Ok(ChunkRun {
            chunks,
            warnings,
            stats,
        })
    }
}

/// One pipeline pass: route, then merge undersized spans.
pub(crate) async fn run_pass(
    router: &StrategyRouter,
    text: &str,
    strategy: Strategy,
    size: usize,
    options: &ChunkingOptions,
) -> Result<Routed> {
    let mut routed = router.split(text, strategy, size, options).await?;
    routed.spans.retain(|s| !s.is_blank());

    if options.min_chunk_size > 0 {
        let merger = SmallChunkMerger::new(
            options.budget().with_max(options.min_chunk_size),
            options.merge_separator.as_str(),
        );
        routed.spans = merger.merge(text, routed.spans);
    }

    Ok(routed)
}
