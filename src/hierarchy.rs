//! Parent/child chunking.
//!
//! Small chunks retrieve well; large chunks read well. A hierarchy gets
//! both: retrieve on the children, hand the parent to the model.
//!
//! ```text
//! pass 1 (size = parent_chunk_size):
//!   [ parent 0                ] [ parent 1           ]
//! pass 2 (size = chunk_size), once per parent:
//!   [c0.0] [c0.1] [c0.2]        [c1.0] [c1.1]
//! ```
//!
//! The parent pass never calls the AI splitter: an AI strategy is replaced
//! by [`Strategy::Recursive`] at the parent level. Children use the strategy
//! that was asked for.
//!
//! Parents do not share state, so the child passes run concurrently up to a
//! fixed limit. Output order is always parent order.

use futures::stream::{self, StreamExt};

use crate::chunk::Chunk;
use crate::engine::run_pass;
use crate::error::{ChunkWarning, Result};
use crate::options::ChunkingOptions;
use crate::router::StrategyRouter;
use crate::strategy::Strategy;
use crate::Slab;

/// Parent size used when hierarchical mode is on but no size was given.
pub const DEFAULT_PARENT_CHUNK_SIZE: usize = 1500;

/// Child passes in flight at once.
pub const DEFAULT_PARENT_CONCURRENCY: usize = 4;

/// A parent and the children cut from it.
#[derive(Debug, Clone)]
pub struct Family {
    /// The context chunk.
    pub parent: Chunk,
    /// Retrieval chunks inside `parent`, in order.
    pub children: Vec<Chunk>,
}

/// Output of a hierarchical run.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    /// Families in source order.
    pub families: Vec<Family>,
    /// Recovered problems from every pass.
    pub warnings: Vec<ChunkWarning>,
}

impl Hierarchy {
    /// All parents.
    pub fn parents(&self) -> impl Iterator<Item = &Chunk> {
        self.families.iter().map(|f| &f.parent)
    }

    /// All children, across parents.
    pub fn children(&self) -> impl Iterator<Item = &Chunk> {
        self.families.iter().flat_map(|f| f.children.iter())
    }

    /// Flatten into one collection: each parent followed by its children.
    pub fn into_chunks(self) -> Vec<Chunk> {
        let mut out = Vec::new();
        for family in self.families {
            out.push(family.parent);
            out.extend(family.children);
        }
        out
    }
}

/// Two-pass parent/child chunker.
#[derive(Debug, Clone)]
pub struct HierarchicalChunker {
    router: StrategyRouter,
    concurrency: usize,
}

impl HierarchicalChunker {
    /// Create a chunker that routes through `router`.
    #[must_use]
    pub fn new(router: StrategyRouter) -> Self {
        Self {
            router,
            concurrency: DEFAULT_PARENT_CONCURRENCY,
        }
    }

    /// Set how many child passes may run at once (at least 1).
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Split `text` into parents, then each parent into children.
    ///
    /// `options` should already be resolved; the parent size defaults to
    /// [`DEFAULT_PARENT_CHUNK_SIZE`] and is never below the chunk size.
    pub async fn split(&self, text: &str, options: &ChunkingOptions) -> Result<Hierarchy> {
        let estimator = options.estimator();
        let parent_size = options
            .parent_chunk_size
            .unwrap_or(DEFAULT_PARENT_CHUNK_SIZE)
            .max(options.chunk_size);

        let parent_strategy = if options.strategy.requires_ai() {
            tracing::debug!(strategy = %options.strategy, "parent pass uses recursive strategy");
            Strategy::Recursive
        } else {
            options.strategy
        };

        let parent_pass = run_pass(&self.router, text, parent_strategy, parent_size, options).await?;
        let mut warnings = parent_pass.warnings;

        let parents: Vec<Chunk> = parent_pass
            .spans
            .iter()
            .map(|slab| place(Chunk::parent(slab.text.as_str(), &estimator), slab, text, Some(0)))
            .collect();

        let child_passes: Vec<_> = stream::iter(parents.iter().map(|parent| {
            run_pass(
                &self.router,
                parent.content(),
                options.strategy,
                options.chunk_size,
                options,
            )
        }))
        .buffered(self.concurrency)
        .collect()
        .await;

        let mut families = Vec::with_capacity(parents.len());
        for (parent, pass) in parents.into_iter().zip(child_passes) {
            let pass = pass?;
            warnings.extend(pass.warnings);
            let base = parent.span().map(|r| r.start);
            let children = pass
                .spans
                .iter()
                .map(|slab| {
                    place(
                        Chunk::child(slab.text.as_str(), &parent, &estimator),
                        slab,
                        parent.content(),
                        base,
                    )
                })
                .collect();
            families.push(Family { parent, children });
        }

        tracing::debug!(
            parents = families.len(),
            children = families.iter().map(|f| f.children.len()).sum::<usize>(),
            "hierarchical split complete"
        );

        Ok(Hierarchy { families, warnings })
    }
}

/// Attach a source span to `chunk` when `slab` is a verbatim slice of
/// `source` and `source` itself starts at `base` in the original text.
pub(crate) fn place(chunk: Chunk, slab: &Slab, source: &str, base: Option<usize>) -> Chunk {
    match base {
        Some(base) if slab.is_anchored(source) => {
            chunk.with_span(base + slab.start, base + slab.end)
        }
        _ => chunk,
    }
}
