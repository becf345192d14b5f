//! Embedding and enrichment fan-out.
//!
//! Both stages call external services and both return a new collection,
//! leaving the input as the unannotated base.
//!
//! Enrichment is capped: only the first [`EnrichmentLimits::max_chunks`]
//! retrievable chunks are sent, with at most
//! [`EnrichmentLimits::concurrency`] calls in flight. A failed call leaves
//! its chunk unannotated; the rest of the batch carries on.

use std::collections::HashMap;

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};

use crate::chunk::{Chunk, Enrichment};
use crate::error::{ChunkWarning, Error, Result};
use crate::external::{Embedder, Enricher};

/// Which annotations to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentOptions {
    /// One-sentence summary.
    pub summarize: bool,
    /// Question/answer pairs.
    pub qa: bool,
    /// Topic labels.
    pub label: bool,
    /// Standalone (hallucination-risk) score.
    pub standalone_check: bool,
}

impl EnrichmentOptions {
    /// Every annotation.
    #[must_use]
    pub fn all() -> Self {
        Self {
            summarize: true,
            qa: true,
            label: true,
            standalone_check: true,
        }
    }

    /// Whether any annotation is requested.
    #[must_use]
    pub fn any(&self) -> bool {
        self.summarize || self.qa || self.label || self.standalone_check
    }
}

/// Caps on an enrichment batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentLimits {
    /// Chunks enriched per batch, in input order.
    pub max_chunks: usize,
    /// Calls in flight at once.
    pub concurrency: usize,
}

impl Default for EnrichmentLimits {
    fn default() -> Self {
        Self {
            max_chunks: 10,
            concurrency: 4,
        }
    }
}

/// Result of [`enrich_chunks`].
#[derive(Debug, Clone)]
pub struct EnrichmentRun {
    /// Every input chunk, annotated where enrichment succeeded.
    pub chunks: Vec<Chunk>,
    /// One entry per failed call.
    pub warnings: Vec<ChunkWarning>,
}

/// Annotate up to `limits.max_chunks` non-parent chunks.
///
/// Does nothing when `options` requests no annotation.
pub async fn enrich_chunks(
    chunks: &[Chunk],
    enricher: &dyn Enricher,
    model_id: Option<&str>,
    options: &EnrichmentOptions,
    limits: EnrichmentLimits,
) -> EnrichmentRun {
    if !options.any() {
        return EnrichmentRun {
            chunks: chunks.to_vec(),
            warnings: Vec::new(),
        };
    }

    let targets: Vec<&Chunk> = chunks
        .iter()
        .filter(|c| !c.is_parent())
        .take(limits.max_chunks)
        .collect();

    let results: Vec<(String, Result<Enrichment>)> = stream::iter(targets)
        .map(|chunk| async move {
            let result = enricher.enrich(chunk, model_id, options).await;
            (chunk.id().to_string(), result)
        })
        .buffer_unordered(limits.concurrency.max(1))
        .collect()
        .await;

    let mut annotations: HashMap<String, Enrichment> = HashMap::with_capacity(results.len());
    let mut warnings = Vec::new();
    for (chunk_id, result) in results {
        match result {
            Ok(enrichment) => {
                annotations.insert(chunk_id, enrichment);
            }
            Err(err) => {
                tracing::warn!(%chunk_id, error = %err, "enrichment failed");
                warnings.push(ChunkWarning::EnrichmentFailed {
                    chunk_id,
                    message: err.to_string(),
                });
            }
        }
    }
    // Completion order is arbitrary; report failures in input order.
    let position: HashMap<&str, usize> = chunks.iter().enumerate().map(|(i, c)| (c.id(), i)).collect();
    warnings.sort_by_key(|w| match w {
        ChunkWarning::EnrichmentFailed { chunk_id, .. } => position.get(chunk_id.as_str()).copied(),
        _ => None,
    });

    let enriched = annotations.len();
    let chunks = chunks
        .iter()
        .map(|chunk| {
            let mut chunk = chunk.clone();
            if let Some(enrichment) = annotations.remove(chunk.id()) {
                chunk.enrichment = Some(enrichment);
            }
            chunk
        })
        .collect();

    tracing::debug!(enriched, failed = warnings.len(), "enrichment complete");
    EnrichmentRun { chunks, warnings }
}

/// Embed every non-parent chunk in one batch.
///
/// Returns new chunks with `retrieval.embedding` set; parents pass through
/// untouched. Fails if the embedder fails or returns the wrong number of
/// vectors.
pub async fn embed_chunks(chunks: &[Chunk], embedder: &dyn Embedder) -> Result<Vec<Chunk>> {
    let texts: Vec<&str> = chunks
        .iter()
        .filter(|c| !c.is_parent())
        .map(Chunk::content)
        .collect();
    if texts.is_empty() {
        return Ok(chunks.to_vec());
    }

    let vectors = embedder.embed(&texts).await?;
    if vectors.len() != texts.len() {
        return Err(Error::Embedding {
            expected: texts.len(),
            actual: vectors.len(),
        });
    }

    let mut vectors = vectors.into_iter();
    let out = chunks
        .iter()
        .map(|chunk| {
            let mut chunk = chunk.clone();
            if !chunk.is_parent() {
                let mut retrieval = chunk.retrieval.take().unwrap_or_default();
                retrieval.embedding = vectors.next();
                chunk.retrieval = Some(retrieval);
            }
            chunk
        })
        .collect();

    tracing::debug!(embedded = texts.len(), "embedded chunks");
    Ok(out)
}
