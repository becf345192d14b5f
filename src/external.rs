//! Seams for external collaborators.
//!
//! Anything that calls a hosted model lives behind one of these traits and
//! is supplied by the caller. The crate only relies on each trait's
//! contract, never on how an implementation works:
//!
//! - [`AiSplitter`]: returns non-overlapping spans, in order, whose
//!   concatenation approximates the input.
//! - [`Embedder`]: returns exactly one vector per input text, in order.
//! - [`Enricher`]: returns annotations for a single chunk.
//!
//! Credentials, retries and timeouts belong to the implementations.

use async_trait::async_trait;

use crate::chunk::{Chunk, Enrichment};
use crate::enrich::EnrichmentOptions;
use crate::error::Result;
use crate::strategy::Strategy;

/// Splits text with a language model.
#[async_trait]
pub trait AiSplitter: Send + Sync {
    /// Split `text` for an AI strategy (semantic, linguistic or LLM).
    ///
    /// Failures should be reported as
    /// [`Error::ExternalService`](crate::Error::ExternalService).
    async fn split(
        &self,
        text: &str,
        strategy: Strategy,
        model_id: Option<&str>,
        custom_prompt: Option<&str>,
    ) -> Result<Vec<String>>;
}

/// Generates embeddings.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts.
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single query.
    async fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed(&[query]).await?;
        if vectors.len() != 1 {
            return Err(crate::Error::Embedding {
                expected: 1,
                actual: vectors.len(),
            });
        }
        Ok(vectors.remove(0))
    }
}

/// Annotates a chunk (summary, labels, Q&A, standalone score).
#[async_trait]
pub trait Enricher: Send + Sync {
    /// Produce annotations for `chunk`. Only the fields switched on in
    /// `options` are expected to be filled.
    async fn enrich(
        &self,
        chunk: &Chunk,
        model_id: Option<&str>,
        options: &EnrichmentOptions,
    ) -> Result<Enrichment>;
}
