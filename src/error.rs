//! Error types for chunklab.
//!
//! Most problems in the chunking pipeline are recovered locally and reported
//! as [`ChunkWarning`]s on the run result. Only the cases with no safe
//! default surface as [`Error`].

use crate::strategy::Strategy;

/// Errors that can occur during chunking or retrieval.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Size/overlap/minimum combination is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A user-supplied regular expression failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// An external collaborator (AI splitter, embedder, enricher) failed.
    #[error("{service} failed: {message}")]
    ExternalService {
        /// Which collaborator failed.
        service: &'static str,
        /// The collaborator's error message.
        message: String,
    },

    /// An AI strategy was selected but no splitter was configured.
    #[error("strategy '{0}' requires an AI splitter, but none is configured")]
    SplitterUnavailable(Strategy),

    /// The embedder returned a different number of vectors than inputs.
    #[error("embedder returned {actual} vectors for {expected} inputs")]
    Embedding {
        /// Number of texts sent.
        expected: usize,
        /// Number of vectors received.
        actual: usize,
    },
}

impl Error {
    /// Build an [`Error::ExternalService`] from any displayable cause.
    pub fn external(service: &'static str, cause: impl std::fmt::Display) -> Self {
        Self::ExternalService {
            service,
            message: cause.to_string(),
        }
    }
}

/// Result type for chunklab operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A recovered problem, reported alongside a successful result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkWarning {
    /// Options were clamped into a usable range.
    OptionsClamped(String),
    /// The regex strategy's pattern did not compile; the whole text was
    /// returned as one span.
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Compiler message.
        message: String,
    },
    /// The AI splitter failed; the whole text was returned as one span.
    ExternalFallback {
        /// Strategy that was being run.
        strategy: Strategy,
        /// Failure message.
        message: String,
    },
    /// Enrichment failed for one chunk, which was left unannotated.
    EnrichmentFailed {
        /// Id of the chunk left unannotated.
        chunk_id: String,
        /// Failure message.
        message: String,
    },
}

impl std::fmt::Display for ChunkWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OptionsClamped(what) => write!(f, "options clamped: {what}"),
            Self::InvalidPattern { pattern, message } => {
                write!(f, "invalid pattern {pattern:?}, kept text whole: {message}")
            }
            Self::ExternalFallback { strategy, message } => {
                write!(f, "{strategy} splitter failed, kept text whole: {message}")
            }
            Self::EnrichmentFailed { chunk_id, message } => {
                write!(f, "enrichment failed for {chunk_id}: {message}")
            }
        }
    }
}
