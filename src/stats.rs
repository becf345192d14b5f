//! Run statistics over retrievable chunks.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use crate::chunk::Chunk;

/// Width of a size-distribution bucket, in characters.
pub const BUCKET_WIDTH: usize = 100;

/// Number of chunks whose size falls in one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeBucket {
    /// Inclusive lower bound in characters.
    pub lower: usize,
    /// Label such as `"100-200"`.
    pub range: String,
    /// Chunks in the bucket.
    pub count: usize,
}

/// Summary of a chunking run. Parents are excluded.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ChunkStats {
    /// Number of retrievable chunks.
    pub total_chunks: usize,
    /// Mean size in characters (0 when empty).
    pub avg_size: f64,
    /// Smallest size in characters (0 when empty).
    pub min_size: usize,
    /// Largest size in characters (0 when empty).
    pub max_size: usize,
    /// Sum of estimated tokens.
    pub total_tokens: usize,
    /// Non-empty buckets, smallest first.
    pub size_distribution: Vec<SizeBucket>,
    /// Wall time of the run.
    pub processing_time: Duration,
}

impl ChunkStats {
    /// Compute statistics for `chunks`, skipping parents.
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use chunklab::{Chunk, ChunkStats, TokenEstimator};
    ///
    /// let est = TokenEstimator::default();
    /// let chunks = vec![Chunk::standalone("x".repeat(50), &est), Chunk::standalone("y".repeat(150), &est)];
    /// let stats = ChunkStats::from_chunks(&chunks, Duration::ZERO);
    ///
    /// assert_eq!(stats.avg_size, 100.0);
    /// assert_eq!(stats.size_distribution[1].range, "100-200");
    /// ```
    pub fn from_chunks(chunks: &[Chunk], processing_time: Duration) -> Self {
        let sizes: Vec<usize> = chunks
            .iter()
            .filter(|c| !c.is_parent())
            .map(Chunk::char_count)
            .collect();
        let total_tokens = chunks
            .iter()
            .filter(|c| !c.is_parent())
            .map(Chunk::token_count)
            .sum();

        let mut buckets: BTreeMap<usize, usize> = BTreeMap::new();
        for &size in &sizes {
            *buckets.entry(size / BUCKET_WIDTH * BUCKET_WIDTH).or_default() += 1;
        }

        let total: usize = sizes.iter().sum();
        Self {
            total_chunks: sizes.len(),
            avg_size: if sizes.is_empty() {
                0.0
            } else {
                total as f64 / sizes.len() as f64
            },
            min_size: sizes.iter().copied().min().unwrap_or(0),
            max_size: sizes.iter().copied().max().unwrap_or(0),
            total_tokens,
            size_distribution: buckets
                .into_iter()
                .map(|(lower, count)| SizeBucket {
                    lower,
                    range: format!("{lower}-{}", lower + BUCKET_WIDTH),
                    count,
                })
                .collect(),
            processing_time,
        }
    }
}
