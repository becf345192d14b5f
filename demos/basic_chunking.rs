//! Chunking and Ranking Walkthrough
//!
//! Runs a few strategies over one document, prints size statistics, then
//! ranks the chunks against a query with a toy bag-of-words embedder.
//!
//! ```bash
//! RUST_LOG=chunklab=debug cargo run --example basic_chunking
//! ```

use async_trait::async_trait;
use chunklab::{
    embed_chunks, rank_retrievable, ChunkingEngine, ChunkingOptions, Embedder, RankingOptions,
    Result, Strategy,
};
use futures::executor::block_on;
use tracing_subscriber::EnvFilter;

const VOCABULARY: [&str; 6] = ["model", "layer", "gradient", "data", "prize", "network"];

/// Counts vocabulary words. Good enough to show the ranking mechanics.
struct BagOfWords;

#[async_trait]
impl Embedder for BagOfWords {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| {
                let lower = t.to_lowercase();
                VOCABULARY
                    .iter()
                    .map(|w| lower.matches(w).count() as f32)
                    .collect()
            })
            .collect())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let document = "Machine learning models learn patterns from data. They generalize these patterns to make predictions on new examples.

The training process has three steps. A forward pass produces predictions. The loss compares them with ground truth. Backpropagation sends gradients backward through every layer.

Deep learning stacks many hidden layers. Each layer learns more abstract representations of the data.

Geoffrey Hinton pioneered backpropagation for neural network training. In 2024 that work was recognized with a Nobel Prize.";

    let engine = ChunkingEngine::new();
    println!("Document: {} chars\n", document.len());

    for strategy in [
        Strategy::FixedSize,
        Strategy::Sentence,
        Strategy::Paragraph,
        Strategy::Recursive,
        Strategy::SlidingWindow,
    ] {
        let opts = ChunkingOptions::default()
            .with_strategy(strategy)
            .with_size(160)
            .with_overlap(20);
        let run = block_on(engine.chunk(document, &opts))?;

        println!("{strategy}");
        println!(
            "   {} chunks, avg {:.0} chars, min {}, max {}, ~{} tokens, {:?}",
            run.stats.total_chunks,
            run.stats.avg_size,
            run.stats.min_size,
            run.stats.max_size,
            run.stats.total_tokens,
            run.stats.processing_time,
        );
        for bucket in &run.stats.size_distribution {
            println!("   {:>9} chars: {}", bucket.range, bucket.count);
        }
        println!();
    }

    // Parent/child chunks: rank the small children, read the large parents.
    let opts = ChunkingOptions::default()
        .with_size(120)
        .with_overlap(0)
        .with_parent_size(300);
    let run = block_on(engine.chunk(document, &opts))?;
    let embedded = block_on(embed_chunks(&run.chunks, &BagOfWords))?;

    let query = "how do gradients reach each layer";
    let query_vector = block_on(BagOfWords.embed_query(query))?;
    let ranked = rank_retrievable(
        &embedded,
        &query_vector,
        query,
        &RankingOptions::default().with_rerank(true),
    );

    println!("Query: {query:?}");
    for chunk in ranked.iter().filter(|c| !c.is_parent()).take(3) {
        let Some(stats) = chunk.retrieval.as_ref() else {
            continue;
        };
        let parent = ranked
            .iter()
            .find(|p| Some(p.id()) == chunk.parent_id())
            .map_or(0, |p| p.char_count());
        let preview: String = chunk.content().chars().take(60).collect();
        println!(
            "   #{} hybrid {:.3} (vector {:.3}, keyword {:.3}) parent {} chars: \"{}...\"",
            stats.rank.unwrap_or_default(),
            stats.hybrid_score.unwrap_or_default(),
            stats.vector_score.unwrap_or_default(),
            stats.keyword_score.unwrap_or_default(),
            parent,
            preview
        );
    }

    Ok(())
}
