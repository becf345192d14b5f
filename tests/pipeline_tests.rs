//! End-to-end pipeline tests with mock external collaborators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chunklab::{
    embed_chunks, enrich_chunks, rank_retrievable, AiSplitter, Chunk, ChunkKind, ChunkWarning,
    ChunkingEngine, ChunkingOptions, Embedder, Enricher, Enrichment, EnrichmentLimits,
    EnrichmentOptions, Error, RankingOptions, Result, Strategy,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// =============================================================================
// Mocks
// =============================================================================

/// Splits on ". " and records what it was asked.
#[derive(Default)]
struct SentenceSplitter {
    calls: Mutex<Vec<(Strategy, Option<String>, Option<String>)>>,
}

#[async_trait]
impl AiSplitter for SentenceSplitter {
    async fn split(
        &self,
        text: &str,
        strategy: Strategy,
        model_id: Option<&str>,
        custom_prompt: Option<&str>,
    ) -> Result<Vec<String>> {
        self.calls.lock().unwrap().push((
            strategy,
            model_id.map(str::to_string),
            custom_prompt.map(str::to_string),
        ));
        Ok(text.split(". ").map(str::to_string).collect())
    }
}

struct FailingSplitter;

#[async_trait]
impl AiSplitter for FailingSplitter {
    async fn split(&self, _: &str, _: Strategy, _: Option<&str>, _: Option<&str>) -> Result<Vec<String>> {
        Err(Error::external("splitter", "503 service unavailable"))
    }
}

/// Rewrites every span, so nothing can be located in the source.
struct ParaphrasingSplitter;

#[async_trait]
impl AiSplitter for ParaphrasingSplitter {
    async fn split(&self, text: &str, _: Strategy, _: Option<&str>, _: Option<&str>) -> Result<Vec<String>> {
        Ok(text.split("\n\n").map(|p| format!("Summary: {}", p.to_uppercase())).collect())
    }
}

/// Embeds by counting two marker words.
struct MarkerEmbedder;

#[async_trait]
impl Embedder for MarkerEmbedder {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| {
                let lower = t.to_lowercase();
                vec![
                    lower.matches("rust").count() as f32,
                    lower.matches("python").count() as f32,
                ]
            })
            .collect())
    }
}

struct ShortEmbedder;

#[async_trait]
impl Embedder for ShortEmbedder {
    async fn embed(&self, _: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(vec![vec![1.0]])
    }
}

/// Counts concurrent calls and sleeps to let them overlap.
#[derive(Default)]
struct SlowEnricher {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
}

#[async_trait]
impl Enricher for SlowEnricher {
    async fn enrich(
        &self,
        chunk: &Chunk,
        _model_id: Option<&str>,
        options: &EnrichmentOptions,
    ) -> Result<Enrichment> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        Ok(Enrichment {
            summary: options.summarize.then(|| format!("about {}", chunk.keywords().join(", "))),
            standalone_score: options.standalone_check.then_some(7),
            ..Enrichment::default()
        })
    }
}

fn document() -> String {
    [
        "Rust ownership rules prevent data races at compile time.",
        "Python favours readability and a large standard library.",
        "The borrow checker in Rust enforces those ownership rules.",
        "Python packaging has improved a lot over the years.",
    ]
    .join("\n\n")
}

// =============================================================================
// Chunking
// =============================================================================

#[tokio::test]
async fn paragraph_strategy_three_chunks() {
    init_tracing();
    let opts = ChunkingOptions::default().with_strategy(Strategy::Paragraph);
    let run = ChunkingEngine::new().chunk("para1\n\npara2\n\npara3", &opts).await.unwrap();

    let texts: Vec<&str> = run.chunks.iter().map(Chunk::content).collect();
    assert_eq!(texts, vec!["para1", "para2", "para3"]);
    assert!(run.chunks.iter().all(|c| c.kind() == ChunkKind::Standalone));
    assert!(run.warnings.is_empty());
}

#[tokio::test]
async fn invalid_regex_returns_original_text() {
    let text = "keep (all) of this\n\ntogether";
    let opts = ChunkingOptions::default()
        .with_strategy(Strategy::Regex)
        .with_regex("(");
    let run = ChunkingEngine::new().chunk(text, &opts).await.unwrap();

    assert_eq!(run.chunks.len(), 1);
    assert_eq!(run.chunks[0].content(), text);
    assert!(matches!(
        &run.warnings[..],
        [ChunkWarning::InvalidPattern { pattern, .. }] if pattern == "("
    ));
}

#[tokio::test]
async fn ai_strategy_uses_splitter() {
    let splitter = Arc::new(SentenceSplitter::default());
    let engine = ChunkingEngine::new().with_splitter(splitter.clone());
    let opts = ChunkingOptions::default()
        .with_strategy(Strategy::Semantic)
        .with_model("model-x")
        .with_prompt("keep lists together");
    let text = "One idea. Another idea. A third idea.";
    let run = engine.chunk(text, &opts).await.unwrap();

    let texts: Vec<&str> = run.chunks.iter().map(Chunk::content).collect();
    assert_eq!(texts, vec!["One idea", "Another idea", "A third idea."]);
    for chunk in &run.chunks {
        assert_eq!(&text[chunk.span().unwrap()], chunk.content());
    }

    let calls = splitter.calls.lock().unwrap();
    assert_eq!(
        calls[0],
        (
            Strategy::Semantic,
            Some("model-x".to_string()),
            Some("keep lists together".to_string())
        )
    );
}

#[tokio::test]
async fn splitter_failure_falls_back_to_whole_text() {
    let engine = ChunkingEngine::new().with_splitter(Arc::new(FailingSplitter));
    let opts = ChunkingOptions::default().with_strategy(Strategy::Llm);
    let run = engine.chunk("whole document", &opts).await.unwrap();

    assert_eq!(run.chunks.len(), 1);
    assert_eq!(run.chunks[0].content(), "whole document");
    assert!(matches!(
        &run.warnings[0],
        ChunkWarning::ExternalFallback { strategy: Strategy::Llm, message } if message.contains("503")
    ));
}

#[tokio::test]
async fn unlocated_ai_spans_keep_text_without_offsets() {
    let engine = ChunkingEngine::new().with_splitter(Arc::new(ParaphrasingSplitter));
    let opts = ChunkingOptions::default().with_strategy(Strategy::Linguistic);
    let run = engine.chunk("first part\n\nsecond part", &opts).await.unwrap();

    assert_eq!(run.chunks.len(), 2);
    assert_eq!(run.chunks[0].content(), "Summary: FIRST PART");
    assert!(run.chunks.iter().all(|c| c.span().is_none()));
}

#[tokio::test]
async fn ai_strategy_without_splitter_is_an_error() {
    let opts = ChunkingOptions::default().with_strategy(Strategy::Semantic);
    let err = ChunkingEngine::new().chunk("text", &opts).await.unwrap_err();
    assert!(matches!(err, Error::SplitterUnavailable(Strategy::Semantic)));
    assert!(err.to_string().contains("Semantic"));
}

#[tokio::test]
async fn hierarchical_children_reference_parents() {
    let text = document();
    let opts = ChunkingOptions::default()
        .with_size(70)
        .with_overlap(0)
        .with_parent_size(130);
    let run = ChunkingEngine::new().chunk(&text, &opts).await.unwrap();

    let parents: Vec<&Chunk> = run.chunks.iter().filter(|c| c.is_parent()).collect();
    assert!(parents.len() >= 2);
    for child in run.retrievable() {
        assert_eq!(child.kind(), ChunkKind::Child);
        let parent = parents
            .iter()
            .find(|p| Some(p.id()) == child.parent_id())
            .expect("child links to a parent in the run");
        assert!(parent.content().contains(child.content()));
        assert_eq!(&text[child.span().unwrap()], child.content());
    }
    assert_eq!(run.stats.total_chunks, run.retrievable().count());
}

#[tokio::test]
async fn hierarchical_ai_parents_use_recursive() {
    let splitter = Arc::new(SentenceSplitter::default());
    let engine = ChunkingEngine::new().with_splitter(splitter.clone());
    let opts = ChunkingOptions::default()
        .with_strategy(Strategy::Semantic)
        .with_size(100)
        .with_parent_size(130);
    let run = engine.chunk(&document(), &opts).await.unwrap();

    let parents = run.chunks.iter().filter(|c| c.is_parent()).count();
    // One splitter call per parent: the parent pass itself never calls it.
    assert_eq!(splitter.calls.lock().unwrap().len(), parents);
}

// =============================================================================
// Retrieval
// =============================================================================

#[tokio::test]
async fn embed_then_rank_alpha_one() {
    let opts = ChunkingOptions::default().with_strategy(Strategy::Paragraph);
    let run = ChunkingEngine::new().chunk(&document(), &opts).await.unwrap();
    let embedded = embed_chunks(&run.chunks, &MarkerEmbedder).await.unwrap();

    let query = MarkerEmbedder.embed_query("rust").await.unwrap();
    let ranked = rank_retrievable(
        &embedded,
        &query,
        "python python",
        &RankingOptions::default().with_alpha(1.0),
    );

    // Pure vector: the Rust paragraphs win despite the keyword query.
    assert!(ranked[0].content().contains("Rust"));
    assert!(ranked[1].content().contains("Rust"));
    let ranks: Vec<usize> = ranked.iter().filter_map(|c| c.retrieval.as_ref()?.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn rank_alpha_zero_uses_keywords() {
    let opts = ChunkingOptions::default().with_strategy(Strategy::Paragraph);
    let run = ChunkingEngine::new().chunk(&document(), &opts).await.unwrap();
    let embedded = embed_chunks(&run.chunks, &MarkerEmbedder).await.unwrap();

    let ranked = rank_retrievable(
        &embedded,
        &[1.0, 0.0],
        "python packaging",
        &RankingOptions::default().with_alpha(0.0),
    );
    assert!(ranked[0].content().starts_with("Python packaging"));
}

#[tokio::test]
async fn embedder_count_mismatch_is_an_error() {
    let opts = ChunkingOptions::default().with_strategy(Strategy::Paragraph);
    let run = ChunkingEngine::new().chunk(&document(), &opts).await.unwrap();
    let err = embed_chunks(&run.chunks, &ShortEmbedder).await.unwrap_err();
    assert!(matches!(err, Error::Embedding { expected: 4, actual: 1 }));
}

// =============================================================================
// Enrichment
// =============================================================================

#[tokio::test]
async fn enrichment_capped_and_bounded() {
    let text = (0..15)
        .map(|i| format!("Paragraph number {i} about chunking"))
        .collect::<Vec<_>>()
        .join("\n\n");
    let opts = ChunkingOptions::default().with_strategy(Strategy::Paragraph);
    let run = ChunkingEngine::new().chunk(&text, &opts).await.unwrap();
    assert_eq!(run.chunks.len(), 15);

    let enricher = SlowEnricher::default();
    let limits = EnrichmentLimits {
        max_chunks: 10,
        concurrency: 3,
    };
    let options = EnrichmentOptions {
        summarize: true,
        standalone_check: true,
        ..EnrichmentOptions::default()
    };
    let out = enrich_chunks(&run.chunks, &enricher, Some("model-x"), &options, limits).await;

    assert_eq!(enricher.calls.load(Ordering::SeqCst), 10);
    assert!(enricher.peak.load(Ordering::SeqCst) <= 3);
    assert_eq!(out.chunks.iter().filter(|c| c.enrichment.is_some()).count(), 10);
    let first = out.chunks[0].enrichment.as_ref().unwrap();
    assert_eq!(first.standalone_score, Some(7));
    assert!(first.summary.as_deref().unwrap().contains("paragraph"));
    assert!(first.labels.is_empty());
    // The input collection stays unannotated.
    assert!(run.chunks.iter().all(|c| c.enrichment.is_none()));
}

#[tokio::test]
async fn enrichment_skips_parents() {
    let opts = ChunkingOptions::default()
        .with_size(70)
        .with_overlap(0)
        .with_parent_size(130);
    let run = ChunkingEngine::new().chunk(&document(), &opts).await.unwrap();

    let enricher = SlowEnricher::default();
    let out = enrich_chunks(
        &run.chunks,
        &enricher,
        None,
        &EnrichmentOptions::all(),
        EnrichmentLimits::default(),
    )
    .await;

    assert!(out.chunks.iter().filter(|c| c.is_parent()).all(|c| c.enrichment.is_none()));
    assert!(out.chunks.iter().filter(|c| !c.is_parent()).all(|c| c.enrichment.is_some()));
}

#[tokio::test]
async fn options_round_trip_through_json() {
    let opts = ChunkingOptions::default()
        .with_strategy(Strategy::ContentAware)
        .with_parent_size(900);
    let json = serde_json::to_string(&opts).unwrap();
    assert!(json.contains("\"content-aware\""));
    let back: ChunkingOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(back, opts);
}
