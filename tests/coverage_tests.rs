#![allow(dead_code, clippy::needless_range_loop, clippy::manual_assert)]
//! Coverage and overlap tests for text chunking.
//!
//! These tests verify that chunks properly cover input text, handle
//! overlaps correctly, and that every strategy in the catalog routes to a
//! chunker producing valid spans.

use chunklab::{
    Chunker, ChunkingOptions, ContentAwareChunker, FixedChunker, HybridChunker,
    RecursiveChunker, SentenceChunker, SizeBudget, SizeUnit, Slab, SlidingWindowChunker,
    Strategy, StrategyRouter, TokenEstimator, STRATEGIES,
};

// =============================================================================
// Coverage: Chunks should cover the entire input
// =============================================================================

/// Check that every non-whitespace byte of `text` lies inside some slab.
fn covers_content(slabs: &[Slab], text: &str) -> bool {
    let mut covered = vec![false; text.len()];
    for slab in slabs {
        for i in slab.start..slab.end {
            covered[i] = true;
        }
    }
    text.char_indices()
        .all(|(i, c)| c.is_whitespace() || covered[i])
}

const TEXTS: [&str; 7] = [
    "Hello, world!",
    "The quick brown fox jumps over the lazy dog.",
    "First paragraph.\n\nSecond paragraph.\n\nThird.",
    "Sentence one. Sentence two. Sentence three.",
    " Leading and trailing spaces ",
    "# Title\n\nIntro.\n\n```rust\nfn main() {}\n```\n\nOutro.",
    "NoSeparatorsAtAllNoSeparatorsAtAllNoSeparatorsAtAll",
];

#[test]
fn fixed_chunker_full_coverage() {
    for text in TEXTS {
        let slabs = FixedChunker::new(10, 3).chunk(text);
        assert!(covers_content(&slabs, text), "fixed failed coverage for {text:?}");
    }
}

#[test]
fn recursive_chunker_full_coverage() {
    for text in TEXTS {
        for size in [1, 5, 12, 100] {
            let slabs = RecursiveChunker::prose(size).chunk(text);
            assert!(covers_content(&slabs, text), "recursive({size}) failed for {text:?}");
            assert!(chunk_bounds_valid(&slabs, text));
        }
    }
}

#[test]
fn deterministic_strategies_produce_valid_spans() {
    let opts = ChunkingOptions::default().with_size(25).with_overlap(5);
    let router = StrategyRouter::new();

    for text in TEXTS {
        for strategy in Strategy::ALL.into_iter().filter(|s| !s.requires_ai()) {
            let routed = router
                .split_deterministic(text, strategy, opts.chunk_size, &opts)
                .unwrap();
            assert!(routed.warnings.is_empty());
            assert!(!routed.spans.is_empty(), "{strategy} produced nothing for {text:?}");
            for slab in &routed.spans {
                assert!(!slab.is_blank(), "{strategy} emitted a blank span");
                assert_eq!(text.get(slab.span()), Some(slab.text.as_str()), "{strategy}");
            }
        }
    }
}

#[test]
fn sentence_chunker_valid_chunks() {
    let texts = [
        "Hello. World.",
        "Dr. Smith went home. He was tired.",
        "First! Second? Third.",
        "No sentence ending here",
    ];

    for text in &texts {
        let slabs = SentenceChunker::new(SizeBudget::chars(20)).chunk(text);
        assert!(chunk_bounds_valid(&slabs, text));
    }
}

// =============================================================================
// Overlap tests
// =============================================================================

#[test]
fn fixed_chunker_overlap_property() {
    let text = "The quick brown fox jumps over the lazy dog. Pack my box.";

    for overlap in [0, 5, 10, 20] {
        let slabs = FixedChunker::new(30, overlap).chunk(text);

        for window in slabs.windows(2) {
            let (first, second) = (&window[0], &window[1]);
            if second.start < first.end {
                let actual_overlap = first.end - second.start;
                assert!(
                    actual_overlap <= overlap,
                    "Overlap {actual_overlap} exceeds requested {overlap}"
                );
            }
        }
    }
}

#[test]
fn fixed_chunker_no_overlap_means_contiguous() {
    let slabs = FixedChunker::no_overlap(5).chunk("ABCDEFGHIJKLMNOPQRSTUVWXYZ");
    for window in slabs.windows(2) {
        assert_eq!(window[1].start, window[0].end);
    }
}

#[test]
fn sliding_window_overlaps_by_step() {
    let text = "one two three four five six seven eight nine ten";
    // 15 chars / 5 = 3 words per window, step 10 / 5 = 2 words.
    let slabs = SlidingWindowChunker::new(15, 10, 5.0).chunk(text);
    assert_eq!(slabs[0].text, "one two three");
    assert_eq!(slabs[1].text, "three four five");
    assert_eq!(slabs.last().map(|s| s.text.as_str()), Some("nine ten"));
}

// =============================================================================
// Size bounds
// =============================================================================

#[test]
fn recursive_chunker_respects_size() {
    let text = "First paragraph with lots of words. More words here.\n\n\
                Second paragraph also has words. Even more words.\n\n\
                Third paragraph continues. And more sentences.";

    for size in [10, 50, 100, 200] {
        let slabs = RecursiveChunker::new(size, &["\n\n", ". ", " ", ""]).chunk(text);
        for slab in &slabs {
            assert!(slab.text.chars().count() <= size);
        }
    }
}

#[test]
fn token_budget_respected_by_recursive() {
    let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu";
    let est = TokenEstimator::default();
    let budget = SizeBudget::new(5, SizeUnit::Tokens, est);
    let chunker = RecursiveChunker::with_budget(budget, vec![" ".into()]);

    for slab in chunker.chunk(text) {
        assert!(est.estimate(&slab.text) <= 5, "{:?}", slab.text);
    }
}

#[test]
fn hybrid_packs_paragraphs_below_size() {
    let text = "aaaa\n\nbbbb\n\ncccc\n\ndddd";
    // "aaaa\n\nbbbb" is 10 chars including the gap.
    let slabs = HybridChunker::new(SizeBudget::chars(11)).chunk(text);
    assert_eq!(slabs.len(), 2);
    assert_eq!(slabs[0].text, "aaaa\n\nbbbb");
    for slab in HybridChunker::new(SizeBudget::chars(10)).chunk(text) {
        assert!(slab.text.chars().count() <= 4, "{:?}", slab.text);
    }
}

#[test]
fn content_aware_keeps_fences_whole() {
    let text = "prose\n```\nlet a = 1;\n\nlet b = 2;\n```\nmore prose";
    let slabs = ContentAwareChunker.chunk(text);
    assert_eq!(slabs.len(), 3);
    assert!(slabs[1].text.starts_with("```") && slabs[1].text.ends_with("```"));
}

// =============================================================================
// Catalog
// =============================================================================

#[test]
fn catalog_matches_strategies() {
    assert_eq!(STRATEGIES.len(), Strategy::ALL.len());
    for def in &STRATEGIES {
        assert_eq!(Strategy::from_id(def.id), Some(def.strategy));
        assert_eq!(def.requires_ai, def.strategy.requires_ai());
        assert!(!def.description.is_empty());
    }
    let ai: Vec<&str> = STRATEGIES.iter().filter(|d| d.requires_ai).map(|d| d.id).collect();
    assert_eq!(ai, vec!["semantic", "linguistic", "llm"]);
}

// =============================================================================
// Edge cases
// =============================================================================

#[test]
fn chunker_handles_only_whitespace() {
    let text = "   \n\n\t\t  ";
    assert!(FixedChunker::new(50, 10).chunk(text).is_empty());
    assert!(RecursiveChunker::new(100, &["\n\n", " "]).chunk(text).is_empty());
}

#[test]
fn chunker_handles_size_equals_text_length() {
    let text = "Exactly fifty characters in this string, not more.";
    let slabs = FixedChunker::new(text.chars().count(), 0).chunk(text);
    assert_eq!(slabs.len(), 1);
    assert_eq!(slabs[0].text, text);
}

// =============================================================================
// Helpers
// =============================================================================

fn chunk_bounds_valid(slabs: &[Slab], text: &str) -> bool {
    slabs
        .iter()
        .all(|slab| slab.start <= slab.end && text.get(slab.span()) == Some(slab.text.as_str()))
}
