//! Content-aware chunking around fenced code blocks.
//!
//! Mixed documents interleave prose with code. Embedding a code block
//! together with half a paragraph of prose gives a vector that represents
//! neither well, so this strategy isolates every fenced block:
//!
//! ````text
//! Intro prose.            <- span 0
//! ```rust                 <- span 1 (whole block, fences included)
//! fn main() {}
//! ```
//! Closing prose.          <- span 2
//! ````
//!
//! Blocks are never subdivided here, however long. An unterminated fence is
//! treated as prose.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

use crate::slab::materialize;
use crate::{Chunker, Slab};

fn fenced_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```.*?```").expect("fence pattern is valid"))
}

/// Splits prose runs and fenced code blocks into separate spans.
///
/// ```rust
/// use chunklab::{Chunker, ContentAwareChunker};
///
/// let text = "Intro.\n```\ncode\n```\nOutro.";
/// let slabs = ContentAwareChunker.chunk(text);
/// assert_eq!(slabs.len(), 3);
/// assert_eq!(slabs[1].text, "```\ncode\n```");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentAwareChunker;

impl Chunker for ContentAwareChunker {
    fn chunk(&self, text: &str) -> Vec<Slab> {
        let mut ranges: Vec<Range<usize>> = Vec::new();
        let mut cursor = 0;
        for block in fenced_block().find_iter(text) {
            ranges.push(cursor..block.start());
            ranges.push(block.range());
            cursor = block.end();
        }
        ranges.push(cursor..text.len());
        materialize(text, ranges)
    }
}
