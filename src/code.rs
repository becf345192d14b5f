//! Source-code chunking on declaration boundaries.
//!
//! A function split down the middle is useless to a retriever, so code is
//! first cut right before top-level declarations and only falls back to
//! blank lines, single lines, and finally characters when a single
//! declaration is too large.
//!
//! Declarations are recognised lexically: a line that *starts* (column 0)
//! with one of the keywords below. Indented methods stay with their class.
//!
//! | Keyword | Languages |
//! |---------|-----------|
//! | `class`, `def`, `async def` | Python |
//! | `function`, `async function`, `export` | JavaScript / TypeScript |
//! | `fn`, `pub fn`, `impl` | Rust |

use crate::capacity::SizeBudget;
use crate::recursive::RecursiveChunker;
use crate::splitter::Separator;
use crate::{Chunker, Slab};

/// Pattern matching the start of a top-level declaration line.
pub const DECLARATION_PATTERN: &str =
    r"(?m)^(?:class|def|async def|function|async function|export|fn|pub fn|impl)\s";

/// Recursive chunker whose coarsest separator is a declaration boundary.
///
/// ```rust
/// use chunklab::{Chunker, CodeChunker, SizeBudget};
///
/// let code = "def a():\n    return 1\n\ndef b():\n    return 2\n";
/// let slabs = CodeChunker::new(SizeBudget::chars(30)).chunk(code);
///
/// assert_eq!(slabs.len(), 2);
/// assert!(slabs[1].text.starts_with("def b"));
/// ```
#[derive(Debug, Clone)]
pub struct CodeChunker {
    inner: RecursiveChunker,
}

impl CodeChunker {
    /// Create a code chunker. Code is never overlapped.
    #[must_use]
    pub fn new(budget: SizeBudget) -> Self {
        let mut separators = Vec::with_capacity(4);
        match Separator::boundary(DECLARATION_PATTERN) {
            Ok(sep) => separators.push(sep),
            Err(err) => tracing::error!(%err, "declaration pattern failed to compile"),
        }
        separators.extend(["\n\n", "\n", ""].map(Separator::from));
        Self {
            inner: RecursiveChunker::with_budget(budget, separators),
        }
    }
}

impl Chunker for CodeChunker {
    fn chunk(&self, text: &str) -> Vec<Slab> {
        self.inner.chunk(text)
    }

    fn estimate_chunks(&self, text_len: usize) -> usize {
        self.inner.estimate_chunks(text_len)
    }
}
