//! Regex splitting with a user-supplied pattern.
//!
//! The pattern comes straight from a UI text box, so it is often half-typed
//! or invalid. An invalid pattern must not take the run down: the chunker
//! then returns the whole input as one span, and the caller learns about it
//! through [`RegexChunker::compile_error`] (the router turns that into a
//! warning on the run result).

use std::ops::Range;

use regex::Regex;

use crate::slab::materialize;
use crate::{Chunker, Error, Slab};

/// Pattern used when none is configured.
pub const DEFAULT_PATTERN: &str = r"\n\n";

/// Splits text on every match of a regular expression.
///
/// Matched text is dropped; whitespace-only parts are filtered.
///
/// ```rust
/// use chunklab::{Chunker, RegexChunker};
///
/// let chunker = RegexChunker::new(r"\n---\n");
/// let slabs = chunker.chunk("one\n---\ntwo\n---\nthree");
/// assert_eq!(slabs.len(), 3);
///
/// let broken = RegexChunker::new("(");
/// assert!(broken.compile_error().is_some());
/// assert_eq!(broken.chunk("kept whole")[0].text, "kept whole");
/// ```
#[derive(Debug, Clone)]
pub struct RegexChunker {
    pattern: String,
    compiled: Result<Regex, regex::Error>,
}

impl RegexChunker {
    /// Compile `pattern` once. Compilation failure is recorded, not raised.
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            compiled: Regex::new(pattern),
        }
    }

    /// The pattern as given.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Why the pattern failed to compile, if it did.
    #[must_use]
    pub fn compile_error(&self) -> Option<Error> {
        self.compiled.as_ref().err().cloned().map(Error::Pattern)
    }
}

impl Chunker for RegexChunker {
    fn chunk(&self, text: &str) -> Vec<Slab> {
        match &self.compiled {
            Ok(re) => materialize(text, ranges_between(text, re)),
            Err(_) => materialize(text, [0..text.len()]),
        }
    }
}

/// Byte ranges of the text between consecutive matches of `re`.
pub(crate) fn ranges_between(source: &str, re: &Regex) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    let mut cursor = 0;
    for m in re.find_iter(source) {
        out.push(cursor..m.start());
        cursor = m.end();
    }
    out.push(cursor..source.len());
    out
}
