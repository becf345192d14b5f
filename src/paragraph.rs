//! Paragraph and paragraph-packing chunkers.
//!
//! A paragraph is text between blank lines: a newline, any run of
//! whitespace, then another newline. Lines holding only spaces count as
//! blank.
//!
//! [`ParagraphChunker`] returns every paragraph as its own span regardless of
//! size. [`HybridChunker`] packs neighbouring paragraphs up to the budget,
//! which keeps short paragraphs (headings, one-liners) together with their
//! context without ever cutting inside one.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

use crate::capacity::SizeBudget;
use crate::pattern::ranges_between;
use crate::slab::{materialize, trim_range};
use crate::{Chunker, Slab};

fn paragraph_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n\s*\n").expect("paragraph pattern is valid"))
}

/// Trimmed, non-blank paragraph ranges of `source`.
pub(crate) fn paragraph_ranges(source: &str) -> Vec<Range<usize>> {
    ranges_between(source, paragraph_break())
        .into_iter()
        .map(|r| trim_range(source, r))
        .filter(|r| !r.is_empty())
        .collect()
}

/// One span per paragraph.
///
/// ```rust
/// use chunklab::{Chunker, ParagraphChunker};
///
/// let slabs = ParagraphChunker.chunk("para1\n\npara2\n  \npara3");
/// let texts: Vec<&str> = slabs.iter().map(|s| s.text.as_str()).collect();
/// assert_eq!(texts, vec!["para1", "para2", "para3"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ParagraphChunker;

impl Chunker for ParagraphChunker {
    fn chunk(&self, text: &str) -> Vec<Slab> {
        materialize(text, paragraph_ranges(text))
    }
}

/// Paragraph-then-size packing.
///
/// Paragraphs are appended to the current span while the packed range,
/// gaps included, stays strictly below the budget. The blank-line gap
/// between packed paragraphs is kept verbatim.
///
/// ```rust
/// use chunklab::{Chunker, HybridChunker, SizeBudget};
///
/// let chunker = HybridChunker::new(SizeBudget::chars(20));
/// let slabs = chunker.chunk("Intro\n\nShort one\n\nA much longer closing paragraph");
///
/// assert_eq!(slabs[0].text, "Intro\n\nShort one");
/// assert_eq!(slabs[1].text, "A much longer closing paragraph");
/// ```
#[derive(Debug, Clone)]
pub struct HybridChunker {
    budget: SizeBudget,
}

impl HybridChunker {
    /// Create a hybrid chunker.
    #[must_use]
    pub fn new(budget: SizeBudget) -> Self {
        Self { budget }
    }
}

impl Chunker for HybridChunker {
    fn chunk(&self, text: &str) -> Vec<Slab> {
        let mut packed = Vec::new();
        let mut current: Option<Range<usize>> = None;

        for para in paragraph_ranges(text) {
            current = match current.take() {
                Some(cur) if self.budget.measure(&text[cur.start..para.end]) < self.budget.max() => {
                    Some(cur.start..para.end)
                }
                Some(cur) => {
                    packed.push(cur);
                    Some(para)
                }
                None => Some(para),
            };
        }

        packed.extend(current);
        materialize(text, packed)
    }
}
