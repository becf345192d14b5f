//! Sentence-based chunking.
//!
//! Splits text on sentence boundaries, packing consecutive sentences into a
//! chunk until the next one would overflow the size budget.
//!
//! ## Boundaries
//!
//! Boundaries come from UAX #29 sentence segmentation. The rules cope with
//! decimals ("3.5 ms"), ellipses and closing quotes, and still split after
//! an abbreviation followed by a capital:
//!
//! ```text
//! "Ask Dr. Smith first."  ->  ["Ask Dr. ", "Smith first."]
//! ```
//!
//! Good enough for chunk boundaries; not a linguistic parser.
//!
//! ## Packing
//!
//! ```text
//! max = 30
//!
//! sentences: [Hello world. ] [How are you? ] [I am fine, thanks.]
//!             13              13              18
//! chunks:    [Hello world. How are you?] [I am fine, thanks.]
//! ```
//!
//! A single sentence longer than the budget becomes its own chunk; this
//! strategy never cuts inside a sentence.

use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

use crate::capacity::SizeBudget;
use crate::slab::{materialize, trim_range};
use crate::{Chunker, Slab};

/// Sentence-based chunker.
///
/// ## Example
///
/// ```rust
/// use chunklab::{Chunker, SentenceChunker, SizeBudget};
///
/// let chunker = SentenceChunker::new(SizeBudget::chars(35));
/// let text = "First sentence. Second sentence. Third sentence.";
/// let slabs = chunker.chunk(text);
///
/// assert_eq!(slabs.len(), 2);
/// assert_eq!(slabs[0].text, "First sentence. Second sentence.");
/// assert_eq!(slabs[1].text, "Third sentence.");
/// ```
#[derive(Debug, Clone)]
pub struct SentenceChunker {
    budget: SizeBudget,
}

impl SentenceChunker {
    /// Create a new sentence chunker.
    #[must_use]
    pub fn new(budget: SizeBudget) -> Self {
        Self { budget }
    }

    /// Create a chunker that outputs one sentence per chunk.
    #[must_use]
    pub fn single() -> Self {
        Self::new(SizeBudget::chars(1))
    }
}

/// Byte ranges of the UAX #29 sentences in `range`, trailing space included.
pub(crate) fn sentence_ranges(source: &str, range: Range<usize>) -> Vec<Range<usize>> {
    source[range.clone()]
        .split_sentence_bound_indices()
        .map(|(i, s)| range.start + i..range.start + i + s.len())
        .collect()
}

/// Greedily pack consecutive ranges while the joined range fits `budget`.
///
/// Ranges must be contiguous and in order; the gap between two packed
/// ranges is kept verbatim.
pub(crate) fn pack_ranges(
    source: &str,
    ranges: impl IntoIterator<Item = Range<usize>>,
    budget: &SizeBudget,
) -> Vec<Range<usize>> {
    let mut packed = Vec::new();
    let mut current: Option<Range<usize>> = None;

    for r in ranges {
        current = Some(match current.take() {
            None => r,
            Some(cur) => {
                let joined = cur.start..r.end;
                if budget.fits(&source[joined.clone()]) {
                    joined
                } else {
                    packed.push(cur);
                    r
                }
            }
        });
    }

    packed.extend(current);
    packed
}

impl Chunker for SentenceChunker {
    fn chunk(&self, text: &str) -> Vec<Slab> {
        if text.is_empty() {
            return vec![];
        }

        let sentences = sentence_ranges(text, 0..text.len());
        let packed = pack_ranges(text, sentences, &self.budget);
        materialize(text, packed.into_iter().map(|r| trim_range(text, r)))
    }

    fn estimate_chunks(&self, text_len: usize) -> usize {
        (text_len / self.budget.max()).max(1)
    }
}
