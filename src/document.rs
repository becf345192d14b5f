//! Structure-driven chunkers: Markdown headers and metadata markers.
//!
//! Both cut *before* a marker line, so each span starts with the header (or
//! timestamp, or `From:` line) that introduces it:
//!
//! ```text
//! # Guide            <- span 0
//! intro
//! ## Install         <- span 1
//! steps
//! ```
//!
//! Text before the first marker becomes its own span.

use std::sync::OnceLock;

use regex::Regex;

use crate::slab::materialize;
use crate::splitter::Separator;
use crate::{Chunker, Slab};

fn header_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^#{1,6}\s").expect("header pattern is valid"))
}

fn metadata_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^(?:#{1,6}\s|-{3,}[ \t]*$|\[?\d{4}-\d{2}-\d{2}|\[\d{1,2}:\d{2}|From:\s)")
            .expect("metadata pattern is valid")
    })
}

fn split_before(text: &str, re: &Regex) -> Vec<Slab> {
    if text.is_empty() {
        return vec![];
    }
    let boundary = Separator::Boundary(re.clone());
    materialize(text, boundary.fragments(text, 0..text.len()))
}

/// Splits before every Markdown ATX header (`#` to `######`).
///
/// ```rust
/// use chunklab::{Chunker, DocumentChunker};
///
/// let slabs = DocumentChunker.chunk("# Guide\nintro\n## Install\nsteps");
/// assert_eq!(slabs.len(), 2);
/// assert!(slabs[1].text.starts_with("## Install"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentChunker;

impl Chunker for DocumentChunker {
    fn chunk(&self, text: &str) -> Vec<Slab> {
        split_before(text, header_line())
    }
}

/// Splits before metadata marker lines.
///
/// Markers are Markdown headers, horizontal rules (`---`), lines opening
/// with an ISO date or a bracketed timestamp (`[2024-05-01 ...`,
/// `[00:05]`), and `From:` lines that start a mail message. Suited to chat
/// logs, transcripts, mail threads and changelogs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataChunker;

impl Chunker for MetadataChunker {
    fn chunk(&self, text: &str) -> Vec<Slab> {
        split_before(text, metadata_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(slabs: &[Slab]) -> Vec<&str> {
        slabs.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_preamble_kept() {
        let slabs = DocumentChunker.chunk("preamble\n# One\na\n## Two\nb");
        assert_eq!(texts(&slabs), vec!["preamble\n", "# One\na\n", "## Two\nb"]);
    }

    #[test]
    fn test_hash_without_space_is_not_header() {
        let slabs = DocumentChunker.chunk("#hashtag\ntext\n####### seven");
        assert_eq!(slabs.len(), 1);
    }

    #[test]
    fn test_chat_log_timestamps() {
        let log = "[2024-05-01 10:00] alice: hi\n[2024-05-01 10:01] bob: hello\n";
        let slabs = MetadataChunker.chunk(log);
        assert_eq!(slabs.len(), 2);
        assert!(slabs[1].text.contains("bob"));
    }

    #[test]
    fn test_transcript_timestamps() {
        let transcript = "# Video\n[00:00] Welcome.\n[00:05] Chunking today.\n";
        let slabs = MetadataChunker.chunk(transcript);
        assert_eq!(texts(&slabs), vec!["# Video\n", "[00:00] Welcome.\n", "[00:05] Chunking today.\n"]);
    }

    #[test]
    fn test_mail_thread() {
        let mail = "From: a@x\nSubject: one\n\nbody one\n---\nFrom: b@x\nbody two";
        let slabs = MetadataChunker.chunk(mail);
        assert_eq!(slabs.len(), 3);
        assert!(slabs[0].text.contains("Subject: one"));
        assert!(slabs[2].text.starts_with("From: b@x"));
    }

    #[test]
    fn test_empty() {
        assert!(DocumentChunker.chunk("").is_empty());
        assert!(MetadataChunker.chunk("").is_empty());
    }
}
