//! The strategy catalog.
//!
//! Fifteen strategies, three of which need a language model and are run by
//! an injected [`AiSplitter`](crate::AiSplitter). The catalog is static
//! reference data for pickers and docs; nothing mutates it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A chunking strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Fixed character windows with overlap.
    FixedSize,
    /// Separator hierarchy, coarsest first.
    #[default]
    Recursive,
    /// Split before Markdown headers.
    Document,
    /// Topic shifts found by a language model.
    Semantic,
    /// UAX #29 sentences packed up to the size.
    Sentence,
    /// One span per paragraph.
    Paragraph,
    /// Fixed windows sized in tokens.
    Token,
    /// Overlapping word windows.
    SlidingWindow,
    /// Fenced code blocks separated from prose.
    ContentAware,
    /// Split before metadata marker lines.
    Metadata,
    /// Clause and discourse boundaries found by a language model.
    Linguistic,
    /// Paragraphs packed up to the size.
    Hybrid,
    /// Free-form segmentation by a language model.
    Llm,
    /// Declaration-aware recursive splitting for source code.
    Code,
    /// Split on a user-supplied regular expression.
    Regex,
}

impl Strategy {
    /// Every strategy, in catalog order.
    pub const ALL: [Self; 15] = [
        Self::FixedSize,
        Self::Recursive,
        Self::Code,
        Self::Regex,
        Self::Document,
        Self::Semantic,
        Self::Sentence,
        Self::Paragraph,
        Self::Token,
        Self::SlidingWindow,
        Self::ContentAware,
        Self::Metadata,
        Self::Linguistic,
        Self::Hybrid,
        Self::Llm,
    ];

    /// Whether this strategy is delegated to an external AI splitter.
    #[must_use]
    pub const fn requires_ai(self) -> bool {
        matches!(self, Self::Semantic | Self::Linguistic | Self::Llm)
    }

    /// The catalog entry for this strategy.
    #[must_use]
    pub fn definition(self) -> &'static StrategyDefinition {
        STRATEGIES
            .iter()
            .find(|d| d.strategy == self)
            .unwrap_or(&STRATEGIES[1])
    }

    /// Short stable identifier (`"fixed"`, `"recursive"`, ...).
    #[must_use]
    pub fn id(self) -> &'static str {
        self.definition().id
    }

    /// Look a strategy up by its short identifier.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        STRATEGIES.iter().find(|d| d.id == id).map(|d| d.strategy)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.definition().name)
    }
}

/// Rough implementation and runtime cost of a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Complexity {
    /// Linear scan, no tuning.
    Low,
    /// Some tuning or structure awareness.
    Medium,
    /// Model calls or syntax awareness.
    High,
}

/// A read-only catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyDefinition {
    /// The strategy described.
    pub strategy: Strategy,
    /// Short stable identifier.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// One-sentence description.
    pub description: &'static str,
    /// Content this strategy suits.
    pub best_for: &'static [&'static str],
    /// Content this strategy handles badly.
    pub worst_for: &'static [&'static str],
    /// Cost class.
    pub complexity: Complexity,
    /// Whether an external AI call is needed.
    pub requires_ai: bool,
}

/// The full catalog.
pub static STRATEGIES: [StrategyDefinition; 15] = [
    StrategyDefinition {
        strategy: Strategy::FixedSize,
        id: "fixed",
        name: "Fixed-Size Chunking",
        description: "Splits text into chunks of a predetermined character count, regardless of content structure.",
        best_for: &["Simple implementations", "Uniform processing", "Memory-constrained systems"],
        worst_for: &["Semantic coherence", "Complex document structures"],
        complexity: Complexity::Low,
        requires_ai: false,
    },
    StrategyDefinition {
        strategy: Strategy::Recursive,
        id: "recursive",
        name: "Recursive Chunking",
        description: "Iteratively splits text using a hierarchy of separators to find the largest chunks that fit the size limit.",
        best_for: &["LangChain compatibility", "General-purpose RAG", "Preserving context"],
        worst_for: &["Highly specialized formats", "Streaming data"],
        complexity: Complexity::Medium,
        requires_ai: false,
    },
    StrategyDefinition {
        strategy: Strategy::Code,
        id: "code",
        name: "Code Splitter",
        description: "Splits code before top-level declarations (classes, functions) to keep logic together.",
        best_for: &["Python", "JavaScript/TypeScript", "Rust"],
        worst_for: &["Natural language", "Minified code"],
        complexity: Complexity::High,
        requires_ai: false,
    },
    StrategyDefinition {
        strategy: Strategy::Regex,
        id: "regex",
        name: "Regex Splitter",
        description: "Splits text on a user-defined regular expression.",
        best_for: &["Custom formats", "Log files", "Specific delimiters"],
        worst_for: &["General prose", "Variable structure"],
        complexity: Complexity::Medium,
        requires_ai: false,
    },
    StrategyDefinition {
        strategy: Strategy::Document,
        id: "document",
        name: "Document-Based Chunking",
        description: "Splits on document structure such as headers and sections.",
        best_for: &["Markdown", "Books", "Technical Docs"],
        worst_for: &["Unstructured text", "Tweets/Emails"],
        complexity: Complexity::Medium,
        requires_ai: false,
    },
    StrategyDefinition {
        strategy: Strategy::Semantic,
        id: "semantic",
        name: "Semantic Chunking",
        description: "Uses a language model to find topic shifts and cut on meaning rather than length.",
        best_for: &["High-accuracy RAG", "Multi-topic documents"],
        worst_for: &["Real-time/Latency sensitive", "Low budget"],
        complexity: Complexity::High,
        requires_ai: true,
    },
    StrategyDefinition {
        strategy: Strategy::Sentence,
        id: "sentence",
        name: "Sentence-Based Chunking",
        description: "Splits at sentence boundaries and groups sentences until the size limit is reached.",
        best_for: &["QA Systems", "News articles"],
        worst_for: &["Lists", "Complex formatting"],
        complexity: Complexity::Low,
        requires_ai: false,
    },
    StrategyDefinition {
        strategy: Strategy::Paragraph,
        id: "paragraph",
        name: "Paragraph-Based Chunking",
        description: "Keeps every paragraph intact as its own chunk.",
        best_for: &["Essays", "Narratives", "Blogs"],
        worst_for: &["Code blocks", "Irregular formatting"],
        complexity: Complexity::Low,
        requires_ai: false,
    },
    StrategyDefinition {
        strategy: Strategy::Token,
        id: "token",
        name: "Token-Based Chunking",
        description: "Splits on an approximate token count to fit model context windows.",
        best_for: &["LLM Training", "Cost optimization"],
        worst_for: &["Human readability"],
        complexity: Complexity::Medium,
        requires_ai: false,
    },
    StrategyDefinition {
        strategy: Strategy::SlidingWindow,
        id: "sliding",
        name: "Sliding Window Chunking",
        description: "Creates overlapping chunks by moving a word window across the text.",
        best_for: &["Context continuity", "Search/Retrieval"],
        worst_for: &["Storage efficiency"],
        complexity: Complexity::Low,
        requires_ai: false,
    },
    StrategyDefinition {
        strategy: Strategy::ContentAware,
        id: "content",
        name: "Content-Aware Chunking",
        description: "Separates fenced code blocks from the prose around them.",
        best_for: &["Mixed-format docs", "Technical papers"],
        worst_for: &["Pure prose"],
        complexity: Complexity::High,
        requires_ai: false,
    },
    StrategyDefinition {
        strategy: Strategy::Metadata,
        id: "metadata",
        name: "Metadata-Driven Chunking",
        description: "Uses headers, timestamps and mail headers to define boundaries.",
        best_for: &["Chat logs", "Emails", "Multi-author docs"],
        worst_for: &["Unstructured data"],
        complexity: Complexity::Medium,
        requires_ai: false,
    },
    StrategyDefinition {
        strategy: Strategy::Linguistic,
        id: "linguistic",
        name: "Linguistic Chunking",
        description: "Uses grammatical features such as clauses and discourse markers to split text.",
        best_for: &["Deep NLP analysis", "Legal docs"],
        worst_for: &["Informal text"],
        complexity: Complexity::High,
        requires_ai: true,
    },
    StrategyDefinition {
        strategy: Strategy::Hybrid,
        id: "hybrid",
        name: "Hybrid/Adaptive Chunking",
        description: "Packs whole paragraphs together up to the size limit.",
        best_for: &["Production systems", "Diverse corpus"],
        worst_for: &["Simple use cases"],
        complexity: Complexity::Medium,
        requires_ai: false,
    },
    StrategyDefinition {
        strategy: Strategy::Llm,
        id: "llm",
        name: "LLM-Based Chunking",
        description: "Asks a language model to segment the text into self-contained chunks.",
        best_for: &["Nuanced content", "Highest accuracy"],
        worst_for: &["Large scale processing"],
        complexity: Complexity::High,
        requires_ai: true,
    },
];
