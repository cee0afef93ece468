use crate::config::ChunkingStrategy;
use serde::{Deserialize, Serialize};

/// A typed unit of parsed document text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockType,

    /// Verbatim source text, `source[start..end]`
    pub text: String,

    /// Heading depth 1-4, 0 for non-headings
    pub heading_level: u8,

    /// Atomic blocks are never split across chunks
    pub is_atomic: bool,

    pub has_table: bool,

    pub has_code: bool,

    /// Byte offset of the first character in the source
    pub start: usize,

    /// Byte offset one past the last character in the source
    pub end: usize,
}

impl Block {
    /// Create a block; atomicity and content flags follow from the kind
    #[must_use]
    pub fn new(kind: BlockType, text: impl Into<String>, start: usize, heading_level: u8) -> Self {
        let text = text.into();
        let end = start + text.len();
        Self {
            kind,
            heading_level: if kind == BlockType::Heading {
                heading_level
            } else {
                0
            },
            is_atomic: kind.is_atomic(),
            has_table: kind == BlockType::Table,
            has_code: kind == BlockType::CodeBlock,
            text,
            start,
            end,
        }
    }

    #[must_use]
    pub fn is_heading(&self) -> bool {
        self.kind == BlockType::Heading
    }

    /// Heading title without markers (empty for non-headings)
    #[must_use]
    pub fn heading_title(&self) -> &str {
        if !self.is_heading() {
            return "";
        }
        crate::patterns::heading(&self.text).map_or("", |(_, title)| title)
    }

    /// Sub-block covering `self.text[from..to]`, same kind and offsets kept exact
    #[must_use]
    pub(crate) fn slice(&self, from: usize, to: usize) -> Self {
        Self::new(
            self.kind,
            &self.text[from..to],
            self.start + from,
            self.heading_level,
        )
    }
}

/// Kind of parsed block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    Heading,
    Table,
    CodeBlock,
    List,
    Paragraph,
}

impl BlockType {
    /// Tables and code blocks must stay whole
    #[must_use]
    pub const fn is_atomic(self) -> bool {
        matches!(self, Self::Table | Self::CodeBlock)
    }

    /// Get human-readable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Heading => "heading",
            Self::Table => "table",
            Self::CodeBlock => "code_block",
            Self::List => "list",
            Self::Paragraph => "paragraph",
        }
    }
}

/// A bounded-size unit of a document with hierarchy and metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// Position in the chunk chain, contiguous from 0
    #[serde(rename = "chunk_id")]
    pub id: usize,

    pub text: String,

    pub token_count: usize,

    /// Heading titles from document root to the owning section
    #[serde(default)]
    pub section_path: Vec<String>,

    /// Heading depth of the owning section (0 = root)
    #[serde(default)]
    pub nesting_level: u8,

    /// `section_path` joined with `/`
    #[serde(default)]
    pub parent_summary: String,

    pub prev_id: Option<usize>,

    pub next_id: Option<usize>,

    #[serde(default)]
    pub has_table: bool,

    #[serde(default)]
    pub has_code: bool,

    /// The chunk is exactly one table or code block
    #[serde(default)]
    pub is_atomic: bool,

    /// Byte offset where the chunk's source span starts
    #[serde(default)]
    pub start_offset: usize,

    /// Byte offset where the chunk's source span ends
    #[serde(default)]
    pub end_offset: usize,

    /// Length of the leading text repeated from the previous chunk
    #[serde(default)]
    pub overlap_chars: usize,

    #[serde(flatten)]
    pub metadata: ChunkMetadata,
}

impl Chunk {
    /// Text without the prefix repeated from the previous chunk
    #[must_use]
    pub fn own_text(&self) -> &str {
        self.text.get(self.overlap_chars..).unwrap_or(&self.text)
    }

    /// Attach the chunk to a section
    pub fn set_section(&mut self, path: &[String], nesting_level: u8) {
        self.section_path = path.to_vec();
        self.nesting_level = nesting_level;
        self.parent_summary = path.join("/");
    }
}

/// Metadata extracted from chunk text
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkMetadata {
    /// Requirement ids in first-seen order, deduplicated
    #[serde(default)]
    pub requirement_ids: Vec<String>,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub document_type: DocumentType,

    /// Most frequent terms first
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Priority derived from MoSCoW wording
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[default]
    #[serde(rename = "")]
    Unspecified,
    #[serde(rename = "high")]
    High,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "low")]
    Low,
}

impl Priority {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unspecified => "",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Requirement category of a chunk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    #[default]
    #[serde(rename = "")]
    Unspecified,
    #[serde(rename = "functional")]
    Functional,
    #[serde(rename = "non-functional")]
    NonFunctional,
    #[serde(rename = "constraint")]
    Constraint,
    #[serde(rename = "glossary")]
    Glossary,
}

impl DocumentType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unspecified => "",
            Self::Functional => "functional",
            Self::NonFunctional => "non-functional",
            Self::Constraint => "constraint",
            Self::Glossary => "glossary",
        }
    }
}

/// Heading entry of the document outline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionNode {
    pub title: String,
    pub level: u8,
}

/// Result of processing one document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentResult {
    pub source_identifier: String,
    pub total_chars: usize,
    pub total_tokens: usize,
    pub chunk_count: usize,
    pub max_tokens_per_chunk: usize,
    /// Configured overlap; applied at fixed-size boundaries only
    pub overlap_tokens: usize,
    pub encoding: String,
    pub structured_mode: bool,
    pub strategy: ChunkingStrategy,
    pub section_tree: Vec<SectionNode>,
    pub chunks: Vec<Chunk>,
}

impl DocumentResult {
    /// Chunks over the token budget (only lone atomic blocks can be)
    pub fn oversized_chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks
            .iter()
            .filter(move |chunk| chunk.token_count > self.max_tokens_per_chunk)
    }
}
