//! # PRD Chunker
//!
//! Structure-aware chunking of long requirement documents (PRDs) for
//! retrieval and LLM context.
//!
//! ## Philosophy
//!
//! The chunker creates bounded fragments that:
//! - Never split a table or code block
//! - Remember where they live in the heading hierarchy
//! - Start new fragments at numbered requirements when the document has them
//! - Carry requirement ids, priority, category and keywords as metadata
//!
//! ## Architecture
//!
//! ```text
//! Document Text
//!     │
//!     ├──> Token Estimate (exact counter or chars / 3)
//!     │
//!     ├──> Structure Analysis → score, table ratio
//!     │
//!     ├──> Strategy Selection
//!     │    └─> none | fixed | hierarchical | semantic | hierarchical+semantic
//!     │
//!     ├──> Block Parsing → Heading / Table / CodeBlock / List / Paragraph
//!     │
//!     └──> Chunk Generation
//!          ├─> Build chunks within the token budget
//!          ├─> Link prev/next ids
//!          └─> Enrich metadata → DocumentResult
//! ```
//!
//! ## Example
//!
//! ```rust
//! use prd_chunker::{ChunkerConfig, ChunkingStrategy, DocumentProcessor};
//!
//! let config = ChunkerConfig::with_strategy(ChunkingStrategy::Hierarchical);
//! let processor = DocumentProcessor::new(config).unwrap();
//!
//! let text = "# Product\n## Login\n**R1. SSO** the system MUST support SSO.\n";
//! let result = processor.process("prd.md", text);
//! for chunk in &result.chunks {
//!     println!("{} [{}] {:?}", chunk.id, chunk.parent_summary, chunk.metadata.requirement_ids);
//! }
//! ```

mod builders;
mod config;
mod error;
mod link;
mod metadata;
mod parser;
mod patterns;
mod processor;
mod strategy;
mod structure;
mod tokens;
mod types;

pub use config::{
    ChunkerConfig, ChunkingStrategy, StrategyMode, DEFAULT_CHUNK_THRESHOLD, DEFAULT_COMBO_THRESHOLD,
};
pub use error::{ChunkerError, Result};
pub use link::link_chunks;
pub use metadata::{
    detect_document_type, detect_priority, extract_keywords, extract_requirement_ids,
    MetadataEnricher, DEFAULT_KEYWORD_TOP_N,
};
pub use parser::BlockParser;
pub use processor::{ChunkingStats, DocumentProcessor};
pub use strategy::StrategySelector;
pub use structure::{analyze, StructureInfo, HEAVY_TABLE_RATIO};
pub use tokens::{approximate_tokens, TokenCounter, TokenEstimator};
pub use types::{
    Block, BlockType, Chunk, ChunkMetadata, DocumentResult, DocumentType, Priority, SectionNode,
};

#[cfg(feature = "hf-tokenizers")]
pub use tokens::HfTokenizerCounter;
#[cfg(feature = "tiktoken")]
pub use tokens::TiktokenCounter;
