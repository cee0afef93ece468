use crate::error::{ChunkerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Token budget above which a document is chunked (exact tokenizer)
pub const DEFAULT_CHUNK_THRESHOLD: usize = 60_000;

/// Token budget above which both hierarchical and semantic passes run
pub const DEFAULT_COMBO_THRESHOLD: usize = 100_000;

/// Configuration for document chunking behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    /// Strategy to use, or `auto` to let the selector decide
    pub strategy: StrategyMode,

    /// Maximum chunk size in tokens (hard limit, atomic blocks excepted)
    pub max_tokens: usize,

    /// Tokens of trailing context repeated at fixed-size boundaries
    pub overlap: usize,

    /// Encoding id handed to the exact token counter
    pub encoding: String,

    /// Documents estimated below this many tokens are not chunked
    pub chunk_threshold: usize,

    /// Documents at or above this many tokens get the combined strategy
    pub combo_threshold: usize,

    /// Number of keywords kept per chunk
    pub keyword_top_n: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyMode::Auto,
            max_tokens: 8000,
            overlap: 400,
            encoding: "cl100k_base".to_string(),
            chunk_threshold: DEFAULT_CHUNK_THRESHOLD,
            combo_threshold: DEFAULT_COMBO_THRESHOLD,
            keyword_top_n: crate::metadata::DEFAULT_KEYWORD_TOP_N,
        }
    }
}

impl ChunkerConfig {
    /// Create config that forces one strategy
    pub fn with_strategy(strategy: ChunkingStrategy) -> Self {
        Self {
            strategy: StrategyMode::Forced(strategy),
            ..Default::default()
        }
    }

    /// Create config optimized for embeddings (smaller chunks, light overlap)
    pub fn for_embeddings() -> Self {
        Self {
            max_tokens: 512,
            overlap: 64,
            ..Default::default()
        }
    }

    /// Create config optimized for LLM context (large chunks)
    pub fn for_llm_context() -> Self {
        Self {
            max_tokens: 16_000,
            overlap: 800,
            ..Default::default()
        }
    }

    /// Chunking threshold in effect for the given estimator kind.
    ///
    /// The approximate estimator is less trustworthy, so it gets a
    /// conservative two-thirds of the configured threshold.
    #[must_use]
    pub const fn effective_chunk_threshold(&self, exact_tokenizer: bool) -> usize {
        if exact_tokenizer {
            self.chunk_threshold
        } else {
            self.chunk_threshold * 2 / 3
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_tokens == 0 {
            return Err(ChunkerError::invalid_config("max_tokens must be > 0"));
        }

        if self.combo_threshold < self.chunk_threshold {
            return Err(ChunkerError::invalid_config(format!(
                "combo_threshold ({}) cannot be below chunk_threshold ({})",
                self.combo_threshold, self.chunk_threshold
            )));
        }

        Ok(())
    }
}

/// Concrete chunking strategy applied to a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChunkingStrategy {
    /// Whole document as a single chunk
    #[serde(rename = "none")]
    None,

    /// Size-bounded chunks, flushed at headings
    #[serde(rename = "fixed")]
    Fixed,

    /// One chunk per heading section, with ancestor path
    #[serde(rename = "hierarchical")]
    Hierarchical,

    /// Boundaries at requirement ids and atomic blocks
    #[serde(rename = "semantic")]
    Semantic,

    /// Hierarchical first, oversized sections re-split semantically
    #[serde(rename = "hierarchical+semantic")]
    HierarchicalSemantic,
}

impl ChunkingStrategy {
    /// Get the wire name of the strategy
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Fixed => "fixed",
            Self::Hierarchical => "hierarchical",
            Self::Semantic => "semantic",
            Self::HierarchicalSemantic => "hierarchical+semantic",
        }
    }
}

impl fmt::Display for ChunkingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChunkingStrategy {
    type Err = ChunkerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "fixed" => Ok(Self::Fixed),
            "hierarchical" => Ok(Self::Hierarchical),
            "semantic" => Ok(Self::Semantic),
            "hierarchical+semantic" => Ok(Self::HierarchicalSemantic),
            _ => Err(ChunkerError::unknown_strategy(s)),
        }
    }
}

/// Requested strategy: selected automatically or forced by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StrategyMode {
    /// Let the strategy selector decide from size and structure
    #[default]
    Auto,

    /// Always use the given strategy
    Forced(ChunkingStrategy),
}

impl FromStr for StrategyMode {
    type Err = ChunkerError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        s.parse().map(Self::Forced)
    }
}

impl TryFrom<String> for StrategyMode {
    type Error = ChunkerError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<StrategyMode> for String {
    fn from(mode: StrategyMode) -> Self {
        mode.to_string()
    }
}

impl fmt::Display for StrategyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Forced(strategy) => f.write_str(strategy.as_str()),
        }
    }
}
