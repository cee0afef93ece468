use crate::builders::{
    BuildContext, CombinedBuilder, FixedBuilder, HierarchicalBuilder, SemanticBuilder,
};
use crate::config::{ChunkerConfig, ChunkingStrategy, StrategyMode};
use crate::error::Result;
use crate::link::link_chunks;
use crate::metadata::MetadataEnricher;
use crate::parser::BlockParser;
use crate::strategy::StrategySelector;
use crate::structure;
use crate::tokens::{TokenCounter, TokenEstimator};
use crate::types::{Block, Chunk, DocumentResult, SectionNode};
use std::sync::Arc;

/// Main entry point: turns one document into a linked, enriched chunk sequence
#[derive(Debug, Clone)]
pub struct DocumentProcessor {
    config: ChunkerConfig,
    estimator: TokenEstimator,
    parser: BlockParser,
    enricher: MetadataEnricher,
}

impl DocumentProcessor {
    /// Create a processor using the approximate token estimator
    pub fn new(config: ChunkerConfig) -> Result<Self> {
        Self::with_estimator(config, TokenEstimator::approximate())
    }

    /// Create a processor backed by an exact token counter
    pub fn with_token_counter(config: ChunkerConfig, counter: Arc<dyn TokenCounter>) -> Result<Self> {
        if counter.encoding() != config.encoding {
            log::warn!(
                "token counter uses encoding '{}' but config asks for '{}'",
                counter.encoding(),
                config.encoding
            );
        }
        Self::with_estimator(config, TokenEstimator::exact(counter))
    }

    fn with_estimator(config: ChunkerConfig, estimator: TokenEstimator) -> Result<Self> {
        config.validate()?;
        if !estimator.is_exact() {
            log::debug!("no exact token counter, using the character estimate");
        }
        Ok(Self {
            enricher: MetadataEnricher::new(config.keyword_top_n),
            parser: BlockParser::new(),
            config,
            estimator,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    #[must_use]
    pub const fn estimator(&self) -> &TokenEstimator {
        &self.estimator
    }

    /// Encoding reported in results: the counter's when one is installed
    fn encoding(&self) -> String {
        self.estimator
            .encoding()
            .unwrap_or(&self.config.encoding)
            .to_string()
    }

    /// Chunk one document
    #[must_use]
    pub fn process(&self, source_identifier: &str, text: &str) -> DocumentResult {
        let total_tokens = self.estimator.estimate(text);
        let info = structure::analyze(text);
        let strategy = match self.config.strategy {
            StrategyMode::Forced(strategy) => strategy,
            StrategyMode::Auto => StrategySelector::from_config(&self.config, self.estimator.is_exact())
                .select_with(&info, total_tokens),
        };

        let blocks = self.parser.parse(text);
        let section_tree = blocks
            .iter()
            .filter(|b| b.is_heading())
            .map(|b| SectionNode {
                title: b.heading_title().to_string(),
                level: b.heading_level,
            })
            .collect();

        let mut chunks = self.build(strategy, text, total_tokens, &blocks);
        link_chunks(&mut chunks);
        self.enricher.enrich_all(&mut chunks);

        log::debug!(
            "{source_identifier}: {strategy}, {} blocks -> {} chunks",
            blocks.len(),
            chunks.len()
        );

        DocumentResult {
            source_identifier: source_identifier.to_string(),
            total_chars: text.chars().count(),
            total_tokens,
            chunk_count: chunks.len(),
            max_tokens_per_chunk: self.config.max_tokens,
            overlap_tokens: self.config.overlap,
            encoding: self.encoding(),
            structured_mode: info.is_structured(),
            strategy,
            section_tree,
            chunks,
        }
    }

    fn build(
        &self,
        strategy: ChunkingStrategy,
        text: &str,
        total_tokens: usize,
        blocks: &[Block],
    ) -> Vec<Chunk> {
        let ctx = BuildContext::new(&self.estimator, self.config.max_tokens, self.config.overlap);
        match strategy {
            ChunkingStrategy::None => vec![Chunk {
                text: text.to_string(),
                token_count: total_tokens,
                has_table: blocks.iter().any(|b| b.has_table),
                has_code: blocks.iter().any(|b| b.has_code),
                end_offset: text.len(),
                ..Default::default()
            }],
            ChunkingStrategy::Fixed => FixedBuilder::new(ctx).build(blocks),
            ChunkingStrategy::Hierarchical => HierarchicalBuilder::new(ctx).build(blocks),
            ChunkingStrategy::Semantic => SemanticBuilder::new(ctx).build(blocks),
            ChunkingStrategy::HierarchicalSemantic => CombinedBuilder::new(ctx).build(blocks),
        }
    }

    /// Get statistics about a result
    #[must_use]
    pub fn get_stats(result: &DocumentResult) -> ChunkingStats {
        let tokens = || result.chunks.iter().map(|c| c.token_count);
        ChunkingStats {
            total_chunks: result.chunks.len(),
            total_tokens: tokens().sum(),
            avg_tokens_per_chunk: if result.chunks.is_empty() {
                0
            } else {
                tokens().sum::<usize>() / result.chunks.len()
            },
            min_tokens: tokens().min().unwrap_or(0),
            max_tokens: tokens().max().unwrap_or(0),
            oversized_chunks: result.oversized_chunks().count(),
        }
    }
}

/// Statistics about chunking results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkingStats {
    pub total_chunks: usize,
    pub total_tokens: usize,
    pub avg_tokens_per_chunk: usize,
    pub min_tokens: usize,
    pub max_tokens: usize,
    /// Lone atomic blocks over the budget
    pub oversized_chunks: usize,
}

impl std::fmt::Display for ChunkingStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chunks: {} | Tokens: {} | Avg: {} | Range: {}-{} | Oversized: {}",
            self.total_chunks,
            self.total_tokens,
            self.avg_tokens_per_chunk,
            self.min_tokens,
            self.max_tokens,
            self.oversized_chunks
        )
    }
}
