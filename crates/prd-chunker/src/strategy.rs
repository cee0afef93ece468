use crate::config::{ChunkerConfig, ChunkingStrategy, DEFAULT_CHUNK_THRESHOLD, DEFAULT_COMBO_THRESHOLD};
use crate::structure::{self, StructureInfo};

/// Picks a chunking strategy from size and structural signals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategySelector {
    /// Below this estimate the document is kept whole
    pub chunk_threshold: usize,
    /// At or above this estimate both hierarchical and semantic passes run
    pub combo_threshold: usize,
}

impl Default for StrategySelector {
    fn default() -> Self {
        Self {
            chunk_threshold: DEFAULT_CHUNK_THRESHOLD,
            combo_threshold: DEFAULT_COMBO_THRESHOLD,
        }
    }
}

impl StrategySelector {
    /// Thresholds from config, narrowed when only the approximate estimator is available
    #[must_use]
    pub const fn from_config(config: &ChunkerConfig, exact_tokenizer: bool) -> Self {
        Self {
            chunk_threshold: config.effective_chunk_threshold(exact_tokenizer),
            combo_threshold: config.combo_threshold,
        }
    }

    /// Analyze `text` and choose a strategy for `tokens` estimated tokens
    #[must_use]
    pub fn select(&self, text: &str, tokens: usize) -> ChunkingStrategy {
        self.select_with(&structure::analyze(text), tokens)
    }

    /// Choose a strategy from precomputed structure signals
    #[must_use]
    pub fn select_with(&self, info: &StructureInfo, tokens: usize) -> ChunkingStrategy {
        let strategy = if tokens < self.chunk_threshold {
            ChunkingStrategy::None
        } else if info.is_structured() && tokens < self.combo_threshold {
            ChunkingStrategy::Hierarchical
        } else if info.is_heavy_table && !info.is_structured() {
            ChunkingStrategy::Semantic
        } else if tokens >= self.combo_threshold {
            ChunkingStrategy::HierarchicalSemantic
        } else {
            ChunkingStrategy::Fixed
        };

        log::debug!(
            "selected {strategy} (tokens={tokens}, score={}, heavy_table={}, thresholds={}/{})",
            info.score,
            info.is_heavy_table,
            self.chunk_threshold,
            self.combo_threshold
        );
        strategy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requirement_doc() -> StructureInfo {
        StructureInfo {
            heading_count: 4,
            h2_count: 3,
            has_table: true,
            has_requirement_numbers: true,
            table_line_ratio: 0.05,
            ..Default::default()
        }
        .scored()
    }

    #[test]
    fn test_small_documents_are_not_chunked() {
        let selector = StrategySelector::default();
        assert_eq!(
            selector.select_with(&requirement_doc(), 59_999),
            ChunkingStrategy::None
        );
    }

    #[test]
    fn test_structured_document_goes_hierarchical() {
        let selector = StrategySelector::default();
        assert_eq!(requirement_doc().score, 5);
        assert_eq!(
            selector.select_with(&requirement_doc(), 70_000),
            ChunkingStrategy::Hierarchical
        );
    }

    #[test]
    fn test_very_large_structured_document_gets_both_passes() {
        let selector = StrategySelector::default();
        assert_eq!(
            selector.select_with(&requirement_doc(), 120_000),
            ChunkingStrategy::HierarchicalSemantic
        );
    }

    #[test]
    fn test_table_heavy_document_goes_semantic() {
        let info = StructureInfo {
            has_table: true,
            table_line_ratio: 0.4,
            ..Default::default()
        }
        .scored();
        let selector = StrategySelector::default();
        assert_eq!(selector.select_with(&info, 70_000), ChunkingStrategy::Semantic);
        assert_eq!(selector.select_with(&info, 150_000), ChunkingStrategy::Semantic);
    }

    #[test]
    fn test_plain_large_document_goes_fixed() {
        let selector = StrategySelector::default();
        let info = StructureInfo::default().scored();
        assert_eq!(selector.select_with(&info, 70_000), ChunkingStrategy::Fixed);
        assert_eq!(
            selector.select_with(&info, 100_000),
            ChunkingStrategy::HierarchicalSemantic
        );
    }

    #[test]
    fn test_approximate_estimator_narrows_threshold() {
        let config = ChunkerConfig::default();
        let approx = StrategySelector::from_config(&config, false);
        let exact = StrategySelector::from_config(&config, true);
        assert_eq!(approx.chunk_threshold, 40_000);
        assert_eq!(exact.chunk_threshold, 60_000);

        let info = StructureInfo::default().scored();
        assert_eq!(approx.select_with(&info, 50_000), ChunkingStrategy::Fixed);
        assert_eq!(exact.select_with(&info, 50_000), ChunkingStrategy::None);
    }

    #[test]
    fn test_threshold_itself_is_chunked() {
        let config = ChunkerConfig::default();
        let info = StructureInfo::default().scored();

        let exact = StrategySelector::from_config(&config, true);
        assert_eq!(exact.select_with(&info, 60_000), ChunkingStrategy::Fixed);
        assert_eq!(
            exact.select_with(&requirement_doc(), 60_000),
            ChunkingStrategy::Hierarchical
        );

        let approx = StrategySelector::from_config(&config, false);
        assert_eq!(approx.select_with(&info, 40_000), ChunkingStrategy::Fixed);
        assert_eq!(approx.select_with(&info, 39_999), ChunkingStrategy::None);
    }

    #[test]
    fn test_select_analyzes_text() {
        let selector = StrategySelector {
            chunk_threshold: 10,
            combo_threshold: 1_000,
        };
        let text = "# A\n## B\n## C\n**R1. Login**\n| a |\n|---|\n";
        assert_eq!(selector.select(text, 100), ChunkingStrategy::Hierarchical);
        assert_eq!(selector.select(text, 5), ChunkingStrategy::None);
    }
}
