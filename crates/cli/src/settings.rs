use anyhow::{Context, Result};
use prd_chunker::{ChunkerConfig, StrategyMode};
use std::fs;
use std::path::Path;

/// Values given on the command line; each one replaces the config file's
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub strategy: Option<StrategyMode>,
    pub max_tokens: Option<usize>,
    pub overlap: Option<usize>,
    pub encoding: Option<String>,
    pub chunk_threshold: Option<usize>,
}

impl Overrides {
    pub fn apply(self, config: &mut ChunkerConfig) {
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.max_tokens = max_tokens;
        }
        if let Some(overlap) = self.overlap {
            config.overlap = overlap;
        }
        if let Some(encoding) = self.encoding {
            config.encoding = encoding;
        }
        if let Some(threshold) = self.chunk_threshold {
            config.chunk_threshold = threshold;
        }
    }
}

/// Read a TOML config file; missing keys keep their defaults
pub fn load_config(path: &Path) -> Result<ChunkerConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_config(&raw).with_context(|| format!("invalid config {}", path.display()))
}

fn parse_config(raw: &str) -> Result<ChunkerConfig> {
    Ok(toml::from_str(raw)?)
}

/// Config file (or defaults) with command-line overrides, validated
pub fn resolve(path: Option<&Path>, overrides: Overrides) -> Result<ChunkerConfig> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => ChunkerConfig::default(),
    };
    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}
