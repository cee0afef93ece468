use thiserror::Error;

/// Result type for chunker operations
pub type Result<T> = std::result::Result<T, ChunkerError>;

/// Errors that can occur while configuring or running the chunker
#[derive(Error, Debug)]
pub enum ChunkerError {
    /// Strategy name is not one of the supported values
    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Token counter could not be constructed
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),
}

impl ChunkerError {
    /// Create an unknown strategy error
    pub fn unknown_strategy(name: impl Into<String>) -> Self {
        Self::UnknownStrategy(name.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a tokenizer error
    pub fn tokenizer(msg: impl Into<String>) -> Self {
        Self::Tokenizer(msg.into())
    }
}
