//! Token estimation.
//!
//! An exact [`TokenCounter`] can be plugged in; without one the estimator
//! falls back to one token per three characters.

use std::fmt;
use std::sync::Arc;

/// Exact sub-word token counter bound to a named encoding
pub trait TokenCounter: Send + Sync {
    /// Count the tokens `text` encodes to
    fn count_tokens(&self, text: &str) -> usize;

    /// Encoding id this counter was built for
    fn encoding(&self) -> &str;
}

/// Approximate token count: one token per three characters
#[must_use]
pub fn approximate_tokens(text: &str) -> usize {
    text.chars().count() / 3
}

/// Token estimator used by every stage of the pipeline
#[derive(Clone, Default)]
pub struct TokenEstimator {
    counter: Option<Arc<dyn TokenCounter>>,
}

impl TokenEstimator {
    /// Estimator backed by an exact counter
    pub fn exact(counter: Arc<dyn TokenCounter>) -> Self {
        Self {
            counter: Some(counter),
        }
    }

    /// Estimator using the character heuristic only
    #[must_use]
    pub fn approximate() -> Self {
        Self { counter: None }
    }

    /// Whether an exact counter is installed
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.counter.is_some()
    }

    /// Encoding of the installed counter
    #[must_use]
    pub fn encoding(&self) -> Option<&str> {
        self.counter.as_deref().map(|counter| counter.encoding())
    }

    /// Estimate tokens for `text`
    #[must_use]
    pub fn estimate(&self, text: &str) -> usize {
        match &self.counter {
            Some(counter) => counter.count_tokens(text),
            None => approximate_tokens(text),
        }
    }
}

impl fmt::Debug for TokenEstimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenEstimator")
            .field("encoding", &self.counter.as_ref().map(|c| c.encoding()))
            .finish()
    }
}

#[cfg(feature = "tiktoken")]
pub use self::tiktoken::TiktokenCounter;

#[cfg(feature = "tiktoken")]
mod tiktoken {
    use super::TokenCounter;
    use crate::error::{ChunkerError, Result};
    use tiktoken_rs::CoreBPE;

    /// Counter for OpenAI BPE encodings
    pub struct TiktokenCounter {
        encoding: String,
        bpe: CoreBPE,
    }

    impl TiktokenCounter {
        /// Load the BPE tables for a named encoding
        pub fn new(encoding: &str) -> Result<Self> {
            let bpe = match encoding {
                "cl100k_base" => tiktoken_rs::cl100k_base(),
                "p50k_base" => tiktoken_rs::p50k_base(),
                "p50k_edit" => tiktoken_rs::p50k_edit(),
                "r50k_base" | "gpt2" => tiktoken_rs::r50k_base(),
                other => {
                    return Err(ChunkerError::tokenizer(format!(
                        "unsupported encoding: {other}"
                    )))
                }
            }
            .map_err(|e| ChunkerError::tokenizer(format!("failed to load {encoding}: {e}")))?;

            Ok(Self {
                encoding: encoding.to_string(),
                bpe,
            })
        }
    }

    impl TokenCounter for TiktokenCounter {
        fn count_tokens(&self, text: &str) -> usize {
            self.bpe.encode_ordinary(text).len()
        }

        fn encoding(&self) -> &str {
            &self.encoding
        }
    }
}

#[cfg(feature = "hf-tokenizers")]
pub use self::hf::HfTokenizerCounter;

#[cfg(feature = "hf-tokenizers")]
mod hf {
    use super::{approximate_tokens, TokenCounter};
    use crate::error::{ChunkerError, Result};
    use std::path::Path;
    use tokenizers::Tokenizer;

    /// Counter backed by a HuggingFace `tokenizer.json`
    pub struct HfTokenizerCounter {
        encoding: String,
        tokenizer: Tokenizer,
    }

    impl HfTokenizerCounter {
        /// Load a tokenizer file; `encoding` is the id reported in results
        pub fn from_file(path: impl AsRef<Path>, encoding: impl Into<String>) -> Result<Self> {
            let path = path.as_ref();
            let tokenizer = Tokenizer::from_file(path).map_err(|e| {
                ChunkerError::tokenizer(format!("failed to load {}: {e}", path.display()))
            })?;
            Ok(Self::new(tokenizer, encoding))
        }

        /// Wrap an already loaded tokenizer
        pub fn new(tokenizer: Tokenizer, encoding: impl Into<String>) -> Self {
            Self {
                encoding: encoding.into(),
                tokenizer,
            }
        }
    }

    impl TokenCounter for HfTokenizerCounter {
        fn count_tokens(&self, text: &str) -> usize {
            match self.tokenizer.encode(text, false) {
                Ok(encoding) => encoding.len(),
                Err(e) => {
                    log::warn!(
                        "{} failed to encode {} chars, using the character estimate: {e}",
                        self.encoding,
                        text.len()
                    );
                    approximate_tokens(text)
                }
            }
        }

        fn encoding(&self) -> &str {
            &self.encoding
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::str::FromStr;

        // Word-level vocabulary with no unknown token in it
        const TOKENIZER_JSON: &str = r#"{
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [],
            "normalizer": null,
            "pre_tokenizer": {"type": "Whitespace"},
            "post_processor": null,
            "decoder": null,
            "model": {"type": "WordLevel", "vocab": {"hello": 0}, "unk_token": "[UNK]"}
        }"#;

        fn counter() -> HfTokenizerCounter {
            let tokenizer = Tokenizer::from_str(TOKENIZER_JSON).unwrap();
            HfTokenizerCounter::new(tokenizer, "hello-words")
        }

        #[test]
        fn test_counts_known_words() {
            let counter = counter();
            assert_eq!(counter.count_tokens("hello hello"), 2);
            assert_eq!(counter.encoding(), "hello-words");
        }

        #[test]
        fn test_encode_failure_falls_back_to_estimate() {
            let text = "hello unknown words";
            assert_eq!(counter().count_tokens(text), approximate_tokens(text));
        }
    }
}
