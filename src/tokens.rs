//! Token counting against the embedded BPE tables.
//!
//! Counting is optional: when the requested model is unknown to the
//! tokenizer the factory returns the `TokenizerUnavailable` sentinel, which
//! is fatal only when the caller actually asked for token counts. Binary
//! files are never counted.

use crate::errors::{Error, Result};
use tiktoken_rs::CoreBPE;

/// Model assumed when `--tokens` is requested without `--model`.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// A per-invocation token counter bound to one model.
pub struct TokenCounter {
    bpe: CoreBPE,
    model: String,
}

impl std::fmt::Debug for TokenCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCounter")
            .field("model", &self.model)
            .finish()
    }
}

impl TokenCounter {
    /// Resolves a model name to its BPE tables.
    ///
    /// # Errors
    /// Returns [`Error::TokenizerUnavailable`] when the embedded tables do
    /// not cover `model`; the sentinel is preserved so the orchestrator can
    /// decide whether that is fatal.
    pub fn for_model(model: &str) -> Result<Self> {
        let bpe = tiktoken_rs::get_bpe_from_model(model).map_err(|_| {
            Error::TokenizerUnavailable {
                model: model.to_string(),
            }
        })?;
        Ok(Self {
            bpe,
            model: model.to_string(),
        })
    }

    /// Counts tokens in a string.
    pub fn count_str(&self, text: &str) -> u64 {
        self.bpe.encode_with_special_tokens(text).len() as u64
    }

    /// The resolved model name this counter was built for.
    pub fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_model_counts() -> Result<()> {
        let counter = TokenCounter::for_model(DEFAULT_MODEL)?;
        assert_eq!(counter.model_name(), DEFAULT_MODEL);
        assert!(counter.count_str("hello world") > 0);
        assert_eq!(counter.count_str(""), 0);
        Ok(())
    }

    #[test]
    fn test_unknown_model_is_sentinel() {
        match TokenCounter::for_model("definitely-not-a-model") {
            Err(Error::TokenizerUnavailable { model }) => {
                assert_eq!(model, "definitely-not-a-model");
            }
            other => panic!("expected TokenizerUnavailable, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_counts_are_deterministic() -> Result<()> {
        let counter = TokenCounter::for_model(DEFAULT_MODEL)?;
        let text = "fn main() { println!(\"hi\"); }";
        assert_eq!(counter.count_str(text), counter.count_str(text));
        Ok(())
    }
}
