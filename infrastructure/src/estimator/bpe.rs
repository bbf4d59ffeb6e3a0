//! Exact token counts with the `cl100k_base` byte-pair encoding.

use duet_application::{EstimatorError, TokenEstimator};
use std::sync::Arc;
use tiktoken_rs::CoreBPE;

/// Counts tokens with a `tiktoken` encoding. Special-token text is encoded
/// as ordinary text.
#[derive(Clone)]
pub struct BpeTokenEstimator {
    bpe: Arc<CoreBPE>,
}

impl BpeTokenEstimator {
    /// Build the `cl100k_base` encoding. The vocabulary is embedded in the
    /// binary, so this only fails if it is corrupt.
    pub fn cl100k_base() -> Result<Self, EstimatorError> {
        let bpe = tiktoken_rs::cl100k_base()
            .map_err(|e| EstimatorError::Unavailable(format!("cl100k_base: {e}")))?;
        Ok(Self { bpe: Arc::new(bpe) })
    }
}

impl std::fmt::Debug for BpeTokenEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BpeTokenEstimator")
            .field("encoding", &"cl100k_base")
            .finish()
    }
}

impl TokenEstimator for BpeTokenEstimator {
    fn count_tokens(&self, text: &str) -> Result<u64, EstimatorError> {
        Ok(self.bpe.encode_ordinary(text).len() as u64)
    }

    fn name(&self) -> &str {
        "cl100k_base"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimator() -> BpeTokenEstimator {
        BpeTokenEstimator::cl100k_base().unwrap()
    }

    #[test]
    fn test_empty_text_is_zero() {
        assert_eq!(estimator().count_tokens("").unwrap(), 0);
    }

    #[test]
    fn test_known_counts() {
        let est = estimator();
        assert_eq!(est.count_tokens("hello world").unwrap(), 2);
        assert_eq!(est.count_tokens("hello").unwrap(), 1);
    }

    #[test]
    fn test_special_token_text_is_ordinary() {
        let est = estimator();
        assert!(est.count_tokens("<|endoftext|>").unwrap() > 1);
    }

    #[test]
    fn test_count_grows_with_text() {
        let est = estimator();
        let short = est.count_tokens("fn main() {}").unwrap();
        let long = est
            .count_tokens("fn main() { println!(\"reverse a string\"); }")
            .unwrap();
        assert!(long > short);
    }
}
