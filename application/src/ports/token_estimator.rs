//! Token estimator port
//!
//! Maps text to an approximate token count. Any consistent estimator works;
//! the router only compares totals against thresholds.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EstimatorError {
    #[error("Tokenizer unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to encode text: {0}")]
    Encoding(String),
}

/// Estimates the number of tokens in a piece of text.
pub trait TokenEstimator: Send + Sync {
    fn count_tokens(&self, text: &str) -> Result<u64, EstimatorError>;

    /// Short identifier for logs.
    fn name(&self) -> &str {
        "unknown"
    }
}
