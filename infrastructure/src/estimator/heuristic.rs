//! Heuristic token estimator.
//!
//! Approximates tokens from character and word counts. Used when the BPE
//! vocabulary cannot be loaded; it never fails.

use duet_application::{EstimatorError, TokenEstimator};

/// Character-based estimator: roughly four characters per token, but never
/// fewer tokens than words.
#[derive(Debug, Clone)]
pub struct HeuristicTokenEstimator {
    chars_per_token: f64,
}

impl HeuristicTokenEstimator {
    pub fn new() -> Self {
        Self {
            chars_per_token: 4.0,
        }
    }

    pub fn with_chars_per_token(mut self, ratio: f64) -> Self {
        if ratio.is_finite() && ratio > 0.0 {
            self.chars_per_token = ratio;
        }
        self
    }
}

impl Default for HeuristicTokenEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenEstimator for HeuristicTokenEstimator {
    fn count_tokens(&self, text: &str) -> Result<u64, EstimatorError> {
        let chars = text.chars().count() as f64;
        let by_chars = (chars / self.chars_per_token).ceil() as u64;
        let words = text.split_whitespace().count() as u64;
        Ok(by_chars.max(words))
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}
