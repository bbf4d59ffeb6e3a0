//! Completed model response.

use serde::{Deserialize, Serialize};

/// A finished, non-streaming model response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    pub content: String,
    /// Backend's stop reason ("stop", "length", "STOP", ...)
    pub finish_reason: String,
    /// Tokens billed for the exchange, when the backend reports them
    pub token_count: Option<u64>,
    pub model_used: String,
}

impl Generation {
    pub fn new(content: impl Into<String>, model_used: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            finish_reason: "stop".to_string(),
            token_count: None,
            model_used: model_used.into(),
        }
    }

    pub fn with_finish_reason(mut self, reason: impl Into<String>) -> Self {
        self.finish_reason = reason.into();
        self
    }

    pub fn with_token_count(mut self, tokens: u64) -> Self {
        self.token_count = Some(tokens);
        self
    }

    /// Whether the backend cut the output at its token limit.
    pub fn is_truncated(&self) -> bool {
        matches!(
            self.finish_reason.to_ascii_lowercase().as_str(),
            "length" | "max_tokens"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let generation = Generation::new("hello", "planner-7b");
        assert_eq!(generation.finish_reason, "stop");
        assert_eq!(generation.token_count, None);
        assert!(!generation.is_truncated());
    }

    #[test]
    fn test_truncation_detection() {
        let generation = Generation::new("partial", "m").with_finish_reason("MAX_TOKENS");
        assert!(generation.is_truncated());
        let generation = Generation::new("partial", "m").with_finish_reason("length");
        assert!(generation.is_truncated());
    }

    #[test]
    fn test_token_count_builder() {
        let generation = Generation::new("x", "m").with_token_count(42);
        assert_eq!(generation.token_count, Some(42));
    }
}
