//! Context routing domain
//!
//! Classifies a task's estimated token volume into a size band and picks
//! which model leads. Token estimation itself lives behind a port in the
//! application layer; this module only sees the totals.

mod policy;
mod strategy;
mod value_objects;

pub use policy::{RoutingPolicy, SPLIT_CHUNK_BY_FILE, SPLIT_ITERATIVE};
pub use strategy::ProcessingStrategy;
pub use value_objects::{ContextAnalysis, ContextSize, RoutingMode};

/// Fallback estimate used when a tokenizer is unavailable or fails: one token per four chars.
pub fn approximate_tokens(text: &str) -> u64 {
    (text.chars().count() / 4) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approximate_tokens() {
        assert_eq!(approximate_tokens(""), 0);
        assert_eq!(approximate_tokens("abc"), 0);
        assert_eq!(approximate_tokens("abcdefgh"), 2);
    }
}
