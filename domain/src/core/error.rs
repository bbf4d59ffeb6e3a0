//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid routing thresholds: small ({small}) must be below medium ({medium})")]
    InvalidThresholds { small: u64, medium: u64 },

    #[error("Invalid unit cost: {0} (must be finite and non-negative)")]
    InvalidUnitCost(f64),

    #[error("Invalid task: {0}")]
    InvalidTask(String),

    #[error("Invalid workflow transition: {0}")]
    InvalidTransition(String),
}

impl DomainError {
    /// Check if this error stems from configuration (fatal at construction time)
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidThresholds { .. } | DomainError::InvalidUnitCost(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_thresholds_display() {
        let error = DomainError::InvalidThresholds {
            small: 100,
            medium: 50,
        };
        assert_eq!(
            error.to_string(),
            "Invalid routing thresholds: small (100) must be below medium (50)"
        );
    }

    #[test]
    fn test_is_configuration_check() {
        assert!(DomainError::InvalidThresholds { small: 1, medium: 1 }.is_configuration());
        assert!(DomainError::InvalidUnitCost(-1.0).is_configuration());
        assert!(!DomainError::InvalidTask("empty".to_string()).is_configuration());
        assert!(!DomainError::InvalidTransition("x".to_string()).is_configuration());
    }
}
