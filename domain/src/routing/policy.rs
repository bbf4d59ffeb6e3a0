//! Routing policy: token-volume thresholds and the classification built on them.

use super::value_objects::{ContextAnalysis, ContextSize, RoutingMode};
use crate::core::error::DomainError;
use crate::util::format_thousands;
use serde::{Deserialize, Serialize};

/// Split label used when a MEDIUM task with attachments is too big for one pass.
pub const SPLIT_CHUNK_BY_FILE: &str = "chunk_by_file";
/// Split label used when a LARGE task exceeds the iterative threshold.
pub const SPLIT_ITERATIVE: &str = "iterative_processing";

/// Thresholds and cost factor driving context classification.
///
/// `small_threshold < medium_threshold` is enforced by [`RoutingPolicy::try_new`];
/// an instance that exists is always valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingPolicy {
    small_threshold: u64,
    medium_threshold: u64,
    /// Cost per 1000 tokens for the HeavyLifter
    unit_cost: f64,
    medium_split_threshold: u64,
    large_split_threshold: u64,
}

impl Default for RoutingPolicy {
    fn default() -> Self {
        Self {
            small_threshold: 8_000,
            medium_threshold: 100_000,
            unit_cost: 0.001,
            medium_split_threshold: 50_000,
            large_split_threshold: 1_000_000,
        }
    }
}

impl RoutingPolicy {
    /// Create a policy with the given size thresholds and default cost/split factors.
    pub fn try_new(small_threshold: u64, medium_threshold: u64) -> Result<Self, DomainError> {
        if small_threshold >= medium_threshold {
            return Err(DomainError::InvalidThresholds {
                small: small_threshold,
                medium: medium_threshold,
            });
        }
        Ok(Self {
            small_threshold,
            medium_threshold,
            ..Self::default()
        })
    }

    pub fn with_unit_cost(mut self, unit_cost: f64) -> Result<Self, DomainError> {
        if !unit_cost.is_finite() || unit_cost < 0.0 {
            return Err(DomainError::InvalidUnitCost(unit_cost));
        }
        self.unit_cost = unit_cost;
        Ok(self)
    }

    pub fn with_split_thresholds(mut self, medium: u64, large: u64) -> Self {
        self.medium_split_threshold = medium;
        self.large_split_threshold = large;
        self
    }

    pub fn small_threshold(&self) -> u64 {
        self.small_threshold
    }

    pub fn medium_threshold(&self) -> u64 {
        self.medium_threshold
    }

    pub fn unit_cost(&self) -> f64 {
        self.unit_cost
    }

    pub fn medium_split_threshold(&self) -> u64 {
        self.medium_split_threshold
    }

    pub fn large_split_threshold(&self) -> u64 {
        self.large_split_threshold
    }

    /// Pure size classification of a token total.
    pub fn classify(&self, token_count: u64) -> ContextSize {
        if token_count < self.small_threshold {
            ContextSize::Small
        } else if token_count < self.medium_threshold {
            ContextSize::Medium
        } else {
            ContextSize::Large
        }
    }

    /// Rough HeavyLifter cost; zero when the Planner handles the task alone.
    pub fn estimate_cost(&self, token_count: u64, mode: RoutingMode) -> f64 {
        match mode {
            RoutingMode::PlannerPrimary => 0.0,
            _ => (token_count as f64 / 1000.0) * self.unit_cost,
        }
    }

    /// Build the complete routing decision for a token total.
    pub fn analyze(&self, token_count: u64, has_attachments: bool) -> ContextAnalysis {
        let size = self.classify(token_count);
        let mode = size.routing_mode();

        let (should_split, split_strategy) = match size {
            ContextSize::Small => (false, None),
            ContextSize::Medium => {
                let split = token_count > self.medium_split_threshold;
                let strategy = (split && has_attachments).then(|| SPLIT_CHUNK_BY_FILE.to_string());
                (split, strategy)
            }
            ContextSize::Large => {
                let split = token_count > self.large_split_threshold;
                (split, split.then(|| SPLIT_ITERATIVE.to_string()))
            }
        };

        let estimated_cost = self.estimate_cost(token_count, mode);
        let recommendations = recommendations_for(mode, token_count, estimated_cost);

        ContextAnalysis::new(
            token_count,
            size,
            estimated_cost,
            recommendations,
            should_split,
            split_strategy,
        )
    }
}

fn recommendations_for(mode: RoutingMode, token_count: u64, cost: f64) -> Vec<String> {
    let mut recommendations: Vec<String> = match mode {
        RoutingMode::PlannerPrimary => vec![
            "Planner will handle primary processing".to_string(),
            "HeavyLifter will verify the solution".to_string(),
            "Efficient for quick tasks".to_string(),
        ],
        RoutingMode::CollaborativeMedium => vec![
            "Planner coordinates the workflow".to_string(),
            "HeavyLifter assists with context-aware processing".to_string(),
            "Collaborative approach for complex tasks".to_string(),
        ],
        RoutingMode::HeavyLifting => vec![
            "Planner orchestrates the overall strategy".to_string(),
            "HeavyLifter handles heavy lifting with full context".to_string(),
            "Optimal for codebase analysis, log processing, etc.".to_string(),
        ],
    };

    if mode == RoutingMode::HeavyLifting {
        recommendations.push(format!(
            "Large context detected ({} tokens). Estimated cost: ${:.4}",
            format_thousands(token_count),
            cost
        ));
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_rejects_unordered_thresholds() {
        assert_eq!(
            RoutingPolicy::try_new(100, 100),
            Err(DomainError::InvalidThresholds {
                small: 100,
                medium: 100
            })
        );
        assert!(RoutingPolicy::try_new(200, 100).is_err());
        assert!(RoutingPolicy::try_new(99, 100).is_ok());
    }

    #[test]
    fn test_negative_unit_cost_rejected() {
        let result = RoutingPolicy::default().with_unit_cost(-0.5);
        assert_eq!(result, Err(DomainError::InvalidUnitCost(-0.5)));
        assert!(RoutingPolicy::default().with_unit_cost(f64::NAN).is_err());
    }

    #[test]
    fn test_classify_boundaries() {
        let policy = RoutingPolicy::default();
        assert_eq!(policy.classify(0), ContextSize::Small);
        assert_eq!(policy.classify(7_999), ContextSize::Small);
        assert_eq!(policy.classify(8_000), ContextSize::Medium);
        assert_eq!(policy.classify(99_999), ContextSize::Medium);
        assert_eq!(policy.classify(100_000), ContextSize::Large);
    }

    #[test]
    fn test_classification_is_monotone() {
        let policy = RoutingPolicy::default();
        let samples = [0, 10, 7_999, 8_000, 50_000, 99_999, 100_000, 2_000_000];
        for pair in samples.windows(2) {
            assert!(policy.classify(pair[0]) as u8 <= policy.classify(pair[1]) as u8);
        }
    }

    #[test]
    fn test_small_analysis_is_free_and_never_split() {
        let analysis = RoutingPolicy::default().analyze(500, true);
        assert_eq!(analysis.routing_mode(), RoutingMode::PlannerPrimary);
        assert_eq!(analysis.estimated_cost(), 0.0);
        assert!(!analysis.should_split());
        assert_eq!(analysis.split_strategy(), None);
        assert_eq!(analysis.recommendations().len(), 3);
    }

    #[test]
    fn test_medium_split_requires_attachments_for_label() {
        let policy = RoutingPolicy::default();

        let with_files = policy.analyze(60_000, true);
        assert!(with_files.should_split());
        assert_eq!(with_files.split_strategy(), Some(SPLIT_CHUNK_BY_FILE));

        let without_files = policy.analyze(60_000, false);
        assert!(without_files.should_split());
        assert_eq!(without_files.split_strategy(), None);

        let at_threshold = policy.analyze(50_000, true);
        assert!(!at_threshold.should_split());
    }

    #[test]
    fn test_medium_cost_is_proportional() {
        let analysis = RoutingPolicy::default().analyze(20_000, false);
        assert_eq!(analysis.routing_mode(), RoutingMode::CollaborativeMedium);
        assert!((analysis.estimated_cost() - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_large_appends_cost_warning() {
        let analysis = RoutingPolicy::default().analyze(1_500_000, false);
        assert_eq!(analysis.routing_mode(), RoutingMode::HeavyLifting);
        assert!(analysis.should_split());
        assert_eq!(analysis.split_strategy(), Some(SPLIT_ITERATIVE));
        assert!((analysis.estimated_cost() - 1.5).abs() < 1e-12);

        let last = analysis.recommendations().last().unwrap();
        assert_eq!(
            last,
            "Large context detected (1,500,000 tokens). Estimated cost: $1.5000"
        );
    }

    #[test]
    fn test_large_below_split_threshold() {
        let analysis = RoutingPolicy::default().analyze(150_000, true);
        assert!(!analysis.should_split());
        assert_eq!(analysis.split_strategy(), None);
        assert_eq!(analysis.recommendations().len(), 4);
    }

    #[test]
    fn test_custom_thresholds() {
        let policy = RoutingPolicy::try_new(10, 20).unwrap();
        assert_eq!(policy.analyze(9, false).context_size(), ContextSize::Small);
        assert_eq!(policy.analyze(10, false).context_size(), ContextSize::Medium);
        assert_eq!(policy.analyze(20, false).context_size(), ContextSize::Large);
    }
}
