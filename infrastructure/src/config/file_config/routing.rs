//! Routing thresholds from TOML (`[routing]` section)
//!
//! ```toml
//! [routing]
//! small_threshold = 8000          # below: Planner works alone
//! medium_threshold = 100000       # at or above: HeavyLifter does the bulk work
//! unit_cost = 0.001               # per 1,000 tokens sent to the HeavyLifter
//! medium_split_threshold = 50000
//! large_split_threshold = 1000000
//! ```

use duet_domain::{ConfigIssue, ConfigIssueCode, DomainError, RoutingPolicy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRoutingConfig {
    pub small_threshold: u64,
    pub medium_threshold: u64,
    pub unit_cost: f64,
    pub medium_split_threshold: u64,
    pub large_split_threshold: u64,
}

impl Default for FileRoutingConfig {
    fn default() -> Self {
        let policy = RoutingPolicy::default();
        Self {
            small_threshold: policy.small_threshold(),
            medium_threshold: policy.medium_threshold(),
            unit_cost: policy.unit_cost(),
            medium_split_threshold: policy.medium_split_threshold(),
            large_split_threshold: policy.large_split_threshold(),
        }
    }
}

impl FileRoutingConfig {
    pub fn to_policy(&self) -> Result<RoutingPolicy, DomainError> {
        Ok(
            RoutingPolicy::try_new(self.small_threshold, self.medium_threshold)?
                .with_unit_cost(self.unit_cost)?
                .with_split_thresholds(self.medium_split_threshold, self.large_split_threshold),
        )
    }

    pub(super) fn issues(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.small_threshold >= self.medium_threshold {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ThresholdsOutOfOrder,
                format!(
                    "routing.small_threshold ({}) must be below routing.medium_threshold ({})",
                    self.small_threshold, self.medium_threshold
                ),
            ));
        }
        if !self.unit_cost.is_finite() || self.unit_cost < 0.0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidUnitCost,
                format!("routing.unit_cost must be a non-negative number, got {}", self.unit_cost),
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_build_default_policy() {
        let policy = FileRoutingConfig::default().to_policy().unwrap();
        assert_eq!(policy, RoutingPolicy::default());
    }

    #[test]
    fn test_out_of_order_thresholds() {
        let config = FileRoutingConfig {
            small_threshold: 100,
            medium_threshold: 100,
            ..FileRoutingConfig::default()
        };
        assert!(config.to_policy().is_err());
        let issues = config.issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, ConfigIssueCode::ThresholdsOutOfOrder);
    }

    #[test]
    fn test_negative_unit_cost() {
        let config = FileRoutingConfig {
            unit_cost: -1.0,
            ..FileRoutingConfig::default()
        };
        assert!(config.to_policy().is_err());
        assert_eq!(config.issues()[0].code, ConfigIssueCode::InvalidUnitCost);
    }
}
