//! Routing value objects - the immutable outcome of context analysis.
//!
//! - [`ContextSize`] - size band of the estimated token volume
//! - [`RoutingMode`] - division of labor chosen for that band
//! - [`ContextAnalysis`] - complete routing decision for one task

use serde::{Deserialize, Serialize};

/// Size band of a task's estimated token volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextSize {
    /// Below the small threshold: Planner builds, HeavyLifter verifies
    Small,
    /// Between the thresholds: Planner coordinates, HeavyLifter assists
    Medium,
    /// At or above the medium threshold: HeavyLifter does the heavy lifting
    Large,
}

impl ContextSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextSize::Small => "small",
            ContextSize::Medium => "medium",
            ContextSize::Large => "large",
        }
    }

    /// The routing mode paired with this size band (1:1).
    pub fn routing_mode(&self) -> RoutingMode {
        match self {
            ContextSize::Small => RoutingMode::PlannerPrimary,
            ContextSize::Medium => RoutingMode::CollaborativeMedium,
            ContextSize::Large => RoutingMode::HeavyLifting,
        }
    }
}

impl std::fmt::Display for ContextSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Division of labor between the Planner and the HeavyLifter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingMode {
    PlannerPrimary,
    CollaborativeMedium,
    HeavyLifting,
}

impl RoutingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingMode::PlannerPrimary => "planner_primary",
            RoutingMode::CollaborativeMedium => "collaborative_medium",
            RoutingMode::HeavyLifting => "heavy_lifting",
        }
    }

    /// The size band this mode serves.
    pub fn context_size(&self) -> ContextSize {
        match self {
            RoutingMode::PlannerPrimary => ContextSize::Small,
            RoutingMode::CollaborativeMedium => ContextSize::Medium,
            RoutingMode::HeavyLifting => ContextSize::Large,
        }
    }

    /// Whether the HeavyLifter does the primary processing in this mode.
    pub fn heavylifter_is_primary(&self) -> bool {
        matches!(
            self,
            RoutingMode::CollaborativeMedium | RoutingMode::HeavyLifting
        )
    }
}

impl std::fmt::Display for RoutingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of context analysis (Value Object)
///
/// Produced once per task by the routing policy and never mutated afterwards.
/// Construction goes through [`RoutingPolicy::analyze`](super::RoutingPolicy::analyze),
/// which keeps `context_size` and `routing_mode` consistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextAnalysis {
    token_count: u64,
    context_size: ContextSize,
    routing_mode: RoutingMode,
    estimated_cost: f64,
    recommendations: Vec<String>,
    should_split: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    split_strategy: Option<String>,
}

impl ContextAnalysis {
    pub(crate) fn new(
        token_count: u64,
        context_size: ContextSize,
        estimated_cost: f64,
        recommendations: Vec<String>,
        should_split: bool,
        split_strategy: Option<String>,
    ) -> Self {
        Self {
            token_count,
            context_size,
            routing_mode: context_size.routing_mode(),
            estimated_cost,
            recommendations,
            should_split,
            split_strategy,
        }
    }

    pub fn token_count(&self) -> u64 {
        self.token_count
    }

    pub fn context_size(&self) -> ContextSize {
        self.context_size
    }

    pub fn routing_mode(&self) -> RoutingMode {
        self.routing_mode
    }

    pub fn estimated_cost(&self) -> f64 {
        self.estimated_cost
    }

    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }

    pub fn should_split(&self) -> bool {
        self.should_split
    }

    pub fn split_strategy(&self) -> Option<&str> {
        self.split_strategy.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_and_mode_are_paired_both_ways() {
        for size in [ContextSize::Small, ContextSize::Medium, ContextSize::Large] {
            assert_eq!(size.routing_mode().context_size(), size);
        }
    }

    #[test]
    fn test_heavylifter_primary_modes() {
        assert!(!RoutingMode::PlannerPrimary.heavylifter_is_primary());
        assert!(RoutingMode::CollaborativeMedium.heavylifter_is_primary());
        assert!(RoutingMode::HeavyLifting.heavylifter_is_primary());
    }

    #[test]
    fn test_routing_mode_serializes_snake_case() {
        let json = serde_json::to_string(&RoutingMode::CollaborativeMedium).unwrap();
        assert_eq!(json, "\"collaborative_medium\"");
        let mode: RoutingMode = serde_json::from_str("\"heavy_lifting\"").unwrap();
        assert_eq!(mode, RoutingMode::HeavyLifting);
    }

    #[test]
    fn test_analysis_derives_mode_from_size() {
        let analysis = ContextAnalysis::new(
            42,
            ContextSize::Medium,
            0.5,
            vec!["hint".to_string()],
            false,
            None,
        );
        assert_eq!(analysis.routing_mode(), RoutingMode::CollaborativeMedium);
        assert_eq!(analysis.split_strategy(), None);
    }
}
