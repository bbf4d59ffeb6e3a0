//! Human-readable processing plan derived from a [`ContextAnalysis`].

use super::value_objects::{ContextAnalysis, ContextSize, RoutingMode};
use serde::Serialize;

/// Roles and ordered steps the two models follow for one routing mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingStrategy {
    pub routing_mode: RoutingMode,
    pub context_size: ContextSize,
    pub token_count: u64,
    pub planner_role: String,
    pub heavylifter_role: String,
    pub workflow_steps: Vec<String>,
}

impl ProcessingStrategy {
    pub fn for_analysis(analysis: &ContextAnalysis) -> Self {
        let mode = analysis.routing_mode();
        let (planner_role, heavylifter_role, steps): (&str, &str, &[&str]) = match mode {
            RoutingMode::PlannerPrimary => (
                "Primary processor - builds solution",
                "Verifier - reviews and critiques",
                &[
                    "1. Planner analyzes task",
                    "2. Planner proposes solution",
                    "3. HeavyLifter reviews solution",
                    "4. Iterate if issues found",
                    "5. Finalize solution",
                ],
            ),
            RoutingMode::CollaborativeMedium => (
                "Coordinator - manages workflow",
                "Context provider - handles larger context",
                &[
                    "1. Planner breaks down task",
                    "2. HeavyLifter loads and analyzes full context",
                    "3. Planner coordinates implementation",
                    "4. HeavyLifter verifies with context awareness",
                    "5. Iterate and refine",
                    "6. Planner finalizes",
                ],
            ),
            RoutingMode::HeavyLifting => (
                "Orchestrator - strategic direction",
                "Heavy lifter - processes large context",
                &[
                    "1. Planner analyzes requirements",
                    "2. Planner formulates strategy",
                    "3. HeavyLifter loads entire context",
                    "4. HeavyLifter performs comprehensive analysis",
                    "5. Planner reviews findings",
                    "6. Planner directs refinements",
                    "7. Iterate until complete",
                    "8. Planner synthesizes final result",
                ],
            ),
        };

        let mut workflow_steps: Vec<String> = steps.iter().map(|s| s.to_string()).collect();
        if analysis.should_split() {
            workflow_steps.insert(
                0,
                format!(
                    "0. Split task using strategy: {}",
                    analysis.split_strategy().unwrap_or("unspecified")
                ),
            );
        }

        Self {
            routing_mode: mode,
            context_size: analysis.context_size(),
            token_count: analysis.token_count(),
            planner_role: planner_role.to_string(),
            heavylifter_role: heavylifter_role.to_string(),
            workflow_steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::RoutingPolicy;

    #[test]
    fn test_step_counts_per_mode() {
        let policy = RoutingPolicy::default();
        let small = ProcessingStrategy::for_analysis(&policy.analyze(100, false));
        let medium = ProcessingStrategy::for_analysis(&policy.analyze(10_000, false));
        let large = ProcessingStrategy::for_analysis(&policy.analyze(200_000, false));

        assert_eq!(small.workflow_steps.len(), 5);
        assert_eq!(medium.workflow_steps.len(), 6);
        assert_eq!(large.workflow_steps.len(), 8);
        assert!(small.planner_role.starts_with("Primary processor"));
    }

    #[test]
    fn test_split_step_is_prepended() {
        let policy = RoutingPolicy::default();
        let strategy = ProcessingStrategy::for_analysis(&policy.analyze(60_000, true));

        assert_eq!(strategy.workflow_steps.len(), 7);
        assert_eq!(
            strategy.workflow_steps[0],
            "0. Split task using strategy: chunk_by_file"
        );
    }

    #[test]
    fn test_split_without_label() {
        let policy = RoutingPolicy::default();
        let strategy = ProcessingStrategy::for_analysis(&policy.analyze(60_000, false));
        assert_eq!(
            strategy.workflow_steps[0],
            "0. Split task using strategy: unspecified"
        );
    }
}
