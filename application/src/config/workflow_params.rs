//! Workflow parameters: verification budget and streaming cutoff.
//!
//! [`WorkflowParams`] groups the static knobs of the
//! [`ProcessTaskUseCase`](crate::use_cases::process_task::ProcessTaskUseCase).
//! Routing thresholds live in the domain's `RoutingPolicy`; these are the
//! loop limits and prompt overrides the engine itself consults.

use duet_domain::PromptTemplate;
use serde::{Deserialize, Serialize};

/// Workflow loop control parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowParams {
    /// Whether the HeavyLifter reviews small-context solutions.
    pub verification_enabled: bool,
    /// Maximum refinement passes after a failed review.
    pub max_iterations: u32,
    /// Number of debate rounds once the Planner defends its solution.
    pub debate_rounds: u32,
    /// Token total above which the HeavyLifter's analysis is streamed.
    pub streaming_threshold: u64,
    /// Planner system prompt; `None` uses the built-in default.
    pub planner_system_prompt: Option<String>,
    /// HeavyLifter system prompt; `None` uses the built-in default.
    pub heavylifter_system_prompt: Option<String>,
}

impl Default for WorkflowParams {
    fn default() -> Self {
        Self {
            verification_enabled: true,
            max_iterations: 3,
            debate_rounds: 3,
            streaming_threshold: 500_000,
            planner_system_prompt: None,
            heavylifter_system_prompt: None,
        }
    }
}

impl WorkflowParams {
    // ==================== Builder Methods ====================

    pub fn with_verification(mut self, enabled: bool) -> Self {
        self.verification_enabled = enabled;
        self
    }

    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_debate_rounds(mut self, rounds: u32) -> Self {
        self.debate_rounds = rounds;
        self
    }

    pub fn with_streaming_threshold(mut self, threshold: u64) -> Self {
        self.streaming_threshold = threshold;
        self
    }

    pub fn with_planner_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.planner_system_prompt = Some(prompt.into());
        self
    }

    pub fn with_heavylifter_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.heavylifter_system_prompt = Some(prompt.into());
        self
    }

    // ==================== Accessors ====================

    pub fn planner_system(&self) -> &str {
        self.planner_system_prompt
            .as_deref()
            .unwrap_or(PromptTemplate::planner_system())
    }

    pub fn heavylifter_system(&self) -> &str {
        self.heavylifter_system_prompt
            .as_deref()
            .unwrap_or(PromptTemplate::heavylifter_system())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = WorkflowParams::default();
        assert!(params.verification_enabled);
        assert_eq!(params.max_iterations, 3);
        assert_eq!(params.debate_rounds, 3);
        assert_eq!(params.streaming_threshold, 500_000);
    }

    #[test]
    fn test_builder_chain() {
        let params = WorkflowParams::default()
            .with_verification(false)
            .with_max_iterations(1)
            .with_debate_rounds(5)
            .with_streaming_threshold(10);
        assert!(!params.verification_enabled);
        assert_eq!(params.max_iterations, 1);
        assert_eq!(params.debate_rounds, 5);
        assert_eq!(params.streaming_threshold, 10);
    }

    #[test]
    fn test_system_prompt_override() {
        let params = WorkflowParams::default();
        assert_eq!(params.planner_system(), PromptTemplate::planner_system());

        let params = params.with_planner_system_prompt("Be terse.");
        assert_eq!(params.planner_system(), "Be terse.");
        assert_eq!(
            params.heavylifter_system(),
            PromptTemplate::heavylifter_system()
        );
    }
}
