//! Workflow state aggregate and the records it accumulates.

use super::stage::WorkflowStage;
use crate::core::error::DomainError;
use crate::core::role::AgentRole;
use crate::core::task::Task;
use crate::routing::ContextAnalysis;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One round of debate: the Planner's stated position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateEntry {
    /// 1-based round number
    pub round: u32,
    pub position: String,
}

/// A decision recorded by one of the models during the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDecision {
    agent: AgentRole,
    decision: String,
    reasoning: String,
    confidence: f64,
}

impl AgentDecision {
    /// Create a decision; confidence is clamped into `[0, 1]` (NaN becomes 0).
    pub fn new(
        agent: AgentRole,
        decision: impl Into<String>,
        reasoning: impl Into<String>,
        confidence: f64,
    ) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            agent,
            decision: decision.into(),
            reasoning: reasoning.into(),
            confidence,
        }
    }

    pub fn agent(&self) -> AgentRole {
        self.agent
    }

    pub fn decision(&self) -> &str {
        &self.decision
    }

    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}

/// Token counts keyed by stage label. Recording a label twice overwrites it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenUsage(BTreeMap<String, u64>);

impl TokenUsage {
    pub fn record(&mut self, label: impl Into<String>, tokens: u64) {
        self.0.insert(label.into(), tokens);
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.0.get(label).copied()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.contains_key(label)
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// How the final solution was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Verification disabled; the Planner's first proposal stands
    Unverified,
    /// HeavyLifter accepted the first proposal
    Accepted,
    /// A refinement pass cleared the HeavyLifter's concerns
    Refined,
    /// Planner defended its solution and debate rounds ran
    Debated,
    /// Refinement budget exhausted with concerns still open
    Unresolved,
    /// Planner synthesized the HeavyLifter's analysis
    Synthesized,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Unverified => "unverified",
            Resolution::Accepted => "accepted",
            Resolution::Refined => "refined",
            Resolution::Debated => "debated",
            Resolution::Unresolved => "unresolved",
            Resolution::Synthesized => "synthesized",
        }
    }
}

/// One-line summary of a state, for log fields.
pub struct WorkflowStateSummary<'a>(&'a WorkflowState);

impl std::fmt::Display for WorkflowStateSummary<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "stage={} iterations={} debate_rounds={} tokens={}",
            self.0.stage,
            self.0.iteration_count,
            self.0.debate_history.len(),
            self.0.token_usage.total()
        )
    }
}

/// Accumulator for one task run.
///
/// Owned by the caller of the workflow engine and lent out as `&mut` to each
/// stage in turn. Append-only collections only grow; `task` and
/// `context_analysis` are set once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    stage: WorkflowStage,
    task: Task,
    context_analysis: Option<ContextAnalysis>,
    planner_solution: Option<String>,
    heavylifter_critique: Option<String>,
    heavylifter_analysis: Option<String>,
    final_solution: Option<String>,
    resolution: Option<Resolution>,
    debate_history: Vec<DebateEntry>,
    decisions: Vec<AgentDecision>,
    iteration_count: u32,
    token_usage: TokenUsage,
    stage_history: Vec<WorkflowStage>,
}

impl WorkflowState {
    pub fn new(task: Task) -> Self {
        Self {
            stage: WorkflowStage::Init,
            task,
            context_analysis: None,
            planner_solution: None,
            heavylifter_critique: None,
            heavylifter_analysis: None,
            final_solution: None,
            resolution: None,
            debate_history: Vec::new(),
            decisions: Vec::new(),
            iteration_count: 0,
            token_usage: TokenUsage::default(),
            stage_history: vec![WorkflowStage::Init],
        }
    }

    // ==================== Transitions ====================

    /// Enter `next`, recording it in the stage history.
    pub fn enter(&mut self, next: WorkflowStage) -> Result<(), DomainError> {
        if !self.stage.can_transition_to(next) {
            return Err(DomainError::InvalidTransition(format!(
                "{} -> {}",
                self.stage, next
            )));
        }
        self.stage = next;
        self.stage_history.push(next);
        Ok(())
    }

    /// Mark the run as failed. No-op once a terminal stage is reached.
    pub fn fail(&mut self) {
        if !self.stage.is_terminal() {
            self.stage = WorkflowStage::Error;
            self.stage_history.push(WorkflowStage::Error);
        }
    }

    // ==================== Mutators ====================

    pub fn set_context_analysis(&mut self, analysis: ContextAnalysis) -> Result<(), DomainError> {
        if self.context_analysis.is_some() {
            return Err(DomainError::InvalidTransition(
                "context analysis already recorded".to_string(),
            ));
        }
        self.context_analysis = Some(analysis);
        Ok(())
    }

    pub fn set_planner_solution(&mut self, solution: impl Into<String>) {
        self.planner_solution = Some(solution.into());
    }

    pub fn set_heavylifter_critique(&mut self, critique: impl Into<String>) {
        self.heavylifter_critique = Some(critique.into());
    }

    pub fn set_heavylifter_analysis(&mut self, analysis: impl Into<String>) {
        self.heavylifter_analysis = Some(analysis.into());
    }

    pub fn finalize(&mut self, solution: impl Into<String>, resolution: Resolution) {
        self.final_solution = Some(solution.into());
        self.resolution = Some(resolution);
    }

    /// Append a debate round; rounds are numbered from 1 in append order.
    pub fn push_debate(&mut self, position: impl Into<String>) -> &DebateEntry {
        let round = self.debate_history.len() as u32 + 1;
        self.debate_history.push(DebateEntry {
            round,
            position: position.into(),
        });
        &self.debate_history[self.debate_history.len() - 1]
    }

    pub fn record_decision(&mut self, decision: AgentDecision) {
        self.decisions.push(decision);
    }

    /// Record token usage for a label; absent counts are not recorded.
    pub fn record_tokens(&mut self, label: impl Into<String>, tokens: Option<u64>) {
        if let Some(tokens) = tokens {
            self.token_usage.record(label, tokens);
        }
    }

    pub fn set_iteration_count(&mut self, count: u32) {
        self.iteration_count = count;
    }

    // ==================== Accessors ====================

    pub fn stage(&self) -> WorkflowStage {
        self.stage
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn context_analysis(&self) -> Option<&ContextAnalysis> {
        self.context_analysis.as_ref()
    }

    pub fn planner_solution(&self) -> Option<&str> {
        self.planner_solution.as_deref()
    }

    pub fn heavylifter_critique(&self) -> Option<&str> {
        self.heavylifter_critique.as_deref()
    }

    pub fn heavylifter_analysis(&self) -> Option<&str> {
        self.heavylifter_analysis.as_deref()
    }

    pub fn final_solution(&self) -> Option<&str> {
        self.final_solution.as_deref()
    }

    pub fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }

    pub fn debate_history(&self) -> &[DebateEntry] {
        &self.debate_history
    }

    pub fn decisions(&self) -> &[AgentDecision] {
        &self.decisions
    }

    pub fn iteration_count(&self) -> u32 {
        self.iteration_count
    }

    pub fn token_usage(&self) -> &TokenUsage {
        &self.token_usage
    }

    pub fn stage_history(&self) -> &[WorkflowStage] {
        &self.stage_history
    }

    pub fn is_complete(&self) -> bool {
        self.stage == WorkflowStage::Complete
    }

    pub fn summary(&self) -> WorkflowStateSummary<'_> {
        WorkflowStateSummary(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> WorkflowState {
        WorkflowState::new(Task::try_new("Write a function").unwrap())
    }

    #[test]
    fn test_new_state_starts_in_init() {
        let state = state();
        assert_eq!(state.stage(), WorkflowStage::Init);
        assert_eq!(state.stage_history(), &[WorkflowStage::Init]);
        assert_eq!(state.iteration_count(), 0);
        assert!(state.final_solution().is_none());
    }

    #[test]
    fn test_enter_records_history() {
        let mut state = state();
        state.enter(WorkflowStage::Analysis).unwrap();
        state.enter(WorkflowStage::Routing).unwrap();
        assert_eq!(
            state.stage_history(),
            &[
                WorkflowStage::Init,
                WorkflowStage::Analysis,
                WorkflowStage::Routing
            ]
        );
    }

    #[test]
    fn test_enter_rejects_skipping_stages() {
        let mut state = state();
        let err = state.enter(WorkflowStage::Synthesis).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));
        assert_eq!(state.stage(), WorkflowStage::Init);
    }

    #[test]
    fn test_fail_is_sticky() {
        let mut state = state();
        state.enter(WorkflowStage::Analysis).unwrap();
        state.fail();
        state.fail();
        assert_eq!(state.stage(), WorkflowStage::Error);
        assert_eq!(state.stage_history().len(), 3);
        assert!(state.enter(WorkflowStage::Routing).is_err());
    }

    #[test]
    fn test_context_analysis_set_once() {
        let mut state = state();
        let analysis = crate::routing::RoutingPolicy::default().analyze(10, false);
        state.set_context_analysis(analysis.clone()).unwrap();
        assert!(state.set_context_analysis(analysis).is_err());
    }

    #[test]
    fn test_token_usage_overwrites_by_label() {
        let mut state = state();
        state.record_tokens("planner_initial", Some(10));
        state.record_tokens("planner_initial", Some(25));
        state.record_tokens("heavylifter_verification", None);
        assert_eq!(state.token_usage().get("planner_initial"), Some(25));
        assert!(!state.token_usage().contains("heavylifter_verification"));
        assert_eq!(state.token_usage().total(), 25);
    }

    #[test]
    fn test_debate_rounds_are_numbered_from_one() {
        let mut state = state();
        state.push_debate("first");
        let second = state.push_debate("second").clone();
        assert_eq!(second.round, 2);
        assert_eq!(state.debate_history()[0].round, 1);
    }

    #[test]
    fn test_decision_confidence_is_clamped() {
        let high = AgentDecision::new(AgentRole::Planner, "d", "r", 1.7);
        let low = AgentDecision::new(AgentRole::HeavyLifter, "d", "r", -0.2);
        let nan = AgentDecision::new(AgentRole::Planner, "d", "r", f64::NAN);
        assert_eq!(high.confidence(), 1.0);
        assert_eq!(low.confidence(), 0.0);
        assert_eq!(nan.confidence(), 0.0);
    }

    #[test]
    fn test_finalize_sets_resolution() {
        let mut state = state();
        state.finalize("done", Resolution::Accepted);
        assert_eq!(state.final_solution(), Some("done"));
        assert_eq!(state.resolution(), Some(Resolution::Accepted));
    }

    #[test]
    fn test_state_serializes_token_usage_as_map() {
        let mut state = state();
        state.record_tokens("planner_synthesis", Some(7));
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["token_usage"]["planner_synthesis"], 7);
        assert_eq!(json["stage"], "init");
        assert_eq!(json["task"], "Write a function");
    }
}
