//! Workflow domain: stages, the per-task state aggregate, and critique
//! classification used by the verification protocol.

mod critique;
mod stage;
mod state;

pub use critique::{
    CLEARANCE_WORDS, CritiqueClassifier, DEFENSE_WINDOW_CHARS, KeywordCritiqueClassifier,
    NEGATIONS, REFINEMENT_KEYWORDS,
};
pub use stage::WorkflowStage;
pub use state::{
    AgentDecision, DebateEntry, Resolution, TokenUsage, WorkflowState, WorkflowStateSummary,
};
