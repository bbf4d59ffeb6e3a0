//! Domain layer for duet
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Planner / HeavyLifter
//!
//! Two models collaborate on every task:
//!
//! - **Planner**: low-cost model that always orchestrates and owns the final answer
//! - **HeavyLifter**: large-context model that verifies or does bulk analysis
//!
//! ## Routing
//!
//! The estimated token volume of a task picks one of three workflows:
//! planner-primary (small), collaborative (medium) or heavy-lifting (large).

pub mod config;
pub mod core;
pub mod prompt;
pub mod routing;
pub mod session;
pub mod util;
pub mod workflow;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::{error::DomainError, model::ModelInfo, role::AgentRole, task::Task};
pub use prompt::PromptTemplate;
pub use routing::{
    ContextAnalysis, ContextSize, ProcessingStrategy, RoutingMode, RoutingPolicy,
    approximate_tokens,
};
pub use session::{generation::Generation, stream::StreamEvent};
pub use workflow::{
    AgentDecision, CritiqueClassifier, DebateEntry, KeywordCritiqueClassifier, Resolution,
    TokenUsage, WorkflowStage, WorkflowState,
};
