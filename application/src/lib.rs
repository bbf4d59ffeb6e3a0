//! Application layer for duet
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::WorkflowParams;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    model_gateway::{GatewayError, GenerateOptions, ModelGateway, StreamHandle},
    progress::{NoProgress, ProgressNotifier},
    token_estimator::{EstimatorError, TokenEstimator},
};
pub use use_cases::analyze_context::ContextRouter;
pub use use_cases::process_task::{
    ProcessTaskError, ProcessTaskInput, ProcessTaskUseCase, WorkflowFailure,
};
pub use use_cases::system_status::{
    ComponentHealth, HealthReport, SystemStatus, SystemStatusUseCase, WorkflowSettings,
};
