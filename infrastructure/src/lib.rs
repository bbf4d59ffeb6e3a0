//! Infrastructure layer for duet
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the vLLM Planner and Gemini HeavyLifter
//! gateways, token estimation, attachment loading, transcript logging
//! and configuration file loading.

pub mod attachments;
pub mod config;
pub mod estimator;
pub mod heavy_lifter;
mod http;
pub mod logging;
pub mod planner;
pub mod retry;

// Re-export commonly used types
pub use attachments::{AttachmentFailure, AttachmentLoader, AttachmentReport, LoadedAttachment};
pub use config::{
    ConfigError, ConfigLoader, FileConfig, FileLoggingConfig, FileModelsConfig, FileOutputConfig,
    FileReplConfig, LogFormat,
};
pub use estimator::{BpeTokenEstimator, HeuristicTokenEstimator, default_estimator};
pub use heavy_lifter::{GeminiConfig, GeminiGateway};
pub use logging::{JsonlConversationLogger, run_file_name};
pub use planner::{VllmPlannerConfig, VllmPlannerGateway};
pub use retry::RetryPolicy;
