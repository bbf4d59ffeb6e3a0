//! Application-level configuration.
//!
//! - [`WorkflowParams`] - verification budget, debate rounds, streaming cutoff

pub mod workflow_params;

pub use workflow_params::WorkflowParams;
