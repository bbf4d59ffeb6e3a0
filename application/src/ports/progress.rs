//! Progress notification port
//!
//! Defines the interface for reporting progress while a task moves through
//! the workflow.

use duet_domain::{ContextAnalysis, WorkflowStage, WorkflowState};

/// Callback for progress updates during a workflow run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinner, plain log lines, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called when the workflow enters a stage
    fn on_stage_start(&self, stage: WorkflowStage);

    /// Called once the context has been classified
    fn on_analysis(&self, _analysis: &ContextAnalysis) {}

    /// Called at the start of each refinement pass (1-based)
    fn on_refinement_iteration(&self, _iteration: u32, _max_iterations: u32) {}

    /// Called at the start of each debate round (1-based)
    fn on_debate_round(&self, _round: u32, _total_rounds: u32) {}

    /// Called for each text chunk while the HeavyLifter streams
    fn on_stream_chunk(&self, _chunk: &str) {}

    /// Called when the run ends, successfully or not
    fn on_finished(&self, _state: &WorkflowState) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_stage_start(&self, _stage: WorkflowStage) {}
}
