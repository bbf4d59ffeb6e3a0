//! Type definitions for the ProcessTask use case.

use crate::ports::model_gateway::GatewayError;
use duet_domain::{DomainError, Task, WorkflowStage, WorkflowState};
use thiserror::Error;

/// Errors that can abort a workflow run
#[derive(Error, Debug)]
pub enum ProcessTaskError {
    #[error("Planner failed during {stage}: {source}")]
    Planner {
        stage: WorkflowStage,
        #[source]
        source: GatewayError,
    },

    #[error("HeavyLifter failed during {stage}: {source}")]
    HeavyLifter {
        stage: WorkflowStage,
        #[source]
        source: GatewayError,
    },

    #[error("Workflow logic error: {0}")]
    Logic(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ProcessTaskError {
    /// The gateway error behind this failure, if any
    pub fn gateway_error(&self) -> Option<&GatewayError> {
        match self {
            ProcessTaskError::Planner { source, .. }
            | ProcessTaskError::HeavyLifter { source, .. } => Some(source),
            ProcessTaskError::Logic(_) | ProcessTaskError::Domain(_) => None,
        }
    }
}

/// A failed run: the error plus everything accumulated before it.
///
/// `state.stage()` is always [`WorkflowStage::Error`]; `failed_stage` is the
/// stage that was active when the error occurred.
#[derive(Error, Debug)]
#[error("Workflow failed at {failed_stage}: {error}")]
pub struct WorkflowFailure {
    pub failed_stage: WorkflowStage,
    #[source]
    pub error: ProcessTaskError,
    pub state: Box<WorkflowState>,
}

/// Input for the ProcessTask use case
#[derive(Debug, Clone)]
pub struct ProcessTaskInput {
    pub task: Task,
    /// Free-form context supplied alongside the task
    pub additional_context: Option<String>,
    /// Attachment contents (already loaded), in the order given
    pub attachments: Vec<String>,
}

impl ProcessTaskInput {
    pub fn new(task: Task) -> Self {
        Self {
            task,
            additional_context: None,
            attachments: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.additional_context = Some(context.into());
        self
    }

    pub fn with_attachments(mut self, attachments: Vec<String>) -> Self {
        self.attachments = attachments;
        self
    }

    /// Context plus attachments, skipping absent or empty parts, joined by a blank line.
    pub fn full_context(&self) -> String {
        self.additional_context
            .iter()
            .chain(self.attachments.iter())
            .filter(|part| !part.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
