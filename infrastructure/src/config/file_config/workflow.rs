//! Workflow engine settings from TOML
//! (`[verification]`, `[workflow]` and `[prompts]` sections)
//!
//! ```toml
//! [verification]
//! enabled = true
//! max_iterations = 3
//! debate_rounds = 3
//!
//! [workflow]
//! streaming_threshold = 500000
//!
//! [prompts]
//! planner_system = "You are a careful planner."
//! ```

use duet_application::WorkflowParams;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileVerificationConfig {
    pub enabled: bool,
    pub max_iterations: u32,
    pub debate_rounds: u32,
}

impl Default for FileVerificationConfig {
    fn default() -> Self {
        let params = WorkflowParams::default();
        Self {
            enabled: params.verification_enabled,
            max_iterations: params.max_iterations,
            debate_rounds: params.debate_rounds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileWorkflowConfig {
    /// Token total above which the HeavyLifter's analysis is streamed
    pub streaming_threshold: u64,
}

impl Default for FileWorkflowConfig {
    fn default() -> Self {
        Self {
            streaming_threshold: WorkflowParams::default().streaming_threshold,
        }
    }
}

/// Optional system prompt overrides; unset means the built-in prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePromptsConfig {
    pub planner_system: Option<String>,
    pub heavylifter_system: Option<String>,
}
