//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod logging;
mod models;
mod output;
mod repl;
mod routing;
mod workflow;

pub use logging::{FileLoggingConfig, LogFormat};
pub use models::FileModelsConfig;
pub use output::FileOutputConfig;
pub use repl::FileReplConfig;
pub use routing::FileRoutingConfig;
pub use workflow::{FilePromptsConfig, FileVerificationConfig, FileWorkflowConfig};

use crate::retry::RetryPolicy;
use duet_application::WorkflowParams;
use duet_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Token thresholds and cost model for the context router
    pub routing: FileRoutingConfig,
    /// HeavyLifter review, refinement and debate budget
    pub verification: FileVerificationConfig,
    /// Engine settings outside the verification loop
    pub workflow: FileWorkflowConfig,
    /// Planner and HeavyLifter backends
    pub models: FileModelsConfig,
    /// Gateway transport retries
    pub retry: RetryPolicy,
    pub logging: FileLoggingConfig,
    pub output: FileOutputConfig,
    pub repl: FileReplConfig,
    pub prompts: FilePromptsConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Issues with `Severity::Error` must abort startup.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let api_key_available = self.models.heavy_lifter.resolve_api_key().is_some();
        self.validate_with_key(api_key_available)
    }

    fn validate_with_key(&self, api_key_available: bool) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Routing thresholds and cost
        issues.extend(self.routing.issues());

        // 2. Backends
        issues.extend(self.models.issues(api_key_available));

        // 3. Loop budgets
        if self.verification.enabled && self.verification.max_iterations == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::NoRefinementBudget,
                "verification.max_iterations is 0: critiques will never be acted on",
            ));
        }
        if self.retry.max_attempts == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::NoRetryAttempts,
                "retry.max_attempts is 0: each call is attempted once",
            ));
        }

        // 4. Cross-section consistency
        if self.workflow.streaming_threshold < self.routing.medium_threshold {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::StreamingBelowLarge,
                format!(
                    "workflow.streaming_threshold ({}) is below routing.medium_threshold ({}): \
                     every large-context analysis will be streamed",
                    self.workflow.streaming_threshold, self.routing.medium_threshold
                ),
            ));
        }
        if self.models.planner.context_limit < self.routing.small_threshold {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::PlannerContextTooSmall,
                format!(
                    "models.planner.context_limit ({}) is below routing.small_threshold ({})",
                    self.models.planner.context_limit, self.routing.small_threshold
                ),
            ));
        }

        issues
    }

    /// Engine parameters assembled from `[verification]`, `[workflow]` and `[prompts]`.
    pub fn workflow_params(&self) -> WorkflowParams {
        let mut params = WorkflowParams::default()
            .with_verification(self.verification.enabled)
            .with_max_iterations(self.verification.max_iterations)
            .with_debate_rounds(self.verification.debate_rounds)
            .with_streaming_threshold(self.workflow.streaming_threshold);
        if let Some(prompt) = &self.prompts.planner_system {
            params = params.with_planner_system_prompt(prompt.clone());
        }
        if let Some(prompt) = &self.prompts.heavylifter_system {
            params = params.with_heavylifter_system_prompt(prompt.clone());
        }
        params
    }
}
