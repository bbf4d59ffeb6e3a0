//! Output formatter trait

use duet_domain::{OutputFormat, WorkflowState};

/// Trait for formatting finished workflow runs
pub trait OutputFormatter {
    /// Format the complete run: analysis, artifacts, debate and token usage
    fn format(&self, state: &WorkflowState) -> String;

    /// Format as JSON
    fn format_json(&self, state: &WorkflowState) -> String;

    /// Format the final solution only (concise output)
    fn format_solution_only(&self, state: &WorkflowState) -> String;

    /// Dispatch on the configured output format
    fn render(&self, state: &WorkflowState, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format(state),
            OutputFormat::Solution => self.format_solution_only(state),
            OutputFormat::Json => self.format_json(state),
        }
    }
}
