//! Console output formatter for workflow results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use duet_application::{HealthReport, SystemStatus, WorkflowFailure};
use duet_domain::util::format_thousands;
use duet_domain::{ContextAnalysis, ModelInfo, WorkflowStage, WorkflowState};

const RULE_WIDTH: usize = 60;

/// Formats workflow results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete workflow result
    pub fn format(state: &WorkflowState) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Duet Workflow Results"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Task:".cyan().bold(),
            state.task().instruction()
        ));

        if let Some(analysis) = state.context_analysis() {
            output.push_str(&Self::format_analysis(analysis));
        }

        output.push_str(&Self::section_header("Workflow Progress"));
        output.push_str(&Self::stage_trail(state.stage_history()));
        output.push('\n');

        if let Some(solution) = state.planner_solution() {
            output.push_str(&Self::panel("Planner Solution", solution));
        }
        if let Some(critique) = state.heavylifter_critique() {
            output.push_str(&Self::panel("HeavyLifter Critique", critique));
        }
        if let Some(analysis) = state.heavylifter_analysis() {
            output.push_str(&Self::panel("HeavyLifter Analysis", analysis));
        }

        if !state.debate_history().is_empty() {
            output.push_str(&Self::section_header("Debate History"));
            for entry in state.debate_history() {
                output.push_str(&format!(
                    "\n{}\n{}\n",
                    format!("Round {}:", entry.round).yellow(),
                    entry.position
                ));
            }
        }

        if let Some(solution) = state.final_solution() {
            let title = match state.resolution() {
                Some(resolution) => format!("Final Solution ({})", resolution.as_str()),
                None => "Final Solution".to_string(),
            };
            output.push_str(&Self::panel(&title, solution));
        }

        output.push_str(&Self::format_token_usage(state));

        output.push_str(&format!("\n{}\n", "=".repeat(RULE_WIDTH).cyan()));
        if state.stage() == WorkflowStage::Complete {
            output.push_str(&format!(
                "{}\n",
                "✓ Task completed successfully!".green().bold()
            ));
        }
        output.push_str(&format!("Iterations: {}\n", state.iteration_count()));
        output.push_str(&format!("{}\n", "=".repeat(RULE_WIDTH).cyan()));

        output
    }

    /// Format as JSON
    pub fn format_json(state: &WorkflowState) -> String {
        serde_json::to_string_pretty(state).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the final solution only (concise output)
    pub fn format_solution_only(state: &WorkflowState) -> String {
        let mut output = String::new();
        match state.final_solution() {
            Some(solution) => {
                output.push_str(solution);
                output.push('\n');
            }
            None => output.push_str(&format!("{}\n", "(no solution produced)".dimmed())),
        }
        output
    }

    /// The routing decision as a metric table, followed by recommendations
    pub fn format_analysis(analysis: &ContextAnalysis) -> String {
        let mut rows = vec![
            ("Token Count".to_string(), format_thousands(analysis.token_count())),
            (
                "Context Size".to_string(),
                analysis.context_size().to_string(),
            ),
            (
                "Routing Mode".to_string(),
                analysis.routing_mode().to_string(),
            ),
            (
                "Estimated Cost".to_string(),
                format!("${:.4}", analysis.estimated_cost()),
            ),
        ];
        if analysis.should_split() {
            rows.push((
                "Split Strategy".to_string(),
                analysis.split_strategy().unwrap_or("unspecified").to_string(),
            ));
        }

        let mut output = Self::table("Context Analysis", ("Metric", "Value"), &rows);

        if !analysis.recommendations().is_empty() {
            output.push_str(&format!("\n{}\n", "Recommendations:".bold()));
            for rec in analysis.recommendations() {
                output.push_str(&format!("  • {}\n", rec));
            }
        }
        output
    }

    /// Per-call token counts plus the total; empty when nothing was recorded
    pub fn format_token_usage(state: &WorkflowState) -> String {
        let usage = state.token_usage();
        if usage.is_empty() {
            return String::new();
        }
        let mut rows: Vec<(String, String)> = usage
            .iter()
            .map(|(label, tokens)| (label.to_string(), format_thousands(tokens)))
            .collect();
        rows.push(("TOTAL".to_string(), format_thousands(usage.total())));
        Self::table("Token Usage", ("Component", "Tokens"), &rows)
    }

    /// Error message plus whatever the run produced before failing
    pub fn format_failure(failure: &WorkflowFailure) -> String {
        let mut output = format!(
            "\n{} {}\n",
            "Error:".red().bold(),
            failure.error
        );
        output.push_str(&format!(
            "{} {}\n",
            "Failed during:".dimmed(),
            failure.failed_stage.display_name()
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Stages:".dimmed(),
            Self::stage_trail(failure.state.stage_history()).trim()
        ));
        if let Some(solution) = failure.state.planner_solution() {
            output.push_str(&Self::panel("Partial Planner Solution", solution));
        }
        output
    }

    /// Failure as a JSON object: error, failed stage and partial state
    pub fn format_failure_json(failure: &WorkflowFailure) -> String {
        let value = serde_json::json!({
            "error": failure.error.to_string(),
            "failed_stage": failure.failed_stage,
            "state": failure.state,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn format_health(report: &HealthReport) -> String {
        let rows: Vec<(String, String)> = report
            .entries()
            .iter()
            .map(|(component, health)| {
                let icon = if health.is_healthy() { "✓" } else { "✗" };
                (component.to_string(), format!("{} {}", icon, health))
            })
            .collect();
        Self::table("System Health", ("Component", "Status"), &rows)
    }

    pub fn format_status(status: &SystemStatus) -> String {
        let mut output = format!("{}\n", "System Status".bold());

        output.push_str(&Self::model_block("Planner", &status.planner));
        output.push_str(&Self::model_block("HeavyLifter", &status.heavylifter));

        let settings = &status.settings;
        output.push_str(&format!("\n{}\n", "Configuration:".cyan().bold()));
        output.push_str(&format!(
            "  Verification: {}\n",
            if settings.verification_enabled {
                "Enabled"
            } else {
                "Disabled"
            }
        ));
        output.push_str(&format!("  Max Iterations: {}\n", settings.max_iterations));
        output.push_str(&format!("  Debate Rounds: {}\n", settings.debate_rounds));
        output.push_str(&format!(
            "  Routing Thresholds: small < {} tokens, medium < {} tokens\n",
            format_thousands(settings.small_threshold),
            format_thousands(settings.medium_threshold)
        ));
        output.push_str(&format!(
            "  Streaming Threshold: {} tokens\n",
            format_thousands(settings.streaming_threshold)
        ));
        output
    }

    // ==================== Building blocks ====================

    fn model_block(title: &str, info: &ModelInfo) -> String {
        let mut output = format!("\n{}\n", format!("{}:", title).cyan().bold());
        output.push_str(&format!("  Model: {}\n", info.model_name));
        output.push_str(&format!(
            "  Context Limit: {} tokens\n",
            format_thousands(info.context_limit)
        ));
        output.push_str(&format!("  Temperature: {}\n", info.temperature));
        output.push_str(&format!("  Max Output: {} tokens\n", info.max_output_tokens));
        if let Some(endpoint) = &info.endpoint {
            output.push_str(&format!("  Endpoint: {}\n", endpoint));
        }
        output
    }

    fn stage_trail(stages: &[WorkflowStage]) -> String {
        let names: Vec<String> = stages
            .iter()
            .map(|stage| match stage {
                WorkflowStage::Complete => stage.as_str().to_uppercase().green().to_string(),
                WorkflowStage::Error => stage.as_str().to_uppercase().red().to_string(),
                _ => stage.as_str().to_uppercase(),
            })
            .collect();
        format!("\n{}\n", names.join(" → "))
    }

    fn table(title: &str, headers: (&str, &str), rows: &[(String, String)]) -> String {
        let left = rows
            .iter()
            .map(|(l, _)| l.chars().count())
            .chain(std::iter::once(headers.0.chars().count()))
            .max()
            .unwrap_or(0);
        let right = rows
            .iter()
            .map(|(_, r)| r.chars().count())
            .chain(std::iter::once(headers.1.chars().count()))
            .max()
            .unwrap_or(0);

        let mut output = format!("\n{}\n", title.magenta().bold());
        output.push_str(&format!(
            "  {}  {}\n",
            format!("{:<left$}", headers.0).bold(),
            format!("{:>right$}", headers.1).bold()
        ));
        output.push_str(&format!("  {}\n", "-".repeat(left + right + 2)));
        for (l, r) in rows {
            output.push_str(&format!(
                "  {}  {}\n",
                format!("{:<left$}", l).cyan(),
                format!("{:>right$}", r).green()
            ));
        }
        output
    }

    fn panel(title: &str, body: &str) -> String {
        format!(
            "\n{}\n{}\n",
            format!("── {} ──", title).yellow().bold(),
            body.trim_end()
        )
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(RULE_WIDTH);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}", title.cyan().bold(), "-".repeat(40))
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, state: &WorkflowState) -> String {
        Self::format(state)
    }

    fn format_json(&self, state: &WorkflowState) -> String {
        Self::format_json(state)
    }

    fn format_solution_only(&self, state: &WorkflowState) -> String {
        Self::format_solution_only(state)
    }
}
