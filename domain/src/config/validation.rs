//! Structured configuration issues.
//!
//! Config loaders report problems as [`ConfigIssue`]s instead of failing on
//! the first one, so every problem can be shown at startup. Issues with
//! [`Severity::Error`] abort startup; warnings are logged.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// `routing.small_threshold` is not below `routing.medium_threshold`.
    ThresholdsOutOfOrder,
    /// `routing.unit_cost` is negative or not finite.
    InvalidUnitCost,
    /// No HeavyLifter API key in config or environment.
    MissingApiKey,
    /// A temperature outside `[0, 2]`.
    TemperatureOutOfRange,
    /// `verification.max_iterations` is zero while verification is enabled.
    NoRefinementBudget,
    /// `workflow.streaming_threshold` is below `routing.medium_threshold`,
    /// so streaming can never be skipped for large contexts.
    StreamingBelowLarge,
    /// `retry.max_attempts` is zero.
    NoRetryAttempts,
    /// The Planner's context limit is below the small threshold.
    PlannerContextTooSmall,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "[{}] {:?}: {}", level, self.code, self.message)
    }
}
