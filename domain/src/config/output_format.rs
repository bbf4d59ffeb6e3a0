//! Output format value object

use serde::{Deserialize, Serialize};

/// How a finished workflow is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Analysis table, every artifact, debate history and token usage (default)
    #[default]
    Full,
    /// Only the final solution
    Solution,
    /// The whole workflow state as JSON
    Json,
}
