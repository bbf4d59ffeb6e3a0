//! Model backend configuration from TOML (`[models]` section)
//!
//! ```toml
//! [models.planner]
//! host = "localhost"
//! port = 8000
//! model_name = "AgentFlow/agentflow-planner-7b"
//! context_limit = 8000
//!
//! [models.heavy_lifter]
//! model_name = "gemini-2.5-pro"
//! # api_key = "..."   # or set GEMINI_API_KEY
//! ```

use crate::heavy_lifter::GeminiConfig;
use crate::planner::VllmPlannerConfig;
use duet_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    pub planner: VllmPlannerConfig,
    pub heavy_lifter: GeminiConfig,
}

impl FileModelsConfig {
    pub(super) fn issues(&self, api_key_available: bool) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if !api_key_available {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::MissingApiKey,
                "models.heavy_lifter.api_key is not set and GEMINI_API_KEY is empty",
            ));
        }

        for (field, temperature) in [
            ("models.planner.temperature", self.planner.temperature),
            ("models.heavy_lifter.temperature", self.heavy_lifter.temperature),
        ] {
            if !(0.0..=2.0).contains(&temperature) {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::TemperatureOutOfRange,
                    format!("{}: {} is outside [0, 2]", field, temperature),
                ));
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_an_error() {
        let issues = FileModelsConfig::default().issues(false);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
        assert_eq!(issues[0].code, ConfigIssueCode::MissingApiKey);
    }

    #[test]
    fn test_temperature_out_of_range_warns() {
        let mut config = FileModelsConfig::default();
        config.planner.temperature = 3.5;
        let issues = config.issues(true);
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
        assert!(issues[0].message.contains("models.planner.temperature"));
    }
}
