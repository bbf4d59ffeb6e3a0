//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};

/// Console log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Default filter directive when neither `-v` nor `RUST_LOG` is given
    pub level: String,
    pub format: LogFormat,
    /// Directory for per-run log files; unset disables file logging
    pub dir: Option<String>,
    /// Also write the JSONL conversation transcript next to the run log
    pub conversation_log: bool,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Text,
            dir: Some("logs".to_string()),
            conversation_log: true,
        }
    }
}
