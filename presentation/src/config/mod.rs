//! Presentation-level configuration
//!
//! Configuration for output formatting and REPL behavior.

use duet_domain::OutputFormat;
use std::path::PathBuf;

/// Output configuration for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Full,
            color: true,
        }
    }
}

impl OutputConfig {
    /// Disable ANSI colors process-wide when `color` is off
    pub fn apply_color_preference(&self) {
        if !self.color {
            colored::control::set_override(false);
        }
    }
}

/// REPL configuration for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub struct ReplConfig {
    /// Show progress indicators
    pub show_progress: bool,
    /// Path to history file; `None` uses the platform data directory
    pub history_file: Option<PathBuf>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: None,
        }
    }
}

impl ReplConfig {
    /// Configured history file, else `<data_dir>/duet/history.txt`
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_file
            .clone()
            .or_else(|| dirs::data_dir().map(|p| p.join("duet").join("history.txt")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_history_file_wins() {
        let config = ReplConfig {
            history_file: Some(PathBuf::from("/tmp/h.txt")),
            ..ReplConfig::default()
        };
        assert_eq!(config.history_path(), Some(PathBuf::from("/tmp/h.txt")));
    }

    #[test]
    fn test_default_history_under_data_dir() {
        if let Some(path) = ReplConfig::default().history_path() {
            assert!(path.ends_with("duet/history.txt"));
        }
    }
}
