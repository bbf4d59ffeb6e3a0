//! Presentation layer for duet
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and the interactive prompt.

pub mod cli;
pub mod config;
pub mod interactive;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, OutputFormat, RunArgs};
pub use config::{OutputConfig, ReplConfig};
pub use interactive::InteractiveRepl;
pub use output::console::ConsoleFormatter;
pub use output::formatter::OutputFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
