//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for workflow results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Analysis, every artifact, debate history and token usage
    Full,
    /// Only the final solution
    Solution,
    /// JSON output
    Json,
}

impl From<OutputFormat> for duet_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => duet_domain::OutputFormat::Full,
            OutputFormat::Solution => duet_domain::OutputFormat::Solution,
            OutputFormat::Json => duet_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for duet
#[derive(Parser, Debug)]
#[command(name = "duet")]
#[command(author, version, about = "Planner / HeavyLifter orchestrator for LLM tasks")]
#[command(long_about = r#"
Duet pairs a low-cost Planner model with a large-context HeavyLifter model.

Every task is routed by its estimated token volume:
1. Small:  the Planner solves it, the HeavyLifter verifies
2. Medium: the Planner decomposes it, the HeavyLifter processes the context
3. Large:  the HeavyLifter analyzes everything, the Planner synthesizes

Configuration files are loaded from (in priority order):
1. DUET_* environment variables
2. --config <path>     Explicit config file
3. ./duet.toml         Project-level config
4. ~/.config/duet/config.toml   Global config

Example:
  duet run -t "Reverse a string in Rust"
  duet run -t "Find the memory leak" -f src/pool.rs -f src/worker.rs
  duet health
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a single task through the workflow
    Run(RunArgs),
    /// Check that both model backends are reachable
    Health,
    /// Show model and workflow settings
    Status,
    /// Read tasks from a prompt until `exit`
    Interactive,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// The task to perform
    #[arg(short, long)]
    pub task: String,

    /// Additional context for the task
    #[arg(short, long)]
    pub context: Option<String>,

    /// Files to attach (can be specified multiple times)
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Output format (overrides `[output] format`)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_with_files_and_context() {
        let cli = Cli::try_parse_from([
            "duet", "-vv", "run", "-t", "Fix it", "-c", "ctx", "-f", "a.rs", "--file", "b.rs",
            "--debug", "-o", "json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.task, "Fix it");
        assert_eq!(args.context.as_deref(), Some("ctx"));
        assert_eq!(args.files, vec![PathBuf::from("a.rs"), PathBuf::from("b.rs")]);
        assert!(args.debug);
        assert_eq!(args.output, Some(OutputFormat::Json));
    }

    #[test]
    fn test_run_requires_task() {
        assert!(Cli::try_parse_from(["duet", "run"]).is_err());
    }

    #[test]
    fn test_config_is_accepted_after_subcommand() {
        let cli = Cli::try_parse_from(["duet", "health", "--config", "x.toml"]).unwrap();
        assert!(matches!(cli.command, Command::Health));
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["duet"]).is_err());
        assert!(matches!(
            Cli::try_parse_from(["duet", "interactive"]).unwrap().command,
            Command::Interactive
        ));
        assert!(matches!(
            Cli::try_parse_from(["duet", "status"]).unwrap().command,
            Command::Status
        ));
    }

    #[test]
    fn test_output_format_maps_to_domain() {
        assert_eq!(
            duet_domain::OutputFormat::from(OutputFormat::Solution),
            duet_domain::OutputFormat::Solution
        );
    }
}
