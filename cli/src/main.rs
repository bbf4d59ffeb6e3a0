//! CLI entrypoint for duet
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod logging;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::Parser;
use duet_application::{
    ContextRouter, ModelGateway, ProcessTaskInput, ProcessTaskUseCase, SystemStatusUseCase,
    WorkflowFailure, WorkflowParams,
};
use duet_domain::{OutputFormat, Task};
use duet_infrastructure::{
    AttachmentLoader, ConfigLoader, FileConfig, GeminiGateway, JsonlConversationLogger,
    VllmPlannerGateway, default_estimator,
};
use duet_presentation::{
    Cli, Command, ConsoleFormatter, InteractiveRepl, OutputConfig, OutputFormatter,
    ProgressReporter, ReplConfig, RunArgs, SimpleProgress,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<WorkflowFailure>() {
                Some(failure) => eprintln!("{}", ConsoleFormatter::format_failure(failure)),
                None => eprintln!("Error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let started_at = Utc::now();

    let config =
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?;

    let debug = matches!(&cli.command, Command::Run(args) if args.debug);
    let _log_guard = logging::init(&config.logging, cli.verbose, debug, started_at)?;

    info!("Starting duet");
    check_config(&config)?;

    let output = OutputConfig {
        format: config.output.format.unwrap_or_default(),
        color: config.output.color,
    };
    output.apply_color_preference();

    // === Dependency Injection ===
    let wants_transcript = matches!(cli.command, Command::Run(_) | Command::Interactive);
    let services = Services::build(&config, wants_transcript.then_some(started_at))?;

    let result = match cli.command {
        Command::Run(args) => run_task(args, output, &services).await,
        Command::Health => {
            println!("Checking system health...\n");
            let report = services.system_status().health().await;
            println!("{}", ConsoleFormatter::format_health(&report));
            Ok(())
        }
        Command::Status => {
            let status = services.system_status().status();
            println!("{}", ConsoleFormatter::format_status(&status));
            Ok(())
        }
        Command::Interactive => {
            let repl = ReplConfig {
                show_progress: config.repl.show_progress,
                history_file: config.repl.history_file.as_ref().map(PathBuf::from),
            };
            InteractiveRepl::new(services.process_task())
                .with_repl_config(repl)
                .with_output_config(output)
                .run()
                .await
                .context("Interactive mode failed")
        }
    };

    services.close().await;
    result
}

/// Log warnings; abort on any error-severity issue.
fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in issues.iter().filter(|i| !i.is_error()) {
        warn!(code = ?issue.code, "{}", issue.message);
    }
    let errors: Vec<&str> = issues
        .iter()
        .filter(|i| i.is_error())
        .map(|i| i.message.as_str())
        .collect();
    if !errors.is_empty() {
        bail!("Invalid configuration:\n  {}", errors.join("\n  "));
    }
    Ok(())
}

async fn run_task(args: RunArgs, output: OutputConfig, services: &Services) -> Result<()> {
    let format = args.output.map(OutputFormat::from).unwrap_or(output.format);
    let quiet = format == OutputFormat::Json;

    if !quiet {
        println!();
        println!("+============================================================+");
        println!("|                  Duet - Planner / HeavyLifter              |");
        println!("+============================================================+");
        println!();
        println!("Task: {}\n", args.task);
    }

    let report = AttachmentLoader::new().load_all(&args.files);
    for loaded in &report.loaded {
        if !quiet {
            println!(
                "✓ Loaded file: {} ({} chars)",
                loaded.path.display(),
                loaded.char_count()
            );
        }
    }
    for failed in &report.failed {
        eprintln!("✗ Failed to load {}: {}", failed.path.display(), failed.error);
    }

    let task = Task::try_new(args.task)?;
    let mut input = ProcessTaskInput::new(task).with_attachments(report.into_contents());
    if let Some(context) = args.context {
        input = input.with_context(context);
    }

    let use_case = services.process_task();
    let result = if quiet {
        use_case.execute(input).await
    } else if args.debug {
        use_case.execute_with_progress(input, &SimpleProgress).await
    } else {
        let progress = ProgressReporter::new();
        use_case.execute_with_progress(input, &progress).await
    };

    match result {
        Ok(state) => {
            println!("{}", ConsoleFormatter.render(&state, format));
            Ok(())
        }
        Err(failure) => {
            if quiet {
                println!("{}", ConsoleFormatter::format_failure_json(&failure));
            }
            Err(failure.into())
        }
    }
}

/// Gateways, router and transcript logger shared by every command
struct Services {
    planner: Arc<VllmPlannerGateway>,
    heavylifter: Arc<GeminiGateway>,
    router: ContextRouter,
    params: WorkflowParams,
    conversation_logger: Option<Arc<JsonlConversationLogger>>,
}

impl Services {
    fn build(config: &FileConfig, transcript_started_at: Option<DateTime<Utc>>) -> Result<Self> {
        let policy = config.routing.to_policy()?;
        let params = config.workflow_params();

        let planner = Arc::new(VllmPlannerGateway::new(
            config.models.planner.clone(),
            config.retry.clone(),
        )?);
        let heavylifter = Arc::new(GeminiGateway::new(
            config.models.heavy_lifter.clone(),
            config.retry.clone(),
        )?);

        let router = ContextRouter::new(default_estimator(), policy);

        let conversation_logger = match (transcript_started_at, &config.logging.dir) {
            (Some(started_at), Some(dir)) if config.logging.conversation_log => {
                JsonlConversationLogger::for_run(dir, started_at).map(|logger| {
                    info!(path = %logger.path().display(), "Recording conversation transcript");
                    Arc::new(logger)
                })
            }
            _ => None,
        };

        Ok(Self {
            planner,
            heavylifter,
            router,
            params,
            conversation_logger,
        })
    }

    fn process_task(&self) -> ProcessTaskUseCase<VllmPlannerGateway, GeminiGateway> {
        let use_case = ProcessTaskUseCase::new(
            self.planner.clone(),
            self.heavylifter.clone(),
            self.router.clone(),
            self.params.clone(),
        );
        match &self.conversation_logger {
            Some(logger) => use_case.with_conversation_logger(logger.clone()),
            None => use_case,
        }
    }

    fn system_status(&self) -> SystemStatusUseCase<VllmPlannerGateway, GeminiGateway> {
        SystemStatusUseCase::new(
            self.planner.clone(),
            self.heavylifter.clone(),
            self.router.clone(),
            self.params.clone(),
        )
    }

    async fn close(&self) {
        self.planner.close().await;
        self.heavylifter.close().await;
    }
}
