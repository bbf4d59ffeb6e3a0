//! REPL (Read-Eval-Print Loop) for interactive mode

use crate::config::{OutputConfig, ReplConfig};
use crate::output::console::ConsoleFormatter;
use crate::output::formatter::OutputFormatter;
use crate::progress::reporter::ProgressReporter;
use colored::Colorize;
use duet_application::{ModelGateway, NoProgress, ProcessTaskInput, ProcessTaskUseCase};
use duet_domain::{OutputFormat, Task};
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use tracing::warn;

const HISTORY_CAPACITY: usize = 1000;

/// What a line typed at the prompt asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput<'a> {
    Empty,
    Exit,
    Help,
    Task(&'a str),
}

impl<'a> ReplInput<'a> {
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ReplInput::Empty;
        }
        match line.to_lowercase().as_str() {
            "exit" | "quit" | "q" | "/exit" | "/quit" | "/q" => ReplInput::Exit,
            "help" | "/help" | "/h" | "/?" => ReplInput::Help,
            _ => ReplInput::Task(line),
        }
    }
}

/// Interactive REPL: each line is run as a task through the workflow
pub struct InteractiveRepl<P: ModelGateway + 'static, H: ModelGateway + 'static> {
    use_case: ProcessTaskUseCase<P, H>,
    repl: ReplConfig,
    output: OutputConfig,
}

impl<P, H> InteractiveRepl<P, H>
where
    P: ModelGateway + 'static,
    H: ModelGateway + 'static,
{
    pub fn new(use_case: ProcessTaskUseCase<P, H>) -> Self {
        Self {
            use_case,
            repl: ReplConfig::default(),
            output: OutputConfig::default(),
        }
    }

    pub fn with_repl_config(mut self, config: ReplConfig) -> Self {
        self.repl = config;
        self
    }

    pub fn with_output_config(mut self, config: OutputConfig) -> Self {
        self.output = config;
        self
    }

    /// Run the interactive REPL until `exit` or Ctrl-D
    ///
    /// Requires a multi-threaded runtime: the line editor blocks.
    pub async fn run(&self) -> std::io::Result<()> {
        let mut editor = self.editor();
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("Task".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            let signal = tokio::task::block_in_place(|| editor.read_line(&prompt))?;

            match signal {
                Signal::Success(line) => match ReplInput::parse(&line) {
                    ReplInput::Empty => continue,
                    ReplInput::Exit => {
                        println!("Bye!");
                        break;
                    }
                    ReplInput::Help => Self::print_help(),
                    ReplInput::Task(task) => self.process_task(task).await,
                },
                Signal::CtrlC => {
                    println!("^C");
                    continue;
                }
                Signal::CtrlD => {
                    println!("Bye!");
                    break;
                }
                #[allow(unreachable_patterns)]
                _ => continue,
            }
        }

        Ok(())
    }

    fn editor(&self) -> Reedline {
        let editor = Reedline::create();
        let Some(path) = self.repl.history_path() else {
            return editor;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match FileBackedHistory::with_file(HISTORY_CAPACITY, path.clone()) {
            Ok(history) => editor.with_history(Box::new(history)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not open REPL history");
                editor
            }
        }
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│          Duet - Interactive Mode            │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!(
            "{}",
            "Type a task and press Enter. Type 'exit' or 'quit' to leave.".yellow()
        );
        println!();
    }

    fn print_help() {
        println!();
        println!("Commands:");
        println!("  help, /help, /h, /?     - Show this help");
        println!("  exit, quit, q           - Leave interactive mode");
        println!("Anything else is run as a task.");
        println!();
    }

    /// Run one task; failures are printed and the loop continues
    async fn process_task(&self, instruction: &str) {
        println!();

        let task = match Task::try_new(instruction) {
            Ok(task) => task,
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                return;
            }
        };
        let input = ProcessTaskInput::new(task);

        let result = if self.repl.show_progress && self.output.format != OutputFormat::Json {
            let progress = ProgressReporter::new();
            self.use_case.execute_with_progress(input, &progress).await
        } else {
            self.use_case.execute_with_progress(input, &NoProgress).await
        };

        match result {
            Ok(state) => println!("{}", ConsoleFormatter.render(&state, self.output.format)),
            Err(failure) => eprintln!("{}", ConsoleFormatter::format_failure(&failure)),
        }
        println!();
    }
}
