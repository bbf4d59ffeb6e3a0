//! Progress reporting for workflow runs

use colored::Colorize;
use duet_application::ProgressNotifier;
use duet_domain::{ContextAnalysis, WorkflowStage, WorkflowState};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn stage_emoji(stage: WorkflowStage) -> &'static str {
    match stage {
        WorkflowStage::Init => "🔧",
        WorkflowStage::Analysis => "🔍",
        WorkflowStage::Routing => "🧭",
        WorkflowStage::PlannerProcessing => "🤖",
        WorkflowStage::HeavyLifterProcessing => "✨",
        WorkflowStage::Verification => "🔬",
        WorkflowStage::Debate => "💬",
        WorkflowStage::Synthesis => "🎯",
        WorkflowStage::Complete => "✅",
        WorkflowStage::Error => "❌",
    }
}

/// Reports progress with one spinner per active stage
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
    streamed_chars: AtomicUsize,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
            streamed_chars: AtomicUsize::new(0),
        }
    }

    fn stage_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn set_message(&self, message: String) {
        if let Ok(guard) = self.spinner.lock()
            && let Some(pb) = guard.as_ref()
        {
            pb.set_message(message);
        }
    }

    fn finish_current_stage(&self) {
        if let Ok(mut guard) = self.spinner.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_and_clear();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_stage_start(&self, stage: WorkflowStage) {
        self.finish_current_stage();

        if stage.is_terminal() {
            let label = format!("{} {}", stage_emoji(stage), stage.display_name());
            if stage == WorkflowStage::Complete {
                println!("{}", label.green().bold());
            } else {
                println!("{}", label.red().bold());
            }
            return;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::stage_style());
        pb.set_prefix(format!("{} {}", stage_emoji(stage), stage.display_name()));
        pb.set_message("...");
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut guard) = self.spinner.lock() {
            *guard = Some(pb);
        }
    }

    fn on_analysis(&self, analysis: &ContextAnalysis) {
        self.set_message(format!(
            "{} tokens → {}",
            analysis.token_count(),
            analysis.routing_mode()
        ));
    }

    fn on_refinement_iteration(&self, iteration: u32, max_iterations: u32) {
        self.set_message(format!("refinement {}/{}", iteration, max_iterations));
    }

    fn on_debate_round(&self, round: u32, total_rounds: u32) {
        self.set_message(format!("round {}/{}", round, total_rounds));
    }

    fn on_stream_chunk(&self, chunk: &str) {
        let total = self
            .streamed_chars
            .fetch_add(chunk.chars().count(), Ordering::Relaxed)
            + chunk.chars().count();
        self.set_message(format!("streaming ({} chars received)", total));
    }

    fn on_finished(&self, _state: &WorkflowState) {
        self.finish_current_stage();
        self.streamed_chars.store(0, Ordering::Relaxed);
    }
}

/// Simple text-based progress (no spinner), for runs that also print debug logs
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_stage_start(&self, stage: WorkflowStage) {
        println!(
            "{} {} {}",
            "->".cyan(),
            stage_emoji(stage),
            stage.as_str().to_uppercase().bold()
        );
    }

    fn on_analysis(&self, analysis: &ContextAnalysis) {
        println!(
            "   {} tokens, {} context, {}",
            analysis.token_count(),
            analysis.context_size(),
            analysis.routing_mode()
        );
    }

    fn on_refinement_iteration(&self, iteration: u32, max_iterations: u32) {
        println!("   refinement {}/{}", iteration, max_iterations);
    }

    fn on_debate_round(&self, round: u32, total_rounds: u32) {
        println!("   debate round {}/{}", round, total_rounds);
    }
}
