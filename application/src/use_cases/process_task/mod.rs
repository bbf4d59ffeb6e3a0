//! Process Task use case (the workflow engine)
//!
//! Drives one task from analysis to a final solution. The routing mode picks
//! exactly one variant:
//!
//! | Mode                  | Planner              | HeavyLifter                 |
//! |-----------------------|----------------------|-----------------------------|
//! | planner_primary       | propose, refine      | verify (optional)           |
//! | collaborative_medium  | coordinate, synthesize | analyze full context      |
//! | heavy_lifting         | coordinate, synthesize | analyze, streamed if huge |
//!
//! Every stage function borrows the [`WorkflowState`] mutably for its
//! duration; nothing else holds it. Gateway failures abort the run
//! immediately and come back as a [`WorkflowFailure`] carrying the partial
//! state.

mod collaborative;
mod types;
mod verification;

pub use types::{ProcessTaskError, ProcessTaskInput, WorkflowFailure};

use crate::config::WorkflowParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::model_gateway::{GenerateOptions, ModelGateway};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::analyze_context::ContextRouter;
use duet_domain::{
    AgentDecision, AgentRole, CritiqueClassifier, Generation, KeywordCritiqueClassifier,
    RoutingMode, WorkflowStage, WorkflowState,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Confidence recorded for verdicts reached by the critique classifier.
pub(crate) const HEURISTIC_CONFIDENCE: f64 = 0.5;

/// Use case for processing a task with the Planner and HeavyLifter
pub struct ProcessTaskUseCase<P: ModelGateway + 'static, H: ModelGateway + 'static> {
    planner: Arc<P>,
    heavylifter: Arc<H>,
    router: ContextRouter,
    params: WorkflowParams,
    classifier: Arc<dyn CritiqueClassifier>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl<P, H> ProcessTaskUseCase<P, H>
where
    P: ModelGateway + 'static,
    H: ModelGateway + 'static,
{
    /// The router's verification switch is taken from `params`.
    pub fn new(
        planner: Arc<P>,
        heavylifter: Arc<H>,
        router: ContextRouter,
        params: WorkflowParams,
    ) -> Self {
        Self {
            planner,
            heavylifter,
            router: router.with_verification(params.verification_enabled),
            params,
            classifier: Arc::new(KeywordCritiqueClassifier),
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn CritiqueClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn router(&self) -> &ContextRouter {
        &self.router
    }

    pub fn params(&self) -> &WorkflowParams {
        &self.params
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: ProcessTaskInput) -> Result<WorkflowState, WorkflowFailure> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: ProcessTaskInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<WorkflowState, WorkflowFailure> {
        info!(
            task_length = input.task.instruction().len(),
            attachments = input.attachments.len(),
            "Task processing started"
        );

        let mut state = WorkflowState::new(input.task.clone());

        match self.run(&input, &mut state, progress).await {
            Ok(()) => {
                info!(summary = %state.summary(), "Task processing complete");
                self.conversation_logger.log(ConversationEvent::new(
                    "workflow_complete",
                    json!({
                        "resolution": state.resolution().map(|r| r.as_str()),
                        "iterations": state.iteration_count(),
                        "debate_rounds": state.debate_history().len(),
                        "token_usage": state.token_usage(),
                        "final_solution": state.final_solution(),
                    }),
                ));
                progress.on_finished(&state);
                Ok(state)
            }
            Err(err) => {
                let failed_stage = state.stage();
                state.fail();
                error!(stage = %failed_stage, error = %err, "Task processing failed");
                self.conversation_logger.log(ConversationEvent::new(
                    "workflow_failed",
                    json!({
                        "stage": failed_stage.as_str(),
                        "error": err.to_string(),
                    }),
                ));
                progress.on_finished(&state);
                Err(WorkflowFailure {
                    failed_stage,
                    error: err,
                    state: Box::new(state),
                })
            }
        }
    }

    /// Analysis, routing, one variant, completion.
    async fn run(
        &self,
        input: &ProcessTaskInput,
        state: &mut WorkflowState,
        progress: &dyn ProgressNotifier,
    ) -> Result<(), ProcessTaskError> {
        self.enter(state, WorkflowStage::Analysis, progress)?;
        let analysis = self.router.analyze(
            input.task.instruction(),
            input.additional_context.as_deref(),
            &input.attachments,
        );
        progress.on_analysis(&analysis);
        self.conversation_logger.log(ConversationEvent::new(
            "routing",
            serde_json::to_value(&analysis).unwrap_or_default(),
        ));
        state.set_context_analysis(analysis.clone())?;

        self.enter(state, WorkflowStage::Routing, progress)?;
        state.record_decision(AgentDecision::new(
            AgentRole::Planner,
            format!("route_{}", analysis.routing_mode()),
            analysis.recommendations().join("; "),
            1.0,
        ));

        match analysis.routing_mode() {
            RoutingMode::PlannerPrimary => self.planner_primary(input, state, progress).await?,
            RoutingMode::CollaborativeMedium | RoutingMode::HeavyLifting => {
                self.collaborative(input, &analysis, state, progress).await?
            }
        }

        self.enter(state, WorkflowStage::Complete, progress)?;
        Ok(())
    }

    fn enter(
        &self,
        state: &mut WorkflowState,
        stage: WorkflowStage,
        progress: &dyn ProgressNotifier,
    ) -> Result<(), ProcessTaskError> {
        state.enter(stage)?;
        debug!(stage = %stage, "Entered stage");
        progress.on_stage_start(stage);
        Ok(())
    }

    // ==================== Gateway Helpers ====================

    async fn ask_planner(
        &self,
        stage: WorkflowStage,
        label: &str,
        prompt: &str,
    ) -> Result<Generation, ProcessTaskError> {
        let options = GenerateOptions::default().with_system_prompt(self.params.planner_system());
        let generation = self
            .planner
            .generate(prompt, &options)
            .await
            .map_err(|source| ProcessTaskError::Planner { stage, source })?;
        debug!(label, tokens = ?generation.token_count, "Planner responded");
        self.conversation_logger.log(ConversationEvent::exchange(
            AgentRole::Planner,
            label,
            prompt,
            &generation.content,
            generation.token_count,
        ));
        Ok(generation)
    }

    async fn ask_heavylifter(
        &self,
        stage: WorkflowStage,
        label: &str,
        prompt: &str,
    ) -> Result<Generation, ProcessTaskError> {
        let options =
            GenerateOptions::default().with_system_prompt(self.params.heavylifter_system());
        let generation = self
            .heavylifter
            .generate(prompt, &options)
            .await
            .map_err(|source| ProcessTaskError::HeavyLifter { stage, source })?;
        debug!(label, tokens = ?generation.token_count, "HeavyLifter responded");
        self.conversation_logger.log(ConversationEvent::exchange(
            AgentRole::HeavyLifter,
            label,
            prompt,
            &generation.content,
            generation.token_count,
        ));
        Ok(generation)
    }

    /// Stream from the HeavyLifter, concatenating chunks in arrival order.
    async fn stream_heavylifter(
        &self,
        stage: WorkflowStage,
        label: &str,
        prompt: &str,
        progress: &dyn ProgressNotifier,
    ) -> Result<String, ProcessTaskError> {
        let options =
            GenerateOptions::default().with_system_prompt(self.params.heavylifter_system());
        let handle = self
            .heavylifter
            .stream_generate(prompt, &options)
            .await
            .map_err(|source| ProcessTaskError::HeavyLifter { stage, source })?;
        let text = handle
            .collect_text_with(|chunk| progress.on_stream_chunk(chunk))
            .await
            .map_err(|source| ProcessTaskError::HeavyLifter { stage, source })?;
        self.conversation_logger.log(ConversationEvent::exchange(
            AgentRole::HeavyLifter,
            label,
            prompt,
            &text,
            None,
        ));
        Ok(text)
    }
}

/// An artifact a stage depends on; missing means the state machine is broken.
pub(super) fn require<'a>(value: Option<&'a str>, what: &str) -> Result<&'a str, ProcessTaskError> {
    value.ok_or_else(|| ProcessTaskError::Logic(format!("{} missing from workflow state", what)))
}
