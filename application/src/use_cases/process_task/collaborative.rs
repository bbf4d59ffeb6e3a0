//! Medium and large context workflows: the Planner coordinates, the
//! HeavyLifter reads the full context, the Planner synthesizes.

use super::types::ProcessTaskError;
use super::{ProcessTaskInput, ProcessTaskUseCase};
use crate::ports::model_gateway::ModelGateway;
use crate::ports::progress::ProgressNotifier;
use duet_domain::{
    AgentDecision, AgentRole, ContextAnalysis, PromptTemplate, Resolution, RoutingMode,
    WorkflowStage, WorkflowState,
};
use tracing::info;

impl<P, H> ProcessTaskUseCase<P, H>
where
    P: ModelGateway + 'static,
    H: ModelGateway + 'static,
{
    /// Single forward pass shared by the collaborative and heavy-lifting modes.
    ///
    /// Heavy lifting differs only in the context description and in streaming
    /// the HeavyLifter's analysis once the token total passes the threshold.
    pub(super) async fn collaborative(
        &self,
        input: &ProcessTaskInput,
        analysis: &ContextAnalysis,
        state: &mut WorkflowState,
        progress: &dyn ProgressNotifier,
    ) -> Result<(), ProcessTaskError> {
        let heavy = analysis.routing_mode() == RoutingMode::HeavyLifting;
        info!(mode = %analysis.routing_mode(), "Starting collaborative workflow");

        // Coordination plan is kept for the transcript only.
        self.enter(state, WorkflowStage::PlannerProcessing, progress)?;
        let task = input.task.instruction();
        let coordination = self
            .ask_planner(
                state.stage(),
                "planner_coordination",
                &PromptTemplate::coordinate(task, analysis),
            )
            .await?;
        state.record_tokens("planner_coordination", coordination.token_count);
        state.record_decision(AgentDecision::new(
            AgentRole::Planner,
            "delegate_analysis",
            format!(
                "{} tokens exceed the Planner's share; HeavyLifter reads the full context",
                analysis.token_count()
            ),
            1.0,
        ));
        info!(length = coordination.content.len(), "Planner coordination complete");

        self.enter(state, WorkflowStage::HeavyLifterProcessing, progress)?;
        let full_context = input.full_context();
        let (description, label) = if heavy {
            ("Large codebase or document set", "heavylifter_heavy_lifting")
        } else {
            ("Medium-size project context", "heavylifter_analysis")
        };
        let prompt = PromptTemplate::analyze_context(task, &full_context, description);

        let findings = if heavy && analysis.token_count() > self.params.streaming_threshold {
            info!(
                token_count = analysis.token_count(),
                threshold = self.params.streaming_threshold,
                "Streaming HeavyLifter analysis"
            );
            self.stream_heavylifter(state.stage(), label, &prompt, progress)
                .await?
        } else {
            let generation = self.ask_heavylifter(state.stage(), label, &prompt).await?;
            state.record_tokens(label, generation.token_count);
            generation.content
        };
        info!(length = findings.len(), "HeavyLifter analysis complete");
        state.set_heavylifter_analysis(findings.clone());

        self.enter(state, WorkflowStage::Synthesis, progress)?;
        let synthesis = self
            .ask_planner(
                state.stage(),
                "planner_synthesis",
                &PromptTemplate::synthesize(task, &findings),
            )
            .await?;
        info!(length = synthesis.content.len(), "Synthesis complete");
        state.record_tokens("planner_synthesis", synthesis.token_count);
        state.finalize(synthesis.content, Resolution::Synthesized);

        Ok(())
    }
}
