//! Planner-primary workflow: propose, verify, refine, debate.

use super::types::ProcessTaskError;
use super::{HEURISTIC_CONFIDENCE, ProcessTaskInput, ProcessTaskUseCase, require};
use crate::ports::conversation_logger::ConversationEvent;
use crate::ports::model_gateway::ModelGateway;
use crate::ports::progress::ProgressNotifier;
use duet_domain::{AgentDecision, AgentRole, PromptTemplate, Resolution, WorkflowStage, WorkflowState};
use serde_json::json;
use tracing::{info, warn};

impl<P, H> ProcessTaskUseCase<P, H>
where
    P: ModelGateway + 'static,
    H: ModelGateway + 'static,
{
    /// Small contexts: the Planner builds, the HeavyLifter verifies.
    pub(super) async fn planner_primary(
        &self,
        input: &ProcessTaskInput,
        state: &mut WorkflowState,
        progress: &dyn ProgressNotifier,
    ) -> Result<(), ProcessTaskError> {
        info!("Starting planner-primary workflow");
        self.enter(state, WorkflowStage::PlannerProcessing, progress)?;

        let task = input.task.instruction();
        let prompt = PromptTemplate::propose(task, input.additional_context.as_deref());
        let proposal = self
            .ask_planner(state.stage(), "planner_initial", &prompt)
            .await?;
        info!(length = proposal.content.len(), "Planner proposed solution");

        state.set_planner_solution(proposal.content.clone());
        state.record_tokens("planner_initial", proposal.token_count);

        let analysis = state
            .context_analysis()
            .ok_or_else(|| ProcessTaskError::Logic("context analysis missing".to_string()))?;
        if !self.router.should_verify(analysis) {
            info!("Verification disabled, accepting Planner solution");
            state.finalize(proposal.content, Resolution::Unverified);
            return Ok(());
        }

        self.verify(input, state, progress).await
    }

    /// HeavyLifter reviews the current solution; refinement follows if needed.
    async fn verify(
        &self,
        input: &ProcessTaskInput,
        state: &mut WorkflowState,
        progress: &dyn ProgressNotifier,
    ) -> Result<(), ProcessTaskError> {
        self.enter(state, WorkflowStage::Verification, progress)?;

        let task = input.task.instruction();
        let solution = require(state.planner_solution(), "planner solution")?.to_string();
        let review = self
            .ask_heavylifter(
                state.stage(),
                "heavylifter_verification",
                &PromptTemplate::review(task, &solution),
            )
            .await?;
        info!(length = review.content.len(), "HeavyLifter verification complete");

        state.set_heavylifter_critique(review.content.clone());
        state.record_tokens("heavylifter_verification", review.token_count);

        let needs_refinement = self.classifier.needs_refinement(&review.content);
        state.record_decision(verdict(needs_refinement));

        if !needs_refinement {
            state.finalize(solution, Resolution::Accepted);
            return Ok(());
        }

        self.refinement_loop(input, state, progress).await
    }

    /// Bounded refine/re-review loop; a defending reply hands over to debate.
    async fn refinement_loop(
        &self,
        input: &ProcessTaskInput,
        state: &mut WorkflowState,
        progress: &dyn ProgressNotifier,
    ) -> Result<(), ProcessTaskError> {
        info!("Starting refinement loop");
        let task = input.task.instruction();
        let max_iterations = self.params.max_iterations;

        for iteration in 1..=max_iterations {
            state.set_iteration_count(iteration);
            progress.on_refinement_iteration(iteration, max_iterations);
            info!(iteration, max_iterations, "Refinement iteration");

            let solution = require(state.planner_solution(), "planner solution")?;
            let critique = require(state.heavylifter_critique(), "critique")?;
            let prompt = PromptTemplate::refine(task, solution, critique);

            let label = format!("planner_refinement_{}", iteration);
            let reply = self.ask_planner(state.stage(), &label, &prompt).await?;
            state.record_tokens(label, reply.token_count);

            if self.classifier.is_defending(&reply.content) {
                info!(iteration, "Planner is defending its solution");
                state.record_decision(AgentDecision::new(
                    AgentRole::Planner,
                    "defend",
                    "Planner declined to revise its solution",
                    HEURISTIC_CONFIDENCE,
                ));
                return self.debate(input, state, progress).await;
            }

            info!(length = reply.content.len(), "Planner refined solution");
            state.set_planner_solution(reply.content);
            state.record_decision(AgentDecision::new(
                AgentRole::Planner,
                "revise",
                "Planner revised its solution in response to the critique",
                HEURISTIC_CONFIDENCE,
            ));

            self.enter(state, WorkflowStage::Verification, progress)?;
            let revised = require(state.planner_solution(), "planner solution")?.to_string();
            let label = format!("heavylifter_reverification_{}", iteration);
            let review = self
                .ask_heavylifter(
                    state.stage(),
                    &label,
                    &PromptTemplate::review(task, &revised),
                )
                .await?;
            state.set_heavylifter_critique(review.content.clone());
            state.record_tokens(label, review.token_count);

            let needs_refinement = self.classifier.needs_refinement(&review.content);
            state.record_decision(verdict(needs_refinement));

            if !needs_refinement {
                info!(iteration, "Refinement successful");
                state.finalize(revised, Resolution::Refined);
                return Ok(());
            }
        }

        warn!(
            max_iterations,
            "Refinement budget exhausted with open concerns"
        );
        let solution = require(state.planner_solution(), "planner solution")?.to_string();
        state.finalize(solution, Resolution::Unresolved);
        Ok(())
    }

    /// Fixed number of Planner position statements; the solution is unchanged.
    async fn debate(
        &self,
        input: &ProcessTaskInput,
        state: &mut WorkflowState,
        progress: &dyn ProgressNotifier,
    ) -> Result<(), ProcessTaskError> {
        info!("Entering debate mode");
        self.enter(state, WorkflowStage::Debate, progress)?;

        let task = input.task.instruction();
        let rounds = self.params.debate_rounds;

        for round in 1..=rounds {
            progress.on_debate_round(round, rounds);
            info!(round, rounds, "Debate round");

            let solution = require(state.planner_solution(), "planner solution")?;
            let critique = require(state.heavylifter_critique(), "critique")?;
            let prompt = PromptTemplate::debate_position(task, solution, critique, round);

            let label = format!("planner_debate_{}", round);
            let position = self.ask_planner(state.stage(), &label, &prompt).await?;
            state.record_tokens(label, position.token_count);

            let entry = state.push_debate(position.content);
            self.conversation_logger.log(ConversationEvent::new(
                "debate_round",
                json!({ "round": entry.round, "position": entry.position }),
            ));
        }

        info!(rounds = state.debate_history().len(), "Debate complete");
        let solution = require(state.planner_solution(), "planner solution")?.to_string();
        state.finalize(solution, Resolution::Debated);
        Ok(())
    }
}

fn verdict(needs_refinement: bool) -> AgentDecision {
    if needs_refinement {
        AgentDecision::new(
            AgentRole::HeavyLifter,
            "request_refinement",
            "Critique flags problems with the solution",
            HEURISTIC_CONFIDENCE,
        )
    } else {
        AgentDecision::new(
            AgentRole::HeavyLifter,
            "approve",
            "Critique raises no problems",
            HEURISTIC_CONFIDENCE,
        )
    }
}
