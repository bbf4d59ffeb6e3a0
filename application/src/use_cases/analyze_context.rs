//! Context Router
//!
//! Estimates a task's token volume and turns it into a routing decision.

use crate::ports::token_estimator::TokenEstimator;
use duet_domain::{ContextAnalysis, ProcessingStrategy, RoutingPolicy, approximate_tokens};
use std::sync::Arc;
use tracing::{info, warn};

/// Classifies tasks by token volume and picks the workflow variant.
///
/// Deterministic for a given estimator and policy. Estimator failures never
/// abort analysis: the affected text is counted at four characters per token.
#[derive(Clone)]
pub struct ContextRouter {
    estimator: Arc<dyn TokenEstimator>,
    policy: RoutingPolicy,
    verification_enabled: bool,
}

impl ContextRouter {
    pub fn new(estimator: Arc<dyn TokenEstimator>, policy: RoutingPolicy) -> Self {
        Self {
            estimator,
            policy,
            verification_enabled: true,
        }
    }

    pub fn with_verification(mut self, enabled: bool) -> Self {
        self.verification_enabled = enabled;
        self
    }

    pub fn policy(&self) -> &RoutingPolicy {
        &self.policy
    }

    /// Token count for one piece of text, falling back to `chars / 4`.
    pub fn count_tokens(&self, text: &str) -> u64 {
        match self.estimator.count_tokens(text) {
            Ok(count) => count,
            Err(e) => {
                warn!(
                    estimator = self.estimator.name(),
                    error = %e,
                    "Token estimation failed, using approximate count"
                );
                approximate_tokens(text)
            }
        }
    }

    /// Analyze the task plus optional context and attachments.
    pub fn analyze(
        &self,
        task: &str,
        additional_context: Option<&str>,
        attachments: &[String],
    ) -> ContextAnalysis {
        let task_tokens = self.count_tokens(task);
        let context_tokens = additional_context.map_or(0, |c| self.count_tokens(c));
        let attachment_tokens: u64 = attachments.iter().map(|a| self.count_tokens(a)).sum();
        let total_tokens = task_tokens + context_tokens + attachment_tokens;

        info!(
            task_tokens,
            context_tokens,
            attachment_tokens,
            total_tokens,
            "Context analyzed"
        );

        let analysis = self.policy.analyze(total_tokens, !attachments.is_empty());

        info!(
            context_size = %analysis.context_size(),
            routing_mode = %analysis.routing_mode(),
            should_split = analysis.should_split(),
            "Routing decided"
        );

        analysis
    }

    /// Whether the HeavyLifter does the primary processing.
    pub fn should_use_heavylifter_primary(&self, analysis: &ContextAnalysis) -> bool {
        analysis.routing_mode().heavylifter_is_primary()
    }

    /// Whether the HeavyLifter should verify; true unless disabled by configuration.
    pub fn should_verify(&self, _analysis: &ContextAnalysis) -> bool {
        self.verification_enabled
    }

    pub fn processing_strategy(&self, analysis: &ContextAnalysis) -> ProcessingStrategy {
        ProcessingStrategy::for_analysis(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::token_estimator::EstimatorError;
    use duet_domain::{ContextSize, RoutingMode};

    /// One token per whitespace-separated word.
    struct WordEstimator;

    impl TokenEstimator for WordEstimator {
        fn count_tokens(&self, text: &str) -> Result<u64, EstimatorError> {
            Ok(text.split_whitespace().count() as u64)
        }
    }

    /// Fails on every call.
    struct BrokenEstimator;

    impl TokenEstimator for BrokenEstimator {
        fn count_tokens(&self, _text: &str) -> Result<u64, EstimatorError> {
            Err(EstimatorError::Unavailable("no vocabulary".to_string()))
        }
    }

    /// Fixed count regardless of input.
    struct FixedEstimator(u64);

    impl TokenEstimator for FixedEstimator {
        fn count_tokens(&self, _text: &str) -> Result<u64, EstimatorError> {
            Ok(self.0)
        }
    }

    fn router(estimator: impl TokenEstimator + 'static) -> ContextRouter {
        ContextRouter::new(Arc::new(estimator), RoutingPolicy::default())
    }

    #[test]
    fn test_total_is_sum_of_parts() {
        let router = router(WordEstimator);
        let attachments = vec!["a b c".to_string(), "d e".to_string()];
        let analysis = router.analyze("one two", Some("three"), &attachments);
        assert_eq!(analysis.token_count(), 2 + 1 + 3 + 2);
    }

    fn assert_attachments_never_decrease_total(router: &ContextRouter) {
        let long = "y".repeat(4_000);
        let files = [
            "fn main() {}",
            "",
            "pub struct Pool { workers: Vec<Worker> }",
            "x",
            "   ",
            long.as_str(),
        ];
        let mut attached: Vec<String> = Vec::new();
        let mut previous = router.analyze("Find the leak", Some("ctx"), &attached).token_count();
        for file in files {
            attached.push(file.to_string());
            let total = router.analyze("Find the leak", Some("ctx"), &attached).token_count();
            assert!(total >= previous, "{total} < {previous} after adding {file:?}");
            previous = total;
        }
    }

    #[test]
    fn test_adding_attachments_never_decreases_total() {
        assert_attachments_never_decrease_total(&router(WordEstimator));
        assert_attachments_never_decrease_total(&router(FixedEstimator(7)));
    }

    #[test]
    fn test_adding_attachments_never_decreases_total_on_fallback() {
        assert_attachments_never_decrease_total(&router(BrokenEstimator));
    }

    #[test]
    fn test_absent_context_counts_zero() {
        let router = router(FixedEstimator(10));
        let analysis = router.analyze("task", None, &[]);
        assert_eq!(analysis.token_count(), 10);
    }

    #[test]
    fn test_estimator_failure_falls_back_to_char_count() {
        let router = router(BrokenEstimator);
        let analysis = router.analyze(&"x".repeat(400), None, &[]);
        assert_eq!(analysis.token_count(), 100);
        assert_eq!(analysis.context_size(), ContextSize::Small);
    }

    #[test]
    fn test_small_task_is_planner_primary() {
        let router = router(WordEstimator);
        let analysis = router.analyze("Write a function to reverse a string", None, &[]);
        assert_eq!(analysis.routing_mode(), RoutingMode::PlannerPrimary);
        assert_eq!(analysis.estimated_cost(), 0.0);
        assert!(!router.should_use_heavylifter_primary(&analysis));
    }

    #[test]
    fn test_medium_with_attachments_chunks_by_file() {
        let router = router(FixedEstimator(20_000));
        let attachments = vec!["file one".to_string(), "file two".to_string()];
        // task + 2 attachments = 60,000
        let analysis = router.analyze("task", None, &attachments);
        assert_eq!(analysis.routing_mode(), RoutingMode::CollaborativeMedium);
        assert!(analysis.should_split());
        assert_eq!(analysis.split_strategy(), Some("chunk_by_file"));
        assert!(router.should_use_heavylifter_primary(&analysis));
    }

    #[test]
    fn test_large_task_warns_about_cost() {
        let router = router(FixedEstimator(600_000));
        let analysis = router.analyze("task", Some("ctx"), &[]);
        assert_eq!(analysis.routing_mode(), RoutingMode::HeavyLifting);
        assert!(
            analysis
                .recommendations()
                .iter()
                .any(|r| r.contains("1,200,000 tokens"))
        );
    }

    #[test]
    fn test_should_verify_follows_configuration() {
        let analysis = RoutingPolicy::default().analyze(10, false);
        assert!(router(WordEstimator).should_verify(&analysis));
        assert!(
            !router(WordEstimator)
                .with_verification(false)
                .should_verify(&analysis)
        );
    }

    #[test]
    fn test_processing_strategy_prepends_split_step() {
        let router = router(FixedEstimator(1_200_000));
        let analysis = router.analyze("task", None, &[]);
        let strategy = router.processing_strategy(&analysis);
        assert_eq!(strategy.workflow_steps.len(), 9);
        assert!(strategy.workflow_steps[0].contains("iterative_processing"));
    }
}
