//! Workflow stage enumeration.

use serde::{Deserialize, Serialize};

/// Stage of a single task run.
///
/// Stages are entered eagerly as each step begins. The only backward move is
/// the bounded refinement loop re-entering `Verification`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    Init,
    Analysis,
    Routing,
    PlannerProcessing,
    #[serde(rename = "heavylifter_processing")]
    HeavyLifterProcessing,
    Verification,
    Debate,
    Synthesis,
    Complete,
    Error,
}

impl WorkflowStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStage::Init => "init",
            WorkflowStage::Analysis => "analysis",
            WorkflowStage::Routing => "routing",
            WorkflowStage::PlannerProcessing => "planner_processing",
            WorkflowStage::HeavyLifterProcessing => "heavylifter_processing",
            WorkflowStage::Verification => "verification",
            WorkflowStage::Debate => "debate",
            WorkflowStage::Synthesis => "synthesis",
            WorkflowStage::Complete => "complete",
            WorkflowStage::Error => "error",
        }
    }

    /// Human-readable label for progress display.
    pub fn display_name(&self) -> &'static str {
        match self {
            WorkflowStage::Init => "Initializing",
            WorkflowStage::Analysis => "Analyzing context",
            WorkflowStage::Routing => "Routing",
            WorkflowStage::PlannerProcessing => "Planner processing",
            WorkflowStage::HeavyLifterProcessing => "HeavyLifter processing",
            WorkflowStage::Verification => "Verifying",
            WorkflowStage::Debate => "Debating",
            WorkflowStage::Synthesis => "Synthesizing",
            WorkflowStage::Complete => "Complete",
            WorkflowStage::Error => "Error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowStage::Complete | WorkflowStage::Error)
    }

    /// Whether moving from `self` to `next` respects the workflow's ordering.
    ///
    /// `Error` is reachable from any non-terminal stage. Terminal stages have
    /// no successors.
    pub fn can_transition_to(&self, next: WorkflowStage) -> bool {
        use WorkflowStage::*;
        if self.is_terminal() {
            return false;
        }
        if next == Error {
            return true;
        }
        match self {
            Init => next == Analysis,
            Analysis => next == Routing,
            Routing => matches!(next, PlannerProcessing),
            PlannerProcessing => matches!(
                next,
                Verification | HeavyLifterProcessing | Complete | PlannerProcessing
            ),
            HeavyLifterProcessing => next == Synthesis,
            // Re-verification happens inside the refinement loop.
            Verification => matches!(next, Verification | Debate | Complete),
            Debate => next == Complete,
            Synthesis => next == Complete,
            Complete | Error => false,
        }
    }
}

impl std::fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_stages() {
        assert!(WorkflowStage::Complete.is_terminal());
        assert!(WorkflowStage::Error.is_terminal());
        assert!(!WorkflowStage::Debate.is_terminal());
    }

    #[test]
    fn test_forward_transitions() {
        assert!(WorkflowStage::Init.can_transition_to(WorkflowStage::Analysis));
        assert!(WorkflowStage::Analysis.can_transition_to(WorkflowStage::Routing));
        assert!(WorkflowStage::Verification.can_transition_to(WorkflowStage::Verification));
        assert!(WorkflowStage::Synthesis.can_transition_to(WorkflowStage::Complete));
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(!WorkflowStage::Init.can_transition_to(WorkflowStage::Synthesis));
        assert!(!WorkflowStage::Debate.can_transition_to(WorkflowStage::Verification));
        assert!(!WorkflowStage::Complete.can_transition_to(WorkflowStage::Error));
    }

    #[test]
    fn test_error_reachable_from_any_live_stage() {
        for stage in [
            WorkflowStage::Init,
            WorkflowStage::Analysis,
            WorkflowStage::Routing,
            WorkflowStage::PlannerProcessing,
            WorkflowStage::HeavyLifterProcessing,
            WorkflowStage::Verification,
            WorkflowStage::Debate,
            WorkflowStage::Synthesis,
        ] {
            assert!(stage.can_transition_to(WorkflowStage::Error), "{stage}");
        }
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&WorkflowStage::HeavyLifterProcessing).unwrap();
        assert_eq!(json, "\"heavylifter_processing\"");
    }
}
