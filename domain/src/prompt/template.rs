//! Prompt templates for the Planner / HeavyLifter workflow

use crate::routing::ContextAnalysis;
use crate::util::format_thousands;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Default system prompt for the Planner
    pub fn planner_system() -> &'static str {
        r#"You are the Planner, the orchestrator of a two-model team.
You break tasks down, propose concrete solutions, and respond to reviews.
When a review raises valid points, revise your solution. When you believe
your solution is correct as written, say that you defend it and explain why."#
    }

    /// Default system prompt for the HeavyLifter
    pub fn heavylifter_system() -> &'static str {
        r#"You are the HeavyLifter, a large-context analyst working with a Planner.
Read the full context carefully, ground every finding in it, and report
problems, risks and missing pieces precisely."#
    }

    /// Planner: initial proposal (small-context workflow)
    pub fn propose(task: &str, context: Option<&str>) -> String {
        match context.filter(|c| !c.is_empty()) {
            Some(context) => format!(
                "Task: {}\n\nContext:\n{}\n\nProvide a complete solution:",
                task, context
            ),
            None => format!("Task: {}\n\nProvide a complete solution:", task),
        }
    }

    /// HeavyLifter: review of a proposed solution
    pub fn review(task: &str, solution: &str) -> String {
        format!(
            r#"Task: {}

Proposed solution:
{}

Review this solution for correctness, completeness, security and performance.
List every issue you find. If the solution is sound, say so plainly."#,
            task, solution
        )
    }

    /// Planner: respond to a critique by refining or defending
    pub fn refine(task: &str, solution: &str, critique: &str) -> String {
        format!(
            r#"Task: {}

Your solution:
{}

Reviewer critique:
{}

Either provide a refined solution that addresses the critique, or state that
you defend your original solution and explain why."#,
            task, solution, critique
        )
    }

    /// Planner: state a position in a debate round
    pub fn debate_position(task: &str, solution: &str, critique: &str, round: u32) -> String {
        format!(
            r#"Debate round {}

Task: {}

Your solution:
{}

Opposing critique:
{}

State your position: which points of the critique you accept, which you
reject, and the strongest argument for your final answer."#,
            round, task, solution, critique
        )
    }

    /// Planner: coordination plan for medium/large contexts
    pub fn coordinate(task: &str, analysis: &ContextAnalysis) -> String {
        format!(
            r#"Task: {}

Context Analysis:
- Token count: {}
- Context size: {}
- Routing mode: {}

As the orchestrator, provide:
1. Task breakdown strategy
2. What information the HeavyLifter should extract from the large context
3. How to synthesize the results
4. Implementation plan
"#,
            task,
            format_thousands(analysis.token_count()),
            analysis.context_size(),
            analysis.routing_mode()
        )
    }

    /// HeavyLifter: analysis over the full context
    pub fn analyze_context(task: &str, context: &str, context_description: &str) -> String {
        format!(
            r#"Task: {}

You are given: {}.
Analyze the full context below and report the findings relevant to the task.

=== CONTEXT START ===
{}
=== CONTEXT END ==="#,
            task, context_description, context
        )
    }

    /// Planner: synthesis of the HeavyLifter's findings
    pub fn synthesize(task: &str, findings: &str) -> String {
        format!(
            r#"Task: {}

The HeavyLifter has analyzed the large context and provided these findings:

{}

As the orchestrator, synthesize these findings and provide:
1. Summary of key points
2. Gaps or areas needing clarification
3. Next steps or actions
4. Final recommendations
"#,
            task, findings
        )
    }
}
