//! Agent role value object

use serde::{Deserialize, Serialize};

/// One of the two collaborating models (Value Object)
///
/// The Planner is the low-cost primary author and keeps final authority over
/// the solution. The HeavyLifter owns the large context window and is used
/// for verification (small tasks) or bulk analysis (medium and large tasks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    Planner,
    HeavyLifter,
}

impl AgentRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::Planner => "planner",
            AgentRole::HeavyLifter => "heavylifter",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AgentRole::Planner => "Planner",
            AgentRole::HeavyLifter => "HeavyLifter",
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
