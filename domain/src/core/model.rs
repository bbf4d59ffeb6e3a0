//! Model descriptor reported by a gateway

use super::role::AgentRole;
use serde::{Deserialize, Serialize};

/// Static facts about the model behind a gateway (Value Object)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub role: AgentRole,
    pub model_name: String,
    pub context_limit: u64,
    pub temperature: f32,
    pub max_output_tokens: u32,
    /// Base URL of the backend, for self-hosted models
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl ModelInfo {
    /// Whether `tokens` fits in this model's context window.
    pub fn fits(&self, tokens: u64) -> bool {
        tokens <= self.context_limit
    }
}
