//! Port for structured conversation logging.
//!
//! Records the per-task transcript (routing decision, every prompt/response
//! exchange with either model, debate rounds, final result) to a structured
//! log. This is separate from `tracing`: tracing carries diagnostics, this
//! port carries the full text of what the models said.

use chrono::{DateTime, Utc};
use duet_domain::AgentRole;
use serde_json::{Value, json};

/// A structured conversation event for logging.
pub struct ConversationEvent {
    /// Event type identifier (e.g. "routing", "model_exchange", "debate_round").
    pub event_type: &'static str,
    pub timestamp: DateTime<Utc>,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    /// Create a new conversation event stamped with the current UTC time.
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// One prompt/response round trip with a model.
    pub fn exchange(
        role: AgentRole,
        label: &str,
        prompt: &str,
        response: &str,
        tokens: Option<u64>,
    ) -> Self {
        Self::new(
            "model_exchange",
            json!({
                "agent": role.as_str(),
                "label": label,
                "prompt": prompt,
                "response": response,
                "tokens": tokens,
            }),
        )
    }
}

/// Port for logging conversation events to a structured log.
///
/// `log` is synchronous and infallible; adapters swallow write failures so
/// logging never interrupts a run.
pub trait ConversationLogger: Send + Sync {
    /// Record a conversation event.
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_payload_shape() {
        let event = ConversationEvent::exchange(
            AgentRole::HeavyLifter,
            "heavylifter_verification",
            "review this",
            "looks fine",
            Some(12),
        );
        assert_eq!(event.event_type, "model_exchange");
        assert_eq!(event.payload["agent"], "heavylifter");
        assert_eq!(event.payload["label"], "heavylifter_verification");
        assert_eq!(event.payload["tokens"], 12);
    }

    #[test]
    fn test_exchange_without_tokens_is_null() {
        let event = ConversationEvent::exchange(AgentRole::Planner, "x", "p", "r", None);
        assert!(event.payload["tokens"].is_null());
    }
}
