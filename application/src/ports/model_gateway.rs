//! Model Gateway port
//!
//! Defines the interface for communicating with the Planner and HeavyLifter
//! backends. Adapters live in the infrastructure layer.

use async_trait::async_trait;
use duet_domain::{Generation, ModelInfo, StreamEvent};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during model gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request failed with status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl GatewayError {
    /// Transport-level failures worth another attempt.
    ///
    /// Malformed responses and configuration problems are never retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Connection(_) | GatewayError::Timeout(_) => true,
            GatewayError::Http { status, .. } => *status == 408 || *status == 429 || *status >= 500,
            GatewayError::InvalidResponse(_)
            | GatewayError::Configuration(_)
            | GatewayError::Stream(_)
            | GatewayError::Other(_) => false,
        }
    }
}

/// Per-call overrides for a generation request.
///
/// Unset fields fall back to the gateway's configured defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateOptions {
    pub system_prompt: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl GenerateOptions {
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Handle for receiving streaming events from a model.
///
/// Wraps an `mpsc::Receiver<StreamEvent>`. A handle is consumed by reading
/// it; streams cannot be restarted.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Consume the stream and collect all text into a single string.
    pub async fn collect_text(self) -> Result<String, GatewayError> {
        self.collect_text_with(|_| {}).await
    }

    /// Consume the stream, calling `on_chunk` for every delta in arrival order.
    pub async fn collect_text_with(
        mut self,
        mut on_chunk: impl FnMut(&str) + Send,
    ) -> Result<String, GatewayError> {
        let mut full_text = String::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => {
                    on_chunk(&chunk);
                    full_text.push_str(&chunk);
                }
                StreamEvent::Completed(text) => {
                    if full_text.is_empty() {
                        return Ok(text);
                    }
                    return Ok(full_text);
                }
                StreamEvent::Error(e) => {
                    return Err(GatewayError::Stream(e));
                }
            }
        }
        // Channel closed without Completed: return what we have
        Ok(full_text)
    }
}

/// Gateway to one remote model
///
/// Implementations are shared behind `Arc` across tasks and own their
/// connection pools. Transport retries and timeouts belong here, not to
/// callers.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Generate a complete response
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<Generation, GatewayError>;

    /// Generate a streaming response.
    ///
    /// Default implementation calls `generate()` and wraps the result in a
    /// single `Completed` event.
    async fn stream_generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<StreamHandle, GatewayError> {
        let result = self.generate(prompt, options).await?;
        let (tx, rx) = mpsc::channel(1);
        // Receiver may already be gone; nothing to report then
        let _ = tx.send(StreamEvent::Completed(result.content)).await;
        Ok(StreamHandle::new(rx))
    }

    /// Whether the backend answers. Never fails; problems map to `false`.
    async fn check_health(&self) -> bool;

    /// Static facts about the configured model
    fn model_info(&self) -> ModelInfo;

    /// Release pooled resources at shutdown
    async fn close(&self) {}
}
