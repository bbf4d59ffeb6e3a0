//! Gemini-backed HeavyLifter gateway.

use super::protocol::{GenerateContentRequest, GenerateContentResponse, GenerationConfig};
use super::sse::SseDecoder;
use crate::http::{build_client, ensure_success, map_send_error};
use crate::retry::RetryPolicy;
use async_trait::async_trait;
use duet_application::{GatewayError, GenerateOptions, ModelGateway, StreamHandle};
use duet_domain::{AgentRole, Generation, ModelInfo, StreamEvent};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Environment variable consulted when no key is configured.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Settings for the HeavyLifter (`[models.heavy_lifter]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key; falls back to `GEMINI_API_KEY` when unset or empty.
    pub api_key: Option<String>,
    pub model_name: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub context_limit: u64,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Capacity of the channel between the HTTP reader and the consumer.
    pub stream_buffer: usize,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model_name: "gemini-2.5-pro".to_string(),
            temperature: 0.7,
            max_tokens: 8192,
            context_limit: 2_000_000,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 300,
            stream_buffer: 64,
        }
    }
}

impl GeminiConfig {
    /// Configured key, else the environment fallback.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|k| !k.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

pub struct GeminiGateway {
    client: reqwest::Client,
    config: GeminiConfig,
    api_key: String,
    retry: RetryPolicy,
}

impl GeminiGateway {
    /// Fails with `GatewayError::Configuration` when no API key is available.
    pub fn new(config: GeminiConfig, retry: RetryPolicy) -> Result<Self, GatewayError> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            GatewayError::Configuration(format!(
                "Gemini API key not found in config or {}",
                API_KEY_ENV
            ))
        })?;
        let client = build_client(config.timeout())?;
        info!(
            model = %config.model_name,
            max_tokens = config.max_tokens,
            temperature = config.temperature,
            "HeavyLifter gateway initialized"
        );
        Ok(Self {
            client,
            config,
            api_key,
            retry,
        })
    }

    fn model_url(&self, method: &str) -> String {
        format!(
            "{}/models/{}{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model_name,
            method
        )
    }

    fn build_request(&self, prompt: &str, options: &GenerateOptions) -> GenerateContentRequest {
        GenerateContentRequest::new(
            prompt,
            options.system_prompt.as_deref().filter(|s| !s.is_empty()),
            GenerationConfig {
                temperature: options.temperature.unwrap_or(self.config.temperature),
                max_output_tokens: options.max_tokens.unwrap_or(self.config.max_tokens),
            },
        )
    }

    async fn post(
        &self,
        url: &str,
        request: &GenerateContentRequest,
    ) -> Result<reqwest::Response, GatewayError> {
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| map_send_error(e, self.config.timeout()))?;
        ensure_success(response).await
    }

    async fn generate_once(
        &self,
        url: &str,
        request: &GenerateContentRequest,
    ) -> Result<Generation, GatewayError> {
        let response = self.post(url, request).await?;
        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("Malformed response: {}", e)))?;
        into_generation(&body, &self.config.model_name)
    }
}

fn into_generation(
    response: &GenerateContentResponse,
    model_name: &str,
) -> Result<Generation, GatewayError> {
    let content = response.text().ok_or_else(|| {
        GatewayError::InvalidResponse(format!(
            "Response has no text (finish reason: {})",
            response.finish_reason().unwrap_or("unknown")
        ))
    })?;
    let mut generation = Generation::new(content, model_name)
        .with_finish_reason(response.finish_reason().unwrap_or("UNKNOWN"));
    if let Some(tokens) = response.total_tokens() {
        generation = generation.with_token_count(tokens);
    }
    Ok(generation)
}

/// Forward decoded SSE payloads as stream events until the body ends or the
/// receiver goes away.
async fn pump_stream<S, B, E>(body: S, tx: mpsc::Sender<StreamEvent>)
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let mut body = std::pin::pin!(body);
    let mut decoder = SseDecoder::new();
    let mut full_text = String::new();

    while let Some(chunk) = body.next().await {
        let payloads = match chunk {
            Ok(bytes) => decoder.push(bytes.as_ref()),
            Err(e) => {
                let _ = tx.send(StreamEvent::Error(e.to_string())).await;
                return;
            }
        };
        for payload in payloads {
            if !forward_payload(&payload, &tx, &mut full_text).await {
                return;
            }
        }
    }

    if let Some(payload) = decoder.finish()
        && !forward_payload(&payload, &tx, &mut full_text).await
    {
        return;
    }
    let _ = tx.send(StreamEvent::Completed(full_text)).await;
}

/// Returns false once the stream should stop.
async fn forward_payload(
    payload: &str,
    tx: &mpsc::Sender<StreamEvent>,
    full_text: &mut String,
) -> bool {
    let parsed: GenerateContentResponse = match serde_json::from_str(payload) {
        Ok(parsed) => parsed,
        Err(e) => {
            let _ = tx
                .send(StreamEvent::Error(format!("Malformed stream chunk: {}", e)))
                .await;
            return false;
        }
    };
    match parsed.text() {
        Some(text) if !text.is_empty() => {
            full_text.push_str(&text);
            tx.send(StreamEvent::Delta(text)).await.is_ok()
        }
        _ => true,
    }
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<Generation, GatewayError> {
        let request = self.build_request(prompt, options);
        let url = self.model_url(":generateContent");
        let generation = self
            .retry
            .run("heavylifter.generate", || self.generate_once(&url, &request))
            .await?;

        debug!(
            prompt_length = prompt.len(),
            response_length = generation.content.len(),
            tokens = ?generation.token_count,
            "HeavyLifter generation complete"
        );
        Ok(generation)
    }

    async fn stream_generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<StreamHandle, GatewayError> {
        let request = self.build_request(prompt, options);
        let url = self.model_url(":streamGenerateContent?alt=sse");
        // Only opening the stream is retried; a started stream cannot restart.
        let response = self
            .retry
            .run("heavylifter.stream", || self.post(&url, &request))
            .await?;

        debug!(prompt_length = prompt.len(), "HeavyLifter stream opened");
        let (tx, rx) = mpsc::channel(self.config.stream_buffer.max(1));
        tokio::spawn(pump_stream(response.bytes_stream(), tx));
        Ok(StreamHandle::new(rx))
    }

    async fn check_health(&self) -> bool {
        let url = self.model_url("");
        match self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!(error = %e, "HeavyLifter health check failed");
                false
            }
        }
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            role: AgentRole::HeavyLifter,
            model_name: self.config.model_name.clone(),
            context_limit: self.config.context_limit,
            temperature: self.config.temperature,
            max_output_tokens: self.config.max_tokens,
            endpoint: None,
        }
    }

    async fn close(&self) {
        debug!(model = %self.config.model_name, "HeavyLifter gateway closed");
    }
}
