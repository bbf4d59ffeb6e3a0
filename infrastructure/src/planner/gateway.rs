//! vLLM-backed Planner gateway.

use super::protocol::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::http::{build_client, ensure_success, map_send_error};
use crate::retry::RetryPolicy;
use async_trait::async_trait;
use duet_application::{GatewayError, GenerateOptions, ModelGateway};
use duet_domain::{AgentRole, Generation, ModelInfo};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Connection and sampling settings for the Planner (`[models.planner]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VllmPlannerConfig {
    pub host: String,
    pub port: u16,
    pub model_name: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub context_limit: u64,
    pub timeout_secs: u64,
}

impl Default for VllmPlannerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8000,
            model_name: "AgentFlow/agentflow-planner-7b".to_string(),
            temperature: 0.7,
            max_tokens: 2048,
            context_limit: 8000,
            timeout_secs: 60,
        }
    }
}

impl VllmPlannerConfig {
    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Planner gateway speaking the OpenAI chat completions protocol.
pub struct VllmPlannerGateway {
    client: reqwest::Client,
    config: VllmPlannerConfig,
    retry: RetryPolicy,
}

impl VllmPlannerGateway {
    pub fn new(config: VllmPlannerConfig, retry: RetryPolicy) -> Result<Self, GatewayError> {
        let client = build_client(config.timeout())?;
        info!(
            endpoint = %config.server_url(),
            model = %config.model_name,
            context_limit = config.context_limit,
            "Planner gateway initialized"
        );
        Ok(Self {
            client,
            config,
            retry,
        })
    }

    pub fn config(&self) -> &VllmPlannerConfig {
        &self.config
    }

    fn build_request(&self, prompt: &str, options: &GenerateOptions) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = options.system_prompt.as_deref().filter(|s| !s.is_empty()) {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(prompt));

        ChatCompletionRequest {
            model: self.config.model_name.clone(),
            messages,
            temperature: options.temperature.unwrap_or(self.config.temperature),
            max_tokens: options.max_tokens.unwrap_or(self.config.max_tokens),
        }
    }

    async fn send_once(&self, request: &ChatCompletionRequest) -> Result<Generation, GatewayError> {
        let url = format!("{}/v1/chat/completions", self.config.server_url());
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| map_send_error(e, self.config.timeout()))?;
        let response = ensure_success(response).await?;

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("Malformed completion: {}", e)))?;

        into_generation(body, &self.config.model_name)
    }
}

/// Extract the first choice; a response without one is a validation error.
fn into_generation(
    response: ChatCompletionResponse,
    model_name: &str,
) -> Result<Generation, GatewayError> {
    let token_count = response.usage.and_then(|u| u.total_tokens);
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GatewayError::InvalidResponse("Response has no choices".to_string()))?;
    let content = choice
        .message
        .content
        .ok_or_else(|| GatewayError::InvalidResponse("Choice has no content".to_string()))?;

    let mut generation = Generation::new(content, model_name)
        .with_finish_reason(choice.finish_reason.unwrap_or_else(|| "stop".to_string()));
    if let Some(tokens) = token_count {
        generation = generation.with_token_count(tokens);
    }
    Ok(generation)
}

#[async_trait]
impl ModelGateway for VllmPlannerGateway {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<Generation, GatewayError> {
        let request = self.build_request(prompt, options);
        let generation = self
            .retry
            .run("planner.generate", || self.send_once(&request))
            .await?;

        debug!(
            prompt_length = prompt.len(),
            response_length = generation.content.len(),
            tokens = ?generation.token_count,
            finish_reason = %generation.finish_reason,
            "Planner generation complete"
        );
        Ok(generation)
    }

    async fn check_health(&self) -> bool {
        let url = format!("{}/health", self.config.server_url());
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!(endpoint = %url, error = %e, "Planner health check failed");
                false
            }
        }
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            role: AgentRole::Planner,
            model_name: self.config.model_name.clone(),
            context_limit: self.config.context_limit,
            temperature: self.config.temperature,
            max_output_tokens: self.config.max_tokens,
            endpoint: Some(self.config.server_url()),
        }
    }

    async fn close(&self) {
        debug!(endpoint = %self.config.server_url(), "Planner gateway closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::protocol::{Choice, ChoiceMessage, Usage};

    fn gateway() -> VllmPlannerGateway {
        VllmPlannerGateway::new(VllmPlannerConfig::default(), RetryPolicy::immediate(1)).unwrap()
    }

    #[test]
    fn test_request_includes_system_prompt_and_defaults() {
        let options = GenerateOptions::default().with_system_prompt("You plan.");
        let request = gateway().build_request("Do it", &options);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].content, "You plan.");
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_tokens, 2048);
        assert_eq!(request.model, "AgentFlow/agentflow-planner-7b");
    }

    #[test]
    fn test_request_overrides() {
        let options = GenerateOptions::default()
            .with_temperature(0.1)
            .with_max_tokens(64);
        let request = gateway().build_request("Do it", &options);
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.temperature, 0.1);
        assert_eq!(request.max_tokens, 64);
    }

    #[test]
    fn test_into_generation_reads_usage_and_finish_reason() {
        let response = ChatCompletionResponse {
            choices: vec![Choice {
                message: ChoiceMessage {
                    content: Some("plan".into()),
                },
                finish_reason: Some("length".into()),
            }],
            usage: Some(Usage {
                total_tokens: Some(42),
            }),
        };
        let generation = into_generation(response, "m").unwrap();
        assert_eq!(generation.content, "plan");
        assert_eq!(generation.token_count, Some(42));
        assert!(generation.is_truncated());
        assert_eq!(generation.model_used, "m");
    }

    #[test]
    fn test_into_generation_defaults_finish_reason() {
        let response = ChatCompletionResponse {
            choices: vec![Choice {
                message: ChoiceMessage {
                    content: Some("x".into()),
                },
                finish_reason: None,
            }],
            usage: None,
        };
        let generation = into_generation(response, "m").unwrap();
        assert_eq!(generation.finish_reason, "stop");
        assert!(generation.token_count.is_none());
    }

    #[test]
    fn test_into_generation_without_choices_is_invalid() {
        let response = ChatCompletionResponse {
            choices: vec![],
            usage: None,
        };
        let err = into_generation(response, "m").unwrap_err();
        assert!(matches!(err, GatewayError::InvalidResponse(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_model_info_reports_endpoint() {
        let info = gateway().model_info();
        assert_eq!(info.role, AgentRole::Planner);
        assert_eq!(info.context_limit, 8000);
        assert_eq!(info.endpoint.as_deref(), Some("http://localhost:8000"));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_unhealthy() {
        let config = VllmPlannerConfig {
            host: "127.0.0.1".into(),
            port: 1,
            timeout_secs: 2,
            ..VllmPlannerConfig::default()
        };
        let gateway = VllmPlannerGateway::new(config, RetryPolicy::immediate(1)).unwrap();
        assert!(!gateway.check_health().await);
    }
}
