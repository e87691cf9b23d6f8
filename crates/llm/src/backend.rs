//! OpenAI-compatible model router client
//!
//! Works with any gateway exposing `POST {endpoint}/chat/completions`
//! (OpenAI, Azure behind a proxy, vLLM, LiteLLM and similar routers).

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use answer_engine_config::ModelRouterConfig;
use answer_engine_core::{
    GenerationError, GenerationRequest, GenerationResult, Message, ModelRouter, TokenUsage,
};

use crate::LlmError;

/// Router client configuration
#[derive(Debug, Clone)]
pub struct HttpRouterConfig {
    /// API base, e.g. `https://api.openai.com/v1`
    pub endpoint: String,
    pub api_key: Option<String>,
    /// Used when the request carries no model preference
    pub default_model: String,
    pub timeout: Duration,
    /// Price per 1000 prompt tokens
    pub prompt_cost_per_1k: f64,
    /// Price per 1000 completion tokens
    pub completion_cost_per_1k: f64,
}

impl Default for HttpRouterConfig {
    fn default() -> Self {
        Self::from(&ModelRouterConfig::default())
    }
}

impl From<&ModelRouterConfig> for HttpRouterConfig {
    fn from(config: &ModelRouterConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            default_model: config.default_model.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
            prompt_cost_per_1k: config.prompt_cost_per_1k,
            completion_cost_per_1k: config.completion_cost_per_1k,
        }
    }
}

impl HttpRouterConfig {
    /// Cost of one call in the configured currency
    pub fn cost(&self, usage: &TokenUsage) -> f64 {
        (usage.prompt_tokens as f64 / 1000.0) * self.prompt_cost_per_1k
            + (usage.completion_tokens as f64 / 1000.0) * self.completion_cost_per_1k
    }
}

/// Model router over HTTP
pub struct HttpModelRouter {
    config: HttpRouterConfig,
    client: Client,
}

impl HttpModelRouter {
    pub fn new(config: HttpRouterConfig) -> Result<Self, LlmError> {
        if config.endpoint.trim().is_empty() {
            return Err(LlmError::Configuration("router endpoint is empty".to_string()));
        }
        if config.api_key.is_none() && !is_local(&config.endpoint) {
            tracing::warn!(
                endpoint = %config.endpoint,
                "No API key configured for remote model router"
            );
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Configuration(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.config.endpoint.trim_end_matches('/'))
    }

    fn build_headers(&self, tenant_id: &str) -> reqwest::header::HeaderMap {
        use reqwest::header::HeaderValue;

        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(ref key) = self.config.api_key {
            if let Ok(val) = HeaderValue::from_str(&format!("Bearer {}", key)) {
                headers.insert(reqwest::header::AUTHORIZATION, val);
            }
        }
        if let Ok(val) = HeaderValue::from_str(tenant_id) {
            headers.insert("X-Tenant-Id", val);
        }
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers
    }

    fn chat_request(&self, request: &GenerationRequest) -> ChatRequest {
        ChatRequest {
            model: request
                .model_preference
                .clone()
                .unwrap_or_else(|| self.config.default_model.clone()),
            messages: request.messages.iter().map(ChatMessage::from).collect(),
            max_tokens: request.max_tokens,
            temperature: Some(request.temperature),
            user: request.user_id.clone(),
            stream: Some(false),
        }
    }

    fn build_result(
        &self,
        response: ChatResponse,
        requested_model: String,
        latency_ms: u64,
    ) -> Result<GenerationResult, GenerationError> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GenerationError::InvalidResponse("No choices in response".to_string()))?;

        let token_usage = response
            .usage
            .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        Ok(GenerationResult {
            text: choice.message.content.unwrap_or_default(),
            model_used: response.model.unwrap_or(requested_model),
            cost: self.config.cost(&token_usage),
            latency_ms,
            token_usage,
        })
    }
}

fn is_local(endpoint: &str) -> bool {
    endpoint.starts_with("http://localhost") || endpoint.starts_with("http://127.0.0.1")
}

fn status_error(status: StatusCode, body: &str) -> GenerationError {
    if status == StatusCode::REQUEST_TIMEOUT || status == StatusCode::GATEWAY_TIMEOUT {
        GenerationError::Timeout
    } else {
        GenerationError::Api(format!("HTTP {}: {}", status, body))
    }
}

fn transport_error(err: reqwest::Error) -> GenerationError {
    if err.is_timeout() {
        GenerationError::Timeout
    } else {
        GenerationError::Network(err.to_string())
    }
}

#[async_trait]
impl ModelRouter for HttpModelRouter {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        let chat = self.chat_request(request);
        let requested_model = chat.model.clone();

        let response = self
            .client
            .post(self.chat_url())
            .headers(self.build_headers(&request.tenant_id))
            .json(&chat)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &error_text));
        }

        let response: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        let latency_ms = start.elapsed().as_millis() as u64;
        self.build_result(response, requested_model, latency_ms)
    }

    fn name(&self) -> &str {
        "http-model-router"
    }
}

// OpenAI API types
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

impl From<&Message> for ChatMessage {
    fn from(msg: &Message) -> Self {
        Self {
            role: msg.role.to_string(),
            content: Some(msg.content.clone()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use answer_engine_core::GenerationRequirements;

    fn router(config: HttpRouterConfig) -> HttpModelRouter {
        HttpModelRouter::new(config).unwrap()
    }

    fn generation_request(model: Option<&str>) -> GenerationRequest {
        GenerationRequest {
            messages: vec![Message::system("ctx"), Message::user("What is ML?")],
            tenant_id: "tenant-a".to_string(),
            user_id: Some("u1".to_string()),
            model_preference: model.map(String::from),
            max_tokens: Some(256),
            temperature: 0.3,
            requirements: GenerationRequirements {
                supports_citations: true,
                language: "en".to_string(),
                requires_reasoning: true,
            },
        }
    }

    #[test]
    fn test_chat_url() {
        let r = router(HttpRouterConfig {
            endpoint: "http://localhost:8082/v1/".to_string(),
            ..Default::default()
        });
        assert_eq!(r.chat_url(), "http://localhost:8082/v1/chat/completions");
    }

    #[test]
    fn test_empty_endpoint_rejected() {
        let result = HttpModelRouter::new(HttpRouterConfig {
            endpoint: String::new(),
            ..Default::default()
        });
        assert!(matches!(result, Err(LlmError::Configuration(_))));
    }

    #[test]
    fn test_model_preference_overrides_default() {
        let r = router(HttpRouterConfig::default());
        assert_eq!(r.chat_request(&generation_request(Some("gpt-4o"))).model, "gpt-4o");
        assert_eq!(r.chat_request(&generation_request(None)).model, "gpt-4o-mini");
    }

    #[test]
    fn test_request_serialization() {
        let r = router(HttpRouterConfig::default());
        let json = serde_json::to_value(r.chat_request(&generation_request(None))).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "What is ML?");
        assert_eq!(json["max_tokens"], 256);
        assert_eq!(json["user"], "u1");
        assert_eq!(json["stream"], false);
    }

    #[test]
    fn test_response_to_result_with_cost() {
        let r = router(HttpRouterConfig {
            prompt_cost_per_1k: 0.5,
            completion_cost_per_1k: 1.5,
            ..Default::default()
        });
        let body = r#"{
            "model": "gpt-4o-mini-2024",
            "choices": [{"message": {"role": "assistant", "content": "ML is AI.[1]"}}],
            "usage": {"prompt_tokens": 1000, "completion_tokens": 200, "total_tokens": 1200}
        }"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        let result = r.build_result(response, "gpt-4o-mini".to_string(), 40).unwrap();

        assert_eq!(result.text, "ML is AI.[1]");
        assert_eq!(result.model_used, "gpt-4o-mini-2024");
        assert_eq!(result.token_usage.total_tokens, 1200);
        assert!((result.cost - 0.8).abs() < 1e-9);
        assert_eq!(result.latency_ms, 40);
    }

    #[test]
    fn test_oversized_usage_saturates() {
        let r = router(HttpRouterConfig::default());
        let body = r#"{
            "choices": [{"message": {"role": "assistant", "content": "ok"}}],
            "usage": {"prompt_tokens": 4294967295, "completion_tokens": 5}
        }"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        let result = r.build_result(response, "m".to_string(), 1).unwrap();
        assert_eq!(result.token_usage.total_tokens, u32::MAX);
    }

    #[test]
    fn test_no_choices_is_invalid() {
        let r = router(HttpRouterConfig::default());
        let response: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        let err = r.build_result(response, "m".to_string(), 1).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidResponse(_)));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_error(StatusCode::GATEWAY_TIMEOUT, ""), GenerationError::Timeout);
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, "slow down"),
            GenerationError::Api(msg) if msg.contains("429")
        ));
    }
}
