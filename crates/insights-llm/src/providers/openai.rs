//! Chat-completions client for a local model runtime
//!
//! llama.cpp server, LM Studio, Ollama and vLLM all expose the OpenAI
//! chat-completions protocol, so one client covers them.
//!
//! ```no_run
//! use insights_llm::{CompletionRequest, LLMProvider};
//! use insights_llm::providers::{OpenAIConfig, OpenAIProvider};
//!
//! # async fn run() -> insights_llm::Result<()> {
//! let provider = OpenAIProvider::with_config(
//!     OpenAIConfig::new("not-needed").with_api_base("http://localhost:8080/v1"),
//! )?;
//! let request = CompletionRequest::from_prompt("llama-2-7b-chat.ggmlv3.q8_0", "Hello!");
//! println!("{}", provider.complete(request).await?.text);
//! # Ok(())
//! # }
//! ```

use crate::{
    CompletionRequest, CompletionResponse, LLMError, LLMProvider, Result, StopReason, TokenUsage,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

/// Default endpoint of a llama.cpp server started on its default port
pub const DEFAULT_API_BASE: &str = "http://localhost:8080/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Runtime endpoint settings
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// Sent as a bearer token; local runtimes ignore it
    pub api_key: String,
    pub api_base: String,
    /// CPU inference is slow, so the default is generous
    pub timeout_secs: u64,
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Read `OPENAI_API_BASE` and `OPENAI_API_KEY`, both optional
    pub fn from_env() -> Self {
        let mut config = Self::new(
            std::env::var("OPENAI_API_KEY").unwrap_or_else(|_| "not-needed".to_string()),
        );
        if let Ok(base) = std::env::var("OPENAI_API_BASE") {
            config.api_base = base;
        }
        config
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

pub struct OpenAIProvider {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIProvider {
    pub fn with_config(config: OpenAIConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, body, request.model));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| LLMError::UnexpectedResponse(e.to_string()))?;
        let completion = body.into_completion()?;

        debug!(
            stop_reason = ?completion.stop_reason,
            input_tokens = completion.usage.input_tokens,
            output_tokens = completion.usage.output_tokens,
            "Runtime responded"
        );
        Ok(completion)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

fn classify_status(status: StatusCode, body: String, model: String) -> LLMError {
    match status {
        StatusCode::UNAUTHORIZED => LLMError::AuthenticationFailed,
        StatusCode::BAD_REQUEST => LLMError::InvalidRequest(body),
        StatusCode::NOT_FOUND => LLMError::ModelNotFound(model),
        _ => LLMError::RequestFailed(format!("HTTP {status}: {body}")),
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: TokenUsage,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatResponse {
    /// Local runtimes return exactly one choice
    fn into_completion(self) -> Result<CompletionResponse> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LLMError::UnexpectedResponse("no choices in response".to_string()))?;

        Ok(CompletionResponse {
            text: choice.message.content.unwrap_or_default(),
            stop_reason: StopReason::from_finish_reason(choice.finish_reason.as_deref()),
            usage: self.usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let provider = OpenAIProvider::with_config(OpenAIConfig::new("test-key")).unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.config().api_base, DEFAULT_API_BASE);
        assert_eq!(provider.config().timeout_secs, 300);
    }

    #[test]
    fn test_completions_url() {
        let config = OpenAIConfig::new("k").with_api_base("http://127.0.0.1:1234/v1/");
        assert_eq!(config.completions_url(), "http://127.0.0.1:1234/v1/chat/completions");
    }

    #[test]
    fn test_status_classification() {
        let model = || "llama".to_string();
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, String::new(), model()),
            LLMError::AuthenticationFailed
        ));
        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND, String::new(), model()),
            LLMError::ModelNotFound(m) if m == "llama"
        ));
        let err = classify_status(StatusCode::SERVICE_UNAVAILABLE, "loading".to_string(), model());
        assert_eq!(
            err.to_string(),
            "Model runtime request failed: HTTP 503 Service Unavailable: loading"
        );
    }

    #[test]
    fn test_parse_completion() {
        let body = r#"{
            "choices": [{"message": {"role": "assistant", "content": "Margins widened."}, "finish_reason": "length"}],
            "usage": {"prompt_tokens": 31, "completion_tokens": 256}
        }"#;
        let completion = serde_json::from_str::<ChatResponse>(body)
            .unwrap()
            .into_completion()
            .unwrap();

        assert_eq!(completion.text, "Margins widened.");
        assert_eq!(completion.stop_reason, StopReason::MaxTokens);
        assert_eq!(completion.usage.total(), 287);
    }

    #[test]
    fn test_parse_without_usage() {
        let body = r#"{"choices":[{"message":{"content":null},"finish_reason":"stop"}]}"#;
        let completion = serde_json::from_str::<ChatResponse>(body)
            .unwrap()
            .into_completion()
            .unwrap();
        assert_eq!(completion.text, "");
        assert_eq!(completion.usage, TokenUsage::default());
    }

    #[test]
    fn test_empty_choices() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(parsed.into_completion(), Err(LLMError::UnexpectedResponse(_))));
    }
}
