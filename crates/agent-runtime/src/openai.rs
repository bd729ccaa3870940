//! OpenAI LLM Provider
//!
//! Implementation of `LlmProvider` for OpenAI-compatible chat completions.

use std::time::Duration;

use agent_core::{
    error::{AgentError, Result},
    message::Message,
    provider::{Completion, FinishReason, GenerationOptions, LlmProvider, TokenUsage},
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Public OpenAI endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI provider configuration
#[derive(Clone)]
pub struct OpenAiConfig {
    /// API key sent as a bearer token
    pub api_key: String,

    /// API base URL, without the trailing `/chat/completions`
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: 60,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    #[serde(skip_serializing_if = "no_stop_sequences")]
    stop: &'a [String],
}

fn no_stop_sequences(stop: &&[String]) -> bool {
    stop.is_empty()
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// OpenAI-compatible LLM provider
#[derive(Debug)]
pub struct OpenAiProvider {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiProvider {
    /// Create from configuration
    pub fn from_config(config: OpenAiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Convert agent messages to the wire format
    fn convert_messages<'a>(
        messages: &'a [Message],
        options: &'a GenerationOptions,
    ) -> Vec<ApiMessage<'a>> {
        options
            .system_prompt
            .as_deref()
            .map(|system| ApiMessage {
                role: "system",
                content: system,
            })
            .into_iter()
            .chain(messages.iter().map(|m| ApiMessage {
                role: m.role.as_str(),
                content: &m.content,
            }))
            .collect()
    }

    /// Convert the API response to an agent completion
    fn convert_completion(response: ChatResponse, requested_model: &str) -> Result<Completion> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::Provider("response contained no choices".into()))?;

        Ok(Completion {
            content: choice.message.content.unwrap_or_default(),
            model: response.model.unwrap_or_else(|| requested_model.to_string()),
            usage: response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason: choice.finish_reason.as_deref().map(FinishReason::from_api),
        })
    }
}

/// Map a non-success HTTP status and body to an agent error
fn status_error(status: StatusCode, body: &str) -> AgentError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        AgentError::Auth(message)
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        AgentError::RateLimited(message)
    } else if status.is_server_error() {
        AgentError::ProviderUnavailable(format!("{status}: {message}"))
    } else {
        AgentError::Provider(format!("{status}: {message}"))
    }
}

/// Map a failed response, including one whose body could not be read
fn failure_error(status: StatusCode, body: reqwest::Result<String>) -> AgentError {
    match body {
        Ok(body) => status_error(status, &body),
        Err(e) => transport_error(&e),
    }
}

fn transport_error(err: &reqwest::Error) -> AgentError {
    if err.is_timeout() {
        AgentError::Timeout(format!("language model request: {err}"))
    } else if err.is_decode() {
        AgentError::Provider(format!("malformed response: {err}"))
    } else {
        AgentError::ProviderUnavailable(err.to_string())
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let request = ChatRequest {
            model: &options.model,
            messages: Self::convert_messages(messages, options),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: options.top_p,
            stop: &options.stop_sequences,
        };

        tracing::debug!(model = %options.model, messages = request.messages.len(), "Sending chat completion");

        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let err = failure_error(status, response.text().await);
            tracing::warn!(%status, error = %err, "Chat completion failed");
            return Err(err);
        }

        let body: ChatResponse = response.json().await.map_err(|e| transport_error(&e))?;
        let completion = Self::convert_completion(body, &options.model)?;

        if let Some(usage) = &completion.usage {
            tracing::debug!(total_tokens = usage.total_tokens, "Chat completion received");
        }
        Ok(completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = OpenAiConfig::new("sk-test");
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.completions_url(), "https://api.openai.com/v1/chat/completions");
        assert!(!format!("{config:?}").contains("sk-test"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let config = OpenAiConfig::new("k").with_base_url("http://localhost:8080/v1/");
        assert_eq!(config.completions_url(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_message_conversion() {
        let messages = vec![Message::user("Hello")];
        let options = GenerationOptions {
            system_prompt: Some("Be brief.".into()),
            ..GenerationOptions::default()
        };

        let converted = OpenAiProvider::convert_messages(&messages, &options);
        assert_eq!(converted.len(), 2);
        assert_eq!(converted[0].role, "system");
        assert_eq!(converted[1].role, "user");
        assert_eq!(converted[1].content, "Hello");
    }

    #[test]
    fn test_request_omits_empty_stop() {
        let options = GenerationOptions::default();
        let request = ChatRequest {
            model: &options.model,
            messages: Vec::new(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: options.top_p,
            stop: &options.stop_sequences,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("stop").is_none());
        assert_eq!(json["model"], "gpt-3.5-turbo");
    }

    #[test]
    fn test_completion_conversion() {
        let body = r#"{
            "model": "gpt-3.5-turbo-0125",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "Final Answer: hi"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 4, "total_tokens": 14}
        }"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        let completion = OpenAiProvider::convert_completion(response, "gpt-3.5-turbo").unwrap();

        assert_eq!(completion.content, "Final Answer: hi");
        assert_eq!(completion.model, "gpt-3.5-turbo-0125");
        assert_eq!(completion.finish_reason, Some(FinishReason::Stop));
        assert_eq!(completion.usage.unwrap().total_tokens, 14);
    }

    #[test]
    fn test_empty_choices_is_provider_error() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        let err = OpenAiProvider::convert_completion(response, "m").unwrap_err();
        assert!(matches!(err, AgentError::Provider(_)));
    }

    #[test]
    fn test_status_error_mapping() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, body),
            AgentError::Auth(m) if m == "Incorrect API key provided"
        ));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, "{}"),
            AgentError::RateLimited(_)
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, "upstream"),
            AgentError::ProviderUnavailable(_)
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_REQUEST, "bad"),
            AgentError::Provider(m) if m.contains("bad")
        ));
    }

    #[tokio::test]
    async fn test_unreadable_error_body_is_not_dropped() {
        let read_failure = reqwest::Client::new().get("not a url").send().await.unwrap_err();

        let err = failure_error(StatusCode::UNAUTHORIZED, Err(read_failure));
        assert!(matches!(err, AgentError::ProviderUnavailable(m) if !m.is_empty()));

        let err = failure_error(StatusCode::UNAUTHORIZED, Ok("{}".into()));
        assert!(matches!(err, AgentError::Auth(_)));
    }
}
