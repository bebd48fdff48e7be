//! Completion client implementation using reqwest

use super::error::{CompletionError, CompletionResult};
use super::models::DEFAULT_MODEL;
use super::parse;
use super::retry::RetryPolicy;
use super::throttle::Throttle;
use super::ChatCompletion;
use crate::config::{ClientConfig, SecretString};
use crate::protocol::{ChatCompletionBody, ChatCompletionResponse, CompletionRequest, ResponseFormat};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, ClientBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Chat-completions endpoint of the GitHub Models inference API
pub const DEFAULT_ENDPOINT: &str = "https://models.github.ai/inference/chat/completions";

/// Default user agent
const USER_AGENT: &str = concat!("triage-core/", env!("CARGO_PKG_VERSION"));

/// Throttled, retrying client for a chat-completions endpoint
pub struct CompletionClient {
    http: Client,
    token: SecretString,
    model: String,
    endpoint: String,
    retry: RetryPolicy,
    throttle: Throttle,
}

impl CompletionClient {
    /// Create a client with the default model, endpoint and retry policy
    pub fn new(token: impl Into<SecretString>) -> CompletionResult<Self> {
        let token = token.into();
        if token.is_blank() {
            return Err(CompletionError::Configuration(
                "an API token is required".to_string(),
            ));
        }

        let http = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()
            .map_err(|e| {
                CompletionError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            token,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            retry: RetryPolicy::default(),
            throttle: Throttle::new(),
        })
    }

    /// Create a client from the `client` section of a loaded configuration
    pub fn from_config(config: &ClientConfig) -> CompletionResult<Self> {
        Ok(Self::new(config.token.clone())?
            .with_model(config.model.clone())
            .with_endpoint(config.endpoint.clone())
            .with_retry_policy(RetryPolicy::new(config.max_retries, config.retry_delay_ms)))
    }

    /// Set the model used when a request carries no override
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the client at a different chat-completions URL
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Replace the retry policy
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Model used when a request carries no override
    pub fn model(&self) -> &str {
        &self.model
    }

    /// URL requests are posted to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Retry policy applied to every call
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Per-instance dispatch throttle
    pub fn throttle(&self) -> &Throttle {
        &self.throttle
    }

    /// Obtain a single completion, throttling every attempt and retrying
    /// transient failures with exponential backoff.
    ///
    /// Returns the first choice's content exactly as received.
    pub async fn complete(&self, request: &CompletionRequest) -> CompletionResult<String> {
        if request.messages.is_empty() {
            return Err(CompletionError::InvalidRequest(
                "prompt must contain at least one message".to_string(),
            ));
        }

        let body = ChatCompletionBody {
            model: request.model.as_deref().unwrap_or(&self.model),
            messages: &request.messages,
            temperature: request.effective_temperature(),
            response_format: request.json_output.then_some(ResponseFormat::JsonObject),
        };

        let request_id = Uuid::new_v4();
        let mut last_error = None;

        for attempt in 0..self.retry.max_attempts() {
            let waited = self.throttle.acquire().await;
            debug!(
                %request_id,
                attempt,
                model = body.model,
                throttled_ms = waited.as_millis() as u64,
                "Dispatching completion request"
            );

            match self.dispatch(&body).await {
                Ok(content) => {
                    info!(%request_id, attempt, "Completion succeeded");
                    return Ok(content);
                }
                Err(err) if self.retry.should_retry(&err, attempt) => {
                    let delay = self.retry.calculate_delay(attempt);
                    warn!(
                        %request_id,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Transient completion failure, retrying"
                    );
                    last_error = Some(err);
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    error!(%request_id, attempt, error = %err, "Completion failed");
                    return Err(err);
                }
            }
        }

        Err(last_error.unwrap_or(CompletionError::Unknown))
    }

    /// Decode model output as JSON, returning `fallback` on failure
    pub fn parse_json<T: DeserializeOwned>(&self, response: &str, fallback: T) -> T {
        parse::parse_json(response, fallback)
    }

    /// One HTTP round trip
    async fn dispatch(&self, body: &ChatCompletionBody<'_>) -> CompletionResult<String> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(self.token.expose_secret())
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let status_text = status.canonical_reason().unwrap_or_default().to_string();
            let body = response.text().await.unwrap_or_else(|e| {
                warn!(status = status.as_u16(), error = %e, "Failed to read error body");
                format!("<unreadable body: {e}>")
            });
            return Err(CompletionError::Http {
                status: status.as_u16(),
                status_text,
                body,
            });
        }

        let text = response.text().await?;
        let decoded: ChatCompletionResponse = serde_json::from_str(&text)?;

        extract_content(decoded)
    }
}

#[async_trait]
impl ChatCompletion for CompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> CompletionResult<String> {
        CompletionClient::complete(self, request).await
    }
}

/// Pull the first choice's content out of a decoded body.
///
/// An embedded error wins over everything else; then the `choices` array
/// must exist and be non-empty, and its first entry must carry content.
pub fn extract_content(response: ChatCompletionResponse) -> CompletionResult<String> {
    if let Some(api_error) = response.error {
        let code = api_error.code_string();
        return Err(CompletionError::Api {
            message: api_error
                .message
                .unwrap_or_else(|| "unspecified API error".to_string()),
            code,
        });
    }

    let choices = response
        .choices
        .ok_or_else(|| CompletionError::MalformedResponse("missing choices array".to_string()))?;
    let first = choices
        .into_iter()
        .next()
        .ok_or_else(|| CompletionError::MalformedResponse("empty choices array".to_string()))?;

    match first.message.and_then(|message| message.content) {
        Some(content) if !content.is_empty() => Ok(content),
        _ => Err(CompletionError::EmptyContent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::models::ModelTier;

    fn decode(body: &str) -> ChatCompletionResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_extract_content_verbatim() {
        let response = decode(r#"{"choices":[{"message":{"content":"  {\"a\":1}\n"}}]}"#);
        assert_eq!(extract_content(response).unwrap(), "  {\"a\":1}\n");
    }

    #[test]
    fn test_extract_uses_first_choice() {
        let response = decode(
            r#"{"choices":[{"message":{"content":"first"}},{"message":{"content":"second"}}]}"#,
        );
        assert_eq!(extract_content(response).unwrap(), "first");
    }

    #[test]
    fn test_extract_embedded_error() {
        let response = decode(
            r#"{"error":{"message":"model overloaded","code":"busy"},"choices":[{"message":{"content":"x"}}]}"#,
        );
        match extract_content(response) {
            Err(CompletionError::Api { message, code }) => {
                assert_eq!(message, "model overloaded");
                assert_eq!(code.as_deref(), Some("busy"));
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_missing_or_empty_choices() {
        assert!(matches!(
            extract_content(decode("{}")),
            Err(CompletionError::MalformedResponse(_))
        ));
        assert!(matches!(
            extract_content(decode(r#"{"choices":[]}"#)),
            Err(CompletionError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_extract_empty_content() {
        for body in [
            r#"{"choices":[{}]}"#,
            r#"{"choices":[{"message":{}}]}"#,
            r#"{"choices":[{"message":{"content":null}}]}"#,
            r#"{"choices":[{"message":{"content":""}}]}"#,
        ] {
            assert!(
                matches!(extract_content(decode(body)), Err(CompletionError::EmptyContent)),
                "body: {body}"
            );
        }
    }

    #[test]
    fn test_blank_token_is_rejected() {
        assert!(matches!(
            CompletionClient::new("   "),
            Err(CompletionError::Configuration(_))
        ));
    }

    #[test]
    fn test_builder_defaults() {
        let client = CompletionClient::new("token").unwrap();
        assert_eq!(client.model(), DEFAULT_MODEL);
        assert_eq!(client.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(client.retry_policy(), RetryPolicy::default());

        let client = client
            .with_model(ModelTier::Reasoning.model_id())
            .with_retry_policy(RetryPolicy::new(1, 5));
        assert_eq!(client.model(), "openai/o4-mini");
        assert_eq!(client.retry_policy().max_retries, 1);
    }

    #[tokio::test]
    async fn test_empty_prompt_is_rejected_before_dispatch() {
        let client = CompletionClient::new("token").unwrap();
        let result = client.complete(&CompletionRequest::new(Vec::new())).await;
        assert!(matches!(result, Err(CompletionError::InvalidRequest(_))));
        assert!(client.throttle().last_request().await.is_none());
    }
}
