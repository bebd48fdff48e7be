//! Core protocol types for chat-completion interactions
//!
//! This module contains the caller-facing request types and the wire shapes
//! exchanged with the completion endpoint. The design prioritizes:
//! - Preserving prompt order end-to-end
//! - Tolerating partial or malformed responses during decoding

use serde::{Deserialize, Serialize};

/// Sampling temperature used when a request does not set one
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instructions that guide the model's behavior
    System,
    /// User input message
    User,
    /// Assistant (model) turn
    Assistant,
}

/// A single prompt turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: MessageRole,

    /// Text content of the turn
    pub content: String,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// A completion request as seen by callers
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Ordered prompt turns
    pub messages: Vec<Message>,

    /// Model override; the client's default model is used when absent
    pub model: Option<String>,

    /// Sampling temperature; `DEFAULT_TEMPERATURE` when absent
    pub temperature: Option<f32>,

    /// Ask the endpoint for a JSON object response
    pub json_output: bool,
}

impl CompletionRequest {
    /// Create a request with default sampling and JSON output enabled
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            model: None,
            temperature: None,
            json_output: true,
        }
    }

    /// Override the model for this request
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Toggle the JSON-object response directive
    pub fn with_json_output(mut self, enabled: bool) -> Self {
        self.json_output = enabled;
        self
    }

    pub fn effective_temperature(&self) -> f32 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }
}

/// Response format directive sent to the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    /// JSON mode
    JsonObject,
}

/// Request body posted to the chat-completions endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionBody<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    pub temperature: f32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

/// Decoded response body
///
/// Every field is optional so that a malformed body still decodes and the
/// client can report precisely what is missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Option<Vec<ResponseChoice>>,

    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

/// One returned choice
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResponseChoice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

/// Message payload of a returned choice
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Error object embedded in an otherwise successful response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,

    /// Some gateways send numeric codes, others strings
    #[serde(default)]
    pub code: Option<serde_json::Value>,
}

impl ApiErrorBody {
    pub fn code_string(&self) -> Option<String> {
        match &self.code {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(code)) => Some(code.clone()),
            Some(other) => Some(other.to_string()),
        }
    }
}
