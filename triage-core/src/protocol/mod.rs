//! Protocol module for chat-completion request/response structures
//!
//! This module defines the prompt types callers build and the wire shapes
//! exchanged with the completion endpoint.

pub mod types;

pub use types::{
    ApiErrorBody, ChatCompletionBody, ChatCompletionResponse, ChoiceMessage, CompletionRequest,
    Message, MessageRole, ResponseChoice, ResponseFormat, DEFAULT_TEMPERATURE,
};
