//! Completion client for a remote chat-completions endpoint
//!
//! This module handles:
//! - Per-instance throttling of outbound requests
//! - Classification of failures into transient and fatal
//! - Exponential backoff between retries
//! - Lenient JSON decoding of model output

pub mod client;
pub mod error;
pub mod models;
pub mod parse;
pub mod retry;
pub mod throttle;

pub use client::{extract_content, CompletionClient, DEFAULT_ENDPOINT};
pub use error::{CompletionError, CompletionResult};
pub use models::{ModelTier, ACCURATE_MODEL, DEFAULT_MODEL, FAST_MODEL, REASONING_MODEL};
pub use parse::{parse_json, strip_code_fence};
pub use retry::{classify, Disposition, RetryPolicy};
pub use throttle::{Throttle, MIN_REQUEST_INTERVAL};

use crate::protocol::CompletionRequest;
use async_trait::async_trait;

/// Anything that can turn a prompt into completion text
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> CompletionResult<String>;
}
