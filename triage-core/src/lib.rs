//! Triage Core Library
//!
//! Building blocks for AI-assisted issue triage: a throttled, retrying
//! chat-completion client with lenient JSON parsing, and a normalizer that
//! turns raw issue text into bounded model input.

pub mod completion;
pub mod config;
pub mod normalize;
pub mod protocol;
pub mod schema;

pub use completion::{
    parse_json, ChatCompletion, CompletionClient, CompletionError, CompletionResult, RetryPolicy,
};
pub use config::{LabelConfig, NormalizationConfig, TriageConfig};
pub use normalize::{is_collaborator_or_higher, normalize, normalize_language_code};
pub use protocol::{CompletionRequest, Message, MessageRole};
pub use schema::ResponseSchema;

/// Returns the version of the Triage Core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
