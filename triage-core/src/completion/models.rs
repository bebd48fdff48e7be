//! Model identifiers available on the inference endpoint

/// High-accuracy model for complex decisions
pub const ACCURATE_MODEL: &str = "openai/gpt-4.1";

/// Fast, inexpensive model for simple checks
pub const FAST_MODEL: &str = "openai/gpt-4.1-mini";

/// Reasoning-oriented model for nuanced judgment
pub const REASONING_MODEL: &str = "openai/o4-mini";

/// Model used when neither the client nor the request names one
pub const DEFAULT_MODEL: &str = ACCURATE_MODEL;

/// Intended use of a model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ModelTier {
    #[default]
    Accurate,
    Fast,
    Reasoning,
}

impl ModelTier {
    /// Identifier sent as `model` in the request body
    pub fn model_id(&self) -> &'static str {
        match self {
            ModelTier::Accurate => ACCURATE_MODEL,
            ModelTier::Fast => FAST_MODEL,
            ModelTier::Reasoning => REASONING_MODEL,
        }
    }
}
