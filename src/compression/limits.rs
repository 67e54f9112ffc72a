//! Model context budget lookup.
//!
//! Models are matched by case-insensitive substring against the table below,
//! first match wins. Unknown models fall back to a conservative default so a
//! misconfigured model name degrades to early compression rather than
//! overflowed requests.

use serde::{Deserialize, Serialize};

/// Token budgets for one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelLimits {
    /// Combined input+output budget for a whole exchange.
    pub context: u32,
    /// Tokens reserved for the model's reply.
    pub output: u32,
}

/// Conservative fallback for unrecognized model names.
pub const DEFAULT_LIMITS: ModelLimits = ModelLimits {
    context: 8_192,
    output: 4_096,
};

/// Known model families, most specific patterns first.
const LIMIT_TABLE: &[(&str, ModelLimits)] = &[
    ("glm-4.7", ModelLimits { context: 128_000, output: 16_384 }),
    ("glm-4", ModelLimits { context: 128_000, output: 8_192 }),
    ("claude", ModelLimits { context: 200_000, output: 8_192 }),
    ("gpt-4o", ModelLimits { context: 128_000, output: 16_384 }),
    ("gpt-4", ModelLimits { context: 128_000, output: 8_192 }),
    ("gemini", ModelLimits { context: 1_000_000, output: 8_192 }),
    ("deepseek", ModelLimits { context: 64_000, output: 8_192 }),
    ("qwen", ModelLimits { context: 32_768, output: 8_192 }),
    ("kimi", ModelLimits { context: 128_000, output: 16_384 }),
];

/// Look up the budgets for a model name.
pub fn lookup_limits(model: &str) -> ModelLimits {
    let normalized = model.to_lowercase();
    LIMIT_TABLE
        .iter()
        .find(|(pattern, _)| normalized.contains(pattern))
        .map(|(_, limits)| *limits)
        .unwrap_or(DEFAULT_LIMITS)
}

/// All known (pattern, limits) entries, for display.
pub fn known_models() -> &'static [(&'static str, ModelLimits)] {
    LIMIT_TABLE
}
