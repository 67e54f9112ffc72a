//! Context Budget & Compression Engine
//!
//! This module tracks how many tokens a conversation occupies and shrinks it
//! when it approaches the model's context limit, without breaking the
//! structural invariants that keep a tool-using conversation replayable.
//!
//! ## Components
//!
//! - **Estimator**: character-based token estimation
//! - **Limits**: model name to context/output budget lookup
//! - **Usage**: aggregate usage snapshot over a message list
//! - **Engine**: threshold decision and strategy dispatch
//! - **Strategies**: sliding-window, summary, importance
//!
//! ## Configuration
//!
//! Compression is configured per session in `cinder.toml`:
//!
//! ```toml
//! [compression]
//! enabled = true
//! threshold = 80
//! strategy = "sliding-window"
//! preserve_recent_messages = 10
//! ```

mod config;
mod engine;
mod estimator;
mod importance;
mod limits;
mod sliding_window;
mod summary;
pub(crate) mod units;
mod usage;

pub use config::{CompressionConfig, CompressionStrategy};
pub use engine::{CompressionResult, compress, should_compress};
pub use estimator::{estimate_message_tokens, estimate_tokens};
pub use limits::{DEFAULT_LIMITS, ModelLimits, known_models, lookup_limits};
pub use usage::{ContextUsage, compute_usage};

/// Characters per estimated token. Deliberately approximate; the engine only
/// relies on determinism and monotonicity, never on tokenizer fidelity.
pub const CHARS_PER_TOKEN: usize = 4;

/// Usage percentage at which a conversation counts as near its limit.
pub const NEAR_LIMIT_PERCENTAGE: u32 = 80;

/// Default usage percentage that triggers compression.
pub const DEFAULT_COMPRESSION_THRESHOLD: u8 = 80;

/// Substrings that mark a message as carrying failure context.
/// Used by the importance scorer and the summary builder.
pub(crate) const ERROR_INDICATORS: &[&str] = &["error", "failed", "failure", "exception", "panic"];

/// Check whether text mentions any failure indicator, case-insensitively.
pub(crate) fn contains_error_indicator(text: &str) -> bool {
    let lowered = text.to_lowercase();
    ERROR_INDICATORS.iter().any(|ind| lowered.contains(ind))
}
