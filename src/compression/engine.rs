//! Compression policy engine: decide, dispatch, verify.
//!
//! The engine never raises for expected conditions. Disabled configuration,
//! below-threshold usage, and nothing-left-to-reduce are all reported as
//! data inside [`CompressionResult`]; only malformed configuration fails
//! loudly, at validation time.

use serde::{Deserialize, Serialize};

use crate::message::Message;

use super::config::{CompressionConfig, CompressionStrategy};
use super::usage::{ContextUsage, compute_usage};
use super::{importance, sliding_window, summary};

/// The outcome of one compression invocation.
///
/// Created synchronously inside one invocation and immutable once returned;
/// the session keeps only the most recent one as a rolling status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionResult {
    /// Whether the message list was actually reduced.
    pub compressed: bool,
    /// Strategy that ran (or would have run).
    pub strategy: CompressionStrategy,
    /// Usage-relevant tokens before compression.
    pub original_token_count: usize,
    /// Usage-relevant tokens after compression.
    pub compressed_token_count: usize,
    /// Reduction as a whole percent of the original, never negative.
    pub reduction_percentage: u32,
    /// Summary text, when the summary strategy produced one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Human-readable outcome, surfaced verbatim by the CLI.
    pub message: String,
    /// The reduced message list; taken by the orchestrator during the swap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compressed_messages: Option<Vec<Message>>,
}

impl CompressionResult {
    fn skipped(strategy: CompressionStrategy, tokens: usize, message: String) -> Self {
        Self {
            compressed: false,
            strategy,
            original_token_count: tokens,
            compressed_token_count: tokens,
            reduction_percentage: 0,
            summary: None,
            message,
            compressed_messages: None,
        }
    }

    /// Drop the carried message list, e.g. before storing on the session.
    pub fn without_messages(mut self) -> Self {
        self.compressed_messages = None;
        self
    }
}

/// Whether the policy would trigger compression for this usage snapshot.
///
/// Percentages are rounded to the nearest integer before the comparison and
/// the trigger is `rounded >= threshold`.
pub fn should_compress(usage: &ContextUsage, config: &CompressionConfig) -> bool {
    config.enabled && usage.usage_percentage >= config.threshold as u32
}

/// Decide whether to compress `messages` and, if so, run the configured
/// strategy.
///
/// List in, list out: the input is never mutated, and the reduced list is
/// carried inside the result for the caller to swap in atomically.
pub fn compress(
    messages: &[Message],
    config: &CompressionConfig,
    model: &str,
) -> CompressionResult {
    let usage = compute_usage(messages, model);

    if !config.enabled {
        return CompressionResult::skipped(
            config.strategy,
            usage.total_tokens,
            "Compression is disabled".to_string(),
        );
    }

    if !should_compress(&usage, config) {
        return CompressionResult::skipped(
            config.strategy,
            usage.total_tokens,
            format!(
                "Context usage {}% is below the {}% compression threshold",
                usage.usage_percentage, config.threshold
            ),
        );
    }

    let target_tokens = usage.context_limit * config.threshold as usize / 100;
    let (new_messages, summary_text) = match config.strategy {
        CompressionStrategy::SlidingWindow => {
            sliding_window::reduce(messages, config, target_tokens)
        }
        CompressionStrategy::Summary => summary::reduce(messages, config),
        CompressionStrategy::Importance => importance::reduce(messages, config, target_tokens),
    };

    let after = compute_usage(&new_messages, model);

    // A strategy must never grow the conversation; keep the original if it
    // somehow would.
    if after.total_tokens > usage.total_tokens {
        tracing::warn!(
            strategy = %config.strategy,
            before = usage.total_tokens,
            after = after.total_tokens,
            "compression output larger than input, keeping original"
        );
        return CompressionResult::skipped(
            config.strategy,
            usage.total_tokens,
            format!(
                "The {} strategy would have grown the conversation from {} to {} tokens; kept the original",
                config.strategy, usage.total_tokens, after.total_tokens
            ),
        );
    }

    if after.total_tokens == usage.total_tokens && new_messages.len() == messages.len() {
        return CompressionResult::skipped(
            config.strategy,
            usage.total_tokens,
            "Nothing left to compress beyond preserved messages".to_string(),
        );
    }

    let reduction_percentage = if usage.total_tokens > 0 {
        ((usage.total_tokens - after.total_tokens) as f64 / usage.total_tokens as f64 * 100.0)
            .round() as u32
    } else {
        0
    };

    tracing::info!(
        strategy = %config.strategy,
        before = usage.total_tokens,
        after = after.total_tokens,
        reduction = reduction_percentage,
        "conversation compressed"
    );

    CompressionResult {
        compressed: true,
        strategy: config.strategy,
        original_token_count: usage.total_tokens,
        compressed_token_count: after.total_tokens,
        reduction_percentage,
        summary: summary_text,
        message: format!(
            "Compressed conversation from {} to {} tokens ({}% reduction) using the {} strategy",
            usage.total_tokens, after.total_tokens, reduction_percentage, config.strategy
        ),
        compressed_messages: Some(new_messages),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Role, ToolCall, ToolResult};
    use serde_json::json;

    /// A conversation large enough to overflow the default 8192-token limit.
    fn big_conversation() -> Vec<Message> {
        let mut messages = Vec::new();
        for i in 0..30 {
            messages.push(Message::user(format!("question {i}: {}", "q".repeat(1200))));
            messages.push(Message::assistant(format!("answer {i}: {}", "a".repeat(1200))));
        }
        messages
    }

    fn config(strategy: CompressionStrategy) -> CompressionConfig {
        CompressionConfig {
            strategy,
            threshold: 50,
            preserve_recent_messages: 6,
            ..Default::default()
        }
    }

    #[test]
    fn test_disabled_config_skips() {
        let cfg = CompressionConfig {
            enabled: false,
            ..config(CompressionStrategy::SlidingWindow)
        };
        let messages = big_conversation();
        let result = compress(&messages, &cfg, "unknown-model");
        assert!(!result.compressed);
        assert!(result.compressed_messages.is_none());
        assert!(result.message.contains("disabled"));
    }

    #[test]
    fn test_below_threshold_skips_with_status_message() {
        let messages = vec![Message::user("short"), Message::assistant("reply")];
        let result = compress(&messages, &config(CompressionStrategy::SlidingWindow), "glm-4.7");
        assert!(!result.compressed);
        assert!(result.message.contains("below"));
        assert!(result.message.contains("50%"));
        assert_eq!(result.original_token_count, result.compressed_token_count);
    }

    #[test]
    fn test_sliding_window_compresses_over_threshold() {
        let messages = big_conversation();
        let result = compress(&messages, &config(CompressionStrategy::SlidingWindow), "unknown-model");
        assert!(result.compressed);
        assert!(result.compressed_token_count <= result.original_token_count);
        assert!(result.reduction_percentage > 0);
        assert!(result.summary.is_none());

        let new = result.compressed_messages.unwrap();
        assert!(new.len() < messages.len());
        // The recency floor survives verbatim.
        assert_eq!(&new[new.len() - 6..], &messages[messages.len() - 6..]);
    }

    #[test]
    fn test_summary_strategy_reports_summary_text() {
        let messages = big_conversation();
        let result = compress(&messages, &config(CompressionStrategy::Summary), "unknown-model");
        assert!(result.compressed);
        let summary = result.summary.expect("summary text");
        assert!(summary.contains("condensed"));
        let new = result.compressed_messages.unwrap();
        assert_eq!(new[0].role, Role::Assistant);
        assert_eq!(new[0].content, summary);
    }

    #[test]
    fn test_importance_strategy_compresses() {
        let messages = big_conversation();
        let result = compress(&messages, &config(CompressionStrategy::Importance), "unknown-model");
        assert!(result.compressed);
        assert!(result.compressed_token_count < result.original_token_count);
    }

    #[test]
    fn test_idempotent_once_stable() {
        let messages = big_conversation();
        let cfg = config(CompressionStrategy::SlidingWindow);
        let first = compress(&messages, &cfg, "unknown-model");
        assert!(first.compressed);

        let reduced = first.compressed_messages.unwrap();
        let second = compress(&reduced, &cfg, "unknown-model");
        assert!(!second.compressed);
        assert_eq!(second.reduction_percentage, 0);
    }

    #[test]
    fn test_floor_larger_than_budget_still_reports_honestly() {
        // The preserved tail alone overflows; compression does its best and
        // reports compressed with whatever reduction it achieved.
        let mut messages = Vec::new();
        for _ in 0..4 {
            messages.push(Message::user("x".repeat(20_000)));
        }
        let cfg = CompressionConfig {
            strategy: CompressionStrategy::SlidingWindow,
            threshold: 50,
            preserve_recent_messages: 3,
            ..Default::default()
        };
        let result = compress(&messages, &cfg, "unknown-model");
        assert!(result.compressed);
        let new = result.compressed_messages.as_ref().unwrap();
        assert_eq!(new.len(), 3);
        // Still over budget, honestly reported.
        let after = compute_usage(new, "unknown-model");
        assert!(after.usage_percentage >= cfg.threshold as u32);
    }

    #[test]
    fn test_no_orphaned_tool_halves_in_any_strategy() {
        let mut messages = Vec::new();
        for i in 0..20 {
            messages.push(Message::user(format!("q{i}: {}", "u".repeat(800))));
            messages.push(Message::assistant_with_tools(
                format!("calling a tool: {}", "v".repeat(800)),
                vec![ToolCall::new(format!("c{i}"), "shell", json!({"cmd": "ls"}))],
            ));
            messages.push(Message::tool(vec![ToolResult::new(
                format!("c{i}"),
                "listing",
            )]));
        }

        for strategy in [
            CompressionStrategy::SlidingWindow,
            CompressionStrategy::Summary,
            CompressionStrategy::Importance,
        ] {
            let result = compress(&messages, &config(strategy), "unknown-model");
            assert!(result.compressed, "strategy {strategy} should compress");
            let new = result.compressed_messages.unwrap();
            for (i, msg) in new.iter().enumerate() {
                if msg.has_tool_calls() {
                    assert_eq!(new[i + 1].role, Role::Tool, "orphaned call in {strategy}");
                }
                if msg.role == Role::Tool {
                    assert!(new[i - 1].has_tool_calls(), "orphaned result in {strategy}");
                }
            }
        }
    }

    #[test]
    fn test_without_messages_strips_payload() {
        let messages = big_conversation();
        let result = compress(&messages, &config(CompressionStrategy::SlidingWindow), "unknown-model");
        assert!(result.compressed_messages.is_some());
        let stripped = result.without_messages();
        assert!(stripped.compressed_messages.is_none());
        assert!(stripped.compressed);
    }
}
