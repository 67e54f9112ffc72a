//! Character-based token estimation.
//!
//! A fixed 4 chars/token ratio stands in for a real tokenizer. Callers may
//! rely on determinism (same text, same count) and monotonicity (longer text
//! never estimates lower), nothing more.

use super::CHARS_PER_TOKEN;
use crate::message::Message;

/// Estimate the token count of a text string.
///
/// Defined as `round(len / 4)`; empty or whitespace-only input estimates to
/// zero. Pure and infallible.
#[inline]
pub fn estimate_tokens(text: &str) -> usize {
    if text.trim().is_empty() {
        return 0;
    }
    (text.len() as f64 / CHARS_PER_TOKEN as f64).round() as usize
}

/// Estimate the token count of a single message.
///
/// An assistant message's tool calls count toward its estimate (the backend
/// replays name and arguments); a tool message is just its derived content.
pub fn estimate_message_tokens(message: &Message) -> usize {
    let mut tokens = estimate_tokens(&message.content);
    if let Some(calls) = &message.tool_calls {
        for call in calls {
            tokens += estimate_tokens(&call.name);
            tokens += estimate_tokens(&call.arguments.to_string());
        }
    }
    tokens
}
