//! Aggregate context usage over a conversation.

use crate::message::{Message, Role};

use super::NEAR_LIMIT_PERCENTAGE;
use super::estimator::estimate_message_tokens;
use super::limits::lookup_limits;

/// A usage snapshot for one conversation against one model's budget.
///
/// Pure function of the message list and model name; recomputed on demand,
/// never persisted independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextUsage {
    /// Input plus output tokens.
    pub total_tokens: usize,
    /// The model's combined context budget.
    pub context_limit: usize,
    /// `total / limit`, rounded to the nearest whole percent.
    pub usage_percentage: u32,
    /// Budget left; negative once the conversation overflows.
    pub remaining_tokens: i64,
    /// True at 80% usage or above.
    pub is_near_limit: bool,
    /// True once total tokens exceed the context limit.
    pub is_overflow: bool,
    /// Estimated tokens across user messages.
    pub input_tokens: usize,
    /// Estimated tokens across assistant messages.
    pub output_tokens: usize,
}

/// Sum the usage-relevant tokens of a message list.
///
/// Tool messages are execution metadata, not conversational payload, and are
/// excluded from the budget on both the input and output side.
pub(crate) fn conversation_tokens(messages: &[Message]) -> usize {
    messages
        .iter()
        .filter(|m| m.role != Role::Tool)
        .map(estimate_message_tokens)
        .sum()
}

/// Compute the usage snapshot for `messages` against `model`'s budget.
pub fn compute_usage(messages: &[Message], model: &str) -> ContextUsage {
    let limits = lookup_limits(model);
    let context_limit = limits.context as usize;

    let mut input_tokens = 0usize;
    let mut output_tokens = 0usize;
    for message in messages {
        match message.role {
            Role::User => input_tokens += estimate_message_tokens(message),
            Role::Assistant => output_tokens += estimate_message_tokens(message),
            Role::Tool => {}
        }
    }

    let total_tokens = input_tokens + output_tokens;
    let usage_percentage =
        ((total_tokens as f64 / context_limit as f64) * 100.0).round() as u32;

    ContextUsage {
        total_tokens,
        context_limit,
        usage_percentage,
        remaining_tokens: context_limit as i64 - total_tokens as i64,
        is_near_limit: usage_percentage >= NEAR_LIMIT_PERCENTAGE,
        is_overflow: total_tokens > context_limit,
        input_tokens,
        output_tokens,
    }
}
