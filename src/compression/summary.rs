//! Summary compression: condense the droppable prefix into one message.
//!
//! The dropped exchanges are replaced with a single synthetic assistant
//! message describing what they covered. The description is deterministic
//! (counts, opening request, tool activity, failure excerpts); its prose
//! quality is not a contract, only its structure and that it is smaller than
//! what it replaces. When it would not be smaller, the strategy returns the
//! conversation unchanged and the engine reports an honest no-op.

use std::fmt::Write as _;

use crate::message::{Message, Role};

use super::config::CompressionConfig;
use super::contains_error_indicator;
use super::estimator::estimate_message_tokens;
use super::units::Partition;

/// Longest excerpt taken from any single message.
const EXCERPT_CHARS: usize = 160;

/// Most failure excerpts carried into the summary.
const MAX_ERROR_EXCERPTS: usize = 3;

/// Most distinct tool names listed in the summary.
const MAX_TOOL_NAMES: usize = 8;

/// Replace all droppable units with one synthetic summary message.
pub(crate) fn reduce(
    messages: &[Message],
    config: &CompressionConfig,
) -> (Vec<Message>, Option<String>) {
    let partition = Partition::of(messages, config);
    let droppable = partition.droppable();
    if droppable.is_empty() {
        return (messages.to_vec(), None);
    }

    let dropped_messages: Vec<&Message> = droppable
        .iter()
        .flat_map(|&u| partition.units[u].range())
        .map(|i| &messages[i])
        .collect();

    let summary_text = build_summary(&dropped_messages);
    let synthetic = Message::assistant(summary_text.clone());

    // Replacing the prefix must shrink it, or the swap is pointless.
    let replaced_tokens: usize = droppable
        .iter()
        .map(|&u| partition.unit_tokens(messages, u))
        .sum();
    if estimate_message_tokens(&synthetic) >= replaced_tokens {
        return (messages.to_vec(), None);
    }

    let mut dropped = vec![false; partition.units.len()];
    for &u in &droppable {
        dropped[u] = true;
    }

    let mut out = Vec::with_capacity(messages.len());
    out.push(synthetic);
    out.extend(partition.assemble(messages, &dropped));

    (out, Some(summary_text))
}

/// Build the condensed description of the dropped exchanges.
fn build_summary(dropped: &[&Message]) -> String {
    let mut text = String::new();
    let _ = writeln!(
        text,
        "[Conversation summary] {} earlier message(s) condensed.",
        dropped.len()
    );

    if let Some(first_user) = dropped.iter().find(|m| m.role == Role::User) {
        let _ = writeln!(
            text,
            "Opening request: {}",
            excerpt(&first_user.content, EXCERPT_CHARS)
        );
    }

    let mut tool_names: Vec<&str> = Vec::new();
    let mut call_count = 0usize;
    for msg in dropped {
        if let Some(calls) = &msg.tool_calls {
            for call in calls {
                call_count += 1;
                if !tool_names.contains(&call.name.as_str()) && tool_names.len() < MAX_TOOL_NAMES {
                    tool_names.push(&call.name);
                }
            }
        }
    }
    if call_count > 0 {
        let _ = writeln!(
            text,
            "Tool activity: {} invocation(s) of {}.",
            call_count,
            tool_names.join(", ")
        );
    }

    let mut error_excerpts = 0usize;
    for msg in dropped {
        if error_excerpts >= MAX_ERROR_EXCERPTS {
            break;
        }
        if contains_error_indicator(&msg.content) {
            let _ = writeln!(
                text,
                "Issue encountered: {}",
                excerpt(&msg.content, EXCERPT_CHARS)
            );
            error_excerpts += 1;
        }
    }

    if let Some(last) = dropped
        .iter()
        .rev()
        .find(|m| m.role != Role::Tool && !m.content.trim().is_empty())
    {
        let _ = write!(
            text,
            "Last condensed exchange ({}): {}",
            last.role,
            excerpt(&last.content, EXCERPT_CHARS)
        );
    }

    text
}

/// First `max_chars` characters of trimmed text, with a marker when cut.
fn excerpt(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let mut cut: String = trimmed.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}
