//! Importance compression: drop the least valuable history first.
//!
//! Each droppable unit is scored by a heuristic; removal proceeds in
//! ascending score order (older units first on ties) until the usage target
//! is met or nothing droppable remains. Failure context, code blocks, and
//! tool interactions score high; short plain exchanges score low.

use crate::message::Message;

use super::config::CompressionConfig;
use super::contains_error_indicator;
use super::units::{Partition, Unit};
use super::usage::conversation_tokens;

/// Score bonus for failure indicators in a unit's content.
const ERROR_WEIGHT: i64 = 30;

/// Score bonus for fenced code blocks.
const CODE_WEIGHT: i64 = 25;

/// Score bonus for tool call/result pairs.
const PAIR_WEIGHT: i64 = 20;

/// Cap on the length-derived score component.
const LENGTH_WEIGHT_CAP: i64 = 20;

/// Drop lowest-scoring non-exempt units until usage falls below
/// `target_tokens`.
pub(crate) fn reduce(
    messages: &[Message],
    config: &CompressionConfig,
    target_tokens: usize,
) -> (Vec<Message>, Option<String>) {
    let partition = Partition::of(messages, config);

    let mut order = partition.droppable();
    order.sort_by_key(|&u| (score_unit(messages, &partition.units[u]), u));

    let mut dropped = vec![false; partition.units.len()];
    let mut remaining = conversation_tokens(messages);
    for unit in order {
        if remaining < target_tokens {
            break;
        }
        remaining -= partition.unit_tokens(messages, unit);
        dropped[unit] = true;
    }

    (partition.assemble(messages, &dropped), None)
}

/// Heuristic value of keeping a unit in the conversation.
fn score_unit(messages: &[Message], unit: &Unit) -> i64 {
    let mut score = 0i64;
    let mut content_len = 0usize;

    for i in unit.range() {
        let content = &messages[i].content;
        content_len += content.len();
        if contains_error_indicator(content) {
            score += ERROR_WEIGHT;
        }
        if content.contains("```") {
            score += CODE_WEIGHT;
        }
    }

    if matches!(unit, Unit::Pair(_)) {
        score += PAIR_WEIGHT;
    }

    score + (content_len as i64 / 100).min(LENGTH_WEIGHT_CAP)
}
