//! Sliding-window compression: forget the oldest history first.
//!
//! The cheapest and most lossy strategy. Droppable units are removed oldest
//! first until the conversation fits below the threshold target or nothing
//! droppable remains. No summary is produced.

use crate::message::Message;

use super::config::CompressionConfig;
use super::units::Partition;
use super::usage::conversation_tokens;

/// Drop oldest non-exempt units until usage falls below `target_tokens`.
pub(crate) fn reduce(
    messages: &[Message],
    config: &CompressionConfig,
    target_tokens: usize,
) -> (Vec<Message>, Option<String>) {
    let partition = Partition::of(messages, config);
    let mut dropped = vec![false; partition.units.len()];
    let mut remaining = conversation_tokens(messages);

    for unit in partition.droppable() {
        if remaining < target_tokens {
            break;
        }
        remaining -= partition.unit_tokens(messages, unit);
        dropped[unit] = true;
    }

    (partition.assemble(messages, &dropped), None)
}
