//! Compressible-unit partitioning shared by all strategies.
//!
//! A strategy never inspects raw message indices. The conversation is first
//! partitioned into a protected recent tail (the recency floor) and a prefix
//! of units, where a unit is either a single message or an atomic
//! assistant-tool-call / tool-result pair. Strategies may only drop whole
//! non-exempt units, which makes splitting a pair or touching the floor
//! impossible by construction.

use crate::message::{Message, Role};

use super::config::CompressionConfig;
use super::estimator::estimate_message_tokens;

/// One compressible unit in the droppable prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Unit {
    /// A standalone message at the given index.
    Single(usize),
    /// An assistant message with tool calls at the given index, paired with
    /// the tool message at `index + 1`.
    Pair(usize),
}

impl Unit {
    /// The message indices covered by this unit, in order.
    pub(crate) fn range(&self) -> std::ops::RangeInclusive<usize> {
        match *self {
            Unit::Single(i) => i..=i,
            Unit::Pair(i) => i..=i + 1,
        }
    }
}

/// A conversation split into droppable prefix units and a protected tail.
#[derive(Debug)]
pub(crate) struct Partition {
    /// Prefix units in conversation order.
    pub(crate) units: Vec<Unit>,
    /// Parallel to `units`; exempt units survive every strategy.
    exempt: Vec<bool>,
    /// Index of the first message in the recency floor.
    pub(crate) floor_start: usize,
}

impl Partition {
    /// Partition `messages` under the constraints in `config`.
    pub(crate) fn of(messages: &[Message], config: &CompressionConfig) -> Self {
        let mut floor_start = messages
            .len()
            .saturating_sub(config.preserve_recent_messages);

        // A floor boundary landing on the tool half of a pair would orphan
        // it; extend the floor to keep the pair whole.
        while floor_start > 0
            && messages[floor_start].role == Role::Tool
            && messages[floor_start - 1].has_tool_calls()
        {
            floor_start -= 1;
        }

        let mut units = Vec::new();
        let mut exempt = Vec::new();
        let mut i = 0;
        while i < floor_start {
            if messages[i].has_tool_calls()
                && i + 1 < floor_start
                && messages[i + 1].role == Role::Tool
            {
                units.push(Unit::Pair(i));
                exempt.push(config.preserve_tool_history);
                i += 2;
            } else {
                units.push(Unit::Single(i));
                exempt.push(false);
                i += 1;
            }
        }

        Self {
            units,
            exempt,
            floor_start,
        }
    }

    /// Indices into `units` that a strategy may drop, oldest first.
    pub(crate) fn droppable(&self) -> Vec<usize> {
        (0..self.units.len())
            .filter(|&u| !self.exempt[u])
            .collect()
    }

    /// Usage-relevant tokens of one unit (tool messages count for zero, in
    /// line with the usage calculator).
    pub(crate) fn unit_tokens(&self, messages: &[Message], unit: usize) -> usize {
        self.units[unit]
            .range()
            .filter(|&i| messages[i].role != Role::Tool)
            .map(|i| estimate_message_tokens(&messages[i]))
            .sum()
    }

    /// Rebuild the message list with the marked units removed.
    ///
    /// Survivors keep their original order; the recency floor is appended
    /// verbatim.
    pub(crate) fn assemble(&self, messages: &[Message], dropped: &[bool]) -> Vec<Message> {
        let mut out = Vec::with_capacity(messages.len());
        for (u, unit) in self.units.iter().enumerate() {
            if !dropped[u] {
                for i in unit.range() {
                    out.push(messages[i].clone());
                }
            }
        }
        out.extend(messages[self.floor_start..].iter().cloned());
        out
    }
}
