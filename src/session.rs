//! Conversation session state.
//!
//! A session is the sole owner of its message list. The list is append-only
//! except for the compression swap, and the most recent compression result
//! is kept on the session itself so multiple sessions in one process never
//! share rolling state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::compression::{
    CompressionConfig, CompressionResult, ContextUsage, compute_usage,
};
use crate::message::Message;

/// One conversation with one model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    /// Model identifier used for limit lookup.
    pub model: String,
    messages: Vec<Message>,
    /// Compression settings; absent when compression is not configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<CompressionConfig>,
    /// Rolling status of the most recent compression, overwritten each run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_compression: Option<CompressionResult>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create an empty session for `model`.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            model: model.into(),
            messages: Vec::new(),
            compression: None,
            last_compression: None,
            created_at: Utc::now(),
        }
    }

    /// Attach compression settings.
    pub fn with_compression(mut self, config: CompressionConfig) -> Self {
        self.compression = Some(config);
        self
    }

    /// Append a message to the conversation.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// The conversation in order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Current usage snapshot against this session's model.
    pub fn usage(&self) -> ContextUsage {
        compute_usage(&self.messages, &self.model)
    }

    /// Replace the message list with a compressed one.
    ///
    /// Only the compression orchestrator calls this; everything else appends.
    pub(crate) fn swap_messages(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }
}
