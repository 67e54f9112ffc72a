//! Conversation data model.
//!
//! A conversation is an ordered list of [`Message`]s. Assistant messages may
//! carry tool calls; each such message is immediately followed by a single
//! `Tool` message whose content is derived from the matching tool results.
//! That pair is atomic: the compression engine moves or drops it as one unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Tool => write!(f, "tool"),
        }
    }
}

/// A tool invocation requested by the assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Backend-assigned call identifier, echoed by the result.
    pub id: String,
    /// Name of the tool being invoked.
    pub name: String,
    /// Tool arguments as free-form JSON.
    pub arguments: serde_json::Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// The outcome of a single tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Identifier of the call this result answers.
    pub call_id: String,
    /// Tool output, already rendered to text.
    pub content: String,
    /// Whether the tool reported a failure.
    #[serde(default)]
    pub is_error: bool,
}

impl ToolResult {
    pub fn new(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            content: content.into(),
            is_error: false,
        }
    }

    /// Mark this result as a tool failure.
    pub fn with_error(mut self) -> Self {
        self.is_error = true;
        self
    }
}

/// A single conversation message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    /// Tool invocations requested by an assistant message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// Tool outcomes carried by a `Tool` message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_results: Option<Vec<ToolResult>>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            tool_calls: None,
            tool_results: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a plain assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create an assistant message that requests tool invocations.
    pub fn assistant_with_tools(content: impl Into<String>, calls: Vec<ToolCall>) -> Self {
        let mut msg = Self::new(Role::Assistant, content);
        msg.tool_calls = Some(calls);
        msg
    }

    /// Create the `Tool` message answering an assistant's tool calls.
    ///
    /// The message content is derived from the results so the backend can
    /// replay the conversation without re-running the tools.
    pub fn tool(results: Vec<ToolResult>) -> Self {
        let content = results
            .iter()
            .map(|r| r.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let mut msg = Self::new(Role::Tool, content);
        msg.tool_results = Some(results);
        msg
    }

    /// Whether this assistant message requests at least one tool invocation.
    pub fn has_tool_calls(&self) -> bool {
        self.role == Role::Assistant
            && self.tool_calls.as_ref().is_some_and(|calls| !calls.is_empty())
    }

    /// Whether `next` is the `Tool` message paired with this one.
    pub fn is_paired_with(&self, next: &Message) -> bool {
        self.has_tool_calls() && next.role == Role::Tool
    }
}
