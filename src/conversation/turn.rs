// ABOUTME: Defines Turn - one entry in the conversation log - and its parts.
// ABOUTME: Tool calls and tool results are joined by an explicit call id.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A text segment within a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub content: String,
}

impl Part {
    /// Create a text part.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// The kind of a turn, also used as the `role` of persisted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnKind {
    System,
    User,
    Assistant,
    ToolCall,
    ToolResult,
}

impl fmt::Display for TurnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TurnKind::System => "system",
            TurnKind::User => "user",
            TurnKind::Assistant => "assistant",
            TurnKind::ToolCall => "tool_call",
            TurnKind::ToolResult => "tool_result",
        };
        f.write_str(name)
    }
}

/// What a tool call produced: a serialized return value or an error message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "content", rename_all = "snake_case")]
pub enum ToolOutcome {
    Value(serde_json::Value),
    Error(String),
}

impl ToolOutcome {
    /// Whether the tool call failed.
    pub fn is_error(&self) -> bool {
        matches!(self, ToolOutcome::Error(_))
    }

    /// The returned value, if the call succeeded.
    pub fn value(&self) -> Option<&serde_json::Value> {
        match self {
            ToolOutcome::Value(v) => Some(v),
            ToolOutcome::Error(_) => None,
        }
    }

    /// The error message, if the call failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            ToolOutcome::Value(_) => None,
            ToolOutcome::Error(msg) => Some(msg),
        }
    }

    /// Text form sent back to the model.
    pub fn to_content(&self) -> String {
        match self {
            ToolOutcome::Value(v) => v.to_string(),
            ToolOutcome::Error(msg) => msg.clone(),
        }
    }
}

/// One entry in the conversation log.
#[derive(Debug, Clone, PartialEq)]
pub enum Turn {
    System {
        parts: Vec<Part>,
    },
    User {
        parts: Vec<Part>,
    },
    Assistant {
        parts: Vec<Part>,
    },
    ToolInvocation {
        call_id: String,
        tool_name: String,
        arguments: serde_json::Value,
    },
    ToolResult {
        call_id: String,
        outcome: ToolOutcome,
    },
}

impl Turn {
    /// Create a system turn with a single text part.
    pub fn system(text: impl Into<String>) -> Self {
        Self::System {
            parts: vec![Part::text(text)],
        }
    }

    /// Create a user turn with a single text part.
    pub fn user(text: impl Into<String>) -> Self {
        Self::User {
            parts: vec![Part::text(text)],
        }
    }

    /// Create an assistant turn with a single text part.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::Assistant {
            parts: vec![Part::text(text)],
        }
    }

    pub fn kind(&self) -> TurnKind {
        match self {
            Turn::System { .. } => TurnKind::System,
            Turn::User { .. } => TurnKind::User,
            Turn::Assistant { .. } => TurnKind::Assistant,
            Turn::ToolInvocation { .. } => TurnKind::ToolCall,
            Turn::ToolResult { .. } => TurnKind::ToolResult,
        }
    }

    /// The call id joining a tool invocation and its result.
    pub fn call_id(&self) -> Option<&str> {
        match self {
            Turn::ToolInvocation { call_id, .. } | Turn::ToolResult { call_id, .. } => {
                Some(call_id)
            }
            _ => None,
        }
    }

    /// Text parts of a system, user or assistant turn.
    pub fn parts(&self) -> &[Part] {
        match self {
            Turn::System { parts } | Turn::User { parts } | Turn::Assistant { parts } => parts,
            _ => &[],
        }
    }

    /// Concatenated text of the turn's parts, joined by newlines.
    ///
    /// Tool invocations yield their JSON arguments, tool results their
    /// outcome content.
    pub fn text(&self) -> String {
        match self {
            Turn::ToolInvocation { arguments, .. } => arguments.to_string(),
            Turn::ToolResult { outcome, .. } => outcome.to_content(),
            _ => join_parts(self.parts()),
        }
    }
}

pub(crate) fn join_parts(parts: &[Part]) -> String {
    parts
        .iter()
        .map(|p| p.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
