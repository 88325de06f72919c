// ABOUTME: Provider-agnostic projection of the conversation log for model calls.
// ABOUTME: Tool results render as an adjacent tool-call / tool-response pair.

use serde::{Deserialize, Serialize};

use super::turn::{Part, ToolOutcome, Turn, join_parts};

/// Role of a rendered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}

/// A tool call as presented to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

/// A message record ready to be translated into a provider wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedMessage {
    pub role: MessageRole,
    pub parts: Vec<Part>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<RenderedToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default)]
    pub is_error: bool,
}

impl RenderedMessage {
    /// A plain text record with no tool data.
    pub fn new(role: MessageRole, parts: Vec<Part>) -> Self {
        Self {
            role,
            parts,
            tool_call: None,
            tool_call_id: None,
            is_error: false,
        }
    }

    fn tool_call(id: &str, name: &str, arguments: &serde_json::Value) -> Self {
        Self {
            role: MessageRole::Assistant,
            parts: Vec::new(),
            tool_call: Some(RenderedToolCall {
                id: id.to_string(),
                name: name.to_string(),
                arguments: arguments.clone(),
            }),
            tool_call_id: None,
            is_error: false,
        }
    }

    fn tool_response(id: &str, outcome: &ToolOutcome) -> Self {
        Self {
            role: MessageRole::Tool,
            parts: vec![Part::text(outcome.to_content())],
            tool_call: None,
            tool_call_id: Some(id.to_string()),
            is_error: outcome.is_error(),
        }
    }

    /// Text content of the message, parts joined by newlines.
    pub fn content(&self) -> String {
        join_parts(&self.parts)
    }
}

/// Render a system turn plus history into model-facing records.
///
/// Invocations are only emitted next to their result; an invocation that has
/// no result yet is left out since providers reject unanswered tool calls.
pub(crate) fn render_turns(system: Option<&Turn>, turns: &[Turn]) -> Vec<RenderedMessage> {
    let mut rendered = Vec::with_capacity(turns.len() + 1);

    if let Some(system) = system {
        rendered.push(RenderedMessage::new(
            MessageRole::System,
            system.parts().to_vec(),
        ));
    }

    for turn in turns {
        match turn {
            Turn::System { parts } => {
                rendered.push(RenderedMessage::new(MessageRole::System, parts.clone()))
            }
            Turn::User { parts } => {
                rendered.push(RenderedMessage::new(MessageRole::User, parts.clone()))
            }
            Turn::Assistant { parts } => {
                rendered.push(RenderedMessage::new(MessageRole::Assistant, parts.clone()))
            }
            Turn::ToolInvocation { .. } => {}
            Turn::ToolResult { call_id, outcome } => {
                let invocation = turns.iter().find_map(|t| match t {
                    Turn::ToolInvocation {
                        call_id: id,
                        tool_name,
                        arguments,
                    } if id == call_id => Some((tool_name, arguments)),
                    _ => None,
                });
                if let Some((tool_name, arguments)) = invocation {
                    rendered.push(RenderedMessage::tool_call(call_id, tool_name, arguments));
                }
                rendered.push(RenderedMessage::tool_response(call_id, outcome));
            }
        }
    }

    rendered
}
