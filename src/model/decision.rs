// ABOUTME: Decision - the model's answer for one step: free text or a tool call.
// ABOUTME: RawDecision converts loosely-shaped payloads, rejecting malformed ones.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// The model's choice for one step.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Reply directly.
    Respond { text: String },

    /// Call a tool. `text` is any accompanying free text, possibly empty.
    UseTool {
        text: String,
        tool_name: String,
        arguments: serde_json::Value,
    },
}

impl Decision {
    /// A free-text reply.
    pub fn respond(text: impl Into<String>) -> Self {
        Self::Respond { text: text.into() }
    }

    /// A tool call with no accompanying text.
    pub fn use_tool(tool_name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self::UseTool {
            text: String::new(),
            tool_name: tool_name.into(),
            arguments,
        }
    }

    /// Attach free text to the decision.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        match self {
            Self::Respond { .. } => Self::Respond { text: text.into() },
            Self::UseTool {
                tool_name,
                arguments,
                ..
            } => Self::UseTool {
                text: text.into(),
                tool_name,
                arguments,
            },
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Respond { text } | Self::UseTool { text, .. } => text,
        }
    }

    pub fn tool_name(&self) -> Option<&str> {
        match self {
            Self::Respond { .. } => None,
            Self::UseTool { tool_name, .. } => Some(tool_name),
        }
    }
}

/// A decision as collaborators often produce it: every field optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDecision {
    #[serde(default)]
    pub free_text: Option<String>,
    #[serde(default)]
    pub chosen_tool_name: Option<String>,
    #[serde(default)]
    pub chosen_tool_arguments: Option<serde_json::Value>,
}

impl TryFrom<RawDecision> for Decision {
    type Error = ModelError;

    /// A tool name wins over free text, which is kept as preamble. Missing or
    /// null arguments become an empty object. A decision with neither text nor
    /// a tool, or with arguments but no tool name, is malformed.
    fn try_from(raw: RawDecision) -> Result<Self, Self::Error> {
        let tool_name = raw.chosen_tool_name.filter(|n| !n.trim().is_empty());

        match (tool_name, raw.chosen_tool_arguments, raw.free_text) {
            (Some(tool_name), arguments, text) => Ok(Decision::UseTool {
                text: text.unwrap_or_default(),
                tool_name,
                arguments: match arguments {
                    None | Some(serde_json::Value::Null) => serde_json::json!({}),
                    Some(arguments) => arguments,
                },
            }),
            (None, Some(_), _) => Err(ModelError::MalformedToolCall(
                "tool arguments supplied without a tool name".to_string(),
            )),
            (None, None, Some(text)) => Ok(Decision::Respond { text }),
            (None, None, None) => Err(ModelError::MalformedToolCall(
                "decision has neither text nor a tool selection".to_string(),
            )),
        }
    }
}
