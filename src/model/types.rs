// ABOUTME: Core types for model communication - tool definitions, tool choice,
// ABOUTME: and the decision request handed to a model collaborator.

use serde::{Deserialize, Serialize};

use crate::conversation::RenderedMessage;

/// Definition of a tool for the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// Whether the model may answer in free text or must call a tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    #[default]
    Auto,
    Required,
}

impl ToolChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolChoice::Auto => "auto",
            ToolChoice::Required => "required",
        }
    }
}

/// Everything a model collaborator needs to make one decision.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRequest {
    pub messages: Vec<RenderedMessage>,
    pub tools: Vec<ToolDefinition>,
    pub tool_choice: ToolChoice,
}

impl DecisionRequest {
    /// Whether a tool with this name was advertised.
    pub fn offers_tool(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name == name)
    }
}
