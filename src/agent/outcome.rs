// ABOUTME: StepOutcome - what a completed step produced: the assistant turn
// ABOUTME: and, when a tool was selected, the invocation and its result.

use std::sync::Arc;

use crate::conversation::{ToolOutcome, Turn};
use crate::error::ToolError;

/// A tool call recorded during a step.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    pub call_id: String,
    pub tool_name: String,
    pub arguments: serde_json::Value,
}

/// Result of one successful step.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    /// The assistant turn appended by the step. For tool calls this holds the
    /// accompanying text, which may be empty.
    pub assistant_message: Turn,

    pub tool_invocation: Option<ToolInvocation>,

    /// The handler's value, or its failure text.
    pub tool_result: Option<ToolOutcome>,

    /// The structured handler error behind an error `tool_result`.
    pub tool_failure: Option<Arc<ToolError>>,
}

impl StepOutcome {
    pub(crate) fn reply(text: String) -> Self {
        Self {
            assistant_message: Turn::assistant(text),
            tool_invocation: None,
            tool_result: None,
            tool_failure: None,
        }
    }

    /// Assistant text, parts joined by newlines.
    pub fn text(&self) -> String {
        self.assistant_message.text()
    }

    pub fn used_tool(&self) -> bool {
        self.tool_invocation.is_some()
    }

    /// The tool's return value, if one was produced.
    pub fn tool_value(&self) -> Option<&serde_json::Value> {
        self.tool_result.as_ref().and_then(ToolOutcome::value)
    }

    /// The tool's failure text, if the handler failed.
    pub fn tool_error(&self) -> Option<&str> {
        self.tool_result.as_ref().and_then(ToolOutcome::error)
    }

    /// The handler failure with its source chain, if the handler failed.
    pub fn handler_error(&self) -> Option<&ToolError> {
        self.tool_failure.as_deref()
    }
}
