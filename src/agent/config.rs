// ABOUTME: AgentConfig - per-agent settings for how a step is run: tool choice,
// ABOUTME: timeouts, and whether tools are described in the system message.

use std::time::Duration;

use crate::model::ToolChoice;

/// Step settings for an agent.
#[derive(Debug, Clone, Default)]
pub struct AgentConfig {
    /// Whether the model may reply in free text or must call a tool.
    pub tool_choice: ToolChoice,

    /// Upper bound on the model call. None waits indefinitely.
    pub decision_timeout: Option<Duration>,

    /// Upper bound on a tool handler call. None waits indefinitely.
    pub tool_timeout: Option<Duration>,

    /// Append a tool listing to the system message sent to the model.
    /// The stored conversation is not changed.
    pub describe_tools_in_system_message: bool,
}

impl AgentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = choice;
        self
    }

    /// Shorthand for `tool_choice(ToolChoice::Required)`.
    pub fn require_tool(self) -> Self {
        self.tool_choice(ToolChoice::Required)
    }

    pub fn decision_timeout(mut self, timeout: Duration) -> Self {
        self.decision_timeout = Some(timeout);
        self
    }

    pub fn tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = Some(timeout);
        self
    }

    pub fn describe_tools_in_system_message(mut self, enabled: bool) -> Self {
        self.describe_tools_in_system_message = enabled;
        self
    }
}
