// ABOUTME: Conversation - the append-only turn log owned by one agent.
// ABOUTME: Enforces a single system turn and call-id pairing of tool results.

use std::sync::Arc;

use super::render::{RenderedMessage, render_turns};
use super::turn::{Part, ToolOutcome, Turn};
use crate::error::ConversationError;

/// An ordered, append-only log of conversation turns.
///
/// The system message is held apart from the history: setting a new one
/// replaces the old one and it always renders first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    pub(super) system: Option<Turn>,
    pub(super) turns: Vec<Turn>,
}

impl Conversation {
    /// Create an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a conversation with a system message.
    pub fn with_system_message(content: impl Into<String>) -> Self {
        let mut conversation = Self::new();
        conversation.set_system_message(content);
        conversation
    }

    /// Replace the system message.
    pub fn set_system_message(&mut self, content: impl Into<String>) {
        self.system = Some(Turn::system(content));
    }

    /// Replace the system message with several parts.
    ///
    /// An empty list stores a single empty part; every turn has at least one.
    pub fn set_system_parts(&mut self, mut parts: Vec<Part>) {
        if parts.is_empty() {
            parts.push(Part::text(""));
        }
        self.system = Some(Turn::System { parts });
    }

    pub fn add_user_message(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::user(content));
    }

    pub fn add_assistant_message(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::assistant(content));
    }

    /// Record a tool call. The call id must not have been used before.
    pub fn begin_tool_invocation(
        &mut self,
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        arguments: serde_json::Value,
    ) -> Result<(), ConversationError> {
        let call_id = call_id.into();
        if self.find_invocation(&call_id).is_some() {
            return Err(ConversationError::DuplicateCallId(call_id));
        }
        self.turns.push(Turn::ToolInvocation {
            call_id,
            tool_name: tool_name.into(),
            arguments,
        });
        Ok(())
    }

    /// Record the result of an open tool call.
    ///
    /// Fails if no invocation with this id exists or it already has a result.
    pub fn complete_tool_result(
        &mut self,
        call_id: impl Into<String>,
        outcome: ToolOutcome,
    ) -> Result<(), ConversationError> {
        let call_id = call_id.into();
        if !self.is_open(&call_id) {
            return Err(ConversationError::DanglingToolResult(call_id));
        }
        self.turns.push(Turn::ToolResult { call_id, outcome });
        Ok(())
    }

    pub fn system_message(&self) -> Option<&Turn> {
        self.system.as_ref()
    }

    /// History turns in order, excluding the system message.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last_turn(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Number of history turns, excluding the system message.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Project the history into model-facing message records.
    pub fn render(&self) -> Vec<RenderedMessage> {
        render_turns(self.system.as_ref(), &self.turns)
    }

    /// A read-only snapshot handed to tool handlers.
    pub fn view(&self) -> ConversationView {
        ConversationView {
            system: self.system.clone(),
            turns: self.turns.clone().into(),
        }
    }

    fn find_invocation(&self, call_id: &str) -> Option<&Turn> {
        self.turns
            .iter()
            .find(|t| matches!(t, Turn::ToolInvocation { call_id: id, .. } if id == call_id))
    }

    fn is_open(&self, call_id: &str) -> bool {
        self.find_invocation(call_id).is_some()
            && !self
                .turns
                .iter()
                .any(|t| matches!(t, Turn::ToolResult { call_id: id, .. } if id == call_id))
    }
}

/// Read-only view of a conversation at the moment a tool was invoked.
#[derive(Debug, Clone, Default)]
pub struct ConversationView {
    system: Option<Turn>,
    turns: Arc<[Turn]>,
}

impl ConversationView {
    pub fn system_message(&self) -> Option<&Turn> {
        self.system.as_ref()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn render(&self) -> Vec<RenderedMessage> {
        render_turns(self.system.as_ref(), &self.turns)
    }

    /// Text of the most recent user turn.
    pub fn last_user_message(&self) -> Option<String> {
        self.turns
            .iter()
            .rev()
            .find(|t| matches!(t, Turn::User { .. }))
            .map(Turn::text)
    }
}
