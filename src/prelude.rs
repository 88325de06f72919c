// ABOUTME: Prelude module - convenient imports for common use cases.
// ABOUTME: Use `use frizz::prelude::*;` to get started quickly.

pub use crate::agent::{
    Agent, AgentBuilder, AgentConfig, FileTranscriptStore, MemoryTranscriptStore, StepOutcome,
    StepState, ToolInvocation, TranscriptStore,
};
pub use crate::conversation::{
    Conversation, ConversationView, MessageRole, Part, RenderedMessage, ToolOutcome, Turn,
    TurnKind,
};
pub use crate::error::{ConversationError, FrizzError, ModelError, StepError, ToolError};
pub use crate::model::{
    Decision, DecisionRequest, ModelClient, OpenAiClient, OpenAiConfig, RawDecision,
    ScriptedModel, ToolChoice, ToolDefinition,
};
pub use crate::tool::{Registry, Tool, ToolBuilder, ToolDescriptor, ToolParameters};
