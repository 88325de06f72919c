// ABOUTME: Defines all error types for the frizz library using thiserror.
// ABOUTME: Each concern has its own error enum, unified under FrizzError.

use std::time::Duration;

use crate::agent::StepState;

/// Top-level error type for the frizz library.
#[derive(Debug, thiserror::Error)]
pub enum FrizzError {
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Conversation error: {0}")]
    Conversation(#[from] ConversationError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Step error: {0}")]
    Step(#[from] StepError),
}

/// Errors from tool registration and execution.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Invalid tool signature: {0}")]
    InvalidSignature(String),

    #[error("Duplicate tool name: {0}")]
    DuplicateName(String),

    #[error("Invalid arguments for tool '{tool}': {reason}")]
    InvalidArguments { tool: String, reason: String },

    #[error("Tool '{tool}' failed: {source}")]
    HandlerExecution {
        tool: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Errors from conversation bookkeeping and persisted state.
#[derive(Debug, thiserror::Error)]
pub enum ConversationError {
    #[error("Tool result references unknown or completed call '{0}'")]
    DanglingToolResult(String),

    #[error("Tool call id '{0}' is already in use")]
    DuplicateCallId(String),

    #[error("Corrupt conversation: {0}")]
    Corrupt(String),

    #[error("Failed to encode conversation: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Errors raised by a model collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Model returned no response")]
    NoResponse,

    #[error("Malformed tool call: {0}")]
    MalformedToolCall(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Errors that abort a single agent step.
///
/// Tool handler failures are not in this list: they are recorded in the
/// conversation and returned inside a successful [`crate::agent::StepOutcome`].
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("Model selected unknown tool '{0}'")]
    UnknownToolSelected(String),

    #[error("Invalid arguments for tool '{tool}': {reason}")]
    InvalidToolArguments { tool: String, reason: String },

    #[error("Tool call error: {0}")]
    ToolCall(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Model returned no response")]
    NoResponse,

    /// The provider rejected the request itself, e.g. bad credentials or an
    /// invalid tool schema. Retrying the same request will fail again.
    #[error("Provider rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Model client misconfigured: {0}")]
    Configuration(String),

    #[error("Step cancelled while {state}")]
    Cancelled { state: StepState },

    #[error("Step timed out after {after:?} while {state}")]
    TimedOut { state: StepState, after: Duration },

    #[error("No pending user message to retry")]
    NoPendingUserMessage,

    #[error(transparent)]
    Conversation(#[from] ConversationError),
}

impl StepError {
    /// Whether the caller may retry the step unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StepError::ModelUnavailable(_)
                | StepError::RateLimitExceeded(_)
                | StepError::NoResponse
                | StepError::Cancelled { .. }
                | StepError::TimedOut { .. }
        )
    }
}

impl From<ModelError> for StepError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::ProviderUnavailable(msg) => StepError::ModelUnavailable(msg),
            ModelError::Http(e) => StepError::ModelUnavailable(e.to_string()),
            ModelError::RateLimited(msg) => StepError::RateLimitExceeded(msg),
            ModelError::NoResponse => StepError::NoResponse,
            ModelError::MalformedToolCall(msg) => StepError::ToolCall(msg),
            ModelError::Api { status: 429, message } => StepError::RateLimitExceeded(message),
            ModelError::Api { status, message } if status >= 500 => {
                StepError::ModelUnavailable(format!("API error ({status}): {message}"))
            }
            ModelError::Api { status, message } => StepError::Rejected { status, message },
            ModelError::Deserialize(e) => StepError::ToolCall(e.to_string()),
            ModelError::Configuration(msg) => StepError::Configuration(msg),
        }
    }
}
