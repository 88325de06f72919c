// ABOUTME: Agent module - the step engine that turns a user message into a
// ABOUTME: reply or a tool call, plus its config, outcome and transcript storage.

mod config;
mod outcome;
mod runner;
mod state;
mod transcript;

pub use config::AgentConfig;
pub use outcome::{StepOutcome, ToolInvocation};
pub use runner::{Agent, AgentBuilder};
pub use state::StepState;
pub use transcript::{FileTranscriptStore, MemoryTranscriptStore, TranscriptStore};
