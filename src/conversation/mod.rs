// ABOUTME: Conversation module - the turn log, rendering, and persistence.
// ABOUTME: Owned by exactly one agent; mutated only through append operations.

mod history;
mod render;
mod snapshot;
mod transaction;
mod turn;

pub use history::*;
pub use render::{MessageRole, RenderedMessage, RenderedToolCall};
pub use snapshot::*;
pub use transaction::*;
pub use turn::{Part, ToolOutcome, Turn, TurnKind};

#[cfg(test)]
mod history_test;
