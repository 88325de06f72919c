// ABOUTME: Model module - the collaborator that decides between replying and
// ABOUTME: calling a tool, plus an OpenAI-compatible and a scripted client.

mod client;
mod decision;
mod openai;
mod scripted;
mod types;

pub use client::*;
pub use decision::*;
pub use openai::*;
pub use scripted::*;
pub use types::*;
