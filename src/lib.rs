// ABOUTME: Root module for frizz - tool dispatch for language-model agents.
// ABOUTME: Re-exports all public types from submodules.

pub mod agent;
pub mod conversation;
pub mod error;
pub mod model;
pub mod prelude;
pub mod tool;

pub use error::FrizzError;
