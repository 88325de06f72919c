// ABOUTME: Defines the ModelClient trait - the abstraction that lets an agent
// ABOUTME: ask any language model provider for a decision.

use std::sync::Arc;

use async_trait::async_trait;

use super::{Decision, DecisionRequest};
use crate::error::ModelError;

/// Trait for model collaborators.
///
/// Implementations translate provider failures into [`ModelError`]:
/// `ProviderUnavailable`, `RateLimited`, `NoResponse` or `MalformedToolCall`.
/// Retrying is left to the caller.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Ask the model to reply or to select one of the advertised tools.
    async fn request_decision(&self, request: &DecisionRequest) -> Result<Decision, ModelError>;
}

#[async_trait]
impl<T: ModelClient + ?Sized> ModelClient for Arc<T> {
    async fn request_decision(&self, request: &DecisionRequest) -> Result<Decision, ModelError> {
        (**self).request_decision(request).await
    }
}
