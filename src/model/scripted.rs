// ABOUTME: ScriptedModel - an in-process ModelClient that replays queued
// ABOUTME: decisions or errors and records every request it receives.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Decision, DecisionRequest, ModelClient};
use crate::error::ModelError;

/// Replays a fixed script. Once the script runs out every request yields
/// [`ModelError::NoResponse`].
#[derive(Debug, Default)]
pub struct ScriptedModel {
    script: Mutex<VecDeque<Result<Decision, ModelError>>>,
    requests: Mutex<Vec<DecisionRequest>>,
    delay: Option<Duration>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model that answers with `decisions` in order.
    pub fn with_decisions(decisions: impl IntoIterator<Item = Decision>) -> Self {
        Self {
            script: Mutex::new(decisions.into_iter().map(Ok).collect()),
            ..Self::default()
        }
    }

    /// Queue another decision.
    pub fn then(mut self, decision: Decision) -> Self {
        self.script.get_mut().push_back(Ok(decision));
        self
    }

    /// Queue a failure.
    pub fn then_fail(mut self, error: ModelError) -> Self {
        self.script.get_mut().push_back(Err(error));
        self
    }

    /// Wait this long before answering each request.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn push(&self, decision: Result<Decision, ModelError>) {
        self.script.lock().await.push_back(decision);
    }

    /// Every request received so far, oldest first.
    pub async fn requests(&self) -> Vec<DecisionRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn remaining(&self) -> usize {
        self.script.lock().await.len()
    }
}

#[async_trait]
impl ModelClient for ScriptedModel {
    async fn request_decision(&self, request: &DecisionRequest) -> Result<Decision, ModelError> {
        self.requests.lock().await.push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.script
            .lock()
            .await
            .pop_front()
            .unwrap_or(Err(ModelError::NoResponse))
    }
}
