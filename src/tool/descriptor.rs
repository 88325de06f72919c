// ABOUTME: ToolDescriptor - wraps a typed async handler behind the Tool trait.
// ABOUTME: Built with ToolBuilder, which checks the signature at registration time.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{self, BoxFuture};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::traits::{Tool, ToolParameters};
use super::validation::validate_arguments;
use crate::conversation::ConversationView;
use crate::error::ToolError;

type Handler<C> = dyn Fn(Arc<C>, serde_json::Value, ConversationView) -> BoxFuture<'static, Result<serde_json::Value, ToolError>>
    + Send
    + Sync;

type DecodeCheck = dyn Fn(&serde_json::Value) -> Result<(), String> + Send + Sync;

/// An immutable tool built from a typed handler and an explicit schema.
pub struct ToolDescriptor<C> {
    name: String,
    description: String,
    parameter_schema: serde_json::Value,
    decode_check: Arc<DecodeCheck>,
    handler: Arc<Handler<C>>,
}

impl<C: Send + Sync + 'static> ToolDescriptor<C> {
    /// Start building a tool with the given name.
    pub fn builder(name: impl Into<String>) -> ToolBuilder<C> {
        ToolBuilder::new(name)
    }

    pub fn parameter_schema(&self) -> &serde_json::Value {
        &self.parameter_schema
    }
}

#[async_trait]
impl<C: Send + Sync + 'static> Tool<C> for ToolDescriptor<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn schema(&self) -> &serde_json::Value {
        &self.parameter_schema
    }

    fn validate(&self, arguments: &serde_json::Value) -> Result<(), ToolError> {
        validate_arguments(arguments, &self.parameter_schema)
            .and_then(|()| (self.decode_check)(arguments))
            .map_err(|reason| ToolError::InvalidArguments {
                tool: self.name.clone(),
                reason,
            })
    }

    async fn invoke(
        &self,
        context: Arc<C>,
        arguments: serde_json::Value,
        conversation: ConversationView,
    ) -> Result<serde_json::Value, ToolError> {
        (self.handler)(context, arguments, conversation).await
    }
}

impl<C> std::fmt::Debug for ToolDescriptor<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameter_schema", &self.parameter_schema)
            .finish()
    }
}

/// Builder for [`ToolDescriptor`].
pub struct ToolBuilder<C> {
    name: String,
    description: String,
    parameter_schema: Option<serde_json::Value>,
    handler: Option<(Arc<DecodeCheck>, Arc<Handler<C>>)>,
    handler_count: usize,
}

impl<C: Send + Sync + 'static> ToolBuilder<C> {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            parameter_schema: None,
            handler: None,
            handler_count: 0,
        }
    }

    /// Set the description shown to the model.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the JSON Schema for the tool's parameters.
    pub fn parameters(mut self, schema: serde_json::Value) -> Self {
        self.parameter_schema = Some(schema);
        self
    }

    /// Take the parameter schema from a [`ToolParameters`] type.
    pub fn parameters_of<P: ToolParameters>(self) -> Self {
        self.parameters(P::schema())
    }

    /// Set a handler taking the agent context and typed parameters.
    pub fn handler<P, R, F, Fut>(self, handler: F) -> Self
    where
        P: DeserializeOwned + Send + 'static,
        R: Serialize + Send + 'static,
        F: Fn(Arc<C>, P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
    {
        self.handler_with_conversation(
            move |context: Arc<C>, params: P, _conversation: ConversationView| {
                handler(context, params)
            },
        )
    }

    /// Set a handler that also reads the conversation as of the call.
    pub fn handler_with_conversation<P, R, F, Fut>(mut self, handler: F) -> Self
    where
        P: DeserializeOwned + Send + 'static,
        R: Serialize + Send + 'static,
        F: Fn(Arc<C>, P, ConversationView) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
    {
        let decode_check: Arc<DecodeCheck> = Arc::new(|arguments: &serde_json::Value| {
            P::deserialize(arguments).map(|_| ()).map_err(|e| e.to_string())
        });

        let name = self.name.clone();
        let erased: Arc<Handler<C>> = Arc::new(
            move |context: Arc<C>,
                  arguments: serde_json::Value,
                  conversation: ConversationView|
                  -> BoxFuture<'static, Result<serde_json::Value, ToolError>> {
                let tool = name.clone();
                let params: P = match serde_json::from_value(arguments) {
                    Ok(params) => params,
                    Err(e) => {
                        return Box::pin(future::ready(Err(ToolError::InvalidArguments {
                            tool,
                            reason: e.to_string(),
                        })));
                    }
                };
                let call = handler(context, params, conversation);
                Box::pin(async move {
                    let output = call.await.map_err(|source| ToolError::HandlerExecution {
                        tool: tool.clone(),
                        source,
                    })?;
                    serde_json::to_value(output).map_err(|e| ToolError::HandlerExecution {
                        tool,
                        source: e.into(),
                    })
                })
            },
        );

        self.handler = Some((decode_check, erased));
        self.handler_count += 1;
        self
    }

    /// Finish the tool, checking that its signature is complete.
    pub fn build(self) -> Result<ToolDescriptor<C>, ToolError> {
        if self.name.trim().is_empty() {
            return Err(ToolError::InvalidSignature(
                "tool name must not be empty".to_string(),
            ));
        }

        let parameter_schema = self.parameter_schema.ok_or_else(|| {
            ToolError::InvalidSignature(format!(
                "tool '{}' has no parameter schema",
                self.name
            ))
        })?;
        if parameter_schema.get("type").and_then(|t| t.as_str()) != Some("object") {
            return Err(ToolError::InvalidSignature(format!(
                "tool '{}' parameter schema must describe an object",
                self.name
            )));
        }

        if self.handler_count > 1 {
            return Err(ToolError::InvalidSignature(format!(
                "tool '{}' has more than one handler",
                self.name
            )));
        }
        let (decode_check, handler) = self.handler.ok_or_else(|| {
            ToolError::InvalidSignature(format!("tool '{}' has no handler", self.name))
        })?;

        Ok(ToolDescriptor {
            name: self.name,
            description: self.description,
            parameter_schema,
            decode_check,
            handler,
        })
    }
}
