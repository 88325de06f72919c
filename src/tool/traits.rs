// ABOUTME: Defines the Tool trait - the seam between the step engine and tools.
// ABOUTME: Tools have a name, description, schema, validation, and async invoke.

use std::sync::Arc;

use async_trait::async_trait;

use super::validation::validate_arguments;
use crate::conversation::ConversationView;
use crate::error::ToolError;
use crate::model::ToolDefinition;

/// A tool that can be selected by the model and invoked by an agent.
///
/// `C` is the agent-supplied context handed to every invocation.
#[async_trait]
pub trait Tool<C>: Send + Sync {
    /// Returns the unique name of this tool.
    fn name(&self) -> &str;

    /// Returns a human-readable description for the model.
    fn description(&self) -> &str;

    /// Returns the JSON Schema for the tool's input parameters.
    fn schema(&self) -> &serde_json::Value;

    /// Check raw model-supplied arguments before any turn is recorded.
    fn validate(&self, arguments: &serde_json::Value) -> Result<(), ToolError> {
        validate_arguments(arguments, self.schema()).map_err(|reason| {
            ToolError::InvalidArguments {
                tool: self.name().to_string(),
                reason,
            }
        })
    }

    /// Invoke the tool with validated arguments.
    ///
    /// Handler failures are reported as [`ToolError::HandlerExecution`].
    async fn invoke(
        &self,
        context: Arc<C>,
        arguments: serde_json::Value,
        conversation: ConversationView,
    ) -> Result<serde_json::Value, ToolError>;

    /// The advertisement sent to the model.
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.schema().clone(),
        }
    }
}

/// Parameter types that carry their own JSON Schema.
pub trait ToolParameters: serde::de::DeserializeOwned {
    fn schema() -> serde_json::Value;
}
