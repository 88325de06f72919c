// ABOUTME: Agent - owns a conversation, a tool registry and a model client, and
// ABOUTME: runs one decide/validate/execute step per user message.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use super::config::AgentConfig;
use super::outcome::{StepOutcome, ToolInvocation};
use super::state::{StateTracker, StepState};
use super::transcript::TranscriptStore;
use crate::conversation::{
    Conversation, MessageRole, Part, RenderedMessage, ToolOutcome, Turn,
};
use crate::error::{ConversationError, FrizzError, StepError, ToolError};
use crate::model::{Decision, DecisionRequest, ModelClient, ToolChoice};
use crate::tool::{Registry, Tool};

/// Builder for [`Agent`].
pub struct AgentBuilder<C> {
    model: Arc<dyn ModelClient>,
    context: Arc<C>,
    tools: Vec<Arc<dyn Tool<C>>>,
    system_message: Option<String>,
    snapshot: Option<String>,
    config: AgentConfig,
    agent_id: Option<String>,
}

impl<C: Send + Sync + 'static> AgentBuilder<C> {
    /// Register a tool.
    pub fn tool(mut self, tool: impl Tool<C> + 'static) -> Self {
        self.tools.push(Arc::new(tool));
        self
    }

    /// Register several already-shared tools.
    pub fn tools(mut self, tools: impl IntoIterator<Item = Arc<dyn Tool<C>>>) -> Self {
        self.tools.extend(tools);
        self
    }

    pub fn system_message(mut self, content: impl Into<String>) -> Self {
        self.system_message = Some(content.into());
        self
    }

    /// Resume from a string produced by [`Agent::snapshot`].
    pub fn conversation_snapshot(mut self, snapshot: impl Into<String>) -> Self {
        self.snapshot = Some(snapshot.into());
        self
    }

    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    /// Key used for transcript storage. A random id is used if unset.
    pub fn agent_id(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }

    /// Build the agent.
    ///
    /// Fails on duplicate tool names or a corrupt snapshot. A system message
    /// given here replaces the one in the snapshot.
    pub fn build(self) -> Result<Agent<C>, FrizzError> {
        let registry = Registry::build(self.tools)?;

        let mut conversation = match self.snapshot {
            Some(snapshot) => Conversation::restore(&snapshot)?,
            None => Conversation::new(),
        };
        if let Some(system) = self.system_message {
            conversation.set_system_message(system);
        }

        let agent_id = self
            .agent_id
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        tracing::debug!(
            agent_id = %agent_id,
            tools = registry.len(),
            turns = conversation.len(),
            "agent built"
        );

        Ok(Agent {
            agent_id,
            model: self.model,
            registry,
            context: self.context,
            conversation,
            config: self.config,
        })
    }
}

/// An agent that decides, per user message, whether to reply or call a tool.
///
/// Steps on one agent are serialized by `&mut self`. Different agents are
/// independent and may run concurrently.
pub struct Agent<C = ()> {
    agent_id: String,
    model: Arc<dyn ModelClient>,
    registry: Registry<C>,
    context: Arc<C>,
    conversation: Conversation,
    config: AgentConfig,
}

impl<C: Send + Sync + 'static> Agent<C> {
    /// Start building an agent around a model client and a context value
    /// handed to every tool invocation.
    pub fn builder(model: impl ModelClient + 'static, context: C) -> AgentBuilder<C> {
        AgentBuilder {
            model: Arc::new(model),
            context: Arc::new(context),
            tools: Vec::new(),
            system_message: None,
            snapshot: None,
            config: AgentConfig::default(),
            agent_id: None,
        }
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn registry(&self) -> &Registry<C> {
        &self.registry
    }

    pub fn context(&self) -> &Arc<C> {
        &self.context
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Serialized conversation; see [`Conversation::snapshot`].
    pub fn snapshot(&self) -> Result<String, ConversationError> {
        self.conversation.snapshot()
    }

    /// Persist the conversation under this agent's id.
    pub async fn save_to(&self, store: &dyn TranscriptStore) -> Result<(), anyhow::Error> {
        let snapshot = self.snapshot()?;
        store.save(&self.agent_id, &snapshot).await
    }

    /// Append a user message and run one step.
    ///
    /// Protocol errors leave the conversation with only the user turn
    /// appended. Tool handler failures do not fail the step; they are
    /// recorded and returned in the outcome.
    pub async fn step(&mut self, user_message: impl Into<String>) -> Result<StepOutcome, StepError> {
        self.step_with_cancel(user_message, std::future::pending()).await
    }

    /// Like [`Agent::step`], aborting with [`StepError::Cancelled`] when
    /// `cancel` completes first. Partial turns are rolled back.
    pub async fn step_with_cancel<F>(
        &mut self,
        user_message: impl Into<String>,
        cancel: F,
    ) -> Result<StepOutcome, StepError>
    where
        F: Future<Output = ()>,
    {
        self.conversation.add_user_message(user_message);
        self.advance(cancel).await
    }

    /// Re-run the decision for a user turn left pending by a failed step.
    pub async fn retry(&mut self) -> Result<StepOutcome, StepError> {
        self.retry_with_cancel(std::future::pending()).await
    }

    pub async fn retry_with_cancel<F>(&mut self, cancel: F) -> Result<StepOutcome, StepError>
    where
        F: Future<Output = ()>,
    {
        if !matches!(self.conversation.last_turn(), Some(Turn::User { .. })) {
            return Err(StepError::NoPendingUserMessage);
        }
        self.advance(cancel).await
    }

    async fn advance<F>(&mut self, cancel: F) -> Result<StepOutcome, StepError>
    where
        F: Future<Output = ()>,
    {
        let tracker = StateTracker::new(StepState::AwaitingDecision);
        tokio::pin!(cancel);

        let result = tokio::select! {
            biased;
            () = &mut cancel => Err(StepError::Cancelled { state: tracker.get() }),
            result = self.run_step(&tracker) => result,
        };

        if let Err(err) = &result {
            tracing::warn!(
                agent_id = %self.agent_id,
                error = %err,
                retryable = err.is_retryable(),
                "step failed"
            );
        }
        result
    }

    async fn run_step(&mut self, tracker: &StateTracker) -> Result<StepOutcome, StepError> {
        let Self {
            model,
            registry,
            context,
            conversation,
            config,
            ..
        } = self;
        let mut tx = conversation.transaction();

        tracker.set(StepState::AwaitingDecision);
        let request = DecisionRequest {
            messages: render_for_model(&tx, registry, config),
            tools: registry.all_schemas(),
            tool_choice: config.tool_choice,
        };
        let decision = within(
            config.decision_timeout,
            StepState::AwaitingDecision,
            model.request_decision(&request),
        )
        .await??;

        let (text, tool_name, arguments) = match decision {
            Decision::Respond { text } => {
                if config.tool_choice == ToolChoice::Required {
                    return Err(StepError::ToolCall(
                        "a tool call was required but the model replied with text".to_string(),
                    ));
                }
                tracker.set(StepState::Responding);
                tx.add_assistant_message(text.clone());
                tx.commit();
                tracker.set(StepState::Done);
                return Ok(StepOutcome::reply(text));
            }
            Decision::UseTool {
                text,
                tool_name,
                arguments,
            } => (text, tool_name, arguments),
        };

        tracker.set(StepState::ToolSelected);
        let tool = registry
            .lookup(&tool_name)
            .ok_or_else(|| StepError::UnknownToolSelected(tool_name.clone()))?;

        tracker.set(StepState::ValidatingArguments);
        tool.validate(&arguments).map_err(|err| match err {
            ToolError::InvalidArguments { tool, reason } => {
                StepError::InvalidToolArguments { tool, reason }
            }
            other => StepError::InvalidToolArguments {
                tool: tool_name.clone(),
                reason: other.to_string(),
            },
        })?;

        let call_id = format!("call_{}", Uuid::new_v4().simple());
        tx.add_assistant_message(text.clone());
        tx.begin_tool_invocation(call_id.clone(), tool_name.clone(), arguments.clone())?;

        tracker.set(StepState::ExecutingTool);
        tracing::debug!(tool = %tool_name, call_id = %call_id, "executing tool");
        let invoked = within(
            config.tool_timeout,
            StepState::ExecutingTool,
            tool.invoke(Arc::clone(context), arguments.clone(), tx.view()),
        )
        .await?;

        let (outcome, failure) = match invoked {
            Ok(value) => {
                tracker.set(StepState::ToolCompleted);
                (ToolOutcome::Value(value), None)
            }
            Err(err) => {
                tracker.set(StepState::ToolFailed);
                tracing::warn!(tool = %tool_name, call_id = %call_id, error = %err, "tool failed");
                (ToolOutcome::Error(failure_text(&err)), Some(Arc::new(err)))
            }
        };
        tx.complete_tool_result(call_id.clone(), outcome.clone())?;
        tx.commit();
        tracker.set(StepState::Done);

        Ok(StepOutcome {
            assistant_message: Turn::assistant(text),
            tool_invocation: Some(ToolInvocation {
                call_id,
                tool_name,
                arguments,
            }),
            tool_result: Some(outcome),
            tool_failure: failure,
        })
    }
}

/// Await `fut`, failing with [`StepError::TimedOut`] once `limit` elapses.
async fn within<T>(
    limit: Option<Duration>,
    state: StepState,
    fut: impl Future<Output = T>,
) -> Result<T, StepError> {
    match limit {
        Some(after) => tokio::time::timeout(after, fut)
            .await
            .map_err(|_| StepError::TimedOut { state, after }),
        None => Ok(fut.await),
    }
}

/// Text recorded for a failed tool call. Handler failures keep only the
/// handler's own message chain.
fn failure_text(err: &ToolError) -> String {
    match err {
        ToolError::HandlerExecution { source, .. } => format!("{source:#}"),
        other => other.to_string(),
    }
}

fn render_for_model<C: Send + Sync + 'static>(
    conversation: &Conversation,
    registry: &Registry<C>,
    config: &AgentConfig,
) -> Vec<RenderedMessage> {
    let mut messages = conversation.render();
    if !config.describe_tools_in_system_message || registry.is_empty() {
        return messages;
    }

    let listing = Part::text(describe_tools(registry));
    let has_system = messages
        .first()
        .is_some_and(|m| m.role == MessageRole::System);
    if has_system {
        messages[0].parts.push(listing);
    } else {
        messages.insert(0, RenderedMessage::new(MessageRole::System, vec![listing]));
    }
    messages
}

fn describe_tools<C: Send + Sync + 'static>(registry: &Registry<C>) -> String {
    let mut listing = String::from("You can use the following tools:");
    for def in registry.all_schemas() {
        if def.description.is_empty() {
            listing.push_str(&format!("\n- {}", def.name));
        } else {
            listing.push_str(&format!("\n- {}: {}", def.name, def.description));
        }
    }
    listing
}
