// ABOUTME: OpenAI-compatible chat-completions client implementing ModelClient.
// ABOUTME: Maps provider responses and failures onto Decision and ModelError.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Decision, DecisionRequest, ModelClient, RawDecision, ToolChoice, ToolDefinition};
use crate::conversation::{MessageRole, RenderedMessage};
use crate::error::ModelError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Connection settings for an OpenAI-compatible endpoint.
#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: None,
            temperature: None,
        }
    }

    /// Load settings from the environment, reading `.env` first if present.
    ///
    /// `OPENAI_API_KEY` is required; `OPENAI_BASE_URL` and `FRIZZ_MODEL`
    /// override the defaults.
    pub fn from_env() -> Result<Self, ModelError> {
        dotenvy::dotenv().ok();

        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            ModelError::Configuration("OPENAI_API_KEY environment variable not set".to_string())
        })?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(model) = std::env::var("FRIZZ_MODEL") {
            config.model = model;
        }
        Ok(config)
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

/// OpenAI API request format.
#[derive(Debug, Serialize)]
pub struct OpenAIRequest {
    pub model: String,
    pub messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<OpenAITool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<&'static str>,
}

/// OpenAI message format.
#[derive(Debug, Serialize, Deserialize)]
pub struct OpenAIMessage {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<OpenAIToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

/// OpenAI tool call, in requests and responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub call_type: String,
    pub function: OpenAIFunctionCall,
}

/// OpenAI function call details. Arguments travel as a JSON string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIFunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

/// OpenAI tool definition.
#[derive(Debug, Serialize)]
pub struct OpenAITool {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: OpenAIFunction,
}

/// OpenAI function definition.
#[derive(Debug, Serialize)]
pub struct OpenAIFunction {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// OpenAI API response format.
#[derive(Debug, Deserialize)]
pub struct OpenAIResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub choices: Vec<OpenAIChoice>,
    pub usage: Option<OpenAIUsage>,
}

/// OpenAI response choice.
#[derive(Debug, Deserialize)]
pub struct OpenAIChoice {
    pub message: OpenAIResponseMessage,
    pub finish_reason: Option<String>,
}

/// OpenAI response message.
#[derive(Debug, Deserialize)]
pub struct OpenAIResponseMessage {
    pub content: Option<String>,
    pub tool_calls: Option<Vec<OpenAIToolCall>>,
}

/// OpenAI usage stats.
#[derive(Debug, Deserialize)]
pub struct OpenAIUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// OpenAI API error response.
#[derive(Debug, Deserialize)]
pub struct OpenAIError {
    pub error: OpenAIErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct OpenAIErrorDetail {
    pub message: String,
}

impl From<&ToolDefinition> for OpenAITool {
    fn from(tool: &ToolDefinition) -> Self {
        OpenAITool {
            tool_type: "function".to_string(),
            function: OpenAIFunction {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.input_schema.clone(),
            },
        }
    }
}

fn role_name(role: MessageRole) -> &'static str {
    match role {
        MessageRole::System => "system",
        MessageRole::User => "user",
        MessageRole::Assistant => "assistant",
        MessageRole::Tool => "tool",
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}

/// Translate rendered records into chat messages.
///
/// A tool-call record directly after a text-only assistant message is folded
/// into it, so the preamble and the call reach the provider as one message.
pub(crate) fn convert_messages(messages: &[RenderedMessage]) -> Vec<OpenAIMessage> {
    let mut result: Vec<OpenAIMessage> = Vec::with_capacity(messages.len());

    for msg in messages {
        match (msg.role, &msg.tool_call) {
            (MessageRole::Assistant, Some(call)) => {
                let tool_call = OpenAIToolCall {
                    id: call.id.clone(),
                    call_type: "function".to_string(),
                    function: OpenAIFunctionCall {
                        name: call.name.clone(),
                        arguments: call.arguments.to_string(),
                    },
                };
                match result.last_mut() {
                    Some(prev) if prev.role == "assistant" && prev.tool_calls.is_none() => {
                        prev.tool_calls = Some(vec![tool_call]);
                    }
                    _ => result.push(OpenAIMessage {
                        role: "assistant".to_string(),
                        content: None,
                        tool_calls: Some(vec![tool_call]),
                        tool_call_id: None,
                    }),
                }
            }
            (MessageRole::Tool, _) => result.push(OpenAIMessage {
                role: "tool".to_string(),
                content: Some(msg.content()),
                tool_calls: None,
                tool_call_id: msg.tool_call_id.clone(),
            }),
            (role, _) => result.push(OpenAIMessage {
                role: role_name(role).to_string(),
                content: non_empty(msg.content()),
                tool_calls: None,
                tool_call_id: None,
            }),
        }
    }

    result
}

impl OpenAIRequest {
    pub fn new(config: &OpenAiConfig, request: &DecisionRequest) -> Self {
        let tools: Vec<OpenAITool> = request.tools.iter().map(OpenAITool::from).collect();
        let tool_choice = if tools.is_empty() {
            None
        } else {
            Some(request.tool_choice.as_str())
        };

        OpenAIRequest {
            model: config.model.clone(),
            messages: convert_messages(&request.messages),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            tools,
            tool_choice,
        }
    }
}

/// Turn a parsed response into a decision for `request`.
///
/// Only the first tool call is honoured.
pub(crate) fn decision_from_response(
    response: OpenAIResponse,
    request: &DecisionRequest,
) -> Result<Decision, ModelError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(ModelError::NoResponse)?;

    let text = choice.message.content.unwrap_or_default();
    let first_call = choice
        .message
        .tool_calls
        .and_then(|calls| calls.into_iter().next());

    let Some(call) = first_call else {
        if request.tool_choice == ToolChoice::Required {
            return Err(ModelError::MalformedToolCall(
                "a tool call was required but the model replied with text".to_string(),
            ));
        }
        if text.is_empty() {
            return Err(ModelError::NoResponse);
        }
        return Ok(Decision::respond(text));
    };

    let name = call.function.name;
    if !request.offers_tool(&name) {
        return Err(ModelError::MalformedToolCall(format!(
            "model called unadvertised tool '{name}'"
        )));
    }

    let arguments = if call.function.arguments.trim().is_empty() {
        None
    } else {
        let parsed: serde_json::Value =
            serde_json::from_str(&call.function.arguments).map_err(|e| {
                ModelError::MalformedToolCall(format!(
                    "arguments for '{name}' are not valid JSON: {e}"
                ))
            })?;
        Some(parsed)
    };

    Decision::try_from(RawDecision {
        free_text: Some(text),
        chosen_tool_name: Some(name),
        chosen_tool_arguments: arguments,
    })
}

fn transport_error(err: reqwest::Error) -> ModelError {
    if err.is_connect() || err.is_timeout() {
        ModelError::ProviderUnavailable(err.to_string())
    } else {
        ModelError::Http(err)
    }
}

/// Client for OpenAI-compatible chat-completions endpoints.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    config: OpenAiConfig,
    http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Create a client from [`OpenAiConfig::from_env`].
    pub fn from_env() -> Result<Self, ModelError> {
        Ok(Self::new(OpenAiConfig::from_env()?))
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    async fn request_decision(&self, request: &DecisionRequest) -> Result<Decision, ModelError> {
        let body = OpenAIRequest::new(&self.config, request);

        tracing::debug!(
            model = %self.config.model,
            messages = body.messages.len(),
            tools = body.tools.len(),
            tool_choice = request.tool_choice.as_str(),
            "requesting decision"
        );

        let response = self
            .http
            .post(self.config.endpoint())
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OpenAIError>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(match status.as_u16() {
                429 => ModelError::RateLimited(message),
                502..=504 => ModelError::ProviderUnavailable(message),
                code => ModelError::Api {
                    status: code,
                    message,
                },
            });
        }

        let text = response.text().await.map_err(transport_error)?;
        let parsed: OpenAIResponse = serde_json::from_str(&text)?;

        if let Some(usage) = &parsed.usage {
            tracing::debug!(
                id = %parsed.id,
                model = %parsed.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "decision received"
            );
        }

        decision_from_response(parsed, request)
    }
}
