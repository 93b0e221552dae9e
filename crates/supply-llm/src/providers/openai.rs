//! OpenAI-compatible chat-completions provider
//!
//! Defaults target OpenRouter, which serves the hosted instruct models the agent runs
//! on. Any endpoint speaking the OpenAI chat-completions protocol works by changing
//! the API base.
//!
//! ```no_run
//! use supply_llm::{CompletionRequest, LlmProvider, Message, OpenAIConfig, OpenAIProvider};
//!
//! # async fn run() -> supply_llm::Result<()> {
//! let provider = OpenAIProvider::with_config(OpenAIConfig::new("sk-or-..."))?;
//! let request = CompletionRequest::new(
//!     "mistralai/mistral-7b-instruct:free",
//!     vec![Message::user("Which regions produce most microchips?")],
//! );
//! let response = provider.complete(request).await?;
//! println!("{}", response.message.text().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

use crate::{
    CompletionRequest, CompletionResponse, ContentBlock, LlmError, LlmProvider, Message, Result,
    Role, StopReason, TokenUsage, ToolDefinition,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use supply_core::LlmConfig;
use tracing::{debug, instrument, warn};

const DEFAULT_API_BASE: &str = "https://openrouter.ai/api/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const APP_TITLE: &str = "supply-risk";

/// Configuration for [`OpenAIProvider`]
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,

    /// Base URL, `https://openrouter.ai/api/v1` by default
    pub api_base: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// When set, requests for other models are rejected before sending
    pub supported_models: Option<Vec<String>>,
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            supported_models: None,
        }
    }

    /// Build from the `llm` section of the application config
    pub fn from_llm_config(config: &LlmConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            LlmError::Config("OPENROUTER_API_KEY is not set".to_string())
        })?;
        Ok(Self::new(api_key)
            .with_api_base(&config.api_base)
            .with_timeout(config.timeout_secs))
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_supported_models(mut self, models: Vec<String>) -> Self {
        self.supported_models = Some(models);
        self
    }
}

/// Provider for OpenAI-compatible chat-completion endpoints
pub struct OpenAIProvider {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIProvider {
    pub fn with_config(config: OpenAIConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    fn validate_model(&self, model: &str) -> Result<()> {
        if let Some(supported) = &self.config.supported_models {
            if !supported.iter().any(|m| m == model) {
                return Err(LlmError::UnsupportedModel(model.to_string()));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    #[instrument(skip(self, request), fields(model = %request.model, api_base = %self.config.api_base))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.validate_model(&request.model)?;

        let model = request.model.clone();
        let body = chat_request(request);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.api_base))
            .bearer_auth(&self.config.api_key)
            .header("X-Title", APP_TITLE)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await?;
            return Err(status_error(status, body, model));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Malformed(e.to_string()))?;
        into_completion(parsed)
    }

    fn name(&self) -> &str {
        "openai-compatible"
    }
}

// Wire types

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ChatTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
}

#[derive(Debug, Serialize, PartialEq)]
struct ChatMessage {
    role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ChatToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatTool {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: ChatFunction,
}

#[derive(Debug, Serialize)]
struct ChatFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct ChatToolCall {
    id: String,
    #[serde(rename = "type", default = "function_type")]
    tool_type: String,
    function: ChatFunctionCall,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct ChatFunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

fn function_type() -> String {
    "function".to_string()
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
    /// OpenRouter reports some upstream failures in a successful response
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ChatToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

// Conversions

fn chat_request(request: CompletionRequest) -> ChatRequest {
    ChatRequest {
        model: request.model,
        messages: build_chat_messages(request.system, request.messages),
        max_tokens: request.max_tokens,
        temperature: request.temperature,
        tools: (!request.tools.is_empty()).then(|| convert_tools(&request.tools)),
        stop: (!request.stop.is_empty()).then_some(request.stop),
    }
}

/// System prompt first, then every message; tool results become `tool` messages
fn build_chat_messages(system: Option<String>, messages: Vec<Message>) -> Vec<ChatMessage> {
    let mut result = Vec::new();
    if let Some(sys) = system {
        result.push(text_message("system", sys));
    }
    for msg in messages {
        result.extend(convert_message(msg));
    }
    result
}

fn text_message(role: &'static str, text: String) -> ChatMessage {
    ChatMessage {
        role,
        content: Some(text),
        tool_calls: None,
        tool_call_id: None,
    }
}

fn status_error(status: u16, body: String, model: String) -> LlmError {
    match status {
        401 => LlmError::Unauthorized,
        404 => LlmError::UnsupportedModel(model),
        429 => LlmError::RateLimited(body),
        _ => LlmError::Status { status, body },
    }
}

fn convert_message(msg: Message) -> Vec<ChatMessage> {
    let role = match msg.role {
        Role::User => "user",
        Role::Assistant => "assistant",
    };
    let mut texts = Vec::new();
    let mut tool_calls = Vec::new();
    let mut tool_messages = Vec::new();

    for block in msg.blocks {
        match block {
            ContentBlock::Text { text } => texts.push(text),
            ContentBlock::ToolUse { id, name, input } => tool_calls.push(ChatToolCall {
                id,
                tool_type: function_type(),
                function: ChatFunctionCall {
                    name,
                    arguments: input.to_string(),
                },
            }),
            ContentBlock::ToolResult {
                tool_use_id,
                content,
                ..
            } => tool_messages.push(ChatMessage {
                role: "tool",
                content: Some(content),
                tool_calls: None,
                tool_call_id: Some(tool_use_id),
            }),
        }
    }

    let mut messages = Vec::new();
    if !texts.is_empty() || !tool_calls.is_empty() {
        messages.push(ChatMessage {
            role,
            content: (!texts.is_empty()).then(|| texts.join("\n")),
            tool_calls: (!tool_calls.is_empty()).then_some(tool_calls),
            tool_call_id: None,
        });
    }
    messages.extend(tool_messages);
    messages
}

fn convert_tools(tools: &[ToolDefinition]) -> Vec<ChatTool> {
    tools
        .iter()
        .map(|tool| ChatTool {
            tool_type: "function",
            function: ChatFunction {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.input_schema.clone(),
            },
        })
        .collect()
}

fn into_completion(response: ChatResponse) -> Result<CompletionResponse> {
    let Some(choice) = response.choices.into_iter().next() else {
        return Err(match response.error {
            Some(error) => LlmError::Upstream(error.to_string()),
            None => LlmError::Malformed("no choices in response".to_string()),
        });
    };

    let usage = response.usage.map_or_else(TokenUsage::default, |u| TokenUsage {
        prompt_tokens: u.prompt_tokens,
        completion_tokens: u.completion_tokens,
    });
    let finish_reason = choice.finish_reason.unwrap_or_default();
    debug!(
        finish_reason = %finish_reason,
        prompt_tokens = usage.prompt_tokens,
        completion_tokens = usage.completion_tokens,
        total_tokens = usage.total(),
        "Received completion"
    );

    let message = parse_response_message(choice.message);
    let stop_reason = if message.tool_uses().is_empty() {
        map_stop_reason(&finish_reason)
    } else {
        StopReason::ToolCalls
    };

    Ok(CompletionResponse {
        message,
        stop_reason,
        usage,
    })
}

fn parse_response_message(msg: ChatResponseMessage) -> Message {
    let mut blocks = Vec::new();

    if let Some(content) = msg.content.filter(|c| !c.is_empty()) {
        blocks.push(ContentBlock::Text { text: content });
    }

    for call in msg.tool_calls.unwrap_or_default() {
        // Small models sometimes send bare strings; pass them through as a JSON string
        let input = serde_json::from_str(&call.function.arguments).unwrap_or_else(|_| {
            warn!(tool = %call.function.name, "Tool arguments are not JSON, passing them as text");
            serde_json::Value::String(call.function.arguments.clone())
        });
        blocks.push(ContentBlock::ToolUse {
            id: call.id,
            name: call.function.name,
            input,
        });
    }

    if blocks.is_empty() {
        blocks.push(ContentBlock::Text {
            text: String::new(),
        });
    }

    Message::new(Role::Assistant, blocks)
}

fn map_stop_reason(reason: &str) -> StopReason {
    match reason {
        "length" => StopReason::Length,
        "tool_calls" | "function_call" => StopReason::ToolCalls,
        "stop" | "eos" | "stop_sequence" => StopReason::Stop,
        other => {
            debug!(reason = other, "Unmapped finish reason");
            StopReason::Stop
        }
    }
}
