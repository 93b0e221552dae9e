//! One round trip to the model

use crate::{Message, ToolDefinition};

const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Everything sent for one completion; the whole conversation is replayed each turn
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: Option<String>,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Offered for native calling; empty offers none
    pub tools: Vec<ToolDefinition>,
    /// Generation halts before any of these strings
    pub stop: Vec<String>,
}

impl CompletionRequest {
    /// Greedy request over `messages` with nothing else attached
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            system: None,
            messages,
            temperature: 0.0,
            max_tokens: DEFAULT_MAX_TOKENS,
            tools: Vec::new(),
            stop: Vec::new(),
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_tools(mut self, tools: &[ToolDefinition]) -> Self {
        self.tools = tools.to_vec();
        self
    }

    pub fn with_stop(mut self, stop: impl Into<String>) -> Self {
        self.stop.push(stop.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    pub message: Message,
    pub stop_reason: StopReason,
    pub usage: TokenUsage,
}

/// Why generation ended, in the chat-completions vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Natural end of the reply or a stop string
    Stop,
    /// Cut off by `max_tokens`
    Length,
    ToolCalls,
}

/// Zero when the endpoint does not report usage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}
