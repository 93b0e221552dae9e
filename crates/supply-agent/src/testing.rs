//! Scripted model and tools for exercising the loop without a network

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;
use supply_llm::{
    CompletionRequest, CompletionResponse, ContentBlock, LlmError, LlmProvider, Message, Role,
    StopReason, TokenUsage,
};
use supply_tools::Tool;

/// Replays canned responses in order and records every request
#[derive(Default)]
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<CompletionResponse>>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<CompletionResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Text replies, one per turn
    pub fn texts(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| text_response(r)).collect())
    }

    pub fn request(&self, index: usize) -> CompletionRequest {
        self.requests.lock().unwrap()[index].clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn complete(&self, request: CompletionRequest) -> supply_llm::Result<CompletionResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| LlmError::Upstream("script exhausted".to_string()))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub fn text_response(text: &str) -> CompletionResponse {
    CompletionResponse {
        message: Message::assistant(text),
        stop_reason: StopReason::Stop,
        usage: TokenUsage::default(),
    }
}

pub fn tool_use_response(text: &str, calls: &[(&str, &str, Value)]) -> CompletionResponse {
    let mut blocks = Vec::new();
    if !text.is_empty() {
        blocks.push(ContentBlock::Text {
            text: text.to_string(),
        });
    }
    for (id, name, input) in calls {
        blocks.push(ContentBlock::ToolUse {
            id: (*id).to_string(),
            name: (*name).to_string(),
            input: input.clone(),
        });
    }
    CompletionResponse {
        message: Message::new(Role::Assistant, blocks),
        stop_reason: StopReason::ToolCalls,
        usage: TokenUsage::default(),
    }
}

/// Tool answering from a fixed table, recording the queries it saw
pub struct LookupTool {
    name: &'static str,
    answers: Vec<(&'static str, &'static str)>,
    fallback: &'static str,
    pub seen: Mutex<Vec<String>>,
}

impl LookupTool {
    pub fn new(name: &'static str, answers: Vec<(&'static str, &'static str)>, fallback: &'static str) -> Self {
        Self {
            name,
            answers,
            fallback,
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Tool for LookupTool {
    async fn call(&self, input: Value) -> supply_core::Result<String> {
        let query = supply_tools::tool::query_argument(&input)?;
        self.seen.lock().unwrap().push(query.clone());
        Ok(self
            .answers
            .iter()
            .find(|(q, _)| *q == query)
            .map_or(self.fallback, |(_, a)| a)
            .to_string())
    }

    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "Looks a query up in a fixed table"
    }

    fn input_schema(&self) -> Value {
        json!({"type": "object", "properties": {"query": {"type": "string"}}, "required": ["query"]})
    }
}

/// Tool that always fails
pub struct FailingTool;

#[async_trait]
impl Tool for FailingTool {
    async fn call(&self, _input: Value) -> supply_core::Result<String> {
        Err(supply_core::Error::ProcessingFailed("index unavailable".to_string()))
    }

    fn name(&self) -> &str {
        "supply_chain_retriever_tool"
    }

    fn description(&self) -> &str {
        "Always fails"
    }

    fn input_schema(&self) -> Value {
        json!({"type": "object"})
    }
}
