//! Decision strategies: how the agent picks its next move

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use supply_core::LlmConfig;
use supply_llm::ToolDefinition;

/// A tool invocation requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub input: Value,
}

/// One entry of the run transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    /// A tool was called and observed
    Tool {
        iteration: usize,
        /// Model text that led to the call
        log: String,
        call: ToolCall,
        observation: String,
        is_error: bool,
    },
    /// The model's output could not be acted on
    Invalid {
        iteration: usize,
        log: String,
        feedback: String,
    },
}

impl Step {
    pub fn iteration(&self) -> usize {
        match self {
            Self::Tool { iteration, .. } | Self::Invalid { iteration, .. } => *iteration,
        }
    }
}

/// What the strategy wants to do next
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Run these tools, in order
    Act { thought: String, calls: Vec<ToolCall> },
    Finish { answer: String },
    /// Output was unusable; `feedback` is shown to the model on the next turn
    Retry { thought: String, feedback: String },
}

/// Chooses the next move from the task and the transcript so far
#[async_trait]
pub trait DecisionStrategy: Send + Sync {
    fn name(&self) -> &str;

    async fn decide(&self, task: &str, steps: &[Step], tools: &[ToolDefinition]) -> Result<Decision>;
}

/// Model parameters shared by the strategies
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ModelSettings {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: 0.0,
            max_tokens: 1024,
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}
