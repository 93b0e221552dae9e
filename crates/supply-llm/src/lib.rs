//! Language-model plumbing for the risk analyst agent
//!
//! This crate provides provider-agnostic types for talking to a chat-completion model:
//!
//! - messages built from text, tool-call and tool-result blocks
//! - [`CompletionRequest`] with the system prompt, tools and stop strings the agent sends
//! - the [`LlmProvider`] trait and an OpenAI-compatible implementation (OpenRouter by default)

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod providers;
pub mod tools;

pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LlmError, Result};
pub use messages::{ContentBlock, Message, Role};
pub use provider::LlmProvider;
pub use providers::{OpenAIConfig, OpenAIProvider};
pub use tools::ToolDefinition;
