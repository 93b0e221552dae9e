//! Reasoning loop for the supply-chain risk analyst
//!
//! The [`AgentExecutor`] asks a [`DecisionStrategy`] what to do next, runs the requested
//! tools one at a time and feeds their observations back, until the strategy produces a
//! final answer or the iteration budget runs out.
//!
//! Two strategies are provided:
//!
//! - [`ReactStrategy`] drives any text model through a Thought/Action/Observation prompt
//! - [`FunctionCallingStrategy`] uses the provider's native tool calling
//!
//! [`RiskAnalyst`] wires both ends from an [`supply_core::AppConfig`].

pub mod analyst;
pub mod error;
pub mod executor;
pub mod function_calling;
pub mod prompts;
pub mod react;
pub mod strategy;

#[cfg(test)]
mod testing;

pub use analyst::RiskAnalyst;
pub use error::{AgentError, Result};
pub use executor::{
    AgentExecutor, AgentRun, ExecutorEventHandler, ITERATION_LIMIT_ANSWER, NoOpEventHandler,
    RunStatus,
};
pub use function_calling::FunctionCallingStrategy;
pub use prompts::Prompts;
pub use react::ReactStrategy;
pub use strategy::{Decision, DecisionStrategy, ModelSettings, Step, ToolCall};
