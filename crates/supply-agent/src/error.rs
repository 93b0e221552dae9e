//! Error types for the agent loop

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AgentError>;

#[derive(Error, Debug)]
pub enum AgentError {
    /// The model call failed; the loop cannot continue without it
    #[error("Model call failed: {0}")]
    Llm(#[from] supply_llm::LlmError),

    #[error("Failed to render prompt '{name}': {detail}")]
    Prompt { name: String, detail: String },

    /// Assembling the analyst from configuration failed
    #[error("Setup failed: {0}")]
    Setup(#[from] supply_core::Error),
}

impl From<supply_index::IndexError> for AgentError {
    fn from(err: supply_index::IndexError) -> Self {
        Self::Setup(err.into())
    }
}

impl From<AgentError> for supply_core::Error {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::Setup(inner) => inner,
            other => supply_core::Error::ProcessingFailed(other.to_string()),
        }
    }
}
