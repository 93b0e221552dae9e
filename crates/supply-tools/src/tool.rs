//! Tool trait definition

use async_trait::async_trait;
use serde_json::Value;
use supply_core::{Error, Result};
use supply_llm::ToolDefinition;

/// A capability the agent can invoke by name
///
/// Tools answer in plain text, since the output is read by the model as an observation.
/// Errors are reserved for real failures; "nothing found" is a normal answer.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Run the tool with `input`, which should match [`Tool::input_schema`]
    async fn call(&self, input: Value) -> Result<String>;

    /// Unique name within a registry, as the model refers to it
    fn name(&self) -> &str;

    /// Tells the model when to use this tool
    fn description(&self) -> &str;

    /// JSON Schema of the input object
    fn input_schema(&self) -> Value;

    /// Definition offered to the model for native tool calling
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description(), self.input_schema())
    }
}

/// Extract the `query` argument.
///
/// Accepts `{"query": "..."}` or a bare JSON string, since text-protocol models often send
/// the raw search term.
pub fn query_argument(input: &Value) -> Result<String> {
    let query = match input {
        Value::String(s) => s.as_str(),
        Value::Object(map) => map.get("query").and_then(Value::as_str).ok_or_else(|| {
            Error::ProcessingFailed("Invalid parameters: missing string field 'query'".to_string())
        })?,
        other => {
            return Err(Error::ProcessingFailed(format!(
                "Invalid parameters: expected an object or a string, got {other}"
            )));
        }
    };

    let query = query.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    if query.is_empty() {
        return Err(Error::ProcessingFailed("Invalid parameters: query is empty".to_string()));
    }
    Ok(query.to_string())
}

/// Optional positive integer argument; a bare string input has none
pub fn optional_count(input: &Value, key: &str) -> Result<Option<usize>> {
    match input.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => match value.as_u64() {
            Some(n) if n > 0 => Ok(Some(n as usize)),
            _ => Err(Error::ProcessingFailed(format!(
                "Invalid parameters: '{key}' must be a positive integer, got {value}"
            ))),
        },
    }
}
