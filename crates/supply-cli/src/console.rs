//! Console output for agent runs

use async_trait::async_trait;
use serde_json::Value;
use supply_agent::ExecutorEventHandler;

/// Prints each tool call and its observation as the agent works
pub struct ConsoleEventHandler {
    pub show_observations: bool,
}

/// The query a tool call carries, for display
pub fn display_query(input: &Value) -> String {
    match input {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("query")
            .and_then(Value::as_str)
            .map_or_else(|| input.to_string(), ToString::to_string),
        other => other.to_string(),
    }
}

pub fn action_line(name: &str, input: &Value) -> String {
    format!(
        "--- AGENT ACTION: Calling {name} with query: '{}' ---",
        display_query(input)
    )
}

#[async_trait]
impl ExecutorEventHandler for ConsoleEventHandler {
    async fn on_tool_start(&self, _id: &str, name: &str, input: &Value) {
        println!("{}", action_line(name, input));
    }

    async fn on_tool_done(
        &self,
        _id: &str,
        name: &str,
        result: Result<&str, &str>,
        duration_ms: u64,
    ) {
        match result {
            Ok(text) if self.show_observations => {
                println!("Observation from {name} ({duration_ms} ms):\n{text}\n");
            }
            Ok(_) => {}
            Err(error) => eprintln!("Tool {name} failed after {duration_ms} ms: {error}\n"),
        }
    }

    async fn on_retry(&self, feedback: &str) {
        eprintln!("--- Model output could not be used: {feedback} ---");
    }
}
