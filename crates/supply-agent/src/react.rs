//! ReAct text protocol
//!
//! The model sees one prompt holding the task, the tool list and a scratchpad of its
//! previous Thought/Action/Observation turns, and replies with either an
//! `Action:`/`Action Input:` pair or a `Final Answer:`. Generation stops at
//! `\nObservation:` so the model never invents tool output.

use crate::prompts::Prompts;
use crate::strategy::{Decision, DecisionStrategy, ModelSettings, Step, ToolCall};
use crate::Result;
use async_trait::async_trait;
use regex::Regex;
use serde_json::{Value, json};
use std::sync::Arc;
use supply_llm::{CompletionRequest, LlmProvider, Message, ToolDefinition};
use tracing::{debug, instrument, warn};

const OBSERVATION_STOP: &str = "\nObservation:";
const FINAL_ANSWER: &str = "Final Answer:";

const ACTION_PATTERN: &str =
    r"(?s)Action\s*\d*\s*:[\s]*(.*?)[\s]*Action\s*\d*\s*Input\s*\d*\s*:[\s]*(.*)";
const ACTION_ONLY_PATTERN: &str = r"Action\s*\d*\s*:";

/// Result of parsing one model reply
#[derive(Debug, Clone, PartialEq)]
pub enum ReactOutput {
    Action { tool: String, input: String },
    Finish { answer: String },
}

/// Parse a ReAct reply. The error is the feedback to show the model.
pub fn parse_react_output(text: &str) -> std::result::Result<ReactOutput, String> {
    let text = text.split(OBSERVATION_STOP).next().unwrap_or_default();
    let includes_answer = text.contains(FINAL_ANSWER);

    let action_re = Regex::new(ACTION_PATTERN).map_err(|e| e.to_string())?;
    if let Some(caps) = action_re.captures(text) {
        if includes_answer {
            return Err(format!(
                "Invalid Format: the output contains both a final answer and an action. \
                 Reply with either '{FINAL_ANSWER}' or an 'Action:' with its 'Action Input:', not both."
            ));
        }
        let tool = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
        let input = caps
            .get(2)
            .map_or("", |m| m.as_str())
            .trim()
            .trim_matches('"')
            .to_string();
        if tool.is_empty() {
            return Err("Invalid Format: 'Action:' names no tool.".to_string());
        }
        return Ok(ReactOutput::Action { tool, input });
    }

    if includes_answer {
        let answer = text.rsplit(FINAL_ANSWER).next().unwrap_or_default().trim();
        return Ok(ReactOutput::Finish {
            answer: answer.to_string(),
        });
    }

    let has_action = Regex::new(ACTION_ONLY_PATTERN)
        .map_err(|e| e.to_string())?
        .is_match(text);
    if has_action {
        Err("Invalid Format: Missing 'Action Input:' after 'Action:'".to_string())
    } else {
        Err("Invalid Format: Missing 'Action:' after 'Thought:'".to_string())
    }
}

/// Tool input from an `Action Input:` line: a JSON object as-is, anything else as a query
fn action_input(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Object(_)) => value,
        _ => json!({ "query": raw }),
    }
}

/// Scratchpad replaying earlier turns in the format the prompt asks for
pub fn build_scratchpad(steps: &[Step]) -> String {
    let mut scratchpad = String::new();
    for step in steps {
        let (log, observation) = match step {
            Step::Tool {
                log, observation, ..
            } => (log, observation),
            Step::Invalid { log, feedback, .. } => (log, feedback),
        };
        scratchpad.push_str(log);
        scratchpad.push_str("\nObservation: ");
        scratchpad.push_str(observation);
        scratchpad.push_str("\nThought: ");
    }
    scratchpad
}

/// Drives a text model through the ReAct prompt
pub struct ReactStrategy {
    provider: Arc<dyn LlmProvider>,
    settings: ModelSettings,
    prompts: Prompts,
}

impl ReactStrategy {
    pub fn new(provider: Arc<dyn LlmProvider>, settings: ModelSettings) -> Result<Self> {
        Ok(Self {
            provider,
            settings,
            prompts: Prompts::new()?,
        })
    }
}

#[async_trait]
impl DecisionStrategy for ReactStrategy {
    fn name(&self) -> &str {
        "react"
    }

    #[instrument(skip_all, fields(steps = steps.len(), model = %self.settings.model))]
    async fn decide(&self, task: &str, steps: &[Step], tools: &[ToolDefinition]) -> Result<Decision> {
        let prompt = self.prompts.react(task, tools, &build_scratchpad(steps))?;
        let request = CompletionRequest::new(&self.settings.model, vec![Message::user(prompt)])
            .with_sampling(self.settings.temperature, self.settings.max_tokens)
            .with_stop(OBSERVATION_STOP);

        let response = self.provider.complete(request).await?;
        let text = response.message.text().unwrap_or_default();
        debug!(reply = %text, "ReAct reply");

        Ok(match parse_react_output(&text) {
            Ok(ReactOutput::Finish { answer }) => Decision::Finish { answer },
            Ok(ReactOutput::Action { tool, input }) => Decision::Act {
                thought: text.trim_end().to_string(),
                calls: vec![ToolCall {
                    id: format!("call_{}", steps.len() + 1),
                    name: tool,
                    input: action_input(&input),
                }],
            },
            Err(feedback) => {
                warn!(feedback = %feedback, "Could not parse model output");
                Decision::Retry {
                    thought: text.trim_end().to_string(),
                    feedback,
                }
            }
        })
    }
}
