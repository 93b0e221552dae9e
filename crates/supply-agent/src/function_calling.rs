//! Native tool calling
//!
//! The transcript is replayed as chat messages on every turn: each iteration becomes an
//! assistant message holding its tool-use blocks, followed by one tool result per call.

use crate::prompts::Prompts;
use crate::strategy::{Decision, DecisionStrategy, ModelSettings, Step, ToolCall};
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use supply_llm::{
    CompletionRequest, ContentBlock, LlmProvider, Message, Role, StopReason, ToolDefinition,
};
use tracing::{debug, instrument, warn};

const EMPTY_REPLY_FEEDBACK: &str =
    "Your reply was empty. Call one of the tools or give your final answer as plain text.";
const TRUNCATED_REPLY_FEEDBACK: &str =
    "Your reply was cut off by the token limit. Give a shorter answer.";

pub struct FunctionCallingStrategy {
    provider: Arc<dyn LlmProvider>,
    settings: ModelSettings,
    prompts: Prompts,
}

impl FunctionCallingStrategy {
    pub fn new(provider: Arc<dyn LlmProvider>, settings: ModelSettings) -> Result<Self> {
        Ok(Self {
            provider,
            settings,
            prompts: Prompts::new()?,
        })
    }
}

/// Conversation for `task` followed by every recorded step
pub fn replay_transcript(task: &str, steps: &[Step]) -> Vec<Message> {
    let mut messages = vec![Message::user(task)];
    let mut index = 0;

    while index < steps.len() {
        let iteration = steps[index].iteration();
        let turn: Vec<&Step> = steps[index..]
            .iter()
            .take_while(|s| s.iteration() == iteration)
            .collect();
        index += turn.len();

        let mut blocks = Vec::new();
        let mut results = Vec::new();
        for step in turn {
            match step {
                Step::Tool {
                    log,
                    call,
                    observation,
                    is_error,
                    ..
                } => {
                    if blocks.is_empty() && !log.is_empty() {
                        blocks.push(ContentBlock::Text { text: log.clone() });
                    }
                    blocks.push(ContentBlock::ToolUse {
                        id: call.id.clone(),
                        name: call.name.clone(),
                        input: call.input.clone(),
                    });
                    results.push(Message::tool_result(
                        call.id.clone(),
                        observation.clone(),
                        *is_error,
                    ));
                }
                Step::Invalid { log, feedback, .. } => {
                    messages.push(Message::assistant(log.clone()));
                    messages.push(Message::user(feedback.clone()));
                }
            }
        }

        if !blocks.is_empty() {
            messages.push(Message::new(Role::Assistant, blocks));
            messages.extend(results);
        }
    }
    messages
}

#[async_trait]
impl DecisionStrategy for FunctionCallingStrategy {
    fn name(&self) -> &str {
        "function_calling"
    }

    #[instrument(skip_all, fields(steps = steps.len(), model = %self.settings.model))]
    async fn decide(&self, task: &str, steps: &[Step], tools: &[ToolDefinition]) -> Result<Decision> {
        let request = CompletionRequest::new(&self.settings.model, replay_transcript(task, steps))
            .with_system(self.prompts.function_calling_system(tools)?)
            .with_tools(tools)
            .with_sampling(self.settings.temperature, self.settings.max_tokens);

        let response = self.provider.complete(request).await?;
        let text = response.message.text().unwrap_or_default();
        let calls: Vec<ToolCall> = response
            .message
            .tool_uses()
            .into_iter()
            .map(|(id, name, input)| ToolCall {
                id: id.to_string(),
                name: name.to_string(),
                input: input.clone(),
            })
            .collect();
        debug!(calls = calls.len(), stop_reason = ?response.stop_reason, "Model replied");

        if !calls.is_empty() {
            return Ok(Decision::Act {
                thought: text,
                calls,
            });
        }
        if response.stop_reason == StopReason::Length {
            warn!("Reply truncated by the token limit");
            return Ok(Decision::Retry {
                thought: text,
                feedback: TRUNCATED_REPLY_FEEDBACK.to_string(),
            });
        }
        if text.trim().is_empty() {
            return Ok(Decision::Retry {
                thought: text,
                feedback: EMPTY_REPLY_FEEDBACK.to_string(),
            });
        }
        Ok(Decision::Finish {
            answer: text.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedProvider, text_response, tool_use_response};
    use serde_json::json;

    fn tool_step(iteration: usize, id: &str, observation: &str) -> Step {
        Step::Tool {
            iteration,
            log: String::new(),
            call: ToolCall {
                id: id.to_string(),
                name: "supply_chain_retriever_tool".to_string(),
                input: json!({"query": id}),
            },
            observation: observation.to_string(),
            is_error: false,
        }
    }

    #[test]
    fn test_replay_groups_calls_by_iteration() {
        let steps = vec![
            tool_step(1, "a", "first"),
            tool_step(1, "b", "second"),
            tool_step(2, "c", "third"),
        ];
        let messages = replay_transcript("Find risks", &steps);

        // task, turn 1 (assistant + 2 results), turn 2 (assistant + 1 result)
        assert_eq!(messages.len(), 6);
        assert_eq!(messages[1].tool_uses().len(), 2);
        assert_eq!(
            messages[2].blocks,
            vec![ContentBlock::ToolResult {
                tool_use_id: "a".to_string(),
                content: "first".to_string(),
                is_error: false,
            }]
        );
        assert_eq!(messages[4].tool_uses()[0].0, "c");
    }

    #[test]
    fn test_replay_invalid_turn_as_feedback() {
        let steps = vec![Step::Invalid {
            iteration: 1,
            log: String::new(),
            feedback: EMPTY_REPLY_FEEDBACK.to_string(),
        }];
        let messages = replay_transcript("Find risks", &steps);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].text().as_deref(), Some(EMPTY_REPLY_FEEDBACK));
    }

    #[tokio::test]
    async fn test_tool_use_becomes_act() {
        let provider = Arc::new(ScriptedProvider::new(vec![tool_use_response(
            "Checking",
            &[("call_1", "news_scanner_tool", json!({"query": "Taiwan semiconductor"}))],
        )]));
        let strategy = FunctionCallingStrategy::new(provider.clone(), ModelSettings::new("m")).unwrap();
        let tools = vec![ToolDefinition::new("news_scanner_tool", "Scan", json!({"type": "object"}))];

        let decision = strategy.decide("Find risks", &[], &tools).await.unwrap();
        assert!(matches!(decision, Decision::Act { ref calls, .. } if calls[0].id == "call_1"));

        let request = provider.request(0);
        assert_eq!(request.tools.len(), 1);
        assert!(request.system.unwrap().contains("news_scanner_tool"));
    }

    #[tokio::test]
    async fn test_text_becomes_finish() {
        let provider = Arc::new(ScriptedProvider::new(vec![text_response("  No risks found.  ")]));
        let strategy = FunctionCallingStrategy::new(provider, ModelSettings::new("m")).unwrap();

        let decision = strategy.decide("Find risks", &[], &[]).await.unwrap();
        assert_eq!(
            decision,
            Decision::Finish {
                answer: "No risks found.".to_string()
            }
        );
    }

    #[test]
    fn test_replay_marks_failed_calls() {
        let mut step = tool_step(1, "a", "Error: index missing");
        if let Step::Tool { is_error, .. } = &mut step {
            *is_error = true;
        }
        let messages = replay_transcript("Find risks", &[step]);
        assert!(matches!(
            &messages[2].blocks[0],
            ContentBlock::ToolResult { is_error: true, content, .. } if content == "Error: index missing"
        ));
    }

    #[tokio::test]
    async fn test_truncated_reply_is_retry() {
        let mut cut = text_response("The main risk is");
        cut.stop_reason = StopReason::Length;
        let provider = Arc::new(ScriptedProvider::new(vec![cut]));
        let strategy = FunctionCallingStrategy::new(provider, ModelSettings::new("m")).unwrap();

        let decision = strategy.decide("Find risks", &[], &[]).await.unwrap();
        assert!(matches!(
            decision,
            Decision::Retry { ref feedback, .. } if feedback == TRUNCATED_REPLY_FEEDBACK
        ));
    }

    #[tokio::test]
    async fn test_empty_reply_is_retry() {
        let provider = Arc::new(ScriptedProvider::new(vec![text_response("")]));
        let strategy = FunctionCallingStrategy::new(provider, ModelSettings::new("m")).unwrap();

        let decision = strategy.decide("Find risks", &[], &[]).await.unwrap();
        assert!(matches!(decision, Decision::Retry { .. }));
    }
}
