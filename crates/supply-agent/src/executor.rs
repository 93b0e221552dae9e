//! Agent executor for running the reasoning loop
//!
//! The AgentExecutor implements a bounded loop:
//! 1. Ask the strategy for a decision given the task and the transcript
//! 2. If it requests tools, run them one at a time and record the observations
//! 3. If it finishes, return the answer
//! 4. Stop with a fixed answer once `max_iterations` decisions have been made

use crate::strategy::{Decision, DecisionStrategy, Step, ToolCall};
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use supply_tools::ToolRegistry;
use tracing::{debug, info, warn};

/// Answer reported when the loop runs out of iterations
pub const ITERATION_LIMIT_ANSWER: &str = "Agent stopped due to iteration limit or time limit.";

/// Callbacks fired while the loop runs
#[async_trait]
pub trait ExecutorEventHandler: Send + Sync {
    async fn on_tool_start(&self, _id: &str, _name: &str, _input: &Value) {}

    async fn on_tool_done(
        &self,
        _id: &str,
        _name: &str,
        _result: std::result::Result<&str, &str>,
        _duration_ms: u64,
    ) {
    }

    /// The model's output could not be used; `feedback` goes back to it
    async fn on_retry(&self, _feedback: &str) {}

    async fn on_complete(&self, _answer: &str) {}
}

pub struct NoOpEventHandler;

#[async_trait]
impl ExecutorEventHandler for NoOpEventHandler {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Finished,
    IterationLimit,
}

/// Outcome of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRun {
    pub answer: String,
    pub status: RunStatus,
    pub steps: Vec<Step>,
    /// Decisions requested from the strategy
    pub iterations: usize,
}

/// Runs a [`DecisionStrategy`] against a [`ToolRegistry`]
pub struct AgentExecutor {
    strategy: Arc<dyn DecisionStrategy>,
    tools: Arc<ToolRegistry>,
    max_iterations: usize,
    event_handler: Arc<dyn ExecutorEventHandler>,
}

impl AgentExecutor {
    pub fn new(strategy: Arc<dyn DecisionStrategy>, tools: Arc<ToolRegistry>) -> Self {
        Self {
            strategy,
            tools,
            max_iterations: 15,
            event_handler: Arc::new(NoOpEventHandler),
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_event_handler(mut self, handler: Arc<dyn ExecutorEventHandler>) -> Self {
        self.event_handler = handler;
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tools
    }

    /// Run the loop for `task`. Only model failures are errors; tool failures become
    /// observations.
    pub async fn run(&self, task: &str) -> Result<AgentRun> {
        let definitions = self.tools.definitions();
        let mut steps = Vec::new();

        for iteration in 1..=self.max_iterations {
            info!(
                iteration,
                max_iterations = self.max_iterations,
                strategy = self.strategy.name(),
                "Agent iteration started"
            );

            match self.strategy.decide(task, &steps, &definitions).await? {
                Decision::Finish { answer } => {
                    info!(iteration, answer_length = answer.len(), "Agent finished");
                    self.event_handler.on_complete(&answer).await;
                    return Ok(AgentRun {
                        answer,
                        status: RunStatus::Finished,
                        steps,
                        iterations: iteration,
                    });
                }
                Decision::Act { thought, calls } if !calls.is_empty() => {
                    for call in calls {
                        let step = self.execute_call(iteration, &thought, call).await;
                        steps.push(step);
                    }
                }
                Decision::Act { thought, .. } => {
                    warn!(iteration, "Strategy acted without any tool call");
                    let feedback = "No tool was called. Use one of the tools or give your final answer.";
                    self.event_handler.on_retry(feedback).await;
                    steps.push(Step::Invalid {
                        iteration,
                        log: thought,
                        feedback: feedback.to_string(),
                    });
                }
                Decision::Retry { thought, feedback } => {
                    self.event_handler.on_retry(&feedback).await;
                    steps.push(Step::Invalid {
                        iteration,
                        log: thought,
                        feedback,
                    });
                }
            }
        }

        warn!(max_iterations = self.max_iterations, "Iteration limit reached");
        self.event_handler.on_complete(ITERATION_LIMIT_ANSWER).await;
        Ok(AgentRun {
            answer: ITERATION_LIMIT_ANSWER.to_string(),
            status: RunStatus::IterationLimit,
            steps,
            iterations: self.max_iterations,
        })
    }

    async fn execute_call(&self, iteration: usize, thought: &str, call: ToolCall) -> Step {
        let input_preview: String = call.input.to_string().chars().take(500).collect();
        info!(tool_name = %call.name, tool_id = %call.id, input_preview = %input_preview, "Executing tool");
        self.event_handler
            .on_tool_start(&call.id, &call.name, &call.input)
            .await;

        let start_time = Instant::now();
        let (observation, is_error) = match self.tools.get(&call.name) {
            None => {
                warn!(tool_name = %call.name, "Unknown tool requested");
                let observation = format!(
                    "{} is not a valid tool, try one of [{}].",
                    call.name,
                    self.tools.names().join(", ")
                );
                (observation, true)
            }
            Some(tool) => match tool.call(call.input.clone()).await {
                Ok(output) => {
                    debug!(tool_name = %call.name, result_length = output.len(), "Tool execution succeeded");
                    (output, false)
                }
                Err(e) => {
                    warn!(tool_name = %call.name, error = %e, "Tool execution failed");
                    (format!("Error: {e}"), true)
                }
            },
        };
        let duration_ms = start_time.elapsed().as_millis() as u64;

        let result = if is_error {
            Err(observation.as_str())
        } else {
            Ok(observation.as_str())
        };
        self.event_handler
            .on_tool_done(&call.id, &call.name, result, duration_ms)
            .await;

        Step::Tool {
            iteration,
            log: thought.to_string(),
            call,
            observation,
            is_error,
        }
    }
}
