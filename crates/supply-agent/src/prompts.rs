//! Prompt templates rendered with minijinja

use crate::{AgentError, Result};
use minijinja::{Environment, context};
use supply_llm::ToolDefinition;
use supply_tools::{NewsScanTool, SupplyChainRetrieverTool};

const REACT: &str = "react";
const MASTER_TASK: &str = "master_task";
const FUNCTION_CALLING_SYSTEM: &str = "function_calling_system";

const REACT_TEMPLATE: &str = "\
Answer the following questions as best you can. You have access to the following tools:

{{ tools }}

Use the following format:

Question: the input question you must answer
Thought: you should always think about what to do
Action: the action to take, should be one of [{{ tool_names }}]
Action Input: the input to the action
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)
Thought: I now know the final answer
Final Answer: the final answer to the original input question

Begin!

Question: {{ input }}
Thought:{{ scratchpad }}";

const MASTER_TASK_TEMPLATE: &str = "\
Your mission is to act as a Supply Chain Risk Analyst.
First, use the {{ news_tool }} with a query like \"{{ news_query }}\"
to find potential disruption events.

For each relevant news headline, identify the key location or company. Then, use the
{{ retriever_tool }} with that key entity to check if it affects our
internal supply chain.

Finally, provide a consolidated final answer summarizing any identified risks.
If no risks are found, state that clearly.";

const FUNCTION_CALLING_SYSTEM_TEMPLATE: &str = "\
You are a supply chain risk analyst. Use the available tools ({{ tool_names }}) to gather \
evidence before answering. When you have enough information, reply with your final answer \
as plain text and call no more tools.";

/// Registered prompt templates
pub struct Prompts {
    env: Environment<'static>,
}

impl Prompts {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        for (name, source) in [
            (REACT, REACT_TEMPLATE),
            (MASTER_TASK, MASTER_TASK_TEMPLATE),
            (FUNCTION_CALLING_SYSTEM, FUNCTION_CALLING_SYSTEM_TEMPLATE),
        ] {
            env.add_template(name, source).map_err(|e| render_error(name, &e))?;
        }
        Ok(Self { env })
    }

    /// Full ReAct prompt for `task`, with the scratchpad appended after the last `Thought:`
    pub fn react(&self, task: &str, tools: &[ToolDefinition], scratchpad: &str) -> Result<String> {
        let tool_lines = tools
            .iter()
            .map(|t| format!("{}: {}", t.name, t.description))
            .collect::<Vec<_>>()
            .join("\n");
        self.render(
            REACT,
            context! {
                tools => tool_lines,
                tool_names => tool_names(tools),
                input => task,
                scratchpad => scratchpad,
            },
        )
    }

    /// The analyst's standing mission, scanning news for `news_query`
    pub fn master_task(&self, news_query: &str) -> Result<String> {
        self.render(
            MASTER_TASK,
            context! {
                news_tool => NewsScanTool::NAME,
                retriever_tool => SupplyChainRetrieverTool::NAME,
                news_query => news_query,
            },
        )
    }

    pub fn function_calling_system(&self, tools: &[ToolDefinition]) -> Result<String> {
        self.render(
            FUNCTION_CALLING_SYSTEM,
            context! { tool_names => tool_names(tools) },
        )
    }

    fn render(&self, name: &str, ctx: minijinja::Value) -> Result<String> {
        self.env
            .get_template(name)
            .and_then(|t| t.render(ctx))
            .map_err(|e| render_error(name, &e))
    }
}

fn tool_names(tools: &[ToolDefinition]) -> String {
    tools.iter().map(|t| t.name.as_str()).collect::<Vec<_>>().join(", ")
}

fn render_error(name: &str, err: &minijinja::Error) -> AgentError {
    AgentError::Prompt {
        name: name.to_string(),
        detail: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tools() -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::new("news_scanner_tool", "Scans news", json!({})),
            ToolDefinition::new("supply_chain_retriever_tool", "Queries the index", json!({})),
        ]
    }

    #[test]
    fn test_react_prompt_lists_tools() {
        let prompts = Prompts::new().unwrap();
        let prompt = prompts.react("Find risks", &tools(), "").unwrap();

        assert!(prompt.contains("news_scanner_tool: Scans news\nsupply_chain_retriever_tool: Queries the index"));
        assert!(prompt.contains("one of [news_scanner_tool, supply_chain_retriever_tool]"));
        assert!(prompt.ends_with("Question: Find risks\nThought:"));
    }

    #[test]
    fn test_react_prompt_appends_scratchpad() {
        let prompts = Prompts::new().unwrap();
        let prompt = prompts
            .react("Find risks", &tools(), " I should scan\nObservation: none\nThought: ")
            .unwrap();
        assert!(prompt.ends_with("Thought: I should scan\nObservation: none\nThought: "));
    }

    #[test]
    fn test_master_task_names_tools_and_query() {
        let prompts = Prompts::new().unwrap();
        let task = prompts.master_task("Taiwan semiconductor").unwrap();

        assert!(task.starts_with("Your mission is to act as a Supply Chain Risk Analyst."));
        assert!(task.contains("use the news_scanner_tool with a query like \"Taiwan semiconductor\""));
        assert!(task.contains("supply_chain_retriever_tool"));
        assert!(task.ends_with("state that clearly."));
    }

    #[test]
    fn test_function_calling_system_prompt() {
        let prompts = Prompts::new().unwrap();
        let system = prompts.function_calling_system(&tools()).unwrap();
        assert!(system.contains("(news_scanner_tool, supply_chain_retriever_tool)"));
    }
}
