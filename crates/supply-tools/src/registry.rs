//! Tool registry for name-based dispatch

use crate::Tool;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use supply_llm::ToolDefinition;

/// Registered tools, kept in name order so prompts render deterministically
#[derive(Default)]
pub struct ToolRegistry {
    tools: RwLock<BTreeMap<String, Arc<dyn Tool>>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&self, tool: Arc<dyn Tool>) {
        let mut tools = self.tools.write().unwrap_or_else(PoisonError::into_inner);
        tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        tools.get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        tools.keys().cloned().collect()
    }

    /// Definitions to offer the model
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        tools.values().map(|tool| tool.definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{Value, json};

    struct Echo(&'static str);

    #[async_trait]
    impl Tool for Echo {
        async fn call(&self, input: Value) -> supply_core::Result<String> {
            Ok(input.to_string())
        }

        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "Echo the input"
        }

        fn input_schema(&self) -> Value {
            json!({"type": "object"})
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());

        registry.register(Arc::new(Echo("supply_chain_retriever_tool")));
        registry.register(Arc::new(Echo("news_scanner_tool")));

        assert_eq!(registry.len(), 2);
        assert!(registry.get("news_scanner_tool").is_some());
        assert!(registry.get("weather_tool").is_none());
        assert_eq!(
            registry.names(),
            vec!["news_scanner_tool", "supply_chain_retriever_tool"]
        );
    }

    #[test]
    fn test_definitions_follow_name_order() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(Echo("b_tool")));
        registry.register(Arc::new(Echo("a_tool")));

        let definitions = registry.definitions();
        assert_eq!(definitions[0].name, "a_tool");
        assert_eq!(definitions[1].description, "Echo the input");
    }

    #[tokio::test]
    async fn test_dispatch_by_name() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(Echo("echo")));
        let tool = registry.get("echo").unwrap();
        assert_eq!(tool.call(json!("hi")).await.unwrap(), "\"hi\"");
    }
}
