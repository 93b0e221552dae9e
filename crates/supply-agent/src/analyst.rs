//! Risk analyst assembled from configuration

use crate::executor::{AgentExecutor, AgentRun, ExecutorEventHandler};
use crate::function_calling::FunctionCallingStrategy;
use crate::prompts::Prompts;
use crate::react::ReactStrategy;
use crate::strategy::{DecisionStrategy, ModelSettings};
use crate::Result;
use std::sync::Arc;
use supply_core::{AppConfig, StrategyKind};
use supply_index::{LocalVectorStore, VectorStore, build_embedder};
use supply_llm::{LlmProvider, OpenAIConfig, OpenAIProvider};
use supply_tools::{NewsScanTool, NewsScanner, SupplyChainRetrieverTool, ToolRegistry};
use tracing::info;

/// The supply-chain risk analyst: model, tools and loop wired together
pub struct RiskAnalyst {
    executor: AgentExecutor,
    prompts: Prompts,
    news_query: String,
}

impl RiskAnalyst {
    /// Assemble from explicit parts
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        store: Arc<dyn VectorStore>,
        news: NewsScanner,
        config: &AppConfig,
    ) -> Result<Self> {
        let tools = ToolRegistry::new();
        tools.register(Arc::new(NewsScanTool::new(news)));
        tools.register(Arc::new(SupplyChainRetrieverTool::from_config(
            store,
            &config.retrieval,
        )));

        let settings = ModelSettings::from_config(&config.llm);
        let strategy: Arc<dyn DecisionStrategy> = match config.agent.strategy {
            StrategyKind::React => Arc::new(ReactStrategy::new(provider, settings)?),
            StrategyKind::FunctionCalling => Arc::new(FunctionCallingStrategy::new(provider, settings)?),
        };
        info!(strategy = strategy.name(), tools = tools.len(), "Risk analyst ready");

        Ok(Self {
            executor: AgentExecutor::new(strategy, Arc::new(tools))
                .with_max_iterations(config.agent.max_iterations),
            prompts: Prompts::new()?,
            news_query: config.agent.news_query.clone(),
        })
    }

    /// Assemble from configuration: OpenAI-compatible model, configured embedder, the
    /// local index under `index.db_dir` and the GNews scanner
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let provider = OpenAIProvider::with_config(OpenAIConfig::from_llm_config(&config.llm)?)?;
        let embedder = build_embedder(&config.embedding).await?;
        let store = LocalVectorStore::open(&config.index.db_dir, embedder).await?;
        if store.is_empty().await {
            info!(db_dir = %config.index.db_dir.display(), "Index is empty, supply-chain queries will find nothing");
        }

        Self::new(
            Arc::new(provider),
            Arc::new(store),
            NewsScanner::from_config(&config.news),
            config,
        )
    }

    pub fn with_event_handler(mut self, handler: Arc<dyn ExecutorEventHandler>) -> Self {
        self.executor = self.executor.with_event_handler(handler);
        self
    }

    /// The standing mission text for the configured news query
    pub fn master_task(&self) -> Result<String> {
        self.prompts.master_task(&self.news_query)
    }

    /// Scan the news and check each lead against the supply chain
    pub async fn run_master_task(&self) -> Result<AgentRun> {
        let task = self.master_task()?;
        self.run(&task).await
    }

    pub async fn run(&self, task: &str) -> Result<AgentRun> {
        self.executor.run(task).await
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.executor.tools().names()
    }
}
