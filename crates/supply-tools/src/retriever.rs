//! Supply-chain similarity queries over the vector index

use crate::format::format_retrieval;
use crate::tool::{Tool, optional_count, query_argument};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use supply_core::{Result, RetrievalConfig, ScoredSegment};
use supply_index::VectorStore;
use supply_llm::tools::schema;
use tracing::{info, instrument};

/// How many matches to fetch and how to present them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalMode {
    /// Single best match with its criticality level
    BestMatch,
    /// The `k` closest segments, contents only
    Broad { k: usize },
}

impl RetrievalMode {
    pub fn from_top_k(k: usize) -> Self {
        if k <= 1 { Self::BestMatch } else { Self::Broad { k } }
    }

    pub fn k(self) -> usize {
        match self {
            Self::BestMatch => 1,
            Self::Broad { k } => k,
        }
    }
}

/// Outcome of a similarity query
#[derive(Debug, Clone, PartialEq)]
pub enum Retrieval {
    /// Best first, never empty
    Matches(Vec<ScoredSegment>),
    NoMatches,
}

impl Retrieval {
    pub fn matches(&self) -> &[ScoredSegment] {
        match self {
            Self::Matches(m) => m,
            Self::NoMatches => &[],
        }
    }
}

/// Queries the supply-chain index
pub struct SupplyChainRetriever {
    store: Arc<dyn VectorStore>,
}

impl SupplyChainRetriever {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }

    /// Up to `k` most similar segments. An empty or unbuilt index is `NoMatches`.
    #[instrument(skip(self))]
    pub async fn query(&self, query: &str, k: usize) -> Result<Retrieval> {
        let results = self.store.similarity_search(query, k).await?;
        info!(matches = results.len(), "Supply-chain query complete");
        Ok(if results.is_empty() {
            Retrieval::NoMatches
        } else {
            Retrieval::Matches(results)
        })
    }
}

/// `supply_chain_retriever_tool`
pub struct SupplyChainRetrieverTool {
    retriever: SupplyChainRetriever,
    default_mode: RetrievalMode,
}

impl SupplyChainRetrieverTool {
    pub const NAME: &'static str = "supply_chain_retriever_tool";

    pub fn new(retriever: SupplyChainRetriever, default_mode: RetrievalMode) -> Self {
        Self {
            retriever,
            default_mode,
        }
    }

    pub fn from_config(store: Arc<dyn VectorStore>, config: &RetrievalConfig) -> Self {
        Self::new(
            SupplyChainRetriever::new(store),
            RetrievalMode::from_top_k(config.top_k),
        )
    }
}

#[async_trait]
impl Tool for SupplyChainRetrieverTool {
    async fn call(&self, input: Value) -> Result<String> {
        let query = query_argument(&input)?;
        let mode = optional_count(&input, "top_k")?.map_or(self.default_mode, RetrievalMode::from_top_k);

        let retrieval = self.retriever.query(&query, mode.k()).await?;
        Ok(format_retrieval(&retrieval, mode))
    }

    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Queries the company's internal supply chain database to find information about \
         suppliers, materials and locations. Input is a location or company name. Returns the \
         matching record and its 'Criticality Level'."
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({
                "query": schema::string("Location or company to look up, e.g. 'Hsinchu'"),
                "top_k": schema::integer("Number of matches to return (default 1)"),
            }),
            &["query"],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use supply_core::{Criticality, SegmentMetadata, TextSegment};
    use supply_index::{HashingEmbedder, IndexError, LocalVectorStore};

    fn segment(id: &str, content: &str, level: Criticality) -> TextSegment {
        TextSegment {
            content: content.to_string(),
            metadata: SegmentMetadata {
                source: SegmentMetadata::source_locator("materials.csv", id),
                material_id: id.to_string(),
                criticality_level: Some(level),
                supplier_resolved: true,
                ..SegmentMetadata::default()
            },
        }
    }

    async fn taiwan_store(dir: &std::path::Path) -> Arc<dyn VectorStore> {
        let store = LocalVectorStore::open(dir, Arc::new(HashingEmbedder::default()))
            .await
            .unwrap();
        store
            .upsert(vec![
                segment(
                    "M001",
                    "Material 'Cotton Fabric' (ID: M001) is a Low criticality component. It is supplied by 'Lion Eagle Ltd' (ID: S002) from Leeds, UK, which is in the Textiles industry.",
                    Criticality::Low,
                ),
                segment(
                    "M002",
                    "Material 'AX-12-PRO Microchip' (ID: M002) is a High criticality component. It is supplied by 'Apex Orion Corp' (ID: S001) from Hsinchu, Taiwan, which is in the Semiconductors industry.",
                    Criticality::High,
                ),
                segment(
                    "M003",
                    "Material 'Thermal Resin' (ID: M003) is a Medium criticality component. It is supplied by 'Green River Co' (ID: S003) from Recife, Brazil, which is in the Chemicals industry.",
                    Criticality::Medium,
                ),
            ])
            .await
            .unwrap();
        Arc::new(store)
    }

    struct BrokenStore;

    #[async_trait]
    impl VectorStore for BrokenStore {
        async fn upsert(&self, _segments: Vec<TextSegment>) -> supply_index::Result<usize> {
            Ok(0)
        }

        async fn similarity_search(&self, _query: &str, _k: usize) -> supply_index::Result<Vec<ScoredSegment>> {
            Err(IndexError::Embedding("model unavailable".to_string()))
        }

        async fn clear(&self) -> supply_index::Result<()> {
            Ok(())
        }

        async fn len(&self) -> usize {
            1
        }
    }

    #[test]
    fn test_mode_from_top_k() {
        assert_eq!(RetrievalMode::from_top_k(1), RetrievalMode::BestMatch);
        assert_eq!(RetrievalMode::from_top_k(3), RetrievalMode::Broad { k: 3 });
        assert_eq!(RetrievalMode::Broad { k: 3 }.k(), 3);
    }

    #[tokio::test]
    async fn test_taiwan_best_match_is_high() {
        let dir = tempfile::tempdir().unwrap();
        let tool = SupplyChainRetrieverTool::from_config(taiwan_store(dir.path()).await, &RetrievalConfig::default());

        let text = tool.call(json!({"query": "Taiwan"})).await.unwrap();
        assert!(text.starts_with("Found Match: Material 'AX-12-PRO Microchip' (ID: M002)"));
        assert!(text.ends_with("\nCriticality Level: High"));
    }

    #[tokio::test]
    async fn test_retriever_returns_matches_best_first() {
        let dir = tempfile::tempdir().unwrap();
        let retriever = SupplyChainRetriever::new(taiwan_store(dir.path()).await);

        let retrieval = retriever.query("Taiwan", 3).await.unwrap();
        assert_eq!(retrieval.matches().len(), 3);
        assert_eq!(retrieval.matches()[0].segment.metadata.material_id, "M002");
    }

    #[tokio::test]
    async fn test_top_k_override_is_broad() {
        let dir = tempfile::tempdir().unwrap();
        let tool = SupplyChainRetrieverTool::from_config(taiwan_store(dir.path()).await, &RetrievalConfig::default());

        let text = tool.call(json!({"query": "Taiwan", "top_k": 2})).await.unwrap();
        assert_eq!(text.split("\n\n").count(), 2);
        assert!(!text.contains("Criticality Level:"));
    }

    #[tokio::test]
    async fn test_empty_index_gives_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalVectorStore::open(dir.path().join("never-built"), Arc::new(HashingEmbedder::default()))
            .await
            .unwrap();
        let tool = SupplyChainRetrieverTool::from_config(Arc::new(store), &RetrievalConfig::default());

        let text = tool.call(json!("Hsinchu")).await.unwrap();
        assert_eq!(text, "No relevant information found in the supply chain database.");
    }

    #[tokio::test]
    async fn test_store_failure_is_error_not_sentinel() {
        let tool = SupplyChainRetrieverTool::new(
            SupplyChainRetriever::new(Arc::new(BrokenStore)),
            RetrievalMode::BestMatch,
        );
        let err = tool.call(json!("Hsinchu")).await.unwrap_err();
        assert!(err.to_string().contains("model unavailable"));
    }
}
