//! Application configuration
//!
//! Values are layered: built-in defaults, then an optional JSON file, then `.env` and
//! process environment variables. The CLI applies its flags last.

use crate::error::{Error, Result};
use crate::model::Criticality;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How a material whose supplier id matches no supplier is treated during enrichment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DanglingSupplierPolicy {
    /// Supplier fields render as empty strings
    #[default]
    Blank,
    /// Supplier fields render as `Unknown`
    Placeholder,
    /// The material is skipped
    Exclude,
}

impl FromStr for DanglingSupplierPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blank" => Ok(Self::Blank),
            "placeholder" => Ok(Self::Placeholder),
            "exclude" => Ok(Self::Exclude),
            other => Err(Error::Config(format!("unknown dangling supplier policy '{other}'"))),
        }
    }
}

/// What happens to an existing index when the pipeline runs again
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritePolicy {
    /// Add new entries after the existing ones. Reruns duplicate content.
    #[default]
    Append,
    /// Clear the store before writing
    Replace,
}

impl FromStr for WritePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "append" => Ok(Self::Append),
            "replace" => Ok(Self::Replace),
            other => Err(Error::Config(format!("unknown write policy '{other}'"))),
        }
    }
}

/// Embedding backend used by the index and the retriever
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingBackend {
    /// Offline feature hashing
    #[default]
    Hashing,
    /// OpenAI-compatible `/embeddings` endpoint
    OpenAi,
    /// all-MiniLM-L6-v2 run locally (requires the `local-embeddings` feature)
    MiniLm,
}

impl FromStr for EmbeddingBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "hashing" => Ok(Self::Hashing),
            "openai" | "open_ai" => Ok(Self::OpenAi),
            "minilm" | "mini_lm" => Ok(Self::MiniLm),
            other => Err(Error::Config(format!("unknown embedding backend '{other}'"))),
        }
    }
}

/// Decision strategy driving the agent loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Text ReAct prompt parsed for Action / Final Answer
    #[default]
    React,
    /// Native tool calls
    FunctionCalling,
}

impl FromStr for StrategyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "react" => Ok(Self::React),
            "function_calling" | "functions" | "tools" => Ok(Self::FunctionCalling),
            other => Err(Error::Config(format!("unknown strategy '{other}'"))),
        }
    }
}

/// Location of the CSV tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub data_dir: PathBuf,
    pub suppliers_file: String,
    pub materials_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            suppliers_file: "suppliers.csv".to_string(),
            materials_file: "materials.csv".to_string(),
        }
    }
}

impl DataConfig {
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn suppliers_path(&self) -> PathBuf {
        self.data_dir.join(&self.suppliers_file)
    }

    pub fn materials_path(&self) -> PathBuf {
        self.data_dir.join(&self.materials_file)
    }
}

/// Relative weights for drawing criticality levels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriticalityWeights {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
    pub critical: f64,
}

impl Default for CriticalityWeights {
    fn default() -> Self {
        Self {
            low: 0.3,
            medium: 0.4,
            high: 0.2,
            critical: 0.1,
        }
    }
}

impl CriticalityWeights {
    /// Weights in `Criticality::ALL` order
    pub fn as_array(&self) -> [f64; 4] {
        [self.low, self.medium, self.high, self.critical]
    }

    pub fn validate(&self) -> Result<()> {
        let weights = self.as_array();
        if let Some((level, w)) = Criticality::ALL
            .iter()
            .zip(weights)
            .find(|(_, w)| !w.is_finite() || *w < 0.0)
        {
            return Err(Error::Config(format!(
                "criticality weight for {level} must be a non-negative number, got {w}"
            )));
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(Error::Config("criticality weights must not all be zero".to_string()));
        }
        Ok(())
    }
}

/// Synthetic data generator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub supplier_count: usize,
    pub material_count: usize,
    /// Fixed seed for reproducible tables
    pub seed: Option<u64>,
    pub criticality_weights: CriticalityWeights,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            supplier_count: 1000,
            material_count: 1000,
            seed: None,
            criticality_weights: CriticalityWeights::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn with_counts(mut self, suppliers: usize, materials: usize) -> Self {
        self.supplier_count = suppliers;
        self.material_count = materials;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.supplier_count == 0 && self.material_count > 0 {
            return Err(Error::Config(
                "materials need at least one supplier to reference".to_string(),
            ));
        }
        self.criticality_weights.validate()
    }
}

/// Index build settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub db_dir: PathBuf,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub write_policy: WritePolicy,
    pub dangling_policy: DanglingSupplierPolicy,
    /// Segments embedded per call to the embedder
    pub batch_size: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            db_dir: PathBuf::from("db"),
            chunk_size: 500,
            chunk_overlap: 50,
            write_policy: WritePolicy::Append,
            dangling_policy: DanglingSupplierPolicy::Blank,
            batch_size: 64,
        }
    }
}

impl IndexConfig {
    pub fn with_db_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.db_dir = dir.into();
        self
    }

    pub fn with_write_policy(mut self, policy: WritePolicy) -> Self {
        self.write_policy = policy;
        self
    }

    pub fn with_dangling_policy(mut self, policy: DanglingSupplierPolicy) -> Self {
        self.dangling_policy = policy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::Config("chunk_size must be greater than 0".to_string()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.batch_size == 0 {
            return Err(Error::Config("batch_size must be greater than 0".to_string()));
        }
        Ok(())
    }
}

/// Embedding model settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub backend: EmbeddingBackend,
    /// Hugging Face model id for the local backend
    pub local_model: String,
    /// Model name sent to the remote endpoint
    pub remote_model: String,
    /// Output dimension of the hashing backend
    pub dimension: usize,
    pub api_base: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::Hashing,
            local_model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            remote_model: "text-embedding-3-small".to_string(),
            dimension: 384,
            api_base: "https://api.openai.com/v1".to_string(),
            api_key: None,
            timeout_secs: 60,
        }
    }
}

impl EmbeddingConfig {
    pub fn with_backend(mut self, backend: EmbeddingBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.dimension == 0 {
            return Err(Error::Config("embedding dimension must be greater than 0".to_string()));
        }
        if self.backend == EmbeddingBackend::OpenAi && self.api_key.is_none() {
            return Err(Error::Config(
                "OPENAI_API_KEY is required for the openai embedding backend".to_string(),
            ));
        }
        Ok(())
    }
}

/// News search settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub endpoint: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub language: String,
    pub max_results: usize,
    pub requests_per_minute: u32,
    pub timeout_secs: u64,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://gnews.io/api/v4/search".to_string(),
            api_key: None,
            language: "en".to_string(),
            max_results: 10,
            requests_per_minute: 60,
            timeout_secs: 30,
        }
    }
}

impl NewsConfig {
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.max_results) {
            return Err(Error::Config(format!(
                "news max_results must be between 1 and 100, got {}",
                self.max_results
            )));
        }
        if self.requests_per_minute == 0 {
            return Err(Error::Config("requests_per_minute must be greater than 0".to_string()));
        }
        Ok(())
    }
}

/// Supply-chain retriever settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of matches requested per query. `1` selects the best-match format.
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 1 }
    }
}

/// Language model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_base: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: "https://openrouter.ai/api/v1".to_string(),
            api_key: None,
            model: "mistralai/mistral-7b-instruct:free".to_string(),
            temperature: 0.0,
            max_tokens: 1024,
            timeout_secs: 120,
        }
    }
}

/// Agent loop settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub max_iterations: usize,
    pub strategy: StrategyKind,
    /// Query the master task asks the agent to scan news for
    pub news_query: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: 15,
            strategy: StrategyKind::React,
            news_query: "Taiwan semiconductor".to_string(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub generator: GeneratorConfig,
    pub index: IndexConfig,
    pub embedding: EmbeddingConfig,
    pub news: NewsConfig,
    pub retrieval: RetrievalConfig,
    pub llm: LlmConfig,
    pub agent: AgentConfig,
}

impl AppConfig {
    /// Load defaults, an optional JSON file, then `.env` and environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Ok(env_path) = dotenvy::dotenv() {
            tracing::debug!(path = %env_path.display(), "Loaded .env file");
        }
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read a JSON configuration file. Missing sections keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            Error::Config(format!("invalid config file {}: {e}", path.display()))
        })
    }

    /// Apply overrides from an environment-like lookup. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("GNEWS_API_KEY") {
            self.news.api_key = Some(key);
        }
        if let Some(base) = get("OPENROUTER_API_BASE") {
            self.llm.api_base = base;
        }
        if let Some(key) = get("OPENROUTER_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(model) = get("SUPPLY_LLM_MODEL") {
            self.llm.model = model;
        }
        if let Some(dir) = get("SUPPLY_DATA_DIR") {
            self.data.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get("SUPPLY_DB_DIR") {
            self.index.db_dir = PathBuf::from(dir);
        }
        if let Some(backend) = get("SUPPLY_EMBEDDING_BACKEND") {
            self.embedding.backend = backend.parse()?;
        }
        if let Some(key) = get("OPENAI_API_KEY") {
            self.embedding.api_key = Some(key);
        }
        if let Some(base) = get("OPENAI_API_BASE") {
            self.embedding.api_base = base;
        }
        Ok(())
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.generator.validate()?;
        self.index.validate()?;
        self.embedding.validate()?;
        self.news.validate()?;
        if self.retrieval.top_k == 0 {
            return Err(Error::Config("top_k must be greater than 0".to_string()));
        }
        if self.agent.max_iterations == 0 {
            return Err(Error::Config("max_iterations must be greater than 0".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults_match_original_constants() {
        let config = AppConfig::default();
        assert_eq!(config.data.data_dir, PathBuf::from("data"));
        assert_eq!(config.index.db_dir, PathBuf::from("db"));
        assert_eq!(config.index.chunk_size, 500);
        assert_eq!(config.index.chunk_overlap, 50);
        assert_eq!(config.llm.model, "mistralai/mistral-7b-instruct:free");
        assert!(config.llm.temperature.abs() < f32::EPSILON);
        assert_eq!(config.agent.max_iterations, 15);
        assert_eq!(config.retrieval.top_k, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"index": {{"chunk_size": 200, "write_policy": "replace"}}}}"#).unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.index.chunk_size, 200);
        assert_eq!(config.index.chunk_overlap, 50);
        assert_eq!(config.index.write_policy, WritePolicy::Replace);
        assert_eq!(config.news.max_results, 10);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("GNEWS_API_KEY", "news-key"),
            ("OPENROUTER_API_KEY", "llm-key"),
            ("SUPPLY_DB_DIR", "/tmp/index"),
            ("SUPPLY_EMBEDDING_BACKEND", "hashing"),
            ("SUPPLY_LLM_MODEL", "  "),
        ]);
        let mut config = AppConfig::default();
        config
            .apply_env(|key| env.get(key).map(|v| (*v).to_string()))
            .unwrap();

        assert_eq!(config.news.api_key.as_deref(), Some("news-key"));
        assert_eq!(config.llm.api_key.as_deref(), Some("llm-key"));
        assert_eq!(config.index.db_dir, PathBuf::from("/tmp/index"));
        assert_eq!(config.llm.model, "mistralai/mistral-7b-instruct:free");
    }

    #[test]
    fn test_bad_backend_in_env_is_rejected() {
        let mut config = AppConfig::default();
        let result = config.apply_env(|key| {
            (key == "SUPPLY_EMBEDDING_BACKEND").then(|| "word2vec".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_index_validation() {
        let mut index = IndexConfig::default();
        index.chunk_overlap = 500;
        assert!(index.validate().is_err());
        index.chunk_overlap = 0;
        index.chunk_size = 0;
        assert!(index.validate().is_err());
    }

    #[test]
    fn test_weight_validation() {
        let mut weights = CriticalityWeights::default();
        assert!(weights.validate().is_ok());
        weights.high = -1.0;
        assert!(weights.validate().is_err());
        let zero = CriticalityWeights {
            low: 0.0,
            medium: 0.0,
            high: 0.0,
            critical: 0.0,
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_openai_embedding_requires_key() {
        let config = EmbeddingConfig::default().with_backend(EmbeddingBackend::OpenAi);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!(
            "Placeholder".parse::<DanglingSupplierPolicy>().unwrap(),
            DanglingSupplierPolicy::Placeholder
        );
        assert_eq!("replace".parse::<WritePolicy>().unwrap(), WritePolicy::Replace);
        assert_eq!(
            "function-calling".parse::<StrategyKind>().unwrap(),
            StrategyKind::FunctionCalling
        );
        assert!("sometimes".parse::<WritePolicy>().is_err());
    }
}
