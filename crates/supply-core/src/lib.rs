//! Core types for the supply-chain risk analyst
//!
//! This crate defines the domain records, the shared error type, the application
//! configuration and the tracing setup used throughout the workspace.

pub mod config;
pub mod error;
pub mod logging;
pub mod model;

pub use config::{
    AgentConfig, AppConfig, CriticalityWeights, DanglingSupplierPolicy, DataConfig,
    EmbeddingBackend, EmbeddingConfig, GeneratorConfig, IndexConfig, LlmConfig, NewsConfig,
    RetrievalConfig, StrategyKind, WritePolicy,
};
pub use error::{Error, Result};
pub use logging::init_tracing;
pub use model::{
    Criticality, EnrichedDocument, Material, ParseCriticalityError, ScoredSegment,
    SegmentMetadata, Supplier, TextSegment,
};
