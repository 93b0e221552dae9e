//! Tools the risk analyst agent can call
//!
//! Two tools are provided, both returning plain text for the model to read:
//!
//! - [`NewsScanTool`] (`news_scanner_tool`) lists recent headlines for a query
//! - [`SupplyChainRetrieverTool`] (`supply_chain_retriever_tool`) looks a location or
//!   company up in the supply-chain index and reports the matched material's criticality
//!
//! Tools are collected in a [`ToolRegistry`], which the agent executor dispatches through.

pub mod error;
pub mod format;
pub mod news;
pub mod registry;
pub mod retriever;
pub mod tool;

pub use error::NewsError;
pub use format::{NO_NEWS_FOUND, NO_SUPPLY_MATCH};
pub use news::{GNewsClient, NewsArticle, NewsScanTool, NewsScanner, NewsSource};
pub use registry::ToolRegistry;
pub use retriever::{Retrieval, RetrievalMode, SupplyChainRetriever, SupplyChainRetrieverTool};
pub use tool::Tool;
