//! Enrichment pipeline and vector index
//!
//! Turns the supplier and material tables into self-contained text segments and
//! persists them, with their metadata, in a local similarity index:
//!
//! 1. [`loader`] reads both CSV files
//! 2. [`enrich`] left-joins materials to suppliers and renders one sentence per material
//! 3. [`splitter`] bounds each sentence into overlapping segments
//! 4. [`store`] embeds and persists the segments, then answers similarity queries
//!
//! [`pipeline::IndexPipeline`] runs steps 1 to 4 in order.

pub mod embedding;
pub mod enrich;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod splitter;
pub mod store;

pub use embedding::{Embedder, HashingEmbedder, OpenAiEmbedder, build_embedder};
#[cfg(feature = "local-embeddings")]
pub use embedding::MiniLmEmbedder;
pub use enrich::{Enrichment, enrich, render_description};
pub use error::{IndexError, Result};
pub use loader::{load_materials, load_suppliers};
pub use pipeline::{BuildReport, IndexPipeline};
pub use splitter::TextSplitter;
pub use store::{LocalVectorStore, VectorStore, cosine_similarity};
