//! Load, join, split and index in one pass

use crate::enrich::{Enrichment, enrich};
use crate::error::Result;
use crate::loader::{load_materials, load_suppliers};
use crate::splitter::TextSplitter;
use crate::store::VectorStore;
use std::sync::Arc;
use supply_core::{DataConfig, IndexConfig, TextSegment, WritePolicy};
use tracing::{info, instrument, warn};

/// Counts from one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub suppliers_read: usize,
    pub materials_read: usize,
    pub documents: usize,
    pub dangling: usize,
    pub excluded: usize,
    pub segments_indexed: usize,
    /// Entries in the store after the run
    pub total_entries: usize,
    pub write_policy: WritePolicy,
}

/// Builds the vector index from the CSV tables
pub struct IndexPipeline {
    config: IndexConfig,
    splitter: TextSplitter,
    store: Arc<dyn VectorStore>,
}

impl IndexPipeline {
    pub fn new(config: IndexConfig, store: Arc<dyn VectorStore>) -> Result<Self> {
        config.validate()?;
        let splitter = TextSplitter::from_config(&config)?;
        Ok(Self {
            config,
            splitter,
            store,
        })
    }

    /// Read both tables and produce the segments to index, without touching the store
    pub fn prepare(&self, data: &DataConfig) -> Result<(Vec<TextSegment>, PreparedCounts)> {
        let suppliers = load_suppliers(&data.suppliers_path())?;
        let materials = load_materials(&data.materials_path())?;

        let Enrichment {
            documents,
            dangling,
            excluded,
        } = enrich(
            &materials,
            &suppliers,
            self.config.dangling_policy,
            &data.materials_file,
        );
        if dangling > 0 {
            warn!(dangling, policy = ?self.config.dangling_policy, "Materials reference unknown suppliers");
        }

        let segments: Vec<TextSegment> = documents
            .iter()
            .flat_map(|doc| self.splitter.split_document(doc))
            .collect();

        let counts = PreparedCounts {
            suppliers_read: suppliers.len(),
            materials_read: materials.len(),
            documents: documents.len(),
            dangling,
            excluded,
        };
        Ok((segments, counts))
    }

    /// Run the full pipeline and write to the store according to the write policy
    #[instrument(skip(self, data), fields(data_dir = %data.data_dir.display(), policy = ?self.config.write_policy))]
    pub async fn build(&self, data: &DataConfig) -> Result<BuildReport> {
        let (segments, counts) = self.prepare(data)?;

        if self.config.write_policy == WritePolicy::Replace {
            self.store.clear().await?;
        }

        let mut segments_indexed = 0;
        let mut remaining = segments.into_iter().peekable();
        while remaining.peek().is_some() {
            let batch: Vec<TextSegment> = remaining.by_ref().take(self.config.batch_size).collect();
            segments_indexed += self.store.upsert(batch).await?;
        }

        let report = BuildReport {
            suppliers_read: counts.suppliers_read,
            materials_read: counts.materials_read,
            documents: counts.documents,
            dangling: counts.dangling,
            excluded: counts.excluded,
            segments_indexed,
            total_entries: self.store.len().await,
            write_policy: self.config.write_policy,
        };
        info!(
            documents = report.documents,
            segments = report.segments_indexed,
            total = report.total_entries,
            "Index build complete"
        );
        Ok(report)
    }
}

/// Counts gathered before anything is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreparedCounts {
    pub suppliers_read: usize,
    pub materials_read: usize,
    pub documents: usize,
    pub dangling: usize,
    pub excluded: usize,
}
