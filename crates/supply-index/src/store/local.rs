//! JSON-file vector store with brute-force cosine search

use super::{VectorStore, cosine_similarity};
use crate::embedding::Embedder;
use crate::error::{IndexError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use supply_core::{ScoredSegment, SegmentMetadata, TextSegment};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// File name of the persisted index inside the store directory
pub const INDEX_FILE: &str = "index.json";

const FORMAT_VERSION: u32 = 1;

/// One stored segment with its vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: Uuid,
    pub content: String,
    pub metadata: SegmentMetadata,
    pub vector: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct IndexFile {
    version: u32,
    embedder: String,
    dimension: usize,
    entries: Vec<IndexEntry>,
}

#[derive(Debug, Serialize)]
struct IndexFileRef<'a> {
    version: u32,
    embedder: &'a str,
    dimension: usize,
    updated_at: DateTime<Utc>,
    entries: &'a [IndexEntry],
}

/// Vector store persisted as `<dir>/index.json`.
///
/// The whole index is held in memory; every write rewrites the file through a
/// temporary file and a rename.
pub struct LocalVectorStore {
    dir: PathBuf,
    embedder: Arc<dyn Embedder>,
    entries: RwLock<Vec<IndexEntry>>,
}

impl LocalVectorStore {
    /// Open the index in `dir`. A directory without an index opens as an empty store.
    pub async fn open(dir: impl Into<PathBuf>, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let dir = dir.into();
        let path = dir.join(INDEX_FILE);

        let entries = if tokio::fs::try_exists(&path).await? {
            let raw = tokio::fs::read(&path).await?;
            let file: IndexFile = serde_json::from_slice(&raw)?;
            check_compatible(&path, &file, embedder.as_ref())?;
            info!(path = %path.display(), entries = file.entries.len(), "Opened vector index");
            file.entries
        } else {
            debug!(path = %path.display(), "No index found, starting empty");
            Vec::new()
        };

        Ok(Self {
            dir,
            embedder,
            entries: RwLock::new(entries),
        })
    }

    pub fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE)
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    /// Snapshot of the stored entries in insertion order
    pub async fn entries(&self) -> Vec<IndexEntry> {
        self.entries.read().await.clone()
    }

    async fn persist(&self, entries: &[IndexEntry]) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let name = self.embedder.name();
        let file = IndexFileRef {
            version: FORMAT_VERSION,
            embedder: &name,
            dimension: self.embedder.dimension(),
            updated_at: Utc::now(),
            entries,
        };
        let bytes = serde_json::to_vec(&file)?;

        let path = self.index_path();
        let tmp = self.dir.join(format!("{INDEX_FILE}.tmp"));
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!(path = %path.display(), entries = entries.len(), "Persisted vector index");
        Ok(())
    }
}

fn check_compatible(path: &Path, file: &IndexFile, embedder: &dyn Embedder) -> Result<()> {
    let incompatible = |reason: String| IndexError::Incompatible {
        path: path.to_path_buf(),
        reason,
    };

    if file.version != FORMAT_VERSION {
        return Err(incompatible(format!(
            "format version {} is not supported",
            file.version
        )));
    }
    if file.embedder != embedder.name() || file.dimension != embedder.dimension() {
        return Err(incompatible(format!(
            "built with {} ({} dims), opened with {} ({} dims)",
            file.embedder,
            file.dimension,
            embedder.name(),
            embedder.dimension()
        )));
    }
    Ok(())
}

#[async_trait]
impl VectorStore for LocalVectorStore {
    async fn upsert(&self, segments: Vec<TextSegment>) -> Result<usize> {
        if segments.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = segments.iter().map(|s| s.content.clone()).collect();
        let vectors = self.embedder.embed(&texts).await?;
        if vectors.len() != segments.len() {
            return Err(IndexError::Embedding(format!(
                "embedder returned {} vectors for {} texts",
                vectors.len(),
                segments.len()
            )));
        }
        let dimension = self.embedder.dimension();
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
            return Err(IndexError::Embedding(format!(
                "expected {dimension}-dimensional vectors, got {}",
                bad.len()
            )));
        }

        let added = segments.len();
        let mut entries = self.entries.write().await;
        // Visible only once the file holds them
        let mut updated = entries.clone();
        updated.extend(segments.into_iter().zip(vectors).map(|(segment, vector)| IndexEntry {
            id: Uuid::new_v4(),
            content: segment.content,
            metadata: segment.metadata,
            vector,
        }));
        self.persist(&updated).await?;
        *entries = updated;

        debug!(added, total = entries.len(), "Upserted segments");
        Ok(added)
    }

    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<ScoredSegment>> {
        let entries = self.entries.read().await;
        if entries.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let query_vector = self
            .embedder
            .embed(&[query.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| IndexError::Embedding("no vector returned for query".to_string()))?;

        let mut scored: Vec<(f32, &IndexEntry)> = entries
            .iter()
            .map(|entry| (cosine_similarity(&query_vector, &entry.vector), entry))
            .collect();
        // Stable sort keeps insertion order among equal scores
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(score, entry)| ScoredSegment {
                segment: TextSegment {
                    content: entry.content.clone(),
                    metadata: entry.metadata.clone(),
                },
                score,
            })
            .collect())
    }

    async fn clear(&self) -> Result<()> {
        let mut entries = self.entries.write().await;
        self.persist(&[]).await?;
        entries.clear();
        info!(path = %self.index_path().display(), "Cleared vector index");
        Ok(())
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
