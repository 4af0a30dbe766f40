//! Local persistent store used when no server is configured.
//!
//! Every collection lives in its own JSON file under the storage root. Files are
//! replaced atomically on every write, so an interrupted command never leaves a
//! half-written collection behind. This backend never touches the network.

use std::cmp::Ordering;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use uuid::Uuid;

use crate::chroma_client_trait::{ChromaClientTrait, CollectionRef, Metadata, QueryHit, Record};
use crate::client::embedding::{distance, HashingEmbedder};
use crate::error::{ChromaBenchError, Result};
use crate::settings::DistanceMetric;

const COLLECTION_FILE_EXT: &str = "json";
const MIN_NAME_LEN: usize = 3;
const MAX_NAME_LEN: usize = 63;

#[derive(Debug, Serialize, Deserialize)]
struct StoredCollection {
    id: String,
    name: String,
    #[serde(default)]
    metadata: Metadata,
    #[serde(default)]
    records: Vec<StoredRecord>,
}

impl StoredCollection {
    fn to_ref(&self) -> CollectionRef {
        CollectionRef {
            id: self.id.clone(),
            name: self.name.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    document: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Metadata>,
    embedding: Vec<f32>,
}

/// File-backed [`ChromaClientTrait`] implementation.
#[derive(Debug, Clone)]
pub struct LocalChromaClient {
    root: PathBuf,
    embedder: HashingEmbedder,
}

impl LocalChromaClient {
    /// Binds the store to `root`. Nothing is created on disk until the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            embedder: HashingEmbedder::default(),
        }
    }

    /// Appends records to a collection. Records without an embedding are embedded
    /// from their document text.
    pub fn add(&self, name: &str, records: Vec<Record>) -> Result<()> {
        let mut collection = self.load(name)?;

        for record in records {
            if collection.records.iter().any(|r| r.id == record.id) {
                return Err(ChromaBenchError::InvalidArgument(format!(
                    "record id '{}' already exists in collection {}",
                    record.id, name
                )));
            }

            let embedding = match (record.embedding, &record.document) {
                (Some(embedding), _) => embedding,
                (None, Some(document)) => self.embedder.embed(document),
                (None, None) => {
                    return Err(ChromaBenchError::InvalidArgument(format!(
                        "record '{}' needs a document or an embedding",
                        record.id
                    )))
                }
            };

            if let Some(existing) = collection.records.first() {
                if existing.embedding.len() != embedding.len() {
                    return Err(ChromaBenchError::InvalidArgument(format!(
                        "embedding dimension {} does not match collection dimension {}",
                        embedding.len(),
                        existing.embedding.len()
                    )));
                }
            }

            collection.records.push(StoredRecord {
                id: record.id,
                document: record.document,
                metadata: record.metadata,
                embedding,
            });
        }

        self.save(&collection)
    }

    fn collection_path(&self, name: &str) -> Result<PathBuf> {
        validate_collection_name(name)?;
        Ok(self.root.join(format!("{}.{}", name, COLLECTION_FILE_EXT)))
    }

    fn load(&self, name: &str) -> Result<StoredCollection> {
        let path = self.collection_path(name)?;
        if !path.is_file() {
            return Err(ChromaBenchError::CollectionNotFound(name.to_string()));
        }
        read_collection(&path)
    }

    fn save(&self, collection: &StoredCollection) -> Result<()> {
        let path = self.collection_path(&collection.name)?;
        fs::create_dir_all(&self.root)?;

        let mut tmp = NamedTempFile::new_in(&self.root)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, collection)?;
            writer.flush()?;
        }
        tmp.persist(&path).map_err(|e| e.error)?;
        log::debug!("Wrote collection '{}' to {}", collection.name, path.display());
        Ok(())
    }
}

#[async_trait]
impl ChromaClientTrait for LocalChromaClient {
    async fn create_collection(&self, name: &str, metadata: Metadata) -> Result<CollectionRef> {
        let path = self.collection_path(name)?;
        if path.exists() {
            return Err(ChromaBenchError::CollectionExists(name.to_string()));
        }

        let collection = StoredCollection {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            metadata,
            records: Vec::new(),
        };
        self.save(&collection)?;
        Ok(collection.to_ref())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        let path = self.collection_path(name)?;
        if !path.is_file() {
            return Err(ChromaBenchError::CollectionNotFound(name.to_string()));
        }
        fs::remove_file(&path)?;
        Ok(())
    }

    async fn list_collections(&self) -> Result<Vec<CollectionRef>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut collections = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            let is_collection_file = path.is_file()
                && path.extension().and_then(|e| e.to_str()) == Some(COLLECTION_FILE_EXT);
            if !is_collection_file {
                continue;
            }
            match read_collection(&path) {
                Ok(collection) => collections.push(collection.to_ref()),
                Err(e) => log::warn!("Skipping unreadable collection file {}: {}", path.display(), e),
            }
        }
        collections.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(collections)
    }

    async fn get_collection(&self, name: &str) -> Result<CollectionRef> {
        Ok(self.load(name)?.to_ref())
    }

    async fn count(&self, collection: &CollectionRef) -> Result<u64> {
        Ok(self.load(&collection.name)?.records.len() as u64)
    }

    async fn get(&self, collection: &CollectionRef, limit: u32) -> Result<Vec<Record>> {
        let stored = self.load(&collection.name)?;
        Ok(stored
            .records
            .into_iter()
            .take(limit as usize)
            .map(|r| Record {
                id: r.id,
                document: r.document,
                metadata: r.metadata,
                embedding: Some(r.embedding),
            })
            .collect())
    }

    async fn query(
        &self,
        collection: &CollectionRef,
        query_text: &str,
        n_results: u32,
    ) -> Result<Vec<QueryHit>> {
        let stored = self.load(&collection.name)?;
        if stored.records.is_empty() {
            return Ok(Vec::new());
        }

        let metric = DistanceMetric::from_metadata(&stored.metadata);
        let query_embedding = self.embedder.embed(query_text);

        let mut hits = Vec::with_capacity(stored.records.len());
        for record in stored.records {
            if record.embedding.len() != query_embedding.len() {
                return Err(ChromaBenchError::InvalidArgument(format!(
                    "collection {} stores {}-dimensional embeddings, query has {}",
                    collection.name,
                    record.embedding.len(),
                    query_embedding.len()
                )));
            }
            hits.push(QueryHit {
                distance: distance(metric, &query_embedding, &record.embedding),
                id: record.id,
                document: record.document,
                metadata: record.metadata,
            });
        }

        // Stable sort: ties keep insertion order.
        hits.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
        hits.truncate(n_results as usize);
        Ok(hits)
    }
}

/// Applies Chroma's collection naming rules.
pub fn validate_collection_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| {
        Err(ChromaBenchError::InvalidCollectionName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    let len = name.chars().count();
    if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
        return invalid("must be between 3 and 63 characters long");
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return invalid("may only contain letters, digits, '.', '_' and '-'");
    }
    let starts_ok = name.chars().next().is_some_and(|c| c.is_ascii_alphanumeric());
    let ends_ok = name.chars().last().is_some_and(|c| c.is_ascii_alphanumeric());
    if !starts_ok || !ends_ok {
        return invalid("must start and end with a letter or digit");
    }
    if name.contains("..") {
        return invalid("must not contain two consecutive periods");
    }
    Ok(())
}

fn read_collection(path: &Path) -> Result<StoredCollection> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
