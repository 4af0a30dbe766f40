use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::constants::META_DISTANCE;
use crate::error::Result;

/// Free-form metadata attached to collections and records.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A collection as reported by the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionRef {
    /// Server-assigned identifier, used to address the collection's records.
    pub id: String,
    /// Unique, user-facing name.
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub metadata: Metadata,
}

impl CollectionRef {
    /// Distance metric tag, if the collection carries one.
    pub fn distance(&self) -> Option<&str> {
        self.metadata.get(META_DISTANCE).and_then(|v| v.as_str())
    }
}

/// A stored document as returned by `get`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

/// A single nearest-neighbour match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryHit {
    pub id: String,
    pub distance: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

// Use mockall::automock for automatic mock generation in tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChromaClientTrait: Send + Sync {
    async fn create_collection(&self, name: &str, metadata: Metadata) -> Result<CollectionRef>;
    async fn delete_collection(&self, name: &str) -> Result<()>;
    async fn list_collections(&self) -> Result<Vec<CollectionRef>>;
    async fn get_collection(&self, name: &str) -> Result<CollectionRef>;
    async fn count(&self, collection: &CollectionRef) -> Result<u64>;
    async fn get(&self, collection: &CollectionRef, limit: u32) -> Result<Vec<Record>>;
    async fn query(
        &self,
        collection: &CollectionRef,
        query_text: &str,
        n_results: u32,
    ) -> Result<Vec<QueryHit>>;
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Metadata, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Metadata>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collection_ref_null_metadata() {
        let col: CollectionRef =
            serde_json::from_value(json!({"id": "abc", "name": "docs", "metadata": null})).unwrap();
        assert!(col.metadata.is_empty());
        assert_eq!(col.distance(), None);
    }

    #[test]
    fn test_collection_ref_distance() {
        let col: CollectionRef = serde_json::from_value(json!({
            "id": "abc",
            "name": "docs",
            "metadata": {"hnsw:space": "cosine"},
            "tenant": "default_tenant"
        }))
        .unwrap();
        assert_eq!(col.distance(), Some("cosine"));
    }
}
