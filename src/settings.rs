//! Typed view of the metadata a collection is created with.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Serialize;

use crate::chroma_client_trait::Metadata;
use crate::constants::{META_DISTANCE, META_EMBEDDING_MODEL, META_EMBEDDING_PROVIDER};

/// Similarity function used for nearest-neighbour comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Squared Euclidean distance
    #[default]
    L2,
    /// Inner product
    Ip,
    /// Cosine distance
    Cosine,
}

impl DistanceMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceMetric::L2 => "l2",
            DistanceMetric::Ip => "ip",
            DistanceMetric::Cosine => "cosine",
        }
    }

    /// Reads the metric tag from collection metadata. Collections without a
    /// recognised tag use `l2`, matching the server default.
    pub fn from_metadata(metadata: &Metadata) -> Self {
        metadata
            .get(META_DISTANCE)
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "l2" => Ok(DistanceMetric::L2),
            "ip" => Ok(DistanceMetric::Ip),
            "cosine" => Ok(DistanceMetric::Cosine),
            other => Err(format!("unknown distance metric '{}'", other)),
        }
    }
}

/// Embedding provider a collection is tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    Openai,
    Cohere,
    Huggingface,
    Azure,
}

impl EmbeddingProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbeddingProvider::Openai => "openai",
            EmbeddingProvider::Cohere => "cohere",
            EmbeddingProvider::Huggingface => "huggingface",
            EmbeddingProvider::Azure => "azure",
        }
    }
}

impl fmt::Display for EmbeddingProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings chosen at `create` time.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CollectionSettings {
    pub distance: DistanceMetric,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding_provider: Option<EmbeddingProvider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding_model: Option<String>,
}

impl CollectionSettings {
    /// Metadata sent to the server. The distance key is always present; provider and
    /// model only when set.
    pub fn to_metadata(&self) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert(META_DISTANCE.to_string(), self.distance.as_str().into());
        if let Some(provider) = self.embedding_provider {
            metadata.insert(META_EMBEDDING_PROVIDER.to_string(), provider.as_str().into());
        }
        if let Some(model) = &self.embedding_model {
            metadata.insert(META_EMBEDDING_MODEL.to_string(), model.clone().into());
        }
        metadata
    }
}
