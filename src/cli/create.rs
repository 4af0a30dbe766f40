use clap::Args;
use serde::Serialize;

use crate::chroma_client_trait::ChromaClientTrait;
use crate::error::Result;
use crate::settings::{CollectionSettings, DistanceMetric, EmbeddingProvider};

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Name of the collection to create
    pub name: String,

    /// Distance metric
    #[arg(long, value_enum, default_value_t = DistanceMetric::L2)]
    pub distance: DistanceMetric,

    /// Embedding model provider recorded on the collection
    #[arg(long, value_enum)]
    pub embedding_provider: Option<EmbeddingProvider>,

    /// Specific embedding model recorded on the collection
    #[arg(long)]
    pub embedding_model: Option<String>,
}

impl CreateArgs {
    pub fn settings(&self) -> CollectionSettings {
        CollectionSettings {
            distance: self.distance,
            embedding_provider: self.embedding_provider,
            embedding_model: self.embedding_model.clone(),
        }
    }
}

/// A collection that was just created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedCollection {
    pub name: String,
    pub id: String,
    #[serde(flatten)]
    pub settings: CollectionSettings,
}

/// Handles the `create` command.
pub async fn handle_create(
    args: &CreateArgs,
    client: &dyn ChromaClientTrait,
) -> Result<CreatedCollection> {
    let settings = args.settings();
    log::info!("Creating collection '{}' with settings {:?}", args.name, settings);

    let collection = client
        .create_collection(&args.name, settings.to_metadata())
        .await?;

    log::debug!("Created collection '{}' with id {}", collection.name, collection.id);
    Ok(CreatedCollection {
        name: collection.name,
        id: collection.id,
        settings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chroma_client_trait::{CollectionRef, MockChromaClientTrait};
    use crate::constants::{META_DISTANCE, META_EMBEDDING_MODEL, META_EMBEDDING_PROVIDER};
    use crate::error::ChromaBenchError;
    use serde_json::json;

    fn args(name: &str) -> CreateArgs {
        CreateArgs {
            name: name.to_string(),
            distance: DistanceMetric::Cosine,
            embedding_provider: None,
            embedding_model: None,
        }
    }

    #[tokio::test]
    async fn test_create_sends_only_distance_by_default() {
        let mut mock = MockChromaClientTrait::new();
        mock.expect_create_collection()
            .withf(|name, metadata| {
                name == "foo"
                    && metadata.len() == 1
                    && metadata.get(META_DISTANCE) == Some(&json!("cosine"))
            })
            .times(1)
            .returning(|name, metadata| {
                Ok(CollectionRef {
                    id: "id-1".to_string(),
                    name: name.to_string(),
                    metadata,
                })
            });

        let created = handle_create(&args("foo"), &mock).await.unwrap();
        assert_eq!(created.name, "foo");
        assert_eq!(created.id, "id-1");
        assert_eq!(created.settings.distance, DistanceMetric::Cosine);
        assert!(created.settings.embedding_provider.is_none());
    }

    #[tokio::test]
    async fn test_create_with_provider_and_model() {
        let mut mock = MockChromaClientTrait::new();
        mock.expect_create_collection()
            .withf(|_, metadata| {
                metadata.get(META_EMBEDDING_PROVIDER) == Some(&json!("cohere"))
                    && metadata.get(META_EMBEDDING_MODEL) == Some(&json!("embed-english-v3.0"))
            })
            .times(1)
            .returning(|name, metadata| {
                Ok(CollectionRef {
                    id: "id-2".to_string(),
                    name: name.to_string(),
                    metadata,
                })
            });

        let mut create_args = args("bar");
        create_args.embedding_provider = Some(EmbeddingProvider::Cohere);
        create_args.embedding_model = Some("embed-english-v3.0".to_string());

        let created = handle_create(&create_args, &mock).await.unwrap();
        assert_eq!(created.settings.embedding_provider, Some(EmbeddingProvider::Cohere));
        assert_eq!(created.settings.embedding_model.as_deref(), Some("embed-english-v3.0"));
    }

    #[tokio::test]
    async fn test_create_propagates_collaborator_error() {
        let mut mock = MockChromaClientTrait::new();
        mock.expect_create_collection()
            .returning(|name, _| Err(ChromaBenchError::CollectionExists(name.to_string())));

        let err = handle_create(&args("foo"), &mock).await.unwrap_err();
        assert_eq!(err.to_string(), "Collection foo already exists.");
    }
}
