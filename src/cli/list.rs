use clap::Args;
use serde::Serialize;

use crate::chroma_client_trait::ChromaClientTrait;
use crate::error::Result;

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    // No arguments needed for list currently
}

/// One row of the `list` output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionSummary {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionList {
    pub collections: Vec<CollectionSummary>,
}

/// Handles the `list` command: enumerates collections, then counts each one in turn.
pub async fn handle_list(args: &ListArgs, client: &dyn ChromaClientTrait) -> Result<CollectionList> {
    log::info!("Starting list process...");
    log::debug!("ListArgs: {:?}", args);

    let collections = client.list_collections().await?;
    log::debug!("Server reported {} collections", collections.len());

    let mut summaries = Vec::with_capacity(collections.len());
    for collection in &collections {
        let count = client.count(collection).await?;
        summaries.push(CollectionSummary {
            name: collection.name.clone(),
            count,
        });
    }

    log::info!("List process finished successfully.");
    Ok(CollectionList {
        collections: summaries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chroma_client_trait::{CollectionRef, Metadata, MockChromaClientTrait};
    use crate::error::ChromaBenchError;

    fn collection(name: &str) -> CollectionRef {
        CollectionRef {
            id: format!("id-{name}"),
            name: name.to_string(),
            metadata: Metadata::new(),
        }
    }

    #[tokio::test]
    async fn test_list_counts_each_collection() {
        let mut mock = MockChromaClientTrait::new();
        mock.expect_list_collections()
            .times(1)
            .returning(|| Ok(vec![collection("alpha"), collection("beta")]));
        mock.expect_count()
            .times(2)
            .returning(|c| Ok(if c.name == "alpha" { 0 } else { 42 }));

        let list = handle_list(&ListArgs {}, &mock).await.unwrap();
        assert_eq!(
            list.collections,
            vec![
                CollectionSummary { name: "alpha".to_string(), count: 0 },
                CollectionSummary { name: "beta".to_string(), count: 42 },
            ]
        );
    }

    #[tokio::test]
    async fn test_list_empty_is_not_an_error() {
        let mut mock = MockChromaClientTrait::new();
        mock.expect_list_collections().returning(|| Ok(Vec::new()));
        mock.expect_count().never();

        let list = handle_list(&ListArgs {}, &mock).await.unwrap();
        assert!(list.collections.is_empty());
    }

    #[tokio::test]
    async fn test_list_propagates_count_failure() {
        let mut mock = MockChromaClientTrait::new();
        mock.expect_list_collections()
            .returning(|| Ok(vec![collection("alpha")]));
        mock.expect_count().returning(|_| {
            Err(ChromaBenchError::Server {
                status: 500,
                message: "boom".to_string(),
            })
        });

        assert!(handle_list(&ListArgs {}, &mock).await.is_err());
    }
}
