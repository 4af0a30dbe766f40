use chroma_bench_lib::chroma_client_trait::{ChromaClientTrait, Record};
use chroma_bench_lib::cli::commands::{handle_command, CommandOutcome, Commands};
use chroma_bench_lib::cli::{CreateArgs, PeekArgs, SearchArgs, StatsArgs};
use chroma_bench_lib::error::ChromaBenchError;
use chroma_bench_lib::{DistanceMetric, EmbeddingProvider, LocalChromaClient};
use tempfile::tempdir;

fn doc(id: &str, text: &str) -> Record {
    Record {
        id: id.to_string(),
        document: Some(text.to_string()),
        metadata: None,
        embedding: None,
    }
}

fn create(name: &str, distance: DistanceMetric) -> Commands {
    Commands::Create(CreateArgs {
        name: name.to_string(),
        distance,
        embedding_provider: Some(EmbeddingProvider::Huggingface),
        embedding_model: Some("all-MiniLM-L6-v2".to_string()),
    })
}

#[test_log::test(tokio::test)]
async fn test_created_collection_survives_a_new_client() {
    let dir = tempdir().unwrap();
    let client = LocalChromaClient::new(dir.path().join("chroma_data"));
    handle_command(&create("notes", DistanceMetric::Ip), &client)
        .await
        .unwrap();

    // A fresh handle over the same directory sees the collection and its tags.
    let reopened = LocalChromaClient::new(dir.path().join("chroma_data"));
    let collection = reopened.get_collection("notes").await.unwrap();
    assert_eq!(collection.distance(), Some("ip"));
    assert_eq!(
        collection.metadata.get("embedding_provider").and_then(|v| v.as_str()),
        Some("huggingface")
    );

    let stats = handle_command(
        &Commands::Stats(StatsArgs { name: "notes".to_string() }),
        &reopened,
    )
    .await
    .unwrap();
    match stats {
        CommandOutcome::Stats(stats) => {
            assert_eq!(stats.total_items, 0);
            assert_eq!(stats.embedding_dimensions, None);
            assert_eq!(stats.distance_metric, "ip");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test_log::test(tokio::test)]
async fn test_seeded_collection_peek_search_and_stats() {
    let dir = tempdir().unwrap();
    let client = LocalChromaClient::new(dir.path());
    handle_command(&create("docs", DistanceMetric::Cosine), &client)
        .await
        .unwrap();
    client
        .add(
            "docs",
            vec![
                doc("rust", "rust ownership and the borrow checker"),
                doc("python", "python dynamic typing and the interpreter"),
                doc("cooking", "slow cooked tomato sauce with basil"),
            ],
        )
        .unwrap();

    let peek = handle_command(
        &Commands::Peek(PeekArgs { name: "docs".to_string(), limit: 2 }),
        &client,
    )
    .await
    .unwrap();
    match peek {
        CommandOutcome::Peek(peek) => {
            assert_eq!(peek.records.len(), 2);
            assert_eq!(peek.total, 3);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    let search = handle_command(
        &Commands::Search(SearchArgs {
            name: "docs".to_string(),
            query: "borrow checker ownership".to_string(),
            n_results: 2,
        }),
        &client,
    )
    .await
    .unwrap();
    match search {
        CommandOutcome::Search(search) => {
            assert_eq!(search.hits.len(), 2);
            assert_eq!(search.hits[0].id, "rust");
            assert!(search.hits[0].distance <= search.hits[1].distance);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    let stats = handle_command(
        &Commands::Stats(StatsArgs { name: "docs".to_string() }),
        &client,
    )
    .await
    .unwrap();
    match stats {
        CommandOutcome::Stats(stats) => {
            assert_eq!(stats.total_items, 3);
            assert_eq!(stats.embedding_dimensions, Some(384));
            assert_eq!(stats.distance_metric, "cosine");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test_log::test(tokio::test)]
async fn test_creating_twice_fails() {
    let dir = tempdir().unwrap();
    let client = LocalChromaClient::new(dir.path());
    handle_command(&create("docs", DistanceMetric::L2), &client)
        .await
        .unwrap();

    let err = handle_command(&create("docs", DistanceMetric::L2), &client)
        .await
        .unwrap_err();
    assert!(matches!(err, ChromaBenchError::CollectionExists(ref name) if name == "docs"));
}

#[test_log::test(tokio::test)]
async fn test_invalid_name_is_rejected_before_writing() {
    let dir = tempdir().unwrap();
    let client = LocalChromaClient::new(dir.path().join("store"));

    let err = handle_command(&create("a", DistanceMetric::L2), &client)
        .await
        .unwrap_err();
    assert!(matches!(err, ChromaBenchError::InvalidCollectionName { .. }));
    assert!(client.list_collections().await.unwrap().is_empty());
}
