use chroma_bench_lib::chroma_client_trait::{ChromaClientTrait, CollectionRef, Metadata};
use chroma_bench_lib::error::ChromaBenchError;
use chroma_bench_lib::HttpChromaClient;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn collection_json(name: &str, id: &str, space: &str) -> serde_json::Value {
    json!({ "id": id, "name": name, "metadata": { "hnsw:space": space } })
}

fn docs_collection() -> CollectionRef {
    CollectionRef {
        id: "c-1".to_string(),
        name: "docs".to_string(),
        metadata: Metadata::new(),
    }
}

#[tokio::test]
async fn test_create_collection_posts_name_and_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/collections"))
        .and(body_partial_json(json!({
            "name": "docs",
            "metadata": { "hnsw:space": "cosine" },
            "get_or_create": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(collection_json("docs", "c-1", "cosine")))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpChromaClient::new(&server.uri(), None).unwrap();
    let mut metadata = Metadata::new();
    metadata.insert("hnsw:space".to_string(), json!("cosine"));
    let created = client.create_collection("docs", metadata).await.unwrap();

    assert_eq!(created.id, "c-1");
    assert_eq!(created.distance(), Some("cosine"));
}

#[tokio::test]
async fn test_token_is_sent_as_bearer_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/collections"))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            collection_json("a", "c-a", "l2"),
            { "id": "c-b", "name": "b", "metadata": null }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpChromaClient::new(&server.uri(), Some("s3cret".to_string())).unwrap();
    let collections = client.list_collections().await.unwrap();

    assert_eq!(collections.len(), 2);
    assert_eq!(collections[1].name, "b");
    assert!(collections[1].metadata.is_empty());
}

#[tokio::test]
async fn test_missing_collection_maps_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/collections/nope"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({ "error": "ValueError('Collection nope does not exist.')" })),
        )
        .mount(&server)
        .await;

    let client = HttpChromaClient::new(&server.uri(), None).unwrap();
    let err = client.get_collection("nope").await.unwrap_err();

    match err {
        ChromaBenchError::Server { status, message } => {
            assert_eq!(status, 500);
            assert!(message.contains("does not exist"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_accepts_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/collections/docs"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpChromaClient::new(&server.uri(), None).unwrap();
    client.delete_collection("docs").await.unwrap();
}

#[tokio::test]
async fn test_count_and_get_use_collection_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/collections/c-1/count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(2)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/collections/c-1/get"))
        .and(body_partial_json(json!({ "limit": 1 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ids": ["a"],
            "documents": ["hello"],
            "metadatas": [{ "source": "wiki" }],
            "embeddings": [[0.1, 0.2, 0.3]]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpChromaClient::new(&server.uri(), None).unwrap();
    let collection = docs_collection();

    assert_eq!(client.count(&collection).await.unwrap(), 2);
    let records = client.get(&collection, 1).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].document.as_deref(), Some("hello"));
    assert_eq!(records[0].embedding.as_ref().map(Vec::len), Some(3));
    assert_eq!(
        records[0].metadata.as_ref().and_then(|m| m.get("source")),
        Some(&json!("wiki"))
    );
}

#[tokio::test]
async fn test_query_sends_text_and_reads_first_result_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/collections/c-1/query"))
        .and(body_partial_json(json!({ "query_texts": ["rust"], "n_results": 2 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ids": [["x", "y"]],
            "distances": [[0.1, 0.5]],
            "documents": [["about rust", null]],
            "metadatas": [[null, { "k": 1 }]]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpChromaClient::new(&server.uri(), None).unwrap();
    let hits = client.query(&docs_collection(), "rust", 2).await.unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].id, "x");
    assert!((hits[0].distance - 0.1).abs() < 1e-6);
    assert_eq!(hits[1].document, None);
    assert!(hits[1].metadata.is_some());
}

#[tokio::test]
async fn test_unreachable_server_is_an_error() {
    // Port 9 (discard) is not expected to run an HTTP server.
    let client = HttpChromaClient::new("http://127.0.0.1:9", None).unwrap();
    assert!(client.list_collections().await.is_err());
}
