//! Client for a remote Chroma server speaking the v1 REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::chroma_client_trait::{ChromaClientTrait, CollectionRef, Metadata, QueryHit, Record};
use crate::config::ConnectionProfile;
use crate::constants::HTTP_TIMEOUT_SECS;
use crate::error::{ChromaBenchError, Result};
use crate::utils::truncate_chars;

const API_PREFIX: [&str; 2] = ["api", "v1"];
const ERROR_BODY_CHARS: usize = 200;

/// Column-oriented body returned by `POST /collections/{id}/get`.
#[derive(Debug, Deserialize)]
struct GetResponse {
    ids: Vec<String>,
    #[serde(default)]
    documents: Option<Vec<Option<String>>>,
    #[serde(default)]
    metadatas: Option<Vec<Option<Metadata>>>,
    #[serde(default)]
    embeddings: Option<Vec<Option<Vec<f32>>>>,
}

/// Body returned by `POST /collections/{id}/query`; one inner list per query text.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    ids: Vec<Vec<String>>,
    #[serde(default)]
    distances: Option<Vec<Vec<Option<f32>>>>,
    #[serde(default)]
    documents: Option<Vec<Vec<Option<String>>>>,
    #[serde(default)]
    metadatas: Option<Vec<Vec<Option<Metadata>>>>,
}

/// HTTP-backed [`ChromaClientTrait`] implementation.
#[derive(Debug, Clone)]
pub struct HttpChromaClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpChromaClient {
    /// Creates a client for `base_url`. No request is made until an operation runs.
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            ChromaBenchError::Configuration(format!("Invalid server URL '{}': {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ChromaBenchError::Configuration(format!(
                "Server URL '{}' cannot be used as a base URL",
                base_url
            )));
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    pub fn from_profile(profile: &ConnectionProfile) -> Result<Self> {
        Self::new(&profile.base_url()?, profile.token.clone())
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(API_PREFIX).extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        log::debug!("{} {}", method, url);
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            log::debug!("Server responded {} with body: {}", status, body);
            return Err(ChromaBenchError::from_response(status.as_u16(), &body));
        }

        let payload = if body.trim().is_empty() { "null" } else { body.as_str() };
        serde_json::from_str(payload).map_err(|e| {
            ChromaBenchError::InvalidResponse(format!(
                "{} (body: {})",
                e,
                truncate_chars(payload, ERROR_BODY_CHARS)
            ))
        })
    }
}

#[async_trait]
impl ChromaClientTrait for HttpChromaClient {
    async fn create_collection(&self, name: &str, metadata: Metadata) -> Result<CollectionRef> {
        let body = json!({
            "name": name,
            "metadata": metadata,
            "get_or_create": false,
        });
        self.send(self.request(Method::POST, &["collections"]).json(&body))
            .await
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        let _: serde_json::Value = self
            .send(self.request(Method::DELETE, &["collections", name]))
            .await?;
        Ok(())
    }

    async fn list_collections(&self) -> Result<Vec<CollectionRef>> {
        self.send(self.request(Method::GET, &["collections"])).await
    }

    async fn get_collection(&self, name: &str) -> Result<CollectionRef> {
        self.send(self.request(Method::GET, &["collections", name]))
            .await
    }

    async fn count(&self, collection: &CollectionRef) -> Result<u64> {
        self.send(self.request(Method::GET, &["collections", &collection.id, "count"]))
            .await
    }

    async fn get(&self, collection: &CollectionRef, limit: u32) -> Result<Vec<Record>> {
        let body = json!({
            "limit": limit,
            "include": ["documents", "metadatas", "embeddings"],
        });
        let response: GetResponse = self
            .send(
                self.request(Method::POST, &["collections", &collection.id, "get"])
                    .json(&body),
            )
            .await?;
        records_from_columns(response)
    }

    async fn query(
        &self,
        collection: &CollectionRef,
        query_text: &str,
        n_results: u32,
    ) -> Result<Vec<QueryHit>> {
        let body = json!({
            "query_texts": [query_text],
            "n_results": n_results,
            "include": ["documents", "metadatas", "distances"],
        });
        let response: QueryResponse = self
            .send(
                self.request(Method::POST, &["collections", &collection.id, "query"])
                    .json(&body),
            )
            .await?;
        hits_from_columns(response)
    }
}

/// Zips the parallel arrays of a `get` response into records.
fn records_from_columns(response: GetResponse) -> Result<Vec<Record>> {
    let len = response.ids.len();
    let mut documents = column(response.documents, len, "documents")?;
    let mut metadatas = column(response.metadatas, len, "metadatas")?;
    let mut embeddings = column(response.embeddings, len, "embeddings")?;

    Ok(response
        .ids
        .into_iter()
        .enumerate()
        .map(|(i, id)| Record {
            id,
            document: documents[i].take(),
            metadata: metadatas[i].take(),
            embedding: embeddings[i].take(),
        })
        .collect())
}

/// Flattens the first (and only) query of a `query` response into hits.
fn hits_from_columns(response: QueryResponse) -> Result<Vec<QueryHit>> {
    let ids = response.ids.into_iter().next().unwrap_or_default();
    let len = ids.len();
    if len == 0 {
        return Ok(Vec::new());
    }

    let distances = response
        .distances
        .and_then(|d| d.into_iter().next())
        .ok_or_else(|| ChromaBenchError::InvalidResponse("query response has no distances".into()))?;
    if distances.len() != len {
        return Err(length_mismatch("distances", distances.len(), len));
    }
    let mut documents = column(response.documents.and_then(|d| d.into_iter().next()), len, "documents")?;
    let mut metadatas = column(response.metadatas.and_then(|m| m.into_iter().next()), len, "metadatas")?;

    ids.into_iter()
        .zip(distances)
        .enumerate()
        .map(|(i, (id, distance))| {
            let distance = distance.ok_or_else(|| {
                ChromaBenchError::InvalidResponse(format!("missing distance for id '{}'", id))
            })?;
            Ok(QueryHit {
                id,
                distance,
                document: documents[i].take(),
                metadata: metadatas[i].take(),
            })
        })
        .collect()
}

/// An optional column becomes `len` Nones when absent; a present column must line up
/// with the ids.
fn column<T>(values: Option<Vec<Option<T>>>, len: usize, name: &str) -> Result<Vec<Option<T>>> {
    match values {
        None => Ok(std::iter::repeat_with(|| None).take(len).collect()),
        Some(values) if values.len() == len => Ok(values),
        Some(values) => Err(length_mismatch(name, values.len(), len)),
    }
}

fn length_mismatch(name: &str, got: usize, expected: usize) -> ChromaBenchError {
    ChromaBenchError::InvalidResponse(format!(
        "'{}' has {} entries but {} ids were returned",
        name, got, expected
    ))
}
