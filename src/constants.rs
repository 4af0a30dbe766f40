// Constants shared across the CLI, the clients and the config resolver

// Environment variables
/// Host name of a remote Chroma server.
pub const ENV_CHROMA_HOST: &str = "CHROMA_HOST";
/// Port of a remote Chroma server.
pub const ENV_CHROMA_PORT: &str = "CHROMA_PORT";
/// Full base URL of a remote Chroma server (scheme, host and port).
pub const ENV_CHROMA_URL: &str = "CHROMA_URL";
/// Enables TLS when truthy.
pub const ENV_CHROMA_SSL: &str = "CHROMA_SSL";
/// Bearer token forwarded to the server.
pub const ENV_CHROMA_TOKEN: &str = "CHROMA_TOKEN";

/// Port used when `CHROMA_PORT` is unset or unparsable.
pub const DEFAULT_CHROMA_PORT: u16 = 8000;

// Env-file discovery
/// Name of the env file looked up in the working directory and its parent.
pub const ENV_FILE_NAME: &str = ".env";
/// Directory under the user's home that holds the fallback env file.
pub const HOME_CONFIG_DIR: &str = ".chroma-bench";

/// Storage root used in local mode, relative to the working directory.
pub const LOCAL_DATA_DIR: &str = "./chroma_data";

// Collection metadata keys
/// Metadata key holding the distance metric of a collection.
pub const META_DISTANCE: &str = "hnsw:space";
/// Metadata key holding the embedding provider tag.
pub const META_EMBEDDING_PROVIDER: &str = "embedding_provider";
/// Metadata key holding the embedding model tag.
pub const META_EMBEDDING_MODEL: &str = "embedding_model";

// Presentation
/// Number of characters kept in a document preview.
pub const PREVIEW_CHARS: usize = 100;
/// Marker appended to truncated previews.
pub const PREVIEW_ELLIPSIS: &str = "...";

/// Dimension of vectors produced by the local hashing embedder.
pub const LOCAL_EMBEDDING_DIM: usize = 384;

/// Timeout applied to every HTTP request, in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;
