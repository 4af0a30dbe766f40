use std::io;
use thiserror::Error;

/// Result type for chroma-bench operations
pub type Result<T> = std::result::Result<T, ChromaBenchError>;

/// Errors raised while talking to the vector database or shaping its results.
#[derive(Error, Debug)]
pub enum ChromaBenchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Collection {0} does not exist.")]
    CollectionNotFound(String),

    #[error("Collection {0} already exists.")]
    CollectionExists(String),

    #[error("Invalid collection name '{name}': {reason}")]
    InvalidCollectionName { name: String, reason: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ChromaBenchError {
    /// Builds a `Server` error from a status code and a raw response body.
    ///
    /// Chroma reports failures as JSON objects with an `error`, `message` or `detail`
    /// field; anything else is passed through as-is.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                ["error", "message", "detail"]
                    .iter()
                    .find_map(|key| value.get(*key).map(json_to_message))
            })
            .unwrap_or_else(|| body.trim().to_string());

        ChromaBenchError::Server { status, message }
    }
}

fn json_to_message(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
