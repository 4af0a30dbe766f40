//! Collaborator handles for the two connection modes.
//!
//! [`build_client`] turns a resolved [`ConnectionProfile`] into a
//! [`ChromaClientTrait`] object. Neither backend does any I/O at construction time.

pub mod embedding;
pub mod http;
pub mod local;

use std::sync::Arc;

use crate::chroma_client_trait::ChromaClientTrait;
use crate::config::{ConnectionMode, ConnectionProfile};
use crate::constants::LOCAL_DATA_DIR;
use crate::error::Result;

pub use http::HttpChromaClient;
pub use local::LocalChromaClient;

/// Builds the collaborator handle for `profile`.
pub fn build_client(profile: &ConnectionProfile) -> Result<Arc<dyn ChromaClientTrait>> {
    match profile.mode {
        ConnectionMode::Remote => {
            let client = HttpChromaClient::from_profile(profile)?;
            log::info!("Using Chroma server at {}", client.base_url());
            Ok(Arc::new(client))
        }
        ConnectionMode::Local => {
            log::info!("Using local persistent storage at {}", LOCAL_DATA_DIR);
            Ok(Arc::new(LocalChromaClient::new(LOCAL_DATA_DIR)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_build_client_local_mode() {
        let profile = ConnectionProfile::from_vars(&HashMap::new());
        assert!(build_client(&profile).is_ok());
    }

    #[test]
    fn test_build_client_remote_mode_is_lazy() {
        // Nothing listens on this port; construction must still succeed.
        let mut vars = HashMap::new();
        vars.insert("CHROMA_HOST".to_string(), "127.0.0.1".to_string());
        vars.insert("CHROMA_PORT".to_string(), "9".to_string());
        let profile = ConnectionProfile::from_vars(&vars);
        assert!(build_client(&profile).is_ok());
    }

    #[test]
    fn test_build_client_rejects_bad_url() {
        let mut vars = HashMap::new();
        vars.insert("CHROMA_URL".to_string(), "http://".to_string());
        let profile = ConnectionProfile::from_vars(&vars);
        assert_eq!(profile.mode, ConnectionMode::Remote);
        assert!(build_client(&profile).is_err());
    }
}
