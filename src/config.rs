//! Resolves connection settings for the Chroma server from layered env files and the
//! process environment.
//!
//! Resolution happens once at startup: [`load_config`] finds the first env file, overlays
//! the real process environment on top of it and hands the merged variables to the pure
//! [`ConnectionProfile::from_vars`].

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

use crate::constants::{
    DEFAULT_CHROMA_PORT, ENV_CHROMA_HOST, ENV_CHROMA_PORT, ENV_CHROMA_SSL, ENV_CHROMA_TOKEN,
    ENV_CHROMA_URL, ENV_FILE_NAME, HOME_CONFIG_DIR,
};
use crate::error::{ChromaBenchError, Result};

const RECOGNIZED_VARS: [&str; 5] = [
    ENV_CHROMA_HOST,
    ENV_CHROMA_PORT,
    ENV_CHROMA_URL,
    ENV_CHROMA_SSL,
    ENV_CHROMA_TOKEN,
];

/// Whether commands go to a remote server or the local on-disk store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// A Chroma server reached over HTTP.
    Remote,
    /// A store persisted under the working directory.
    Local,
}

impl fmt::Display for ConnectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionMode::Remote => write!(f, "remote"),
            ConnectionMode::Local => write!(f, "local"),
        }
    }
}

/// Connection parameters resolved once per invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionProfile {
    /// Server host, from `CHROMA_HOST` or the host part of `CHROMA_URL`.
    pub host: Option<String>,
    /// Server port, from `CHROMA_PORT`, the port of `CHROMA_URL`, or 8000.
    pub port: u16,
    /// TLS flag, from `CHROMA_SSL` or an `https` scheme in `CHROMA_URL`.
    pub ssl: bool,
    /// Bearer token forwarded to the server.
    pub token: Option<String>,
    /// Raw `CHROMA_URL`, if configured.
    pub url: Option<String>,
    /// Selected mode.
    pub mode: ConnectionMode,
}

impl ConnectionProfile {
    /// Builds a profile from a variable map. Missing or empty variables fall back to
    /// their defaults; nothing here fails.
    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        let get = |key: &str| {
            vars.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let url = get(ENV_CHROMA_URL);
        let parsed_url = url.as_deref().and_then(parse_chroma_url);

        let host = get(ENV_CHROMA_HOST).or_else(|| {
            parsed_url
                .as_ref()
                .and_then(|u| u.host_str().map(str::to_string))
        });

        let url_port = parsed_url
            .as_ref()
            .and_then(Url::port_or_known_default)
            .unwrap_or(DEFAULT_CHROMA_PORT);
        let port = match get(ENV_CHROMA_PORT) {
            Some(raw) => raw.parse::<u16>().unwrap_or_else(|_| {
                log::warn!(
                    "Ignoring invalid {} value '{}', using {}",
                    ENV_CHROMA_PORT,
                    raw,
                    url_port
                );
                url_port
            }),
            None => url_port,
        };

        let ssl = get(ENV_CHROMA_SSL).map(|v| is_truthy(&v)).unwrap_or(false)
            || parsed_url.as_ref().is_some_and(|u| u.scheme() == "https");

        let mode = if host.is_some() || url.is_some() {
            ConnectionMode::Remote
        } else {
            ConnectionMode::Local
        };

        Self {
            host,
            port,
            ssl,
            token: get(ENV_CHROMA_TOKEN),
            url,
            mode,
        }
    }

    /// Base URL of the remote server, without a trailing slash.
    ///
    /// Always built from the resolved scheme, host and port, so it matches what
    /// [`summary_lines`](Self::summary_lines) reports. Only the path is taken from
    /// `CHROMA_URL`.
    pub fn base_url(&self) -> Result<String> {
        let path = match &self.url {
            Some(raw) => {
                let parsed = parse_chroma_url(raw).ok_or_else(|| {
                    ChromaBenchError::Configuration(format!(
                        "Invalid {}: '{}'",
                        ENV_CHROMA_URL, raw
                    ))
                })?;
                parsed.path().trim_end_matches('/').to_string()
            }
            None => String::new(),
        };

        let host = self.host.as_deref().ok_or_else(|| {
            ChromaBenchError::Configuration(format!(
                "Neither {} nor {} is set",
                ENV_CHROMA_HOST, ENV_CHROMA_URL
            ))
        })?;
        let scheme = if self.ssl { "https" } else { "http" };
        Ok(format!("{}://{}:{}{}", scheme, host, self.port, path))
    }

    /// Human-readable summary of the resolved values. The token is only reported as
    /// set or unset.
    pub fn summary_lines(&self) -> Vec<String> {
        let or_unset = |v: &Option<String>| v.clone().unwrap_or_else(|| "<unset>".to_string());
        vec![
            format!("{}: {}", ENV_CHROMA_URL, or_unset(&self.url)),
            format!("{}: {}", ENV_CHROMA_HOST, or_unset(&self.host)),
            format!("{}: {}", ENV_CHROMA_PORT, self.port),
            format!("{}: {}", ENV_CHROMA_SSL, self.ssl),
            format!(
                "{}: {}",
                ENV_CHROMA_TOKEN,
                if self.token.is_some() { "<set>" } else { "<unset>" }
            ),
            format!("Mode: {}", self.mode),
        ]
    }
}

/// A resolved profile plus the env file it was read from, if any.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub profile: ConnectionProfile,
    pub env_file: Option<PathBuf>,
}

/// Returns the first env file that exists, checking the working directory, its parent
/// and finally `~/.chroma-bench/.env`.
pub fn find_env_file(cwd: &Path, home: Option<&Path>) -> Option<PathBuf> {
    let mut candidates = vec![cwd.join(ENV_FILE_NAME)];
    if let Some(parent) = cwd.parent() {
        candidates.push(parent.join(ENV_FILE_NAME));
    }
    if let Some(home) = home {
        candidates.push(home.join(HOME_CONFIG_DIR).join(ENV_FILE_NAME));
    }
    candidates.into_iter().find(|p| p.is_file())
}

/// Parses an env file into a map without touching the process environment.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let iter = dotenvy::from_path_iter(path).map_err(|e| {
        ChromaBenchError::Configuration(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let mut vars = HashMap::new();
    for item in iter {
        let (key, value) = item.map_err(|e| {
            ChromaBenchError::Configuration(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        vars.insert(key, value);
    }
    Ok(vars)
}

/// Overlays process variables on top of env-file variables. Only the recognized
/// `CHROMA_*` keys are kept.
pub fn merge_vars(
    file_vars: HashMap<String, String>,
    process_vars: impl IntoIterator<Item = (String, String)>,
) -> HashMap<String, String> {
    let mut merged: HashMap<String, String> = file_vars
        .into_iter()
        .filter(|(k, _)| RECOGNIZED_VARS.contains(&k.as_str()))
        .collect();
    for (key, value) in process_vars {
        if RECOGNIZED_VARS.contains(&key.as_str()) {
            merged.insert(key, value);
        }
    }
    merged
}

/// Loads the connection profile for this process.
pub fn load_config() -> Result<LoadedConfig> {
    let cwd = std::env::current_dir()?;
    let home = dirs::home_dir();
    let env_file = find_env_file(&cwd, home.as_deref());

    let file_vars = match &env_file {
        Some(path) => {
            log::debug!("Loading connection settings from {}", path.display());
            read_env_file(path)?
        }
        None => {
            log::debug!("No env file found, using process environment only");
            HashMap::new()
        }
    };

    let vars = merge_vars(file_vars, std::env::vars());
    Ok(LoadedConfig {
        profile: ConnectionProfile::from_vars(&vars),
        env_file,
    })
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_chroma_url(raw: &str) -> Option<Url> {
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{}", raw)
    };
    Url::parse(&candidate).ok().filter(|u| u.host_str().is_some())
}
