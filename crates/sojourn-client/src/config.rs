//! Configuration for the planner API client.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// Maximum resume text length accepted by the parse endpoint.
pub const RESUME_TEXT_LIMIT: usize = 5000;

/// Planner API client configuration.
///
/// Loaded from `~/.sojourn/config.yaml` when present; every field has a
/// default so a missing file simply means defaults. The CLI `--server` flag
/// overrides `base_url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the planner server (no trailing slash)
    pub base_url: String,

    /// Connect timeout in seconds.
    ///
    /// Applies to establishing the connection only; the plan stream itself
    /// has no read timeout, matching the server's open-ended generation.
    pub connect_timeout_secs: u64,

    /// Request timeout in seconds for the non-streaming resume endpoint
    pub resume_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout_secs: 10,
            resume_timeout_secs: 60,
        }
    }
}

impl ClientConfig {
    /// Load configuration from the default location, falling back to
    /// defaults when the file does not exist.
    pub fn load() -> Result<Self> {
        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ClientError::ConfigError(format!("{}: {e}", path.display())))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ClientError::ConfigError(format!("{}: {e}", path.display())))
    }

    /// Override the server base URL, trimming any trailing slash.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let url = base_url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }
}

/// Default config file path, `~/.sojourn/config.yaml`.
pub fn default_config_path() -> Option<PathBuf> {
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".sojourn").join("config.yaml"))
}
