//! Client configuration loaded from environment variables.
//!
//! Every setting has a default that matches a local development backend, so
//! the CLI works with zero configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Content API client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the content API, without trailing slash.
    /// Env: `PAGES_API_URL`
    /// Default: `http://localhost:8000/api`
    pub api_url: String,

    /// Operator bearer token sent on writes, uploads and operator reads.
    /// Env: `PAGES_API_TOKEN`
    /// Default: none.
    pub token: Option<String>,

    /// Per-request timeout.
    /// Env: `PAGES_API_TIMEOUT_SECS`
    /// Default: 10 seconds
    pub timeout: Duration,

    /// Where the local page mirror is written.
    /// Env: `PAGES_BACKUP_PATH` (empty disables the mirror)
    /// Default: `sitePages_backup.json`
    pub backup_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000/api".to_string(),
            token: None,
            timeout: Duration::from_secs(10),
            backup_path: Some(PathBuf::from("sitePages_backup.json")),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("PAGES_API_URL") {
            let url = url.trim().trim_end_matches('/');
            if url.starts_with("http://") || url.starts_with("https://") {
                config.api_url = url.to_string();
            } else {
                tracing::warn!(value = %url, "Invalid PAGES_API_URL, using default");
            }
        }

        if let Some(token) = lookup("PAGES_API_TOKEN") {
            let token = token.trim();
            if !token.is_empty() {
                config.token = Some(token.to_string());
            }
        }

        if let Some(secs) = lookup("PAGES_API_TIMEOUT_SECS") {
            match secs.trim().parse::<u64>() {
                Ok(n) if n > 0 => config.timeout = Duration::from_secs(n),
                _ => {
                    tracing::warn!(value = %secs, "Invalid PAGES_API_TIMEOUT_SECS, using default");
                }
            }
        }

        if let Some(path) = lookup("PAGES_BACKUP_PATH") {
            config.backup_path = if path.trim().is_empty() {
                None
            } else {
                Some(PathBuf::from(path))
            };
        }

        config
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}
