//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.danisma/config.json`) and
//! environment. Kept minimal: backend endpoint, probe interval, reveal pacing.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::backend::DEFAULT_BASE_URL;
use crate::reveal::RevealPacing;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Answer service endpoint settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Health polling settings.
    #[serde(default)]
    pub connectivity: ConnectivityConfig,

    /// Typewriter reveal pacing.
    #[serde(default)]
    pub reveal: RevealConfig,
}

/// Answer service base URL and request timeout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendConfig {
    /// Base URL of the answer service (default "http://127.0.0.1:5001").
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Upper bound on one answer request in seconds (default 120). The model
    /// generates on local hardware and can be slow; expiry is surfaced to the
    /// user the same way as any other request failure.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Health probe interval (also the retry delay on failure).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectivityConfig {
    /// Seconds between health probes (default 3).
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

/// Characters per revealed chunk and pause between chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealConfig {
    /// Characters appended per chunk (default 3).
    #[serde(default = "default_chunk_chars")]
    pub chunk_chars: usize,

    /// Milliseconds between chunks (default 10).
    #[serde(default = "default_chunk_pause_ms")]
    pub chunk_pause_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_poll_interval_secs() -> u64 {
    3
}

fn default_chunk_chars() -> usize {
    3
}

fn default_chunk_pause_ms() -> u64 {
    10
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            chunk_chars: default_chunk_chars(),
            chunk_pause_ms: default_chunk_pause_ms(),
        }
    }
}

impl BackendConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl ConnectivityConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl RevealConfig {
    pub fn pacing(&self) -> RevealPacing {
        RevealPacing {
            chunk_chars: self.chunk_chars,
            chunk_pause: Duration::from_millis(self.chunk_pause_ms),
        }
    }
}

/// Resolve the backend base URL: env DANISMA_BACKEND_URL overrides config.
pub fn resolve_backend_url(config: &Config) -> String {
    std::env::var("DANISMA_BACKEND_URL")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| config.backend.base_url.trim().to_string())
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("DANISMA_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".danisma").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the default path (or DANISMA_CONFIG_PATH). Missing file
/// => default config. Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_backend_contract() {
        let c = Config::default();
        assert_eq!(c.backend.base_url, "http://127.0.0.1:5001");
        assert_eq!(c.connectivity.poll_interval(), Duration::from_secs(3));
        let pacing = c.reveal.pacing();
        assert_eq!(pacing.chunk_chars, 3);
        assert_eq!(pacing.chunk_pause, Duration::from_millis(10));
    }

    #[test]
    fn empty_json_is_a_full_default_config() {
        let c: Config = serde_json::from_str("{}").expect("parse empty config");
        assert_eq!(c.backend.request_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn partial_sections_keep_field_defaults() {
        let c: Config = serde_json::from_str(
            r#"{"backend": {"baseUrl": "http://127.0.0.1:9000"}, "reveal": {"chunkChars": 5}}"#,
        )
        .expect("parse partial config");
        assert_eq!(c.backend.base_url, "http://127.0.0.1:9000");
        assert_eq!(c.backend.request_timeout_secs, 120);
        assert_eq!(c.reveal.chunk_chars, 5);
        assert_eq!(c.reveal.chunk_pause_ms, 10);
    }
}
