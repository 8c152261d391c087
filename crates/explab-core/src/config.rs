//! Client configuration loaded from file and environment.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Backend the client talks to when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";
/// Detail refresh period.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3000;
/// Config file read when `EXPLAB_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/explab.toml";

/// Floor applied to every poll period.
pub const MIN_POLL_INTERVAL_MS: u64 = 250;

/// Client configuration.
///
/// | Key | Env override | Default | Description |
/// |-----|--------------|---------|-------------|
/// | api_base_url | EXPLAB__API_BASE_URL | http://127.0.0.1:8000 | Backend serving `/api/experiments`. |
/// | poll_interval_ms | EXPLAB__POLL_INTERVAL_MS | 3000 | Detail refresh period (min 250). |
/// | request_timeout_secs | EXPLAB__REQUEST_TIMEOUT_SECS | unset | Per-request timeout; unset waits on the transport. |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub poll_interval_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            request_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Load config. Precedence: env `EXPLAB_CONFIG` path > `config/explab.toml` > defaults,
    /// with `EXPLAB__*` environment variables applied on top.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("EXPLAB_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Path::new(&config_path))
    }

    /// Load config from `path` (skipped when missing) plus environment overrides.
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .set_default("api_base_url", DEFAULT_API_BASE_URL)?
            .set_default("poll_interval_ms", DEFAULT_POLL_INTERVAL_MS as i64)?;

        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder
        };

        let built = builder
            .add_source(config::Environment::with_prefix("EXPLAB").separator("__"))
            .build()?;

        built.try_deserialize()
    }

    /// Poll period, clamped so a misconfigured value cannot hammer the backend.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(MIN_POLL_INTERVAL_MS))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
    }

    /// Effective configuration rendered as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
