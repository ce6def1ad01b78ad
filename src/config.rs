use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path of the model artifact produced by `build-model`
    #[serde(default = "default_model_path")]
    pub model_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of recommendations returned when the caller gives no `k`
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,

    /// Largest `k` a caller may request
    #[serde(default = "default_max_top_k")]
    pub max_top_k: usize,

    /// Per-request timeout for the HTTP server
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Remote `/recommend` service for the voice adapter; local model when unset
    #[serde(default)]
    pub voice_upstream_url: Option<String>,

    /// Timeout for calls to `voice_upstream_url`
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,
}

fn default_model_path() -> String {
    "model/model.json".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_top_k() -> usize {
    5
}

fn default_max_top_k() -> usize {
    100
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_upstream_timeout_secs() -> u64 {
    5
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.default_top_k == 0 {
            anyhow::bail!("DEFAULT_TOP_K must be positive");
        }
        if self.default_top_k > self.max_top_k {
            anyhow::bail!(
                "DEFAULT_TOP_K ({}) exceeds MAX_TOP_K ({})",
                self.default_top_k,
                self.max_top_k
            );
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}
