//! JSON configuration file.
//!
//! ```json
//! {
//!   "merchant": { "bin": "999995", "merchant_number": "999999999911", ... },
//!   "gateway": { "url": "https://...", "timeout_ms": 30000 }
//! }
//! ```
//!
//! `gateway` may be omitted entirely. Setting `gateway.stream` to a socket
//! address switches from HTTPS to a direct framed TCP link.

use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use vitalnet_client::{HttpsConfig, StreamConfig};
use vitalnet_core::Merchant;
use vitalnet_core::constants::{DEFAULT_EXCHANGE_TIMEOUT, DEFAULT_GATEWAY_URL};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {0}: {1}")]
    FileRead(PathBuf, std::io::Error),
    #[error("Failed to parse config file: {0}")]
    JsonParse(#[from] serde_json::Error),
    #[error("Invalid merchant: {0}")]
    Merchant(#[from] vitalnet_core::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub merchant: Merchant,
    #[serde(default)]
    pub gateway: GatewayConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Direct host address; takes precedence over `url` when set
    #[serde(default)]
    pub stream: Option<SocketAddr>,
}

fn default_url() -> String {
    DEFAULT_GATEWAY_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_EXCHANGE_TIMEOUT
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_ms: default_timeout_ms(),
            stream: None,
        }
    }
}

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn https(&self) -> HttpsConfig {
        HttpsConfig {
            url: self.url.clone(),
            timeout: self.timeout(),
        }
    }

    pub fn stream(&self) -> Option<StreamConfig> {
        self.stream.map(|server_addr| StreamConfig {
            server_addr,
            timeout: self.timeout(),
        })
    }
}

impl Config {
    /// Read, parse and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::FileRead(path.to_path_buf(), e))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(content)?;
        config.merchant.validate()?;
        Ok(config)
    }

    /// Replace the gateway URL, e.g. from `--url` / `VITALNET_URL`.
    pub fn with_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.gateway.url = url;
        }
        self
    }
}
