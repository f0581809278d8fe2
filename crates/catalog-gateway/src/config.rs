//! Gateway configuration types.
//!
//! This module defines configuration structures for the HTTP gateway.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `API_KEY` is unset or empty.
    #[error("API_KEY must be set to a non-empty value")]
    MissingApiKey,

    /// An environment variable could not be parsed.
    #[error("invalid value for {name}: {value}")]
    InvalidValue {
        /// The variable name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Configuration for the gateway service.
#[derive(Clone, Deserialize)]
pub struct GatewayConfig {
    /// Listen address (e.g., "0.0.0.0:8080").
    #[serde(default = "GatewayConfig::default_listen_addr")]
    pub listen_addr: String,

    /// Shared secret expected in the `x-api-key` header.
    ///
    /// An empty key rejects every request.
    #[serde(default)]
    pub api_key: String,

    /// Allowed CORS origins.
    #[serde(default = "GatewayConfig::default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    #[serde(default = "GatewayConfig::default_max_body")]
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    #[serde(default = "GatewayConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Load the sample catalog at startup.
    #[serde(default = "GatewayConfig::default_seed")]
    pub seed_sample_data: bool,
}

impl GatewayConfig {
    fn default_listen_addr() -> String {
        "0.0.0.0:8080".to_string()
    }

    fn default_cors_origins() -> Vec<String> {
        vec!["*".to_string()]
    }

    const fn default_max_body() -> usize {
        1024 * 1024 // 1 MB
    }

    const fn default_request_timeout() -> u64 {
        30
    }

    const fn default_seed() -> bool {
        true
    }

    /// Create a default configuration that accepts `api_key`.
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Reads `LISTEN_ADDR`, `API_KEY`, `CORS_ORIGINS` (comma-separated),
    /// `MAX_BODY_BYTES`, `REQUEST_TIMEOUT_SECONDS` and `SEED_SAMPLE_DATA`.
    /// Unset variables keep their defaults, except `API_KEY`, which is required.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingApiKey` if no key is configured, or
    /// `ConfigError::InvalidValue` if a numeric or boolean variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(addr) = lookup("LISTEN_ADDR") {
            config.listen_addr = addr;
        }

        config.api_key = lookup("API_KEY")
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        if let Some(origins) = lookup("CORS_ORIGINS") {
            config.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(ToString::to_string)
                .collect();
        }

        if let Some(raw) = lookup("MAX_BODY_BYTES") {
            config.max_body_bytes = parse_var("MAX_BODY_BYTES", raw)?;
        }

        if let Some(raw) = lookup("REQUEST_TIMEOUT_SECONDS") {
            config.request_timeout_seconds = parse_var("REQUEST_TIMEOUT_SECONDS", raw)?;
        }

        if let Some(raw) = lookup("SEED_SAMPLE_DATA") {
            config.seed_sample_data = parse_var("SEED_SAMPLE_DATA", raw)?;
        }

        Ok(config)
    }

    /// Get the request timeout as a `Duration`.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, raw: String) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { name, value: raw })
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: Self::default_listen_addr(),
            api_key: String::new(),
            cors_origins: Self::default_cors_origins(),
            max_body_bytes: Self::default_max_body(),
            request_timeout_seconds: Self::default_request_timeout(),
            seed_sample_data: Self::default_seed(),
        }
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("listen_addr", &self.listen_addr)
            .field("api_key", &"[REDACTED]")
            .field("cors_origins", &self.cors_origins)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("seed_sample_data", &self.seed_sample_data)
            .finish()
    }
}
