//! Command line and environment configuration for the service.
//!
//! Every flag falls back to an environment variable; a `.env` file in the
//! working directory is loaded first by the binary, so the usual
//! `TWITTER_API_BASE_URI` / `TWITTER_API_BEARER_TOKEN` pair can live there.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use thiserror::Error;

use crate::service::redact::Redaction;

/// Environment key holding the upstream base URI.
pub const BASE_URI_KEY: &str = "TWITTER_API_BASE_URI";

/// Environment key holding the upstream bearer token.
pub const BEARER_TOKEN_KEY: &str = "TWITTER_API_BEARER_TOKEN";

/// Path of the sampled stream, relative to the base URI.
pub const DEFAULT_STREAM_PATH: &str = "/2/tweets/sample/stream?tweet.fields=entities";

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required value was absent or blank.
    #[error("A configuration value is required for the configuration key \"{key}\"")]
    Missing {
        /// The configuration key.
        key: String,
    },

    /// A value was present but unusable.
    #[error("Invalid value for the configuration key \"{key}\": {reason}")]
    Invalid {
        /// The configuration key.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human readable, multi-line output
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Command-line arguments of the `classifica` binary.
#[derive(Parser, Clone)]
#[command(name = "classifica", version, about = "Live top-N hashtag leaderboard")]
pub struct ServiceArgs {
    /// Base URI of the tweet API (e.g. https://api.twitter.com)
    #[arg(long, env = BASE_URI_KEY)]
    pub base_uri: Option<String>,

    /// Bearer token sent to the tweet API
    #[arg(long, env = BEARER_TOKEN_KEY, hide_env_values = true)]
    pub bearer_token: Option<String>,

    /// Path of the sampled stream endpoint, appended to the base URI
    #[arg(long, default_value = DEFAULT_STREAM_PATH, env = "CLASSIFICA_STREAM_PATH")]
    pub stream_path: String,

    /// Address the HTTP API listens on
    #[arg(long, default_value = "127.0.0.1:8080", env = "CLASSIFICA_BIND")]
    pub bind: SocketAddr,

    /// Number of hashtags kept on the podium
    #[arg(long, default_value = "10", env = "CLASSIFICA_PODIUM_SIZE")]
    pub podium_size: usize,

    /// Bounded wait for the podium lock, in milliseconds
    #[arg(long, default_value = "1000", env = "CLASSIFICA_LOCK_TIMEOUT_MS")]
    pub lock_timeout_ms: u64,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty", env = "CLASSIFICA_LOG_FORMAT")]
    pub log_format: LogFormat,
}

impl ServiceArgs {
    /// Checks the arguments and turns them into a [`ServiceConfig`].
    pub fn validate(self) -> Result<ServiceConfig, ConfigError> {
        let base_uri = self
            .base_uri
            .map(|uri| uri.trim().trim_end_matches('/').to_string())
            .filter(|uri| !uri.is_empty())
            .ok_or_else(|| ConfigError::Missing {
                key: BASE_URI_KEY.to_string(),
            })?;

        if !(base_uri.starts_with("http://") || base_uri.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: BASE_URI_KEY.to_string(),
                reason: format!("\"{}\" is not an http(s) URI", base_uri),
            });
        }

        if self.podium_size == 0 {
            return Err(ConfigError::Invalid {
                key: "CLASSIFICA_PODIUM_SIZE".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.lock_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "CLASSIFICA_LOCK_TIMEOUT_MS".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let bearer_token = self
            .bearer_token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());

        let stream_path = if self.stream_path.starts_with('/') {
            self.stream_path
        } else {
            format!("/{}", self.stream_path)
        };

        Ok(ServiceConfig {
            base_uri,
            bearer_token,
            stream_path,
            bind: self.bind,
            podium_size: self.podium_size,
            lock_timeout: Duration::from_millis(self.lock_timeout_ms),
            log_format: self.log_format,
        })
    }
}

/// Validated service configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Base URI, without trailing slash.
    pub base_uri: String,
    /// Bearer token, if any.
    pub bearer_token: Option<String>,
    /// Stream path, always starting with `/`.
    pub stream_path: String,
    /// HTTP API bind address.
    pub bind: SocketAddr,
    /// Podium size.
    pub podium_size: usize,
    /// Podium lock bounded wait.
    pub lock_timeout: Duration,
    /// Log output format.
    pub log_format: LogFormat,
}

impl ServiceConfig {
    /// Full URL of the sampled stream.
    pub fn stream_url(&self) -> String {
        format!("{}{}", self.base_uri, self.stream_path)
    }

    /// The bearer token in a form safe to log.
    pub fn redacted_token(&self) -> String {
        Redaction::default().redact(self.bearer_token.as_deref().unwrap_or_default())
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("base_uri", &self.base_uri)
            .field("bearer_token", &self.redacted_token())
            .field("stream_path", &self.stream_path)
            .field("bind", &self.bind)
            .field("podium_size", &self.podium_size)
            .field("lock_timeout", &self.lock_timeout)
            .field("log_format", &self.log_format)
            .finish()
    }
}
