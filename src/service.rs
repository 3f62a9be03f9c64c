//! The hashtag service: stream ingestion, HTTP publication and bootstrap.
//!
//! Enabled by the `service` feature. The pieces are wired together by the
//! `classifica` binary, but each one can be driven on its own:
//!
//! - [`config`] - command line and environment configuration
//! - [`logging`] - `tracing-subscriber` setup
//! - [`redact`] - partial redaction of secrets before they are logged
//! - [`tweet`] - decoding of one line of the sampled tweet stream
//! - [`ingestor`] - feeds a [`Leaderboard`](crate::leaderboard::Leaderboard)
//!   from a line-delimited stream
//! - [`api`] - `axum` router publishing the current snapshot

use thiserror::Error;

pub mod api;
pub mod config;
pub mod ingestor;
pub mod logging;
pub mod redact;
pub mod tweet;

pub use config::{ConfigError, ServiceArgs, ServiceConfig};
pub use ingestor::{IngestSummary, Ingestor};

/// Errors that end the service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The configuration is missing a value or holds an invalid one.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The leaderboard reported a fault (podium lock contention).
    #[error(transparent)]
    Leaderboard(#[from] crate::error::LeaderboardError),

    /// Opening or reading the upstream stream failed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Socket or stream I/O failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A spawned task panicked or was aborted.
    #[error("task error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
