//! Error type for leaderboard construction and tallying.

use std::time::Duration;

use thiserror::Error;

/// Errors raised by [`Leaderboard`](crate::leaderboard::Leaderboard).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LeaderboardError {
    /// The podium must hold at least one entry.
    #[error("podium size must be at least 1, got {0}")]
    InvalidPodiumSize(usize),

    /// The podium update region could not be entered within the bounded wait.
    ///
    /// This is an overload signal, not a recoverable condition: the increment
    /// that preceded it was recorded, but the published ranking no longer keeps
    /// up with the writers. Callers are expected to stop and let supervising
    /// infrastructure restart or scale the process.
    #[error("unable to acquire the podium lock within {timeout:?}")]
    Contention {
        /// The bounded wait that elapsed.
        timeout: Duration,
    },
}

impl LeaderboardError {
    /// Returns `true` for faults that must end the writer path.
    pub fn is_fatal(&self) -> bool {
        matches!(self, LeaderboardError::Contention { .. })
    }
}

/// Result type for leaderboard operations.
pub type Result<T> = std::result::Result<T, LeaderboardError>;
