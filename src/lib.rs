//! # Classifica - Concurrent Top-N Leaderboard
//!
//! A Rust library that counts occurrences of keys (hashtags, by default) coming
//! from many concurrent producers and keeps an always-readable, ranked top-N
//! **podium** of the most frequent ones.
//!
//! ## The Problem
//!
//! Producers fire key occurrences at a high rate from many threads. Readers want
//! the current top-N at any moment, without ever waiting on writers and without
//! re-sorting the whole key space on every request.
//!
//! ## The Solution
//!
//! The engine is split in three layers:
//!
//! 1. **Counter table**: a sharded concurrent map ([`dashmap`]) from key to an
//!    atomic count. Increments never block one another except on the same shard.
//!
//! 2. **Podium**: a bounded list of at most N entries, maintained incrementally
//!    under a short lock. Each tally only re-ranks N+1 candidates. The lock is
//!    acquired with a bounded wait (1 second by default); exceeding it is reported
//!    as a fatal [`LeaderboardError::Contention`](error::LeaderboardError::Contention).
//!
//! 3. **Published snapshot**: every podium change is frozen into an immutable
//!    list of [`Standing`](snapshot::Standing)s and swapped in atomically
//!    ([`arc_swap`]). Readers load the latest list lock-free.
//!
//! The raw event total and the engine's own instrumentation live in sharded,
//! cache-padded [`Monotone`](counters::monotone::Monotone) counters, so counting
//! events from many threads does not bounce a single cache line.
//!
//! ## Ranking rule
//!
//! Higher count ranks first; ties are broken by ascending key order. The rule is
//! the [`Ord`] implementation of [`Standing`](snapshot::Standing).
//!
//! ## Quick Start
//!
//! ```rust
//! use classifica::leaderboard::Leaderboard;
//!
//! let board = Leaderboard::new(2).unwrap();
//!
//! for tags in [vec!["rust", "go"], vec!["rust"], vec![], vec!["zig"]] {
//!     board.tally_event();
//!     for tag in tags {
//!         board.tally_key(tag.to_string()).unwrap();
//!     }
//! }
//!
//! let snapshot = board.current_snapshot();
//! assert_eq!(snapshot.total_events, 4);
//! assert_eq!(snapshot.results()[0].key, "rust");
//! assert_eq!(snapshot.results()[0].count, 2);
//! assert_eq!(snapshot.results()[1].key, "go");
//! ```
//!
//! ## Observers
//!
//! Optional observer modules export a snapshot in various formats. Each
//! observer is gated behind a feature flag:
//!
//! | Feature | Module | Description |
//! |---------|--------|-------------|
//! | `table` | [`observers::table`] | Pretty-print the podium as a table |
//! | `json` | [`observers::json`] | Serialize the podium to JSON |
//! | `prometheus` | [`observers::prometheus`] | Export in Prometheus exposition format |
//! | `full` | All observers | Enables all observer modules |
//!
//! ## Service
//!
//! The `service` feature adds the hashtag service: a streaming ingestor that
//! reads newline-delimited tweets over HTTP and feeds the leaderboard, plus an
//! HTTP API that publishes the current snapshot. The `classifica` binary wires
//! both together.

pub mod counter_table;
pub mod counters;
pub mod error;
pub mod leaderboard;
pub mod observers;
pub mod snapshot;

#[cfg(feature = "service")]
pub mod service;

pub use error::{LeaderboardError, Result};
pub use leaderboard::Leaderboard;
pub use snapshot::{Snapshot, Standing};
