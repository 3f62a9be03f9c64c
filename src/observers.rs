//! Observers that export a leaderboard [`Snapshot`](crate::snapshot::Snapshot).
//!
//! - [`table`] - Pretty-print the podium as a table using the `tabled` crate
//! - [`json`] - Serialize the podium (optionally wrapped with the event total)
//! - [`prometheus`] - Export the podium and the engine counters in Prometheus
//!   exposition format
//!
//! Observers only ever read snapshots, so they never contend with writers.
//!
//! # Feature Flags
//!
//! - `table` - Enables the [`table`] module
//! - `json` - Enables the [`json`] module
//! - `prometheus` - Enables the [`prometheus`] module
//! - `full` - Enables all observer modules
//!
//! # Example
//!
//! ```rust,ignore
//! use classifica::leaderboard::Leaderboard;
//! use classifica::observers::Result;
//! use classifica::observers::json::JsonObserver;
//! use classifica::observers::prometheus::PrometheusObserver;
//!
//! fn export(board: &Leaderboard<String>) -> Result<()> {
//!     let snapshot = board.current_snapshot();
//!     println!("{}", JsonObserver::new().wrap_in_snapshot(true).to_json(&snapshot)?);
//!     println!(
//!         "{}",
//!         PrometheusObserver::new()
//!             .with_namespace("classifica")
//!             .render(&snapshot, board.counters().into_iter())?
//!     );
//!     Ok(())
//! }
//! ```

mod error;

pub use error::{ObserverError, Result};

#[cfg(feature = "prometheus")]
pub use error::PrometheusError;

#[cfg(feature = "table")]
pub mod table;

#[cfg(feature = "json")]
pub mod json;

#[cfg(feature = "prometheus")]
pub mod prometheus;

/// Returns the current timestamp in milliseconds since Unix epoch.
#[cfg(feature = "json")]
pub(crate) fn current_timestamp_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
