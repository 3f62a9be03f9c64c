//! JSON observer for serializing leaderboard snapshots.
//!
//! This module provides [`JsonObserver`], which serializes a [`Snapshot`]
//! to JSON using serde.
//!
//! # Feature Flag
//!
//! This module requires the `json` feature:
//!
//! ```toml
//! [dependencies]
//! classifica = { version = "0.1", features = ["json"] }
//! ```
//!
//! # Output shapes
//!
//! By default only the ranked results are written, as an array of
//! `{"value", "count"}` objects. With [`wrap_in_snapshot`](JsonObserver::wrap_in_snapshot)
//! the array is wrapped together with the event total and, optionally, a
//! timestamp:
//!
//! ```text
//! [{"value":"rust","count":42},{"value":"go","count":17}]
//!
//! {"timestamp_ms":1700000000000,"total_events":1000,"results":[{"value":"rust","count":42}]}
//! ```

use serde::Serialize;

use crate::observers::current_timestamp_ms;
use crate::snapshot::{Snapshot, Standing};

/// A snapshot together with the time it was exported.
#[derive(Debug, Serialize)]
pub struct SnapshotEnvelope<'a, K> {
    /// Optional timestamp in milliseconds since Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<u64>,
    /// Raw events observed.
    pub total_events: u64,
    /// Ranked results, best first.
    pub results: &'a [Standing<K>],
}

/// Configuration for the JSON observer.
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Whether to pretty-print the JSON output.
    pub pretty: bool,
    /// Whether to include a timestamp in the output.
    pub include_timestamp: bool,
    /// Whether to wrap the results in a [`SnapshotEnvelope`].
    pub wrap_in_snapshot: bool,
}

/// An observer that serializes snapshots to JSON.
///
/// # Examples
///
/// ```rust,ignore
/// use classifica::leaderboard::Leaderboard;
/// use classifica::observers::json::JsonObserver;
///
/// let board = Leaderboard::new(10)?;
/// board.tally_key("rust".to_string())?;
///
/// let json = JsonObserver::new().to_json(&board.current_snapshot())?;
/// assert_eq!(json, r#"[{"value":"rust","count":1}]"#);
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonObserver {
    config: JsonConfig,
}

impl JsonObserver {
    /// Creates a new JSON observer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new JSON observer with the specified configuration.
    pub fn with_config(config: JsonConfig) -> Self {
        Self { config }
    }

    /// Enables or disables pretty-printing.
    pub fn pretty(mut self, enabled: bool) -> Self {
        self.config.pretty = enabled;
        self
    }

    /// Enables or disables timestamp inclusion.
    ///
    /// Only has effect when `wrap_in_snapshot` is also enabled.
    pub fn include_timestamp(mut self, enabled: bool) -> Self {
        self.config.include_timestamp = enabled;
        self
    }

    /// Enables or disables wrapping the output in a [`SnapshotEnvelope`].
    pub fn wrap_in_snapshot(mut self, enabled: bool) -> Self {
        self.config.wrap_in_snapshot = enabled;
        self
    }

    /// Builds the envelope written in wrapped mode.
    pub fn envelope<'a, K>(&self, snapshot: &'a Snapshot<K>) -> SnapshotEnvelope<'a, K> {
        SnapshotEnvelope {
            timestamp_ms: self
                .config
                .include_timestamp
                .then(current_timestamp_ms),
            total_events: snapshot.total_events,
            results: snapshot.results(),
        }
    }

    /// Serializes a snapshot to a JSON string.
    pub fn to_json<K: Serialize>(
        &self,
        snapshot: &Snapshot<K>,
    ) -> Result<String, serde_json::Error> {
        if self.config.wrap_in_snapshot {
            let envelope = self.envelope(snapshot);
            if self.config.pretty {
                serde_json::to_string_pretty(&envelope)
            } else {
                serde_json::to_string(&envelope)
            }
        } else if self.config.pretty {
            serde_json::to_string_pretty(snapshot.results())
        } else {
            serde_json::to_string(snapshot.results())
        }
    }

    /// Serializes a snapshot to a JSON byte vector.
    pub fn to_json_bytes<K: Serialize>(
        &self,
        snapshot: &Snapshot<K>,
    ) -> Result<Vec<u8>, serde_json::Error> {
        if self.config.wrap_in_snapshot {
            serde_json::to_vec(&self.envelope(snapshot))
        } else {
            serde_json::to_vec(snapshot.results())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::Leaderboard;
    use std::sync::Arc;

    fn sample() -> Snapshot<String> {
        let board = Leaderboard::new(3).unwrap();
        for key in ["rust", "go", "rust"] {
            board.tally_key(key.to_string()).unwrap();
        }
        for _ in 0..4 {
            board.tally_event();
        }
        board.current_snapshot()
    }

    #[test]
    fn test_to_json_empty() {
        let json = JsonObserver::new().to_json(&Snapshot::<String>::empty()).unwrap();
        assert_eq!(json, "[]");
    }

    #[test]
    fn test_to_json_results_only() {
        let json = JsonObserver::new().to_json(&sample()).unwrap();
        assert_eq!(
            json,
            r#"[{"value":"rust","count":2},{"value":"go","count":1}]"#
        );
    }

    #[test]
    fn test_to_json_wrapped() {
        let json = JsonObserver::new()
            .wrap_in_snapshot(true)
            .to_json(&sample())
            .unwrap();
        assert_eq!(
            json,
            r#"{"total_events":4,"results":[{"value":"rust","count":2},{"value":"go","count":1}]}"#
        );
    }

    #[test]
    fn test_to_json_wrapped_with_timestamp() {
        let json = JsonObserver::new()
            .wrap_in_snapshot(true)
            .include_timestamp(true)
            .to_json(&sample())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["timestamp_ms"].as_u64().unwrap() > 0);
        assert_eq!(value["total_events"], 4);
    }

    #[test]
    fn test_timestamp_ignored_without_wrapping() {
        let json = JsonObserver::new()
            .include_timestamp(true)
            .to_json(&sample())
            .unwrap();
        assert!(!json.contains("timestamp_ms"));
    }

    #[test]
    fn test_to_json_pretty() {
        let json = JsonObserver::new().pretty(true).to_json(&sample()).unwrap();
        assert!(json.contains('\n'));
        assert!(json.contains("\"value\": \"rust\""));
    }

    #[test]
    fn test_to_json_bytes_matches_string() {
        let observer = JsonObserver::with_config(JsonConfig {
            wrap_in_snapshot: true,
            ..Default::default()
        });
        let snapshot = sample();
        let bytes = observer.to_json_bytes(&snapshot).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), observer.to_json(&snapshot).unwrap());
    }

    #[test]
    fn test_non_string_keys() {
        let snapshot = Snapshot::new(1, Arc::new(vec![Standing::new(7u32, 3)]));
        let json = JsonObserver::new().to_json(&snapshot).unwrap();
        assert_eq!(json, r#"[{"value":7,"count":3}]"#);
    }
}
