//! Prometheus observer for exporting the leaderboard using the official `prometheus` crate.
//!
//! This module provides [`PrometheusObserver`], which exports the engine
//! counters ([`Observable`]) and the current podium of a [`Snapshot`] to a
//! Prometheus registry and renders them using the official text format.
//!
//! # Feature Flag
//!
//! This module requires the `prometheus` feature:
//!
//! ```toml
//! [dependencies]
//! classifica = { version = "0.1", features = ["prometheus"] }
//! ```
//!
//! # Exported metrics
//!
//! - one metric per engine counter, named after the counter
//!   (`events_total`, `tallies_total`, `contention_faults_total`)
//! - `podium_count`, a gauge vector carrying the frozen count of every ranked
//!   key, labelled by `key` and `rank`
//!
//! ```text
//! # HELP classifica_events_total events_total metric
//! # TYPE classifica_events_total counter
//! classifica_events_total 1000
//! # HELP classifica_podium_count Frozen count of each ranked key
//! # TYPE classifica_podium_count gauge
//! classifica_podium_count{key="rust",rank="1"} 42
//! classifica_podium_count{key="go",rank="2"} 17
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use classifica::observers::prometheus::{PrometheusObserver, MetricType};
//!
//! let observer = PrometheusObserver::new()
//!     .with_namespace("classifica")
//!     .with_const_label("instance", "localhost:8080")
//!     .with_help("events_total", "Raw events observed");
//!
//! let output = observer.render(&board.current_snapshot(), board.counters().into_iter())?;
//! ```

use std::collections::HashMap;
use std::fmt::Display;

use prometheus::{Encoder, IntCounter, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder};

use crate::counters::Observable;
use crate::observers::{PrometheusError, Result};
use crate::snapshot::Snapshot;

/// Name of the gauge vector carrying the podium.
pub const PODIUM_METRIC: &str = "podium_count";

/// Prometheus metric type.
///
/// Determines how a counter is registered and displayed in Prometheus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MetricType {
    /// A counter is a cumulative metric that only ever goes up.
    #[default]
    Counter,
    /// A gauge can go up and down.
    Gauge,
}

/// Configuration for a specific metric.
#[derive(Debug, Clone, Default)]
pub struct MetricConfig {
    /// The type of metric (Counter or Gauge).
    pub metric_type: MetricType,
    /// Help text describing the metric.
    pub help: Option<String>,
    /// Additional constant labels specific to this metric.
    pub labels: HashMap<String, String>,
}

/// Observer that exports the leaderboard to Prometheus format.
///
/// A fresh [`Registry`] is populated on every render, so repeated scrapes
/// never collide with metrics registered by a previous call.
#[derive(Debug, Clone, Default)]
pub struct PrometheusObserver {
    /// Namespace (prefix) for all metrics.
    namespace: Option<String>,
    /// Subsystem for all metrics.
    subsystem: Option<String>,
    /// Constant labels applied to all metrics.
    const_labels: HashMap<String, String>,
    /// Per-metric configuration.
    metric_configs: HashMap<String, MetricConfig>,
    /// Default metric type when not specified.
    default_type: MetricType,
}

impl PrometheusObserver {
    /// Creates a new `PrometheusObserver` with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the namespace (prefix) for all metrics.
    ///
    /// For example, namespace "classifica" + metric "events_total" =
    /// "classifica_events_total".
    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = Some(namespace.to_string());
        self
    }

    /// Sets the subsystem for all metrics.
    ///
    /// The subsystem appears between namespace and metric name.
    pub fn with_subsystem(mut self, subsystem: &str) -> Self {
        self.subsystem = Some(subsystem.to_string());
        self
    }

    /// Adds a constant label to all metrics.
    pub fn with_const_label(mut self, name: &str, value: &str) -> Self {
        self.const_labels
            .insert(name.to_string(), value.to_string());
        self
    }

    /// Sets the default metric type for counters without explicit configuration.
    pub fn with_default_type(mut self, metric_type: MetricType) -> Self {
        self.default_type = metric_type;
        self
    }

    /// Configures a specific metric.
    pub fn with_metric_config(mut self, name: &str, config: MetricConfig) -> Self {
        self.metric_configs.insert(name.to_string(), config);
        self
    }

    /// Sets the metric type for a specific counter.
    pub fn with_type(mut self, name: &str, metric_type: MetricType) -> Self {
        self.metric_configs
            .entry(name.to_string())
            .or_default()
            .metric_type = metric_type;
        self
    }

    /// Sets the help text for a specific metric.
    pub fn with_help(mut self, name: &str, help: &str) -> Self {
        self.metric_configs
            .entry(name.to_string())
            .or_default()
            .help = Some(help.to_string());
        self
    }

    /// Sanitizes a metric name to be Prometheus-compatible.
    ///
    /// Prometheus metric names must match `[a-zA-Z_:][a-zA-Z0-9_:]*`.
    fn sanitize_name(name: &str) -> String {
        let mut result = String::with_capacity(name.len());
        for c in name.chars() {
            if c.is_ascii_alphanumeric() || c == '_' || c == ':' {
                result.push(c);
            } else if c == '-' || c == '.' || c == ' ' {
                result.push('_');
            }
        }
        if result.is_empty() {
            result.push_str("unnamed");
        }
        if result
            .chars()
            .next()
            .map(|c| c.is_ascii_digit())
            .unwrap_or(false)
        {
            result.insert(0, '_');
        }
        result
    }

    /// Builds the full metric name with namespace and subsystem.
    fn build_full_name(&self, name: &str) -> String {
        let sanitized = Self::sanitize_name(name);
        match (&self.namespace, &self.subsystem) {
            (Some(ns), Some(ss)) => format!("{}_{}_{}", ns, ss, sanitized),
            (Some(ns), None) => format!("{}_{}", ns, sanitized),
            (None, Some(ss)) => format!("{}_{}", ss, sanitized),
            (None, None) => sanitized,
        }
    }

    /// Builds the options for a metric, merging global and per-metric labels.
    fn opts(&self, raw_name: &str, default_help: String) -> Opts {
        let config = self.metric_configs.get(raw_name);
        let help = config
            .and_then(|c| c.help.clone())
            .unwrap_or(default_help);

        let mut labels = self.const_labels.clone();
        if let Some(cfg) = config {
            labels.extend(cfg.labels.clone());
        }

        Opts::new(self.build_full_name(raw_name), help).const_labels(labels)
    }

    /// Renders the engine counters and the podium to Prometheus exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if metric creation, registration, or encoding fails
    /// (for instance when two counters sanitize to the same name).
    pub fn render<'a, K: Display>(
        &self,
        snapshot: &Snapshot<K>,
        counters: impl Iterator<Item = &'a dyn Observable>,
    ) -> Result<String> {
        let registry = Registry::new();

        for counter in counters {
            self.register_counter(&registry, counter)?;
        }

        if !snapshot.is_empty() {
            self.register_podium(&registry, snapshot)?;
        }

        Self::encode_registry(&registry)
    }

    /// Renders to bytes (useful for HTTP responses).
    ///
    /// # Errors
    ///
    /// Returns an error if metric creation, registration, or encoding fails.
    pub fn render_bytes<'a, K: Display>(
        &self,
        snapshot: &Snapshot<K>,
        counters: impl Iterator<Item = &'a dyn Observable>,
    ) -> Result<Vec<u8>> {
        Ok(self.render(snapshot, counters)?.into_bytes())
    }

    fn register_counter(&self, registry: &Registry, counter: &dyn Observable) -> Result<()> {
        let raw_name = if counter.name().is_empty() {
            "unnamed"
        } else {
            counter.name()
        };

        let metric_type = self
            .metric_configs
            .get(raw_name)
            .map(|c| c.metric_type)
            .unwrap_or(self.default_type);
        let opts = self.opts(raw_name, format!("{} metric", raw_name));
        let value = counter.value();

        match metric_type {
            MetricType::Counter => {
                let metric = IntCounter::with_opts(opts)?;
                metric.inc_by(value);
                registry.register(Box::new(metric))?;
            }
            MetricType::Gauge => {
                let metric = IntGauge::with_opts(opts)?;
                metric.set(i64::try_from(value).unwrap_or(i64::MAX));
                registry.register(Box::new(metric))?;
            }
        }
        Ok(())
    }

    fn register_podium<K: Display>(&self, registry: &Registry, snapshot: &Snapshot<K>) -> Result<()> {
        let opts = self.opts(PODIUM_METRIC, "Frozen count of each ranked key".to_string());
        let podium = IntGaugeVec::new(opts, &["key", "rank"])?;

        for (rank, standing) in snapshot.ranked() {
            let key = standing.key.to_string();
            let rank = rank.to_string();
            podium
                .with_label_values(&[key.as_str(), rank.as_str()])
                .set(i64::try_from(standing.count).unwrap_or(i64::MAX));
        }

        registry.register(Box::new(podium))?;
        Ok(())
    }

    fn encode_registry(registry: &Registry) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| PrometheusError::EncodeError(e.to_string()))?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counters::monotone::Monotone;
    use crate::leaderboard::Leaderboard;
    use crate::snapshot::Standing;
    use std::sync::Arc;

    fn podium() -> Snapshot<&'static str> {
        Snapshot::new(
            10,
            Arc::new(vec![Standing::new("rust", 42), Standing::new("go", 17)]),
        )
    }

    fn no_counters<'a>() -> std::iter::Empty<&'a dyn Observable> {
        std::iter::empty()
    }

    #[test]
    fn test_render_empty() {
        let observer = PrometheusObserver::new();
        let output = observer
            .render(&Snapshot::<String>::empty(), no_counters())
            .unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_render_single_counter() {
        let counter = Monotone::new().with_name("events_total");
        counter.add(42);

        let observer = PrometheusObserver::new();
        let counters: Vec<&dyn Observable> = vec![&counter];
        let output = observer
            .render(&Snapshot::<String>::empty(), counters.into_iter())
            .unwrap();

        assert!(output.contains("# TYPE events_total counter"));
        assert!(output.contains("events_total 42"));
    }

    #[test]
    fn test_render_podium() {
        let output = PrometheusObserver::new()
            .render(&podium(), no_counters())
            .unwrap();

        assert!(output.contains("# TYPE podium_count gauge"));
        assert!(output.contains("podium_count{key=\"rust\",rank=\"1\"} 42"));
        assert!(output.contains("podium_count{key=\"go\",rank=\"2\"} 17"));
    }

    #[test]
    fn test_render_with_namespace_and_subsystem() {
        let counter = Monotone::new().with_name("events_total");
        counter.add(100);

        let observer = PrometheusObserver::new()
            .with_namespace("classifica")
            .with_subsystem("hashtags");
        let counters: Vec<&dyn Observable> = vec![&counter];
        let output = observer.render(&podium(), counters.into_iter()).unwrap();

        assert!(output.contains("classifica_hashtags_events_total 100"));
        assert!(output.contains("classifica_hashtags_podium_count{"));
    }

    #[test]
    fn test_render_with_help() {
        let counter = Monotone::new().with_name("events_total");
        counter.add(50);

        let observer = PrometheusObserver::new()
            .with_help("events_total", "Raw events observed")
            .with_help(PODIUM_METRIC, "Current podium");
        let counters: Vec<&dyn Observable> = vec![&counter];
        let output = observer.render(&podium(), counters.into_iter()).unwrap();

        assert!(output.contains("# HELP events_total Raw events observed"));
        assert!(output.contains("# HELP podium_count Current podium"));
    }

    #[test]
    fn test_render_with_type_gauge() {
        let counter = Monotone::new().with_name("tallies_total");
        counter.add(25);

        let observer = PrometheusObserver::new().with_type("tallies_total", MetricType::Gauge);
        let counters: Vec<&dyn Observable> = vec![&counter];
        let output = observer
            .render(&Snapshot::<String>::empty(), counters.into_iter())
            .unwrap();

        assert!(output.contains("# TYPE tallies_total gauge"));
        assert!(output.contains("tallies_total 25"));
    }

    #[test]
    fn test_render_with_const_labels() {
        let counter = Monotone::new().with_name("requests");
        counter.add(100);

        let observer = PrometheusObserver::new().with_const_label("instance", "localhost:8080");
        let counters: Vec<&dyn Observable> = vec![&counter];
        let output = observer
            .render(&podium(), counters.into_iter())
            .unwrap();

        assert!(output.contains("requests{instance=\"localhost:8080\"} 100"));
        let podium_line = output
            .lines()
            .find(|l| l.starts_with("podium_count{") && l.contains("rust"))
            .unwrap();
        assert!(podium_line.contains("instance=\"localhost:8080\""));
        assert!(podium_line.ends_with(" 42"));
    }

    #[test]
    fn test_with_default_type() {
        let counter = Monotone::new().with_name("test");
        counter.add(10);

        let observer = PrometheusObserver::new().with_default_type(MetricType::Gauge);
        let counters: Vec<&dyn Observable> = vec![&counter];
        let output = observer
            .render(&Snapshot::<String>::empty(), counters.into_iter())
            .unwrap();

        assert!(output.contains("# TYPE test gauge"));
    }

    #[test]
    fn test_unnamed_counter() {
        let counter = Monotone::new();
        counter.add(42);

        let counters: Vec<&dyn Observable> = vec![&counter];
        let output = PrometheusObserver::new()
            .render(&Snapshot::<String>::empty(), counters.into_iter())
            .unwrap();

        assert!(output.contains("unnamed 42"));
    }

    #[test]
    fn test_duplicate_names_fail() {
        let a = Monotone::new().with_name("same");
        let b = Monotone::new().with_name("same");

        let counters: Vec<&dyn Observable> = vec![&a, &b];
        let result = PrometheusObserver::new().render(&Snapshot::<String>::empty(), counters.into_iter());
        assert!(result.is_err());
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(PrometheusObserver::sanitize_name("valid_name"), "valid_name");
        assert_eq!(PrometheusObserver::sanitize_name("with-dash"), "with_dash");
        assert_eq!(PrometheusObserver::sanitize_name("with.dot"), "with_dot");
        assert_eq!(PrometheusObserver::sanitize_name("with space"), "with_space");
        assert_eq!(PrometheusObserver::sanitize_name(""), "unnamed");
        assert_eq!(PrometheusObserver::sanitize_name("123starts"), "_123starts");
    }

    #[test]
    fn test_render_leaderboard() {
        let board = Leaderboard::new(2).unwrap();
        for key in ["rust", "go", "rust", "zig"] {
            board.tally_event();
            board.tally_key(key.to_string()).unwrap();
        }

        let output = PrometheusObserver::new()
            .with_namespace("classifica")
            .render(&board.current_snapshot(), board.counters().into_iter())
            .unwrap();

        assert!(output.contains("classifica_events_total 4"));
        assert!(output.contains("classifica_tallies_total 4"));
        assert!(output.contains("classifica_contention_faults_total 0"));
        assert!(output.contains("classifica_podium_count{key=\"rust\",rank=\"1\"} 2"));
        assert!(output.contains("classifica_podium_count{key=\"go\",rank=\"2\"} 1"));
        assert!(!output.contains("key=\"zig\""));
    }

    #[test]
    fn test_render_bytes() {
        let bytes = PrometheusObserver::new()
            .render_bytes(&podium(), no_counters())
            .unwrap();
        let output = String::from_utf8(bytes).unwrap();
        assert!(output.contains("podium_count{key=\"rust\",rank=\"1\"} 42"));
    }
}
