//! Ranked, immutable views of the leaderboard.
//!
//! A [`Standing`] is a `(key, count)` pair frozen at the instant a podium was
//! ranked, and its [`Ord`] implementation *is* the ranking rule: count
//! descending, then key ascending. A [`Snapshot`] bundles the published
//! standings with the total-event counter.
//!
//! # Serialization
//!
//! With the `serde` feature both types derive `Serialize`/`Deserialize`.
//! A standing serializes as `{"value": <key>, "count": <n>}`:
//!
//! ```rust,ignore
//! use classifica::snapshot::Standing;
//!
//! let standing = Standing::new("rust".to_string(), 3);
//! let json = serde_json::to_string(&standing).unwrap();
//! assert_eq!(json, r#"{"value":"rust","count":3}"#);
//! ```

use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One ranked `(key, count)` result.
///
/// Ordering follows the leaderboard ranking: `a < b` means `a` ranks higher.
///
/// # Examples
///
/// ```rust
/// use classifica::snapshot::Standing;
///
/// // More occurrences rank higher.
/// assert!(Standing::new("a", 2) < Standing::new("z", 1));
/// assert!(Standing::new("z", 2) < Standing::new("a", 1));
///
/// // Equal counts: the smaller key ranks higher.
/// assert!(Standing::new("a", 2) < Standing::new("z", 2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Standing<K> {
    /// The ranked key.
    #[cfg_attr(feature = "serde", serde(rename = "value"))]
    pub key: K,
    /// Its count when the podium was ranked.
    pub count: u64,
}

impl<K> Standing<K> {
    /// Creates a standing.
    pub fn new(key: K, count: u64) -> Self {
        Self { key, count }
    }
}

impl<K: Ord> Ord for Standing<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .count
            .cmp(&self.count)
            .then_with(|| self.key.cmp(&other.key))
    }
}

impl<K: Ord> PartialOrd for Standing<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Display> Display for Standing<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key, self.count)
    }
}

/// A point-in-time view of the leaderboard.
///
/// The results are shared with the engine's published podium and never change
/// once handed out, so cloning a snapshot is cheap and a reader holding one
/// keeps a stable view while writers continue.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Snapshot<K> {
    /// Raw events observed, whether or not they carried keys.
    pub total_events: u64,
    /// Up to N standings, best first.
    pub results: Arc<Vec<Standing<K>>>,
}

impl<K> Snapshot<K> {
    /// Creates a snapshot from already ranked results.
    pub fn new(total_events: u64, results: Arc<Vec<Standing<K>>>) -> Self {
        Self {
            total_events,
            results,
        }
    }

    /// An empty snapshot: no events, no results.
    pub fn empty() -> Self {
        Self::new(0, Arc::new(Vec::new()))
    }

    /// The ranked results, best first.
    pub fn results(&self) -> &[Standing<K>] {
        &self.results
    }

    /// Number of ranked results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns `true` if nothing has been ranked yet.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// The leading standing, if any.
    pub fn leader(&self) -> Option<&Standing<K>> {
        self.results.first()
    }

    /// Iterates `(rank, standing)` pairs with 1-based ranks.
    pub fn ranked(&self) -> impl Iterator<Item = (usize, &Standing<K>)> {
        self.results.iter().enumerate().map(|(i, s)| (i + 1, s))
    }
}

impl<K: PartialEq> Snapshot<K> {
    /// Finds the standing for `key`, if it is on the podium.
    pub fn get(&self, key: &K) -> Option<&Standing<K>> {
        self.results.iter().find(|s| &s.key == key)
    }
}

impl<K: Ord> Snapshot<K> {
    /// Returns `true` if the results are strictly ordered by the ranking rule.
    ///
    /// Strict ordering also rules out duplicate keys.
    pub fn is_ranked(&self) -> bool {
        self.results.windows(2).all(|pair| pair[0] < pair[1])
    }
}

impl<K> Default for Snapshot<K> {
    fn default() -> Self {
        Self::empty()
    }
}
