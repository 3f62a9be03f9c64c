//! The leaderboard engine.
//!
//! [`Leaderboard`] owns the [`CounterTable`], keeps the bounded podium of the N
//! best-ranked entries up to date on every tally, and publishes an immutable
//! ranking that readers can fetch at any time without blocking.
//!
//! # Concurrency
//!
//! ```text
//!   writer ── tally_key(k) ──► CounterTable::increment     (shard lock + atomic add)
//!                                     │
//!                                     ▼
//!                          podium lock (bounded wait) ──► Podium::admit (≤ N+1 sort)
//!                                     │
//!                                     ▼
//!                          ArcSwap::store(standings)   (single pointer swap)
//!
//!   reader ── current_snapshot() ──► ArcSwap::load_full + events_total  (never blocks)
//! ```
//!
//! The podium lock is the only coarse-grained lock and guards a sort of at most
//! N+1 elements. Publication happens inside it, so standings are published in
//! the order podiums were ranked.
//!
//! # Contention faults
//!
//! Entering the podium lock waits at most [`lock_timeout`](Leaderboard::lock_timeout)
//! (one second by default). When that elapses the tally returns
//! [`LeaderboardError::Contention`]: the increment was recorded, the published
//! ranking was not refreshed, and the caller is expected to treat the fault as
//! fatal rather than keep serving silently stale rankings.

mod podium;

use std::borrow::Borrow;
use std::fmt::{self, Debug};
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use tracing::{debug, error};

use crate::counter_table::{CounterTable, Key};
use crate::counters::monotone::Monotone;
use crate::counters::Observable;
use crate::error::{LeaderboardError, Result};
use crate::snapshot::{Snapshot, Standing};

use podium::Podium;

/// Default bounded wait for the podium lock.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(1);

/// A concurrent, incrementally maintained top-N leaderboard.
///
/// Share it between writers and readers with an `Arc`.
///
/// # Examples
///
/// ```rust
/// use classifica::leaderboard::Leaderboard;
/// use classifica::snapshot::Standing;
///
/// let board = Leaderboard::new(3)?;
/// for key in ["a", "c", "c", "b", "b", "b", "z"] {
///     board.tally_key(key)?;
/// }
/// board.tally_event();
///
/// let snapshot = board.current_snapshot();
/// assert_eq!(snapshot.total_events, 1);
/// assert_eq!(
///     snapshot.results(),
///     &[Standing::new("b", 3), Standing::new("c", 2), Standing::new("a", 1)]
/// );
/// # Ok::<(), classifica::error::LeaderboardError>(())
/// ```
pub struct Leaderboard<K: Key> {
    table: CounterTable<K>,
    podium: Mutex<Podium<K>>,
    published: ArcSwap<Vec<Standing<K>>>,
    podium_size: usize,
    lock_timeout: Duration,
    events: Monotone,
    tallies: Monotone,
    faults: Monotone,
}

impl<K: Key> Leaderboard<K> {
    /// Creates a leaderboard that ranks the best `podium_size` keys.
    ///
    /// # Errors
    ///
    /// [`LeaderboardError::InvalidPodiumSize`] if `podium_size` is zero.
    pub fn new(podium_size: usize) -> Result<Self> {
        if podium_size == 0 {
            return Err(LeaderboardError::InvalidPodiumSize(podium_size));
        }
        Ok(Self {
            table: CounterTable::new(),
            podium: Mutex::new(Podium::new(podium_size)),
            published: ArcSwap::from_pointee(Vec::new()),
            podium_size,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            events: Monotone::new().with_name("events_total"),
            tallies: Monotone::new().with_name("tallies_total"),
            faults: Monotone::new().with_name("contention_faults_total"),
        })
    }

    /// Overrides the bounded wait for the podium lock.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// The configured N.
    pub fn podium_size(&self) -> usize {
        self.podium_size
    }

    /// The bounded wait for the podium lock.
    pub fn lock_timeout(&self) -> Duration {
        self.lock_timeout
    }

    /// Records one occurrence of `key` and re-ranks the podium.
    ///
    /// # Errors
    ///
    /// [`LeaderboardError::Contention`] if the podium lock could not be entered
    /// within the bounded wait. The occurrence is still counted.
    pub fn tally_key(&self, key: K) -> Result<()> {
        let (entry, _) = self.table.increment(key);
        self.tallies.add(1);

        let Some(mut podium) = self.podium.try_lock_for(self.lock_timeout) else {
            self.faults.add(1);
            error!(
                timeout_ms = self.lock_timeout.as_millis() as u64,
                "unable to acquire a timely lock on the podium"
            );
            return Err(LeaderboardError::Contention {
                timeout: self.lock_timeout,
            });
        };

        let (standings, entered) = podium.admit(entry);
        if entered {
            debug!(podium = standings.len(), "new key entered the podium");
        }
        self.published.store(Arc::new(standings));
        Ok(())
    }

    /// Records one raw event, independent of any key.
    #[inline]
    pub fn tally_event(&self) {
        self.events.add(1);
    }

    /// Returns the latest published ranking with the current event total.
    ///
    /// Never blocks on writers; a reader keeps seeing the last successfully
    /// published ranking even while the writer path is faulting.
    pub fn current_snapshot(&self) -> Snapshot<K> {
        Snapshot::new(self.events.value(), self.published.load_full())
    }

    /// Number of raw events recorded so far.
    pub fn total_events(&self) -> u64 {
        self.events.value()
    }

    /// Reads the exact count for `key` from the counter table.
    pub fn count<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.get(key)
    }

    /// The underlying counter table.
    pub fn counter_table(&self) -> &CounterTable<K> {
        &self.table
    }

    /// The engine's own activity counters, for observers.
    ///
    /// `events_total`, `tallies_total` and `contention_faults_total`.
    pub fn counters(&self) -> [&dyn Observable; 3] {
        [&self.events, &self.tallies, &self.faults]
    }

    /// Holds the podium lock, so callers can provoke contention faults.
    #[cfg(test)]
    pub(crate) fn hold_podium(&self) -> parking_lot::MutexGuard<'_, Podium<K>> {
        self.podium.lock()
    }
}

impl<K: Key> Debug for Leaderboard<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Leaderboard")
            .field("podium_size", &self.podium_size)
            .field("lock_timeout", &self.lock_timeout)
            .field("keys", &self.table.len())
            .field("podium", &self.podium.try_lock().map(|p| p.len()))
            .field("events", &self.events.value())
            .finish()
    }
}
