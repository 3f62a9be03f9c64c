//! Sharded operational counters used by the leaderboard.
//!
//! The leaderboard keeps a handful of process-wide tallies (raw events seen,
//! keys tallied, contention faults) that every writer bumps on every call.
//! A single atomic would bounce its cache line between every core running a
//! writer, so these counters are sharded across cache-padded slots and summed
//! on read.
//!
//! # Architecture
//!
//! 1. A global atomic counter (`NEXT_SLOT_ID`) assigns sequential IDs to threads
//! 2. Each thread stores its assigned slot index in thread-local storage
//! 3. The slot index is used modulo `NUM_COMPONENTS` (64) to select which
//!    shard a thread writes to
//! 4. Each shard is cache-line padded to prevent false sharing
//!
//! ```text
//!                          ┌─────────────────────────────────────┐
//!                          │       Monotone (events_total)       │
//!                          ├─────────────────────────────────────┤
//!   Writer 0 ──add(1)──►   │ [Slot 0] ████████ (CachePadded)     │
//!   Writer 1 ──add(1)──►   │ [Slot 1] ████████ (CachePadded)     │
//!        ...               │    ...                              │
//!   Writer 63 ─add(1)──►   │ [Slot 63] ███████ (CachePadded)     │
//!                          └─────────────────────────────────────┘
//!                                          │
//!                                          ▼
//!                                   value() sums all
//!                                   slots on read
//! ```
//!
//! Per-key counts do not use this scheme: a 4KB sharded counter per hashtag
//! would dwarf the key itself. See [`crate::counter_table`] for those.

pub mod monotone;

use std::fmt::{Debug, Display};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Number of shards (slots) used by each counter.
///
/// Each slot is cache-line padded, so total memory per counter is
/// `64 slots × 64 bytes = 4,096 bytes`.
pub(crate) const NUM_COMPONENTS: usize = 64;

/// Global counter for assigning slot IDs to threads.
static NEXT_SLOT_ID: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    /// Slot index assigned to the current thread, stable for its lifetime.
    pub(crate) static THREAD_SLOT_INDEX: usize = get_next_slot_id();
}

/// Assigns the next available slot ID to a thread.
///
/// The returned value is in the range `[0, NUM_COMPONENTS)`. Two threads may
/// share a slot after 64 assignments; that only adds contention.
pub fn get_next_slot_id() -> usize {
    NEXT_SLOT_ID.fetch_add(1, Ordering::Relaxed) % NUM_COMPONENTS
}

/// A named counter that observers can read.
///
/// Implemented by [`Monotone`](monotone::Monotone) and handed out by
/// [`Leaderboard::counters`](crate::leaderboard::Leaderboard::counters) so the
/// JSON, table and Prometheus observers can export the engine's own activity
/// next to the podium.
///
/// # Examples
///
/// ```rust
/// use classifica::counters::monotone::Monotone;
/// use classifica::counters::Observable;
///
/// let counter = Monotone::new().with_name("events_total");
/// counter.add(5);
///
/// let observable: &dyn Observable = &counter;
/// assert_eq!(observable.name(), "events_total");
/// assert_eq!(observable.value(), 5);
/// ```
pub trait Observable: Debug {
    /// Returns the name of this counter, or an empty string if unnamed.
    fn name(&self) -> &str;

    /// Returns the current aggregated value of the counter.
    ///
    /// Reading iterates over all shards, so it is more expensive than a write.
    /// Concurrent writes may or may not be included.
    fn value(&self) -> u64;
}

impl Display for dyn Observable + '_ {
    /// Formats the counter as `name:value` if named, or just `value` otherwise.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.name().is_empty() {
            write!(f, "{}:{}", self.name(), self.value())
        } else {
            write!(f, "{}", self.value())
        }
    }
}
