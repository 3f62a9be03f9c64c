//! Monotone counter with sharded atomic storage.
//!
//! [`Monotone`] only ever increases. The leaderboard uses it for the
//! total-event counter and for its own operational tallies, all of which are
//! bumped by every writer thread and read rarely.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_utils::CachePadded;

use crate::counters::{Observable, NUM_COMPONENTS, THREAD_SLOT_INDEX};

/// A monotonically increasing counter using sharded atomic storage.
///
/// Instead of a single atomic variable, updates are distributed across 64
/// cache-line-padded slots, one per writer thread (modulo 64).
///
/// # Examples
///
/// ```rust
/// use classifica::counters::monotone::Monotone;
/// use classifica::counters::Observable;
/// use std::sync::Arc;
/// use std::thread;
///
/// let counter = Arc::new(Monotone::new());
/// let mut handles = vec![];
///
/// for _ in 0..4 {
///     let c = Arc::clone(&counter);
///     handles.push(thread::spawn(move || {
///         for _ in 0..1000 {
///             c.add(1);
///         }
///     }));
/// }
///
/// for h in handles {
///     h.join().unwrap();
/// }
///
/// assert_eq!(counter.value(), 4000);
/// ```
pub struct Monotone {
    name: &'static str,
    components: [CachePadded<AtomicU64>; NUM_COMPONENTS],
}

impl Monotone {
    /// Creates a new unnamed counter initialized to zero.
    pub const fn new() -> Self {
        const ZERO: CachePadded<AtomicU64> = CachePadded::new(AtomicU64::new(0));
        Monotone {
            components: [ZERO; NUM_COMPONENTS],
            name: "",
        }
    }

    /// Sets the name of this counter, returning `self` for method chaining.
    pub const fn with_name(self, name: &'static str) -> Self {
        Self { name, ..self }
    }

    /// Adds `value` to the current thread's shard. Lock-free.
    #[inline]
    pub fn add(&self, value: u64) {
        self.component().fetch_add(value, Ordering::Relaxed);
    }

    /// Returns the value of the current thread's shard.
    #[inline]
    pub fn local_value(&self) -> u64 {
        self.component().load(Ordering::Relaxed)
    }

    #[inline]
    fn component(&self) -> &AtomicU64 {
        THREAD_SLOT_INDEX.with(|idx| &self.components[*idx])
    }

    #[inline]
    fn total_value(&self) -> u64 {
        self.components
            .iter()
            .map(|counter| counter.load(Ordering::Relaxed))
            .sum()
    }
}

impl Observable for Monotone {
    #[inline]
    fn name(&self) -> &'static str {
        self.name
    }

    /// Sums all 64 shards.
    #[inline]
    fn value(&self) -> u64 {
        self.total_value()
    }
}

impl Default for Monotone {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Monotone {
    /// Formats the counter showing non-zero shards.
    ///
    /// Output format: `name{ [slot]:value [slot]:value ... }`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{{", self.name)?;
        for (i, counter) in self.components.iter().enumerate() {
            let val = counter.load(Ordering::Relaxed);
            if val != 0 {
                write!(f, " [{i}]:{val}")?;
            }
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let counter = Monotone::new();
        assert_eq!(counter.value(), 0);
        assert_eq!(counter.name(), "");
    }

    #[test]
    fn test_add() {
        let counter = Monotone::new();
        counter.add(1);
        assert_eq!(counter.value(), 1);
        counter.add(1);
        counter.add(3);
        assert_eq!(counter.value(), 5);
    }

    #[test]
    fn test_local_value() {
        let counter = Monotone::new();
        assert_eq!(counter.local_value(), 0);
        counter.add(2);
        assert_eq!(counter.local_value(), 2);
    }

    #[test]
    fn test_dyn_format() {
        let counter = Monotone::new().with_name("events_total");
        counter.add(7);
        let formatted = format!("{}", &counter as &dyn Observable);
        assert_eq!(formatted, "events_total:7");
    }

    #[test]
    fn test_dyn_format_unnamed() {
        let counter = Monotone::new();
        counter.add(3);
        assert_eq!(format!("{}", &counter as &dyn Observable), "3");
    }

    #[test]
    fn test_debug_shows_nonzero_shards() {
        let counter = Monotone::new().with_name("tallies_total");
        counter.add(2);
        let debug_str = format!("{:?}", counter);
        assert!(debug_str.starts_with("tallies_total{"));
        assert!(debug_str.contains(":2"));
        assert!(debug_str.ends_with("}"));
    }

    #[test]
    fn test_multiple_threads() {
        use std::sync::Arc;
        use std::thread;

        let counter = Arc::new(Monotone::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    for _ in 0..500 {
                        counter.add(1);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(counter.value(), 4000);
    }

    #[test]
    fn test_static_counter() {
        static EVENTS: Monotone = Monotone::new().with_name("static_events");
        EVENTS.add(1);
        assert!(EVENTS.value() >= 1);
        assert_eq!(EVENTS.name(), "static_events");
    }
}
