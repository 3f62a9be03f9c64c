//! Bounded top-N candidate list.
//!
//! Counts only ever move by +1 and only for the key just tallied, so a key that
//! is neither on the podium nor the one just incremented cannot have overtaken
//! the current last place. Re-ranking the previous podium plus the touched
//! entry (at most N+1 candidates) is therefore enough, and the unbounded
//! counter table is never rescanned.

use std::sync::Arc;

use crate::counter_table::{Entry, Key};
use crate::snapshot::Standing;

/// The entries currently holding a place, best first.
///
/// Not synchronized: the leaderboard owns it behind its podium lock.
pub(crate) struct Podium<K> {
    capacity: usize,
    entries: Vec<Arc<Entry<K>>>,
}

impl<K: Key> Podium<K> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity + 1),
        }
    }

    /// Re-ranks the podium after `entry` was incremented.
    ///
    /// Every candidate's count is read exactly once and frozen into a
    /// [`Standing`] before sorting: concurrent increments keep landing on the
    /// shared entries, and sorting on live counts would rank against values
    /// that change mid-sort. The returned standings are the ones the podium
    /// was ranked by. The second value is `true` if `entry` was not on the
    /// podium before this call and is on it now.
    pub(crate) fn admit(&mut self, entry: Arc<Entry<K>>) -> (Vec<Standing<K>>, bool) {
        // One entry per key: pointer identity is key identity.
        let newcomer = !self.entries.iter().any(|e| Arc::ptr_eq(e, &entry));
        if newcomer {
            self.entries.push(Arc::clone(&entry));
        }

        let mut ranked: Vec<(Standing<K>, Arc<Entry<K>>)> = self
            .entries
            .drain(..)
            .map(|e| (Standing::new(e.key().clone(), e.count()), e))
            .collect();
        ranked.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        ranked.truncate(self.capacity);

        let mut standings = Vec::with_capacity(ranked.len());
        let mut entered = false;
        for (standing, e) in ranked {
            entered |= newcomer && Arc::ptr_eq(&e, &entry);
            standings.push(standing);
            self.entries.push(e);
        }
        (standings, entered)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter_table::CounterTable;

    fn tally(
        table: &CounterTable<&'static str>,
        podium: &mut Podium<&'static str>,
        key: &'static str,
    ) -> Vec<Standing<&'static str>> {
        let (entry, _) = table.increment(key);
        podium.admit(entry).0
    }

    #[test]
    fn test_admit_ranks_and_truncates() {
        let table = CounterTable::new();
        let mut podium = Podium::new(3);

        let mut last = Vec::new();
        for key in ["a", "c", "c", "b", "b", "b", "z"] {
            last = tally(&table, &mut podium, key);
        }

        assert_eq!(
            last,
            vec![
                Standing::new("b", 3),
                Standing::new("c", 2),
                Standing::new("a", 1),
            ]
        );
        assert_eq!(podium.len(), 3);
    }

    #[test]
    fn test_admit_is_idempotent_for_present_entry() {
        let table = CounterTable::new();
        let mut podium = Podium::new(2);

        let (entry, _) = table.increment("a");
        let (first, entered) = podium.admit(Arc::clone(&entry));
        assert!(entered);
        let (second, entered) = podium.admit(entry);
        assert!(!entered);

        assert_eq!(first, second);
        assert_eq!(podium.len(), 1);
    }

    #[test]
    fn test_newcomer_that_misses_the_cut_is_not_entered() {
        let table = CounterTable::new();
        let mut podium = Podium::new(1);

        tally(&table, &mut podium, "a");
        tally(&table, &mut podium, "a");
        let (entry, _) = table.increment("b");
        let (standings, entered) = podium.admit(entry);

        assert!(!entered);
        assert_eq!(standings, vec![Standing::new("a", 2)]);
    }

    #[test]
    fn test_tie_keeps_smaller_key() {
        let table = CounterTable::new();
        let mut podium = Podium::new(1);

        tally(&table, &mut podium, "x");
        tally(&table, &mut podium, "y");
        tally(&table, &mut podium, "y");
        let last = tally(&table, &mut podium, "x");

        assert_eq!(last, vec![Standing::new("x", 2)]);
    }
}
