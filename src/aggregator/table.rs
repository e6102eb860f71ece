//! Thread-safe accumulation of allocation totals keyed by folded stack.

use dashmap::DashMap;

/// Concurrent map from folded stack key to total bytes allocated
///
/// Shared behind an `Arc` by every worker for the duration of one run.
/// While shared, `add` is the only mutation; reading the contents requires
/// consuming the table with [`AggregationTable::into_rows`], which the
/// driver can only do once the pool has drained and every worker reference
/// is gone. Totals only ever grow during the run.
#[derive(Debug, Default)]
pub struct AggregationTable {
    totals: DashMap<String, u64>,
}

impl AggregationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically add `amount` to the total for `key`
    ///
    /// Creates a zero counter first if the key is absent. The map's entry
    /// API holds the shard lock across the whole upsert-accumulate, so
    /// concurrent callers can never drop, lose, or double-count an addend.
    pub fn add(&self, key: String, amount: u64) {
        *self.totals.entry(key).or_insert(0) += amount;
    }

    /// Number of distinct stacks seen so far
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Consume the table into (key, total) rows, in arbitrary order
    pub fn into_rows(self) -> Vec<(String, u64)> {
        self.totals.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_add_inserts_then_accumulates() {
        let table = AggregationTable::new();
        table.add("a".to_string(), 100);
        table.add("a".to_string(), 250);
        table.add("b".to_string(), 16);

        let rows: HashMap<_, _> = table.into_rows().into_iter().collect();
        assert_eq!(rows["a"], 350);
        assert_eq!(rows["b"], 16);
    }

    #[test]
    fn test_concurrent_adds_lose_nothing() {
        const THREADS: u64 = 8;
        const ADDS_PER_THREAD: u64 = 1000;

        let table = Arc::new(AggregationTable::new());

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let table = Arc::clone(&table);
                thread::spawn(move || {
                    for i in 0..ADDS_PER_THREAD {
                        // Two keys contended by every thread, one private
                        table.add("shared".to_string(), 1);
                        table.add(format!("key-{}", i % 4), 2);
                        table.add(format!("thread-{t}"), 3);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let table = Arc::try_unwrap(table).unwrap();
        let rows: HashMap<_, _> = table.into_rows().into_iter().collect();

        assert_eq!(rows["shared"], THREADS * ADDS_PER_THREAD);
        for i in 0..4 {
            assert_eq!(rows[&format!("key-{i}")], THREADS * (ADDS_PER_THREAD / 4) * 2);
        }
        for t in 0..THREADS {
            assert_eq!(rows[&format!("thread-{t}")], ADDS_PER_THREAD * 3);
        }
    }

    #[test]
    fn test_totals_are_order_independent() {
        let events = vec![("a", 100u64), ("b", 16), ("a", 250), ("c", 1), ("b", 4)];

        let forward = AggregationTable::new();
        for (key, size) in &events {
            forward.add(key.to_string(), *size);
        }

        let reversed = AggregationTable::new();
        for (key, size) in events.iter().rev() {
            reversed.add(key.to_string(), *size);
        }

        let forward: HashMap<_, _> = forward.into_rows().into_iter().collect();
        let reversed: HashMap<_, _> = reversed.into_rows().into_iter().collect();
        assert_eq!(forward, reversed);
    }
}
