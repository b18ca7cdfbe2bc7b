use crate::counters::Counter;
use crate::counters::counter_base::rank;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;

/// Frequent-Count (Misra-Gries) heavy-hitters counter.
///
/// At most `capacity` items are tracked. When an untracked item arrives and
/// the table is full, every tracked count is decremented by one and entries
/// reaching zero are dropped; the arriving item is not inserted.
///
/// Estimates never exceed the true count, and any item occurring more than
/// `n / (capacity + 1)` times in a stream of length `n` is still tracked at the
/// end of the stream.
pub struct FrequentCounter<S = RandomState> {
    capacity: usize,
    counts: HashMap<String, u64, S>,
    processed: u64,
}

impl FrequentCounter {
    pub fn new(capacity: usize) -> Result<Self> {
        FrequentCounter::with_hasher(capacity, RandomState::new())
    }
}

impl<S: BuildHasher> FrequentCounter<S> {
    pub fn with_hasher(capacity: usize, hasher: S) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidConfiguration(
                "frequent counter capacity must be positive".to_string(),
            ));
        }

        Ok(FrequentCounter {
            capacity,
            counts: HashMap::with_capacity_and_hasher(capacity, hasher),
            processed: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of items currently tracked.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn contains(&self, item: &str) -> bool {
        self.counts.contains_key(item)
    }

    /// Stream length processed so far.
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Frequency above which an item is guaranteed to be tracked.
    pub fn guarantee_threshold(&self) -> f64 {
        self.processed as f64 / (self.capacity + 1) as f64
    }
}

impl<S: BuildHasher> Counter for FrequentCounter<S> {
    fn process(&mut self, item: &str) {
        self.processed += 1;

        if let Some(count) = self.counts.get_mut(item) {
            *count += 1;
        } else if self.counts.len() < self.capacity {
            self.counts.insert(item.to_owned(), 1);
        } else {
            self.counts.retain(|_, count| {
                *count -= 1;
                *count > 0
            });
        }
    }

    fn query(&self, item: &str) -> u64 {
        self.counts.get(item).copied().unwrap_or(0)
    }

    fn top_n(&self, n: usize) -> Vec<(String, u64)> {
        rank(self.counts.iter().map(|(item, &count)| (item.as_str(), count)), n)
    }

    fn name(&self) -> String {
        format!("Frequent-Count (k={})", self.capacity)
    }
}
