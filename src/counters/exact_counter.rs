use crate::counters::Counter;
use crate::counters::counter_base::rank;
use std::collections::HashMap;
use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;

/// Plain hash-map tally. Used as ground truth for the approximate counters.
pub struct ExactCounter<S = RandomState> {
    counts: HashMap<String, u64, S>,
    total: u64,
}

impl ExactCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: BuildHasher + Default> Default for ExactCounter<S> {
    fn default() -> Self {
        ExactCounter {
            counts: HashMap::with_hasher(S::default()),
            total: 0,
        }
    }
}

impl<S: BuildHasher> ExactCounter<S> {
    /// Number of occurrences processed so far.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct items seen so far.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }
}

impl<S: BuildHasher> Counter for ExactCounter<S> {
    fn process(&mut self, item: &str) {
        self.total += 1;
        match self.counts.get_mut(item) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(item.to_owned(), 1);
            }
        }
    }

    fn query(&self, item: &str) -> u64 {
        self.counts.get(item).copied().unwrap_or(0)
    }

    fn top_n(&self, n: usize) -> Vec<(String, u64)> {
        rank(self.counts.iter().map(|(item, &count)| (item.as_str(), count)), n)
    }

    fn name(&self) -> String {
        "Exact Counter".to_string()
    }
}
