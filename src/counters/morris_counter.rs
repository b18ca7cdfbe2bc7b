use crate::counters::Counter;
use crate::counters::counter_base::rank;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;

/// Morris approximate counter, one exponent per item.
///
/// An item with exponent `k` is reported as `2^k - 1`. On each occurrence the
/// exponent is incremented with probability `2^-k`, so the first occurrence
/// always lands on `k = 1`. A single run is noisy; the estimate is only
/// unbiased in expectation across independent runs.
pub struct MorrisCounter<R = StdRng, S = RandomState> {
    exponents: HashMap<String, u32, S>,
    rng: R,
}

impl MorrisCounter {
    /// Creates a counter driven by a `StdRng` seeded with `seed`.
    pub fn from_seed(seed: u64) -> Self {
        MorrisCounter::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> MorrisCounter<R> {
    pub fn with_rng(rng: R) -> Self {
        MorrisCounter::with_rng_and_hasher(rng, RandomState::new())
    }
}

impl<R: Rng, S: BuildHasher> MorrisCounter<R, S> {
    pub fn with_rng_and_hasher(rng: R, hasher: S) -> Self {
        MorrisCounter {
            exponents: HashMap::with_hasher(hasher),
            rng,
        }
    }

    /// Stored exponent for `item`, 0 if unseen.
    pub fn exponent(&self, item: &str) -> u32 {
        self.exponents.get(item).copied().unwrap_or(0)
    }

    #[inline(always)]
    fn estimate(k: u32) -> u64 {
        if k >= u64::BITS {
            u64::MAX
        } else {
            (1u64 << k) - 1
        }
    }
}

impl<R: Rng, S: BuildHasher> Counter for MorrisCounter<R, S> {
    fn process(&mut self, item: &str) {
        match self.exponents.get_mut(item) {
            // p = 2^-k, stored exponents are never 0
            Some(k) => {
                if self.rng.random::<f64>() < 0.5f64.powi(*k as i32) {
                    *k += 1;
                }
            }
            // at k = 0 the increment is certain and draws nothing
            None => {
                self.exponents.insert(item.to_owned(), 1);
            }
        }
    }

    fn query(&self, item: &str) -> u64 {
        Self::estimate(self.exponent(item))
    }

    fn top_n(&self, n: usize) -> Vec<(String, u64)> {
        rank(
            self.exponents
                .iter()
                .map(|(item, &k)| (item.as_str(), Self::estimate(k))),
            n,
        )
    }

    fn name(&self) -> String {
        "Morris Counter (1/2^k)".to_string()
    }
}
