use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Name of the item with the given 1-based popularity rank.
pub fn item_name(rank: usize) -> String {
    format!("actor-{:05}", rank)
}

/// Generates `len` draws from a Zipf distribution over `distinct` items with
/// exponent `s` (item of rank `r` has weight `r^-s`).
///
/// The same arguments always produce the same stream.
pub fn zipf_stream(distinct: usize, len: usize, s: f64, seed: u64) -> Vec<String> {
    if distinct == 0 {
        return Vec::new();
    }

    let mut cumulative = Vec::with_capacity(distinct);
    let mut total = 0.0;
    for rank in 1..=distinct {
        total += (rank as f64).powf(-s);
        cumulative.push(total);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            let target = rng.random::<f64>() * total;
            let idx = cumulative.partition_point(|&c| c <= target);
            item_name(idx.min(distinct - 1) + 1)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zipf_is_deterministic() {
        assert_eq!(zipf_stream(50, 500, 1.1, 9), zipf_stream(50, 500, 1.1, 9));
        assert_ne!(zipf_stream(50, 500, 1.1, 9), zipf_stream(50, 500, 1.1, 10));
    }

    #[test]
    fn test_zipf_head_dominates() {
        let stream = zipf_stream(100, 10_000, 1.2, 1);
        let first = stream.iter().filter(|s| **s == item_name(1)).count();
        let tenth = stream.iter().filter(|s| **s == item_name(10)).count();
        assert_eq!(stream.len(), 10_000);
        assert!(first > 5 * tenth);
    }

    #[test]
    fn test_zipf_empty() {
        assert!(zipf_stream(0, 10, 1.0, 0).is_empty());
        assert!(zipf_stream(10, 0, 1.0, 0).is_empty());
    }
}
