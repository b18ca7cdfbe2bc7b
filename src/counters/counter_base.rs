/// A frequency-counting strategy fed one item at a time.
pub trait Counter {
    /// Ingests one occurrence of `item`.
    fn process(&mut self, item: &str);

    /// Current estimate for `item`, 0 if it was never seen (or was evicted).
    fn query(&self, item: &str) -> u64;

    /// At most `n` tracked items, highest count first, ties by item ascending.
    fn top_n(&self, n: usize) -> Vec<(String, u64)>;

    /// Label used in reports.
    fn name(&self) -> String;
}

/// Sorts `(item, count)` pairs by count descending, then item ascending, and
/// keeps the first `n`.
pub fn rank<'a, I>(entries: I, n: usize) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = (&'a str, u64)>,
{
    let mut ranked: Vec<(&str, u64)> = entries.into_iter().collect();
    ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(n)
        .map(|(item, count)| (item.to_owned(), count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_breaks_ties_by_item() {
        let entries = [("carol", 2), ("bob", 5), ("alice", 2), ("dave", 1)];
        let ranked = rank(entries, 3);
        assert_eq!(
            ranked,
            vec![
                ("bob".to_string(), 5),
                ("alice".to_string(), 2),
                ("carol".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_rank_truncates_to_available() {
        let ranked = rank([("x", 1)], 10);
        assert_eq!(ranked.len(), 1);
        assert!(rank(std::iter::empty(), 4).is_empty());
    }

    #[test]
    fn test_rank_is_case_sensitive() {
        let ranked = rank([("b", 1), ("B", 1), ("a", 1)], 3);
        let items: Vec<&str> = ranked.iter().map(|(item, _)| item.as_str()).collect();
        assert_eq!(items, vec!["B", "a", "b"]);
    }
}
