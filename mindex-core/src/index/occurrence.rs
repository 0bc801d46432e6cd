//! Key occurrence statistics and the repetitive-seed cutoff

use serde::{Deserialize, Serialize};

use crate::seed::Minimizer;
use crate::types::SeedSpan;

/// Frequency profile of the keys in a sorted seed array
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OccurrenceStats {
    /// Occurrences of the most frequent key
    pub max_occurrence: usize,
    /// Keys occurring more often than this are ignored at query time
    pub cutoff: usize,
    /// Fraction of keys that occur exactly once
    pub singleton_fraction: f64,
    /// Mean occurrences per key
    pub average_occurrence: f64,
    /// Number of distinct keys
    pub num_keys: usize,
}

impl OccurrenceStats {
    /// Compute statistics from a seed array sorted by key.
    pub fn from_sorted_seeds(
        seeds: &[u128],
        frequency_percentile: f64,
        min_cutoff: usize,
    ) -> Self {
        Self::from_run_lengths(key_run_lengths(seeds), frequency_percentile, min_cutoff)
    }

    /// Compute statistics from the per-key spans of a built index.
    pub fn from_spans(spans: &[SeedSpan], frequency_percentile: f64, min_cutoff: usize) -> Self {
        Self::from_run_lengths(
            spans.iter().map(SeedSpan::len).collect(),
            frequency_percentile,
            min_cutoff,
        )
    }

    /// The cutoff drops the `frequency_percentile` most frequent keys; it is
    /// floored at `min_cutoff` and at 1.
    pub fn from_run_lengths(
        mut counts: Vec<usize>,
        frequency_percentile: f64,
        min_cutoff: usize,
    ) -> Self {
        if counts.is_empty() {
            return Self::default();
        }

        let num_keys = counts.len();
        let total: usize = counts.iter().sum();
        let singletons = counts.iter().filter(|&&c| c == 1).count();

        counts.sort_unstable();
        let max_occurrence = counts[num_keys - 1];
        // Number of keys kept below the percentile; the cutoff is the largest
        // run length among them.
        let kept = ((num_keys as f64) * (1.0 - frequency_percentile)).floor() as usize;
        let percentile_cutoff = match kept.min(num_keys) {
            0 => 0,
            n => counts[n - 1],
        };
        let cutoff = percentile_cutoff.max(min_cutoff).max(1);

        Self {
            max_occurrence,
            cutoff,
            singleton_fraction: singletons as f64 / num_keys as f64,
            average_occurrence: total as f64 / num_keys as f64,
            num_keys,
        }
    }
}

/// Lengths of the runs of equal keys in a key-sorted seed array
pub fn key_run_lengths(seeds: &[u128]) -> Vec<usize> {
    let mut counts = Vec::new();
    let Some(&first) = seeds.first() else {
        return counts;
    };

    let mut prev_key = Minimizer::decode_key(first);
    let mut streak_start = 0;
    for (i, &seed) in seeds.iter().enumerate().skip(1) {
        let key = Minimizer::decode_key(seed);
        if key != prev_key {
            counts.push(i - streak_start);
            streak_start = i;
            prev_key = key;
        }
    }
    counts.push(seeds.len() - streak_start);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Strand;

    fn seeds_with_keys(keys: &[u64]) -> Vec<u128> {
        keys.iter()
            .enumerate()
            .map(|(i, &key)| Minimizer::new(key, 0, i as u32, Strand::Forward).pack())
            .collect()
    }

    #[test]
    fn test_run_lengths() {
        let seeds = seeds_with_keys(&[1, 1, 2, 3, 3, 3]);
        assert_eq!(key_run_lengths(&seeds), vec![2, 1, 3]);
        assert!(key_run_lengths(&[]).is_empty());
    }

    #[test]
    fn test_stats() {
        let seeds = seeds_with_keys(&[1, 1, 2, 3, 3, 3, 4]);
        let stats = OccurrenceStats::from_sorted_seeds(&seeds, 0.0, 0);
        assert_eq!(stats.num_keys, 4);
        assert_eq!(stats.max_occurrence, 3);
        assert_eq!(stats.cutoff, 3);
        assert!((stats.singleton_fraction - 0.5).abs() < 1e-9);
        assert!((stats.average_occurrence - 1.75).abs() < 1e-9);
    }

    #[test]
    fn test_percentile_drops_top_keys() {
        // 9 singletons and one key seen 50 times.
        let mut counts = vec![1; 9];
        counts.push(50);
        let stats = OccurrenceStats::from_run_lengths(counts, 0.1, 0);
        assert_eq!(stats.cutoff, 1);
        assert_eq!(stats.max_occurrence, 50);
    }

    #[test]
    fn test_cutoff_floors() {
        let stats = OccurrenceStats::from_run_lengths(vec![1, 1, 1, 40], 0.5, 10);
        assert_eq!(stats.cutoff, 10);
        let stats = OccurrenceStats::from_run_lengths(vec![1], 0.0, 0);
        assert_eq!(stats.cutoff, 1);
    }

    #[test]
    fn test_empty() {
        let stats = OccurrenceStats::from_sorted_seeds(&[], 0.0002, 5);
        assert_eq!(stats, OccurrenceStats::default());
    }

    #[test]
    fn test_spans_agree_with_seeds() {
        let seeds = seeds_with_keys(&[1, 1, 2, 3, 3, 3]);
        let spans = [SeedSpan::new(0, 2), SeedSpan::new(2, 3), SeedSpan::new(3, 6)];
        assert_eq!(
            OccurrenceStats::from_sorted_seeds(&seeds, 0.2, 0),
            OccurrenceStats::from_spans(&spans, 0.2, 0)
        );
    }
}
