//! Global seed array

use super::sort::radix_sort;
use crate::seed::{Minimizer, PackedMinimizer};

/// Expected seeds per base for a window of one; empirical over-estimate
/// that avoids most reallocation while collecting.
const SEED_DENSITY_ESTIMATE: f64 = 2.3;

/// All packed seeds of an index, key-sorted once collection is finished
#[derive(Debug, Clone, Default)]
pub struct SeedStore {
    seeds: Vec<PackedMinimizer>,
    sorted: bool,
}

impl SeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capacity hint from total sequence length and window size
    pub fn estimate_capacity(total_len: usize, w: usize) -> usize {
        (total_len as f64 * SEED_DENSITY_ESTIMATE / w.max(1) as f64) as usize
    }

    pub fn reserve_for(&mut self, total_len: usize, w: usize) {
        let wanted = Self::estimate_capacity(total_len, w);
        self.seeds.reserve(wanted.saturating_sub(self.seeds.len()));
    }

    /// Move one sequence's seeds to the end of the store
    pub fn append(&mut self, local: &mut Vec<PackedMinimizer>) {
        if !local.is_empty() {
            self.sorted = false;
        }
        self.seeds.append(local);
    }

    pub fn sort(&mut self) {
        radix_sort(&mut self.seeds);
        self.sorted = true;
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    pub fn as_slice(&self) -> &[PackedMinimizer] {
        &self.seeds
    }

    pub fn get(&self, idx: usize) -> Option<Minimizer> {
        self.seeds.get(idx).map(|&packed| Minimizer::unpack(packed))
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.seeds.capacity()
    }

    pub fn clear(&mut self) {
        self.seeds.clear();
        self.sorted = false;
    }
}

/// Sum of position steps between consecutive seeds of one sequence
pub fn spacing_sum(seeds: &[PackedMinimizer]) -> i64 {
    seeds
        .windows(2)
        .map(|pair| Minimizer::decode_pos(pair[1]) as i64 - Minimizer::decode_pos(pair[0]) as i64)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Strand;

    fn seed(key: u64, pos: u32) -> PackedMinimizer {
        Minimizer::new(key, 0, pos, Strand::Forward).pack()
    }

    #[test]
    fn test_append_and_sort() {
        let mut store = SeedStore::new();
        store.reserve_for(1000, 10);
        assert!(store.capacity() >= 229);

        let mut a = vec![seed(9, 0), seed(1, 4)];
        let mut b = vec![seed(5, 2)];
        store.append(&mut a);
        store.append(&mut b);
        assert!(a.is_empty() && b.is_empty());
        assert!(!store.is_sorted());

        store.sort();
        let keys: Vec<u64> = (0..store.len()).map(|i| store.get(i).unwrap().key).collect();
        assert_eq!(keys, vec![1, 5, 9]);
        assert!(store.is_sorted());
    }

    #[test]
    fn test_spacing_sum() {
        assert_eq!(spacing_sum(&[seed(1, 2), seed(1, 7), seed(1, 10)]), 8);
        assert_eq!(spacing_sum(&[seed(1, 2)]), 0);
    }
}
