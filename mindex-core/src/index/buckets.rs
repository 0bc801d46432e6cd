//! Two-level key → seed range lookup
//!
//! The key space is split into `2^NUM_BUCKET_BITS` buckets on the most
//! significant key bits. Each bucket maps a key to an entry of one shared
//! `SeedSpan` table. Construction walks the sorted seed array twice: the
//! first pass counts distinct keys per bucket so every map is sized once,
//! the second inserts the spans.

use std::collections::BTreeMap;

use fnv::FnvHashMap;

use super::{IndexError, IndexResult};
use crate::seed::Minimizer;
use crate::types::SeedSpan;

pub const NUM_BUCKET_BITS: u32 = 10;
pub const NUM_BUCKETS: usize = 1 << NUM_BUCKET_BITS;

/// Map capability required of a bucket backend
pub trait BucketMap: Default + Send + Sync {
    fn reserve(&mut self, additional: usize);
    fn insert(&mut self, key: u64, span_id: usize);
    fn get(&self, key: u64) -> Option<usize>;
    fn len(&self) -> usize;
    fn clear(&mut self);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Default backend: FNV-hashed open map
pub type FnvBucket = FnvHashMap<u64, usize>;
/// Ordered backend, slower lookups but no rehashing at all
pub type BTreeBucket = BTreeMap<u64, usize>;

impl BucketMap for FnvHashMap<u64, usize> {
    fn reserve(&mut self, additional: usize) {
        FnvHashMap::reserve(self, additional);
    }

    fn insert(&mut self, key: u64, span_id: usize) {
        FnvHashMap::insert(self, key, span_id);
    }

    fn get(&self, key: u64) -> Option<usize> {
        FnvHashMap::get(self, &key).copied()
    }

    fn len(&self) -> usize {
        FnvHashMap::len(self)
    }

    fn clear(&mut self) {
        FnvHashMap::clear(self);
    }
}

impl BucketMap for BTreeMap<u64, usize> {
    fn reserve(&mut self, _additional: usize) {}

    fn insert(&mut self, key: u64, span_id: usize) {
        BTreeMap::insert(self, key, span_id);
    }

    fn get(&self, key: u64) -> Option<usize> {
        BTreeMap::get(self, &key).copied()
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn clear(&mut self) {
        BTreeMap::clear(self);
    }
}

pub struct BucketedHashIndex<M: BucketMap = FnvBucket> {
    buckets: Vec<M>,
    spans: Vec<SeedSpan>,
    shift: u32,
    mask: u64,
}

impl<M: BucketMap> BucketedHashIndex<M> {
    pub fn new(k: usize) -> Self {
        let key_bits = 2 * k as u32;
        Self {
            buckets: (0..NUM_BUCKETS).map(|_| M::default()).collect(),
            spans: Vec::new(),
            shift: key_bits.saturating_sub(NUM_BUCKET_BITS),
            mask: (NUM_BUCKETS - 1) as u64,
        }
    }

    #[inline]
    pub fn bucket_of(&self, key: u64) -> usize {
        ((key >> self.shift) & self.mask) as usize
    }

    pub fn shift(&self) -> u32 {
        self.shift
    }

    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.spans.clear();
    }

    /// Rebuild the lookup from a seed array sorted by key.
    ///
    /// Keys out of ascending order mean the sorter broke its contract; this
    /// is reported as a fatal [`IndexError::UnsortedSeeds`].
    pub fn build(&mut self, seeds: &[u128]) -> IndexResult<()> {
        self.clear();
        if seeds.is_empty() {
            return Ok(());
        }

        let (precount, total_keys) = self.precount(seeds)?;
        for (bucket, &count) in self.buckets.iter_mut().zip(precount.iter()) {
            bucket.reserve(count);
        }
        self.spans.reserve_exact(total_keys);

        let mut prev_key = Minimizer::decode_key(seeds[0]);
        let mut streak = SeedSpan::new(0, 1);
        for (i, &seed) in seeds.iter().enumerate().skip(1) {
            let key = Minimizer::decode_key(seed);
            if key == prev_key {
                streak.end = i + 1;
            } else {
                self.insert_span(prev_key, streak);
                streak = SeedSpan::new(i, i + 1);
                prev_key = key;
            }
        }
        // The loop boundary is not a key change; flush the final streak.
        self.insert_span(prev_key, streak);

        log::debug!(
            "Hash index holds {} keys in {} buckets (shift = {})",
            self.spans.len(),
            self.buckets.len(),
            self.shift
        );
        Ok(())
    }

    fn insert_span(&mut self, key: u64, span: SeedSpan) {
        let bucket = self.bucket_of(key);
        self.buckets[bucket].insert(key, self.spans.len());
        self.spans.push(span);
    }

    /// Distinct keys per bucket plus the total, verifying sortedness.
    fn precount(&self, seeds: &[u128]) -> IndexResult<(Vec<usize>, usize)> {
        let mut counts = vec![0usize; self.buckets.len()];
        let mut total = 0;

        let mut prev_key = Minimizer::decode_key(seeds[0]);
        for (i, &seed) in seeds.iter().enumerate().skip(1) {
            let key = Minimizer::decode_key(seed);
            if key < prev_key {
                return Err(IndexError::UnsortedSeeds {
                    index: i,
                    previous: prev_key,
                    current: key,
                });
            }
            if key != prev_key {
                counts[self.bucket_of(prev_key)] += 1;
                total += 1;
            }
            prev_key = key;
        }
        counts[self.bucket_of(prev_key)] += 1;
        total += 1;

        Ok((counts, total))
    }

    /// Index into the span table for `key`, if the key was indexed.
    pub fn find(&self, key: u64) -> Option<usize> {
        self.buckets[self.bucket_of(key)].get(key)
    }

    pub fn span_of(&self, key: u64) -> Option<SeedSpan> {
        self.find(key).map(|id| self.spans[id])
    }

    pub fn spans(&self) -> &[SeedSpan] {
        &self.spans
    }

    pub fn num_keys(&self) -> usize {
        self.spans.len()
    }

    pub fn bucket_sizes(&self) -> Vec<usize> {
        self.buckets.iter().map(BucketMap::len).collect()
    }
}
