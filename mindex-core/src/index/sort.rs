//! Least-significant-digit radix sort over packed seeds
//!
//! Sorts `u128` values one byte at a time from the lowest byte up. A single
//! counting pass builds all sixteen histograms; bytes that are identical
//! across the whole input are skipped, so short keys and small sequence ids
//! cost only the passes they need.

const RADIX_BITS: usize = 8;
const RADIX: usize = 1 << RADIX_BITS;
const NUM_DIGITS: usize = 128 / RADIX_BITS;

/// Below this size a comparison sort is faster than setting up the buckets.
const SMALL_SORT_THRESHOLD: usize = 256;

#[inline]
fn digit(value: u128, pass: usize) -> usize {
    ((value >> (pass * RADIX_BITS)) & (RADIX as u128 - 1)) as usize
}

/// Sort packed values ascending.
pub fn radix_sort(values: &mut Vec<u128>) {
    if values.len() <= SMALL_SORT_THRESHOLD {
        values.sort_unstable();
        return;
    }

    let mut histograms = vec![[0usize; RADIX]; NUM_DIGITS];
    for &value in values.iter() {
        for (pass, histogram) in histograms.iter_mut().enumerate() {
            histogram[digit(value, pass)] += 1;
        }
    }

    let len = values.len();
    let mut scratch = vec![0u128; len];
    let mut in_scratch = false;

    for (pass, histogram) in histograms.iter().enumerate() {
        // Every value shares this digit; the pass would be the identity.
        if histogram.iter().any(|&count| count == len) {
            continue;
        }

        let mut offsets = [0usize; RADIX];
        let mut total = 0;
        for (bucket, &count) in histogram.iter().enumerate() {
            offsets[bucket] = total;
            total += count;
        }

        let (src, dst) = if in_scratch {
            (&scratch[..], &mut values[..])
        } else {
            (&values[..], &mut scratch[..])
        };
        for &value in src {
            let bucket = digit(value, pass);
            dst[offsets[bucket]] = value;
            offsets[bucket] += 1;
        }
        in_scratch = !in_scratch;
    }

    if in_scratch {
        *values = scratch;
    }
}
