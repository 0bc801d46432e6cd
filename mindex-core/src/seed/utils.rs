//! Shared nucleotide helpers for minimizer generation

/// Encode a nucleotide to its 2-bit representation (A=0, C=1, G=2, T=3).
///
/// Lowercase bases are accepted; anything outside ACGT is ambiguous and
/// yields `None`.
#[inline]
pub fn encode_nucleotide(nucleotide: u8) -> Option<u64> {
    match nucleotide {
        b'A' | b'a' => Some(0),
        b'C' | b'c' => Some(1),
        b'G' | b'g' => Some(2),
        b'T' | b't' => Some(3),
        _ => None,
    }
}

/// Whether a byte belongs to the unambiguous 4-letter alphabet
#[inline]
pub fn is_nucleotide(nucleotide: u8) -> bool {
    encode_nucleotide(nucleotide).is_some()
}

/// Get complement of a single nucleotide
pub fn complement_nucleotide(nucleotide: u8) -> u8 {
    match nucleotide {
        b'A' => b'T',
        b'T' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        b'a' => b't',
        b't' => b'a',
        b'c' => b'g',
        b'g' => b'c',
        _ => nucleotide, // Ambiguous bases are their own complement
    }
}

/// Generate reverse complement of a sequence
pub fn reverse_complement(sequence: &[u8]) -> Vec<u8> {
    sequence
        .iter()
        .rev()
        .map(|&nucleotide| complement_nucleotide(nucleotide))
        .collect()
}

/// Mask selecting the low `2k` bits of a k-mer key
#[inline]
pub fn kmer_mask(k: usize) -> u64 {
    if k >= 32 {
        u64::MAX
    } else {
        (1u64 << (2 * k)) - 1
    }
}

/// Decode a 2-bit packed k-mer back into ASCII bases
pub fn decode_kmer(key: u64, k: usize) -> Vec<u8> {
    (0..k)
        .rev()
        .map(|i| match (key >> (2 * i)) & 3 {
            0 => b'A',
            1 => b'C',
            2 => b'G',
            _ => b'T',
        })
        .collect()
}
