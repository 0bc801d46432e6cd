//! Packed minimizer representation
//!
//! A seed is stored as a single `u128`: the key in the high 64 bits, then the
//! sequence id, the position and finally the strand flag. Comparing two
//! packed values as integers therefore orders by key first, which is the
//! only property the sorter and the hash index rely on.
//!
//! ```text
//!  127          64 63        32 31          1   0
//! +--------------+------------+-------------+---+
//! |     key      |   seq_id   |  position   | r |
//! +--------------+------------+-------------+---+
//! ```

use crate::types::{SeqId, SeqPos, Strand};

pub type PackedMinimizer = u128;

const KEY_SHIFT: u32 = 64;
const SEQ_ID_SHIFT: u32 = 32;
const POS_SHIFT: u32 = 1;
const POS_MASK: u128 = 0x7FFF_FFFF;
const FLAG_MASK: u128 = 0x1;

/// Largest position that survives packing
pub const MAX_POSITION: usize = POS_MASK as usize;

/// One k-mer occurrence selected as a window minimizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Minimizer {
    pub key: u64,
    pub seq_id: SeqId,
    pub pos: SeqPos,
    pub strand: Strand,
}

impl Minimizer {
    pub fn new(key: u64, seq_id: SeqId, pos: SeqPos, strand: Strand) -> Self {
        debug_assert!(pos as usize <= MAX_POSITION);
        Self {
            key,
            seq_id,
            pos,
            strand,
        }
    }

    pub fn is_rev(&self) -> bool {
        self.strand.is_reverse()
    }

    pub fn pack(&self) -> PackedMinimizer {
        ((self.key as u128) << KEY_SHIFT)
            | ((self.seq_id as u128) << SEQ_ID_SHIFT)
            | (((self.pos as u128) & POS_MASK) << POS_SHIFT)
            | (self.is_rev() as u128)
    }

    pub fn unpack(packed: PackedMinimizer) -> Self {
        Self {
            key: Self::decode_key(packed),
            seq_id: Self::decode_seq_id(packed),
            pos: Self::decode_pos(packed),
            strand: Strand::from(packed & FLAG_MASK == 0),
        }
    }

    #[inline]
    pub fn decode_key(packed: PackedMinimizer) -> u64 {
        (packed >> KEY_SHIFT) as u64
    }

    #[inline]
    pub fn decode_seq_id(packed: PackedMinimizer) -> SeqId {
        (packed >> SEQ_ID_SHIFT) as u32
    }

    #[inline]
    pub fn decode_pos(packed: PackedMinimizer) -> SeqPos {
        ((packed >> POS_SHIFT) & POS_MASK) as u32
    }
}

impl From<Minimizer> for PackedMinimizer {
    fn from(minimizer: Minimizer) -> Self {
        minimizer.pack()
    }
}

/// Choose the canonical key of a k-mer.
///
/// The reverse complement wins only when it is strictly smaller, so
/// palindromic k-mers are always reported on the forward strand.
#[inline]
pub fn canonicalize(forward: u64, reverse: u64, use_reverse_complement: bool) -> (u64, Strand) {
    if use_reverse_complement && reverse < forward {
        (reverse, Strand::Reverse)
    } else {
        (forward, Strand::Forward)
    }
}
