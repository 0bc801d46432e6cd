use serde::{Deserialize, Serialize};

/// Zero-based offset into a sequence
pub type SeqPos = u32;
/// Positional id of a sequence in the index's sequence collection
pub type SeqId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    pub fn is_reverse(self) -> bool {
        matches!(self, Strand::Reverse)
    }

    /// Strand of a hit whose query and indexed seed carry `self` and `other`.
    pub fn relative_to(self, other: Strand) -> Strand {
        Strand::from(self == other)
    }
}

impl From<bool> for Strand {
    fn from(forward: bool) -> Self {
        if forward {
            Strand::Forward
        } else {
            Strand::Reverse
        }
    }
}

impl From<Strand> for bool {
    fn from(strand: Strand) -> Self {
        matches!(strand, Strand::Forward)
    }
}

impl From<Strand> for char {
    fn from(strand: Strand) -> Self {
        match strand {
            Strand::Forward => '+',
            Strand::Reverse => '-',
        }
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", char::from(*self))
    }
}

/// Half-open range `[start, end)` of the sorted seed array holding every
/// occurrence of one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeedSpan {
    pub start: usize,
    pub end: usize,
}

impl SeedSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

/// No auxiliary query flags set
pub const QUERY_MASK_NONE: u32 = 0;

/// A query minimizer matched against one indexed seed.
///
/// For reverse hits both `target_position` and `query_position` point at the
/// last base of the matching window, expressed on the target's reverse
/// strand and on the query respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MinimizerHit {
    pub sequence_id: SeqId,
    pub is_reverse: bool,
    pub target_position: SeqPos,
    pub query_mask: u32,
    pub query_position: SeqPos,
}

impl MinimizerHit {
    pub fn new(
        sequence_id: SeqId,
        is_reverse: bool,
        target_position: SeqPos,
        query_mask: u32,
        query_position: SeqPos,
    ) -> Self {
        Self {
            sequence_id,
            is_reverse,
            target_position,
            query_mask,
            query_position,
        }
    }

    pub fn strand(&self) -> Strand {
        Strand::from(!self.is_reverse)
    }

    /// Single integer ordering hits by target id, strand, target position,
    /// query mask and finally query position. Target positions occupy 31
    /// bits, the same width the seed codec allows.
    pub fn sort_key(&self) -> u128 {
        ((self.sequence_id as u128) << 96)
            | ((self.is_reverse as u128) << 95)
            | (((self.target_position & 0x7FFF_FFFF) as u128) << 64)
            | ((self.query_mask as u128) << 32)
            | (self.query_position as u128)
    }

    /// Diagonal of the hit, used by chaining to group co-linear seeds.
    pub fn diagonal(&self) -> i64 {
        self.target_position as i64 - self.query_position as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strand_relative() {
        assert_eq!(Strand::Forward.relative_to(Strand::Forward), Strand::Forward);
        assert_eq!(Strand::Reverse.relative_to(Strand::Reverse), Strand::Forward);
        assert_eq!(Strand::Forward.relative_to(Strand::Reverse), Strand::Reverse);
        assert_eq!(Strand::Reverse.to_string(), "-");
    }

    #[test]
    fn test_hit_sort_key_orders_by_target_first() {
        let a = MinimizerHit::new(0, true, 5, 0, 100);
        let b = MinimizerHit::new(1, false, 0, 0, 0);
        let c = MinimizerHit::new(0, false, 900, 0, 0);
        let mut hits = vec![a, b, c];
        hits.sort_by_key(|h| h.sort_key());
        assert_eq!(hits, vec![c, a, b]);
    }

    #[test]
    fn test_seed_span() {
        let span = SeedSpan::new(3, 7);
        assert_eq!(span.len(), 4);
        assert!(!span.is_empty());
        assert_eq!(span.range().count(), 4);
    }
}
