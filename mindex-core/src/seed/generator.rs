//! Single-pass minimizer generation
//!
//! Each unambiguous run of a sequence is scanned once: forward and
//! reverse-complement 2-bit encodings are rolled one base at a time, the
//! canonical key enters the sliding window, and the window minima are
//! emitted. A per-position marker keeps a k-mer that stays the minimum of
//! several overlapping windows from being emitted more than once.

use bitvec::prelude::*;

use super::codec::{canonicalize, Minimizer, PackedMinimizer, MAX_POSITION};
use super::homopolymer::HomopolymerScanner;
use super::splitter::{split_valid_runs, ValidRun};
use super::utils::{encode_nucleotide, kmer_mask};
use super::window::MinimizerWindow;
use super::{validate_k, IndexParams, SeedError, SeedResult, MAX_K};
use crate::types::SeqId;

/// Stateless minimizer generator configured for one (k, w) scheme
#[derive(Debug, Clone)]
pub struct MinimizerGenerator {
    k: usize,
    w: usize,
    use_reverse_complement: bool,
    scanner: HomopolymerScanner,
}

impl MinimizerGenerator {
    pub fn new(
        k: usize,
        w: usize,
        use_reverse_complement: bool,
        scanner: HomopolymerScanner,
    ) -> SeedResult<Self> {
        validate_k(k)?;
        if w == 0 {
            return Err(SeedError::InvalidWindow(w));
        }
        Ok(Self {
            k,
            w,
            use_reverse_complement,
            scanner,
        })
    }

    pub fn from_params(params: &IndexParams) -> SeedResult<Self> {
        Self::new(
            params.k,
            params.w,
            params.use_reverse_complement,
            HomopolymerScanner::new(params.homopolymer_suppression, params.max_homopolymer_run),
        )
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn w(&self) -> usize {
        self.w
    }

    pub fn scanner(&self) -> &HomopolymerScanner {
        &self.scanner
    }

    /// Valid runs of `seq[start..end]` this generator would scan
    pub fn valid_runs(&self, seq: &[u8], start: usize, end: usize) -> Vec<ValidRun> {
        split_valid_runs(seq, start, end, self.k)
    }

    /// Append the minimizers of a whole sequence to `out`.
    pub fn generate(
        &self,
        seq: &[u8],
        seq_id: SeqId,
        out: &mut Vec<PackedMinimizer>,
    ) -> SeedResult<usize> {
        self.generate_range(seq, seq_id, 0, 0, out)
    }

    /// Append the minimizers of `seq[start..end]` to `out`, with positions in
    /// whole-sequence coordinates. An `end` of zero or past the sequence end
    /// means "to the end".
    pub fn generate_range(
        &self,
        seq: &[u8],
        seq_id: SeqId,
        start: usize,
        end: usize,
        out: &mut Vec<PackedMinimizer>,
    ) -> SeedResult<usize> {
        if seq.is_empty() {
            return Ok(0);
        }
        if seq.len() > MAX_POSITION + 1 {
            return Err(SeedError::SequenceTooLong {
                len: seq.len(),
                max: MAX_POSITION + 1,
            });
        }

        let end = if end == 0 || end > seq.len() { seq.len() } else { end };
        if start >= seq.len() {
            return Err(SeedError::RegionOutOfBounds {
                start,
                len: seq.len(),
            });
        }
        if start >= end {
            return Err(SeedError::InvalidRegion(format!(
                "start {} is not before end {}",
                start, end
            )));
        }

        let mut local = Vec::with_capacity((end - start) / self.w + 1);
        let mut emitted = bitvec![0; end - start];
        for run in self.valid_runs(seq, start, end) {
            self.generate_run(seq, run, seq_id, start, &mut emitted, &mut local);
        }

        let count = local.len();
        out.reserve(count);
        out.append(&mut local);
        Ok(count)
    }

    fn generate_run(
        &self,
        seq: &[u8],
        run: ValidRun,
        seq_id: SeqId,
        origin: usize,
        emitted: &mut BitVec,
        out: &mut Vec<PackedMinimizer>,
    ) {
        let k = self.k;
        let bases = &seq[run.start..run.end()];
        let mask = kmer_mask(k);
        let rc_shift = 2 * (k - 1);
        let mut forward = 0u64;
        let mut reverse = 0u64;
        let mut window = MinimizerWindow::new(self.w);
        // Ring of the last k kept offsets; slot (j + 1) % k holds the k-mer start.
        let mut starts = [0usize; MAX_K];

        for (j, offset) in self.scanner.kept_offsets(bases).enumerate() {
            starts[j % k] = offset;
            // Runs hold ACGT only.
            let code = encode_nucleotide(bases[offset]).unwrap_or_default();
            forward = ((forward << 2) | code) & mask;
            reverse = (reverse >> 2) | ((3 - code) << rc_shift);
            if j + 1 < k {
                continue;
            }

            let kmer_start = run.start + starts[(j + 1) % k];
            let (key, strand) = canonicalize(forward, reverse, self.use_reverse_complement);
            if window.push(key, kmer_start as u32, strand) {
                Self::emit_minima(&window, seq_id, origin, emitted, out);
            }
        }

        // Runs shorter than one full window still yield their minimum.
        if !window.is_full() && !window.is_empty() {
            Self::emit_minima(&window, seq_id, origin, emitted, out);
        }
    }

    fn emit_minima(
        window: &MinimizerWindow,
        seq_id: SeqId,
        origin: usize,
        emitted: &mut BitVec,
        out: &mut Vec<PackedMinimizer>,
    ) {
        for entry in window.minima() {
            let idx = entry.pos as usize - origin;
            if emitted[idx] {
                continue;
            }
            emitted.set(idx, true);
            out.push(Minimizer::new(entry.key, seq_id, entry.pos, entry.strand).pack());
        }
    }
}

/// Generate the minimizers of one whole sequence with the given parameters.
pub fn generate_minimizers(
    seq: &[u8],
    seq_id: SeqId,
    params: &IndexParams,
) -> SeedResult<Vec<PackedMinimizer>> {
    let generator = MinimizerGenerator::from_params(params)?;
    let mut out = Vec::new();
    generator.generate(seq, seq_id, &mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Strand;

    fn params(k: usize, w: usize) -> IndexParams {
        IndexParams {
            k,
            w,
            ..Default::default()
        }
    }

    fn unpack_all(packed: &[PackedMinimizer]) -> Vec<Minimizer> {
        packed.iter().map(|&p| Minimizer::unpack(p)).collect()
    }

    #[test]
    fn test_w1_emits_every_kmer() {
        let seq = b"ACGTTGCA";
        let mms = unpack_all(&generate_minimizers(seq, 0, &params(3, 1)).unwrap());
        let positions: Vec<u32> = mms.iter().map(|m| m.pos).collect();
        assert_eq!(positions, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_canonical_key_and_strand() {
        // TTT has reverse complement AAA, which is smaller.
        let mms = unpack_all(&generate_minimizers(b"TTT", 0, &params(3, 1)).unwrap());
        assert_eq!(mms.len(), 1);
        assert_eq!(mms[0].key, 0);
        assert_eq!(mms[0].strand, Strand::Reverse);

        let fwd_only = IndexParams {
            use_reverse_complement: false,
            ..params(3, 1)
        };
        let mms = unpack_all(&generate_minimizers(b"TTT", 0, &fwd_only).unwrap());
        assert_eq!(mms[0].key, 0b11_11_11);
        assert_eq!(mms[0].strand, Strand::Forward);
    }

    #[test]
    fn test_no_duplicate_positions() {
        let seq = b"AAAAAAAAAACGTACGTAAAAAAAAAA";
        let mms = unpack_all(&generate_minimizers(seq, 3, &params(4, 5)).unwrap());
        let mut positions: Vec<u32> = mms.iter().map(|m| m.pos).collect();
        let before = positions.len();
        positions.sort_unstable();
        positions.dedup();
        assert_eq!(before, positions.len());
        assert!(mms.iter().all(|m| m.seq_id == 3));
    }

    #[test]
    fn test_every_window_has_a_minimizer() {
        let seq = b"GATTACAGATTACACCGGTTAAGGCCTTAAGC";
        let (k, w) = (5, 4);
        let mms = unpack_all(&generate_minimizers(seq, 0, &params(k, w)).unwrap());
        let positions: Vec<usize> = mms.iter().map(|m| m.pos as usize).collect();
        let num_kmers = seq.len() - k + 1;
        for window_start in 0..=(num_kmers - w) {
            assert!(
                positions
                    .iter()
                    .any(|&p| p >= window_start && p < window_start + w),
                "window starting at {} has no minimizer",
                window_start
            );
        }
    }

    #[test]
    fn test_short_sequence_yields_nothing() {
        assert!(generate_minimizers(b"ACG", 0, &params(4, 1)).unwrap().is_empty());
        assert!(generate_minimizers(b"", 0, &params(4, 1)).unwrap().is_empty());
    }

    #[test]
    fn test_partial_window_emits_minimum() {
        // Only 2 k-mers in the run, window of 10.
        let mms = unpack_all(&generate_minimizers(b"ACGTA", 0, &params(4, 10)).unwrap());
        assert_eq!(mms.len(), 1);
    }

    #[test]
    fn test_ambiguous_bases_never_inside_kmers() {
        let seq = b"ACGTACGTNNNNTTGCATGC";
        let k = 4;
        let mms = unpack_all(&generate_minimizers(seq, 0, &params(k, 1)).unwrap());
        for mm in &mms {
            let window = &seq[mm.pos as usize..mm.pos as usize + k];
            assert!(!window.contains(&b'N'));
        }
        assert_eq!(mms.len(), 5 + 5);
    }

    #[test]
    fn test_invalid_k_rejected() {
        assert!(matches!(
            generate_minimizers(b"ACGT", 0, &params(0, 1)),
            Err(SeedError::InvalidK { .. })
        ));
        assert!(matches!(
            generate_minimizers(b"ACGT", 0, &params(31, 1)),
            Err(SeedError::InvalidK { .. })
        ));
    }

    #[test]
    fn test_range_keeps_sequence_coordinates() {
        let generator = MinimizerGenerator::from_params(&params(4, 1)).unwrap();
        let seq = b"ACGTACGTACGT";
        let mut out = Vec::new();
        generator.generate_range(seq, 0, 4, 10, &mut out).unwrap();
        let positions: Vec<u32> = unpack_all(&out).iter().map(|m| m.pos).collect();
        assert_eq!(positions, vec![4, 5, 6]);

        assert!(matches!(
            generator.generate_range(seq, 0, 20, 0, &mut out),
            Err(SeedError::RegionOutOfBounds { .. })
        ));
        assert!(matches!(
            generator.generate_range(seq, 0, 6, 6, &mut out),
            Err(SeedError::InvalidRegion(_))
        ));
    }

    #[test]
    fn test_homopolymer_suppression_collapses_runs() {
        let hp = IndexParams {
            homopolymer_suppression: true,
            max_homopolymer_run: 10,
            ..params(3, 1)
        };
        let long = unpack_all(&generate_minimizers(b"AAAACCCGT", 0, &hp).unwrap());
        let short = unpack_all(&generate_minimizers(b"ACGT", 0, &hp).unwrap());
        let long_keys: Vec<u64> = long.iter().map(|m| m.key).collect();
        let short_keys: Vec<u64> = short.iter().map(|m| m.key).collect();
        assert_eq!(long_keys, short_keys);
        // The first collapsed k-mer starts on the last A of the run.
        assert_eq!(long[0].pos, 3);
    }

    #[test]
    fn test_uncollapsed_scan_matches_plain_scan() {
        // A cap of one leaves every run uncollapsed, so the streamed offsets
        // must reproduce the plain scan exactly.
        let seq = b"GGGATTTTACAGGCNNACCCCCGTAGGTTTAC";
        for (k, w) in [(3, 1), (4, 3), (5, 5)] {
            let plain = MinimizerGenerator::new(k, w, true, HomopolymerScanner::disabled())
                .unwrap();
            let capped = MinimizerGenerator::new(k, w, true, HomopolymerScanner::new(true, 1))
                .unwrap();
            let (mut a, mut b) = (Vec::new(), Vec::new());
            plain.generate(seq, 0, &mut a).unwrap();
            capped.generate(seq, 0, &mut b).unwrap();
            assert!(!a.is_empty());
            assert_eq!(a, b, "k = {}, w = {}", k, w);
        }
    }

    #[test]
    fn test_collapsed_kmer_starts_follow_kept_bases() {
        let hp = IndexParams {
            homopolymer_suppression: true,
            max_homopolymer_run: 10,
            ..params(3, 1)
        };
        // Kept offsets 0, 3, 4, 5: k-mers ATC at 0 and TCG at 3.
        let mms = unpack_all(&generate_minimizers(b"ATTTCG", 0, &hp).unwrap());
        let positions: Vec<u32> = mms.iter().map(|m| m.pos).collect();
        assert_eq!(positions, vec![0, 3]);
    }
}
