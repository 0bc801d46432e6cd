//! Homopolymer run compression and window span recovery
//!
//! With suppression enabled, a run of identical bases is represented by its
//! last base only, so `AAAAC` and `AAC` produce the same k-mers. Runs that
//! reach the configured cap are left alone. Because a collapsed k-mer covers
//! more than `k` original bases, the scanner also reports, for every window
//! start, how many original bases the window spans.

use super::splitter::ValidRun;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HomopolymerScanner {
    enabled: bool,
    max_run: usize,
}

impl HomopolymerScanner {
    pub fn new(enabled: bool, max_run: usize) -> Self {
        Self { enabled, max_run }
    }

    pub fn disabled() -> Self {
        Self::new(false, 0)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Offsets (relative to `run`) of the bases that enter the k-mer, in
    /// order. Nothing is buffered: a disabled scanner yields `0..run.len()`.
    pub fn kept_offsets<'a>(&self, run: &'a [u8]) -> KeptOffsets<'a> {
        KeptOffsets {
            run,
            next: 0,
            pass_through_end: if self.enabled { 0 } else { run.len() },
            max_run: self.max_run,
        }
    }

    /// Collected form of [`kept_offsets`](Self::kept_offsets).
    pub fn kept_positions(&self, run: &[u8]) -> Vec<u32> {
        self.kept_offsets(run).map(|p| p as u32).collect()
    }

    /// Per-position window span over a whole sequence.
    ///
    /// Entry `p` holds the number of original bases covered by the k-mer
    /// starting at `p`. Positions that start no window keep the default of
    /// `k`, which is also the exact value when nothing was collapsed.
    pub fn span_table(&self, seq: &[u8], runs: &[ValidRun], k: usize) -> Vec<u32> {
        let mut spans = vec![k as u32; seq.len()];
        if !self.enabled || k == 0 {
            return spans;
        }

        for run in runs {
            let kept = self.kept_positions(&seq[run.start..run.end()]);
            for window in kept.windows(k) {
                let first = window[0];
                let last = window[k - 1];
                spans[run.start + first as usize] = last - first + 1;
            }
        }
        spans
    }
}

/// Iterator over the kept offsets of one run
#[derive(Debug, Clone)]
pub struct KeptOffsets<'a> {
    run: &'a [u8],
    next: usize,
    /// Offsets below this are yielded one by one (uncollapsed run or
    /// disabled scanner).
    pass_through_end: usize,
    max_run: usize,
}

impl Iterator for KeptOffsets<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let i = self.next;
        if i >= self.run.len() {
            return None;
        }
        if i < self.pass_through_end {
            self.next += 1;
            return Some(i);
        }

        let base = self.run[i].to_ascii_uppercase();
        let mut len = 1;
        while i + len < self.run.len() && self.run[i + len].to_ascii_uppercase() == base {
            len += 1;
        }

        if len >= self.max_run {
            self.pass_through_end = i + len;
            self.next += 1;
            Some(i)
        } else {
            self.next += len;
            Some(i + len - 1)
        }
    }
}

impl Default for HomopolymerScanner {
    fn default() -> Self {
        Self::disabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_keeps_every_base() {
        let scanner = HomopolymerScanner::disabled();
        assert_eq!(scanner.kept_positions(b"AAAC"), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_runs_collapse_to_last_base() {
        let scanner = HomopolymerScanner::new(true, 5);
        // AAA C GG T -> positions 2, 3, 5, 6
        assert_eq!(scanner.kept_positions(b"AAACGGT"), vec![2, 3, 5, 6]);
        assert_eq!(scanner.kept_positions(b"aAAc"), vec![2, 3]);
    }

    #[test]
    fn test_runs_at_cap_are_not_collapsed() {
        let scanner = HomopolymerScanner::new(true, 3);
        assert_eq!(scanner.kept_positions(b"AAAC"), vec![0, 1, 2, 3]);
        assert_eq!(scanner.kept_positions(b"AAC"), vec![1, 2]);
    }

    #[test]
    fn test_offsets_are_streamed() {
        let run = b"ACGTTTTTTTTA";
        let disabled = HomopolymerScanner::disabled();
        assert!(disabled.kept_offsets(run).eq(0..run.len()));

        let scanner = HomopolymerScanner::new(true, 4);
        let streamed: Vec<u32> = scanner.kept_offsets(run).map(|p| p as u32).collect();
        // The run of eight T reaches the cap and passes through unchanged.
        assert_eq!(streamed, vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]);
        assert_eq!(scanner.kept_offsets(b"GGGTTA").collect::<Vec<_>>(), vec![2, 4, 5]);
        assert_eq!(scanner.kept_offsets(b"").count(), 0);
    }

    #[test]
    fn test_span_table() {
        let seq = b"AAACGGT";
        let runs = [ValidRun { start: 0, len: seq.len() }];

        let plain = HomopolymerScanner::disabled().span_table(seq, &runs, 3);
        assert!(plain.iter().all(|&s| s == 3));

        let spans = HomopolymerScanner::new(true, 5).span_table(seq, &runs, 3);
        // Kept 2,3,5,6: window at 2 ends at 5, window at 3 ends at 6.
        assert_eq!(spans[2], 4);
        assert_eq!(spans[3], 4);
        assert_eq!(spans[0], 3);
    }
}
