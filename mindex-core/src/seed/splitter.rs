//! Split sequences at ambiguous bases

use super::utils::is_nucleotide;

/// A maximal stretch of unambiguous bases, in original sequence coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidRun {
    pub start: usize,
    pub len: usize,
}

impl ValidRun {
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Find every maximal ACGT run inside `seq[start..end]` that can hold at
/// least one k-mer. Shorter runs contribute nothing and are dropped.
pub fn split_valid_runs(seq: &[u8], start: usize, end: usize, k: usize) -> Vec<ValidRun> {
    let end = end.min(seq.len());
    let mut runs = Vec::new();
    if start >= end {
        return runs;
    }

    let mut run_start = start;
    for (i, &base) in seq[start..end].iter().enumerate() {
        if !is_nucleotide(base) {
            let pos = start + i;
            if pos - run_start >= k {
                runs.push(ValidRun {
                    start: run_start,
                    len: pos - run_start,
                });
            }
            run_start = pos + 1;
        }
    }
    if run_start < end && end - run_start >= k {
        runs.push(ValidRun {
            start: run_start,
            len: end - run_start,
        });
    }

    runs
}
