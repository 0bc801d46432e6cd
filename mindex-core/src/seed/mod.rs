//! Minimizer seeding for mindex
//!
//! This module turns raw nucleotide sequences into packed minimizer seeds:
//! the sequence is split into unambiguous runs, optionally homopolymer
//! compressed, and scanned with a sliding window that keeps the smallest
//! canonical k-mer of every `w` consecutive k-mers.

use serde::{Deserialize, Serialize};

pub mod codec;
pub mod generator;
pub mod homopolymer;
pub mod splitter;
pub mod utils;
pub mod window;


pub use codec::{Minimizer, PackedMinimizer};
pub use generator::{generate_minimizers, MinimizerGenerator};

/// Largest supported k-mer length; keys must fit in 64 bits with room to spare
pub const MAX_K: usize = 30;

/// Restrict indexing to a sub-range of one named contig
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRegion {
    /// Contig name, compared against the header up to its first whitespace
    pub name: String,
    /// Zero-based start of the indexed range
    #[serde(default)]
    pub start: usize,
    /// Exclusive end; `0` means "to the end of the contig"
    #[serde(default)]
    pub end: usize,
}

impl IndexRegion {
    pub fn new(name: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }

    /// Parse `name`, `name:start` or `name:start-end`
    pub fn parse(text: &str) -> SeedResult<Self> {
        let (name, range) = match text.rsplit_once(':') {
            Some((name, range)) => (name, Some(range)),
            None => (text, None),
        };
        if name.is_empty() {
            return Err(SeedError::InvalidRegion(format!("missing contig name in '{}'", text)));
        }
        let parse_pos = |s: &str| {
            s.replace(',', "")
                .parse::<usize>()
                .map_err(|_| SeedError::InvalidRegion(format!("bad coordinate '{}' in '{}'", s, text)))
        };
        let (start, end) = match range {
            None => (0, 0),
            Some(range) => match range.split_once('-') {
                Some((s, e)) => (parse_pos(s)?, parse_pos(e)?),
                None => (parse_pos(range)?, 0),
            },
        };
        Ok(Self::new(name, start, end))
    }

    /// Whether a sequence header names this region's contig
    pub fn matches_header(&self, header: &str) -> bool {
        header.split_whitespace().next().unwrap_or("") == self.name
    }
}

/// Parameters for building and querying a minimizer index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexParams {
    /// K-mer length (1..=30)
    pub k: usize,
    /// Window size in k-mers
    pub w: usize,
    /// Fold both strands into one canonical key
    pub use_reverse_complement: bool,
    /// Collapse homopolymer runs before extending the k-mer
    pub homopolymer_suppression: bool,
    /// Runs this long or longer are not collapsed
    pub max_homopolymer_run: usize,
    /// Fraction of the most frequent keys to drop at query time
    pub frequency_percentile: f64,
    /// Lower bound on the occurrence cutoff
    pub min_occurrence_cutoff: usize,
    /// Sequences shorter than this are not indexed
    pub min_sequence_len: usize,
    /// Generate minimizers for separate sequences on the rayon pool
    pub parallel: bool,
    /// Optional restriction to one contig sub-range
    pub region: Option<IndexRegion>,
}

impl Default for IndexParams {
    fn default() -> Self {
        Self {
            k: 15,
            w: 5,
            use_reverse_complement: true,
            homopolymer_suppression: false,
            max_homopolymer_run: 5,
            frequency_percentile: 0.0002,
            min_occurrence_cutoff: 0,
            min_sequence_len: 0,
            parallel: true,
            region: None,
        }
    }
}

impl IndexParams {
    /// Check the parameter bundle before any sequence is touched
    pub fn validate(&self) -> SeedResult<()> {
        validate_k(self.k)?;
        if self.w == 0 {
            return Err(SeedError::InvalidWindow(self.w));
        }
        if self.homopolymer_suppression && self.max_homopolymer_run < 2 {
            return Err(SeedError::InvalidParams(format!(
                "max_homopolymer_run must be at least 2, got {}",
                self.max_homopolymer_run
            )));
        }
        if !(0.0..1.0).contains(&self.frequency_percentile) {
            return Err(SeedError::InvalidParams(format!(
                "frequency_percentile must be in [0, 1), got {}",
                self.frequency_percentile
            )));
        }
        if let Some(region) = &self.region {
            if region.end != 0 && region.start >= region.end {
                return Err(SeedError::InvalidRegion(format!(
                    "start {} is not before end {}",
                    region.start, region.end
                )));
            }
        }
        Ok(())
    }
}

pub(crate) fn validate_k(k: usize) -> SeedResult<()> {
    if k == 0 || k > MAX_K {
        return Err(SeedError::InvalidK { k, max: MAX_K });
    }
    Ok(())
}

/// Result type for seeding operations
pub type SeedResult<T> = Result<T, SeedError>;

/// Errors that can occur during minimizer generation
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("k-mer length {k} is invalid (must be between 1 and {max})")]
    InvalidK { k: usize, max: usize },

    #[error("window size {0} is invalid (must be at least 1)")]
    InvalidWindow(usize),

    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("Region start {start} lies outside a sequence of length {len}")]
    RegionOutOfBounds { start: usize, len: usize },

    #[error("Sequence length {len} exceeds the maximum packable length {max}")]
    SequenceTooLong { len: usize, max: usize },

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
}
