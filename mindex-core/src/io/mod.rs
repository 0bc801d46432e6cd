//! Sequence file input for mindex

pub mod fasta;

pub use fasta::{FastaError, FastaLoader, SequenceStatistics};

use anyhow::Result;
use std::path::Path;

use crate::sequences::SequenceFile;

/// Load a FASTA/FASTQ file (plain or gzipped) into a sequence collection
pub fn load_sequence_file<P: AsRef<Path>>(path: P) -> Result<SequenceFile> {
    FastaLoader::load_file(path)
}
