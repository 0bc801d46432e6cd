//! FASTA/FASTQ sequence loading
//!
//! Records are read with needletail and collected into a [`SequenceFile`]
//! ready to be handed to an index. Gzipped input is detected by extension.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Result;
use flate2::read::GzDecoder;
use needletail::{parse_fastx_file, parse_fastx_reader};
use thiserror::Error;

use crate::sequences::{Sequence, SequenceFile};

#[derive(Debug, Error)]
pub enum FastaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Empty file or no sequences found")]
    EmptyFile,
}

pub struct FastaLoader;

impl FastaLoader {
    /// Load every record of a FASTA/FASTQ file, optionally gzipped
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<SequenceFile> {
        let path_str = path.as_ref().to_string_lossy();

        let seqs = if path_str.ends_with(".gz") {
            let file = File::open(&path)?;
            Self::load_reader(BufReader::new(GzDecoder::new(file)))?
        } else {
            let mut reader =
                parse_fastx_file(&path).map_err(|e| FastaError::Parse(e.to_string()))?;
            let mut seqs = SequenceFile::new();
            while let Some(record) = reader.next() {
                let record = record.map_err(|e| FastaError::Parse(e.to_string()))?;
                seqs.add(Self::record_to_sequence(&record));
            }
            seqs
        };

        if seqs.is_empty() {
            return Err(FastaError::EmptyFile.into());
        }
        log::debug!(
            "Loaded {} sequences ({} bp) from {}",
            seqs.len(),
            seqs.total_len(),
            path_str
        );
        Ok(seqs)
    }

    /// Load FASTA/FASTQ data from any readable source
    pub fn load_reader<R: std::io::Read + Send>(reader: R) -> Result<SequenceFile> {
        let mut fastx_reader =
            parse_fastx_reader(reader).map_err(|e| FastaError::Parse(e.to_string()))?;

        let mut seqs = SequenceFile::new();
        while let Some(record) = fastx_reader.next() {
            let record = record.map_err(|e| FastaError::Parse(e.to_string()))?;
            seqs.add(Self::record_to_sequence(&record));
        }

        if seqs.is_empty() {
            Err(FastaError::EmptyFile.into())
        } else {
            Ok(seqs)
        }
    }

    /// needletail reports the whole header line as the record id.
    fn record_to_sequence(record: &needletail::parser::SequenceRecord) -> Sequence {
        let header = String::from_utf8_lossy(record.id()).into_owned();
        Sequence::new(header, record.seq().into_owned())
    }
}

/// Length profile of a loaded sequence collection
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct SequenceStatistics {
    pub total_sequences: usize,
    pub total_length: usize,
    pub min_length: usize,
    pub max_length: usize,
    pub mean_length: f64,
    pub n50: usize,
    /// Percentage of unambiguous bases that are G or C
    pub gc_content: f64,
    /// Bases outside ACGT
    pub ambiguous_bases: usize,
}

impl SequenceStatistics {
    pub fn from_sequences(seqs: &SequenceFile) -> Self {
        let mut stats = Self::default();
        if seqs.is_empty() {
            return stats;
        }

        let mut lengths: Vec<usize> = Vec::with_capacity(seqs.len());
        let mut total_gc = 0usize;
        let mut total_at = 0usize;
        for seq in seqs.iter() {
            lengths.push(seq.len());
            for &base in &seq.data {
                match base.to_ascii_uppercase() {
                    b'G' | b'C' => total_gc += 1,
                    b'A' | b'T' => total_at += 1,
                    _ => stats.ambiguous_bases += 1,
                }
            }
        }

        stats.total_sequences = lengths.len();
        stats.total_length = lengths.iter().sum();
        stats.min_length = lengths.iter().copied().min().unwrap_or(0);
        stats.max_length = lengths.iter().copied().max().unwrap_or(0);
        stats.mean_length = stats.total_length as f64 / stats.total_sequences as f64;

        lengths.sort_unstable_by(|a, b| b.cmp(a));
        let half_total = stats.total_length / 2;
        let mut cumulative = 0;
        for &length in &lengths {
            cumulative += length;
            if cumulative >= half_total {
                stats.n50 = length;
                break;
            }
        }

        if total_gc + total_at > 0 {
            stats.gc_content = total_gc as f64 / (total_gc + total_at) as f64 * 100.0;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_fasta_reader() {
        let fasta_data = ">seq1 description of sequence 1\n\
                          ATCGATCGATCG\n\
                          >seq2\n\
                          GCTAGCTAGCTA\n";

        let seqs = FastaLoader::load_reader(Cursor::new(fasta_data)).unwrap();
        assert_eq!(seqs.len(), 2);
        let first = seqs.get(0).unwrap();
        assert_eq!(first.name(), "seq1");
        assert_eq!(first.header, "seq1 description of sequence 1");
        assert_eq!(first.data, b"ATCGATCGATCG");
        assert_eq!(seqs.get(1).unwrap().abs_id, 1);
    }

    #[test]
    fn test_load_fastq_reader() {
        let fastq_data = "@read1\n\
                          ATCGATCG\n\
                          +\n\
                          IIIIIIII\n";

        let seqs = FastaLoader::load_reader(Cursor::new(fastq_data)).unwrap();
        assert_eq!(seqs.len(), 1);
        assert_eq!(seqs.get(0).unwrap().data, b"ATCGATCG");
    }

    #[test]
    fn test_multiline_fasta() {
        let fasta_data = ">seq1\n\
                          ATCGATCG\n\
                          GCTAGCTA\n";

        let seqs = FastaLoader::load_reader(Cursor::new(fasta_data)).unwrap();
        assert_eq!(seqs.get(0).unwrap().data, b"ATCGATCGGCTAGCTA");
        assert_eq!(seqs.total_len(), 16);
    }

    #[test]
    fn test_empty_input() {
        assert!(FastaLoader::load_reader(Cursor::new("")).is_err());
    }

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, ">chr1 test").unwrap();
        writeln!(file, "ACGTNNACGT").unwrap();
        file.flush().unwrap();

        let seqs = FastaLoader::load_file(file.path()).unwrap();
        assert_eq!(seqs.len(), 1);
        assert_eq!(seqs.get(0).unwrap().name(), "chr1");
    }

    #[test]
    fn test_sequence_statistics() {
        let seqs: SequenceFile = [
            Sequence::new("a", b"ATCGATCGATCG".to_vec()),
            Sequence::new("b", b"GCGCGCGCGCGCGCGC".to_vec()),
            Sequence::new("c", b"ATGN".to_vec()),
        ]
        .into_iter()
        .collect();

        let stats = SequenceStatistics::from_sequences(&seqs);
        assert_eq!(stats.total_sequences, 3);
        assert_eq!(stats.total_length, 32);
        assert_eq!(stats.min_length, 4);
        assert_eq!(stats.max_length, 16);
        assert_eq!(stats.n50, 16);
        assert_eq!(stats.ambiguous_bases, 1);
        assert!(stats.gc_content > 50.0);
    }
}
