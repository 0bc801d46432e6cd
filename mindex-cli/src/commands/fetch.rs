//! Fetch command - print a reference sub-sequence

use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

use mindex_core::{load_sequence_file, SequenceFile};

pub fn execute(
    reference: PathBuf,
    name: &str,
    start: usize,
    end: Option<usize>,
    reverse_complement: bool,
) -> Result<()> {
    let seqs = load_sequence_file(&reference)
        .with_context(|| format!("Failed to load reference sequences: {}", reference.display()))?;

    let fetched = fetch(&seqs, name, start, end, reverse_complement)?;
    let strand = if reverse_complement { '-' } else { '+' };
    println!(">{}:{}-{}({})", name, start, end.unwrap_or(start + fetched.len()), strand);
    println!("{}", fetched);
    Ok(())
}

fn fetch(
    seqs: &SequenceFile,
    name: &str,
    start: usize,
    end: Option<usize>,
    reverse_complement: bool,
) -> Result<String> {
    let seq = seqs
        .iter()
        .find(|seq| seq.name() == name)
        .ok_or_else(|| anyhow!("No sequence named '{}'", name))?;
    let end = end.unwrap_or(seq.len());
    seq.substring(start, end, reverse_complement).ok_or_else(|| {
        anyhow!(
            "Range {}-{} is invalid for '{}' (length {})",
            start,
            end,
            name,
            seq.len()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindex_core::Sequence;

    fn seqs() -> SequenceFile {
        [
            Sequence::new("chr1 first", b"AACCGGTTA".to_vec()),
            Sequence::new("chr2", b"GGGA".to_vec()),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_fetch_ranges() {
        let seqs = seqs();
        assert_eq!(fetch(&seqs, "chr1", 0, Some(4), false).unwrap(), "AACC");
        assert_eq!(fetch(&seqs, "chr1", 0, Some(4), true).unwrap(), "GGTT");
        assert_eq!(fetch(&seqs, "chr2", 1, None, false).unwrap(), "GGA");
    }

    #[test]
    fn test_fetch_errors() {
        let seqs = seqs();
        assert!(fetch(&seqs, "chr3", 0, None, false).is_err());
        assert!(fetch(&seqs, "chr2", 2, Some(10), false).is_err());
        assert!(fetch(&seqs, "chr2", 3, Some(3), false).is_err());
    }
}
