//! Stats command - build an index and report what went into it

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use mindex_core::io::SequenceStatistics;
use mindex_core::{BuildSummary, IndexParams};

#[derive(Debug, Serialize)]
struct StatsReport {
    params: IndexParams,
    sequences: SequenceStatistics,
    index: BuildSummary,
    /// Largest and mean number of keys per hash bucket
    max_bucket_keys: usize,
    mean_bucket_keys: f64,
}

pub fn execute(
    params: IndexParams,
    reference: PathBuf,
    json: bool,
    dump_seeds: Option<PathBuf>,
) -> Result<()> {
    let (index, summary) = super::build_index(params, &reference)?;

    let bucket_sizes = index.bucket_sizes();
    let report = StatsReport {
        params: index.params().clone(),
        sequences: SequenceStatistics::from_sequences(index.sequences()),
        index: summary,
        max_bucket_keys: bucket_sizes.iter().copied().max().unwrap_or(0),
        mean_bucket_keys: bucket_sizes.iter().sum::<usize>() as f64
            / bucket_sizes.len().max(1) as f64,
    };

    if let Some(path) = dump_seeds {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create seed dump: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        index.dump_seeds(&mut writer)?;
        writer.flush()?;
        log::info!("Wrote {} seeds to {}", index.num_seeds(), path.display());
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        write_text_report(&mut out, &report)?;
    }

    Ok(())
}

fn write_text_report<W: Write>(out: &mut W, report: &StatsReport) -> Result<()> {
    let seqs = &report.sequences;
    let index = &report.index;
    let occ = &index.occurrence;

    writeln!(out, "k = {}, w = {}, reverse complement = {}, homopolymer suppression = {}",
        report.params.k, report.params.w,
        report.params.use_reverse_complement, report.params.homopolymer_suppression)?;
    writeln!(out, "Sequences:          {} ({} indexed)", seqs.total_sequences, index.num_sequences_indexed)?;
    writeln!(out, "Total length:       {}", seqs.total_length)?;
    writeln!(out, "Length min/max/N50: {} / {} / {}", seqs.min_length, seqs.max_length, seqs.n50)?;
    writeln!(out, "GC content:         {:.2}%", seqs.gc_content)?;
    writeln!(out, "Ambiguous bases:    {}", seqs.ambiguous_bases)?;
    writeln!(out, "Seeds:              {}", index.num_seeds)?;
    writeln!(out, "Distinct keys:      {}", index.num_keys)?;
    writeln!(out, "Average spacing:    {:.2}", index.average_spacing)?;
    writeln!(out, "Max occurrence:     {}", occ.max_occurrence)?;
    writeln!(out, "Occurrence cutoff:  {}", occ.cutoff)?;
    writeln!(out, "Singleton fraction: {:.4}", occ.singleton_fraction)?;
    writeln!(out, "Average occurrence: {:.2}", occ.average_occurrence)?;
    writeln!(out, "Keys per bucket:    max {}, mean {:.2}", report.max_bucket_keys, report.mean_bucket_keys)?;
    Ok(())
}
