//! Query command - look up query minimizers against a reference index

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use mindex_core::{load_sequence_file, IndexParams, MinimizerHit, MinimizerIndex};

pub fn execute(
    params: IndexParams,
    reference: PathBuf,
    query: PathBuf,
    output: Option<PathBuf>,
) -> Result<()> {
    let (index, _) = super::build_index(params, &reference)?;

    log::info!("Loading query sequences from {}", query.display());
    let queries = load_sequence_file(&query)
        .with_context(|| format!("Failed to load query sequences: {}", query.display()))?;

    let records: Vec<_> = queries.iter().collect();
    let results: Vec<Result<Vec<MinimizerHit>>> = records
        .par_iter()
        .map(|record| {
            index
                .collect_hits(&record.data)
                .with_context(|| format!("Query '{}' failed", record.name()))
        })
        .collect();

    let writer: Box<dyn Write> = match &output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout().lock()),
    };
    let mut writer = BufWriter::new(writer);

    let mut total_hits = 0;
    for (record, hits) in records.iter().zip(results) {
        let hits = hits?;
        total_hits += hits.len();
        write_hits(&mut writer, &index, record.name(), &hits)?;
    }
    writer.flush()?;

    log::info!(
        "Collected {} hits for {} query sequences",
        total_hits,
        records.len()
    );
    Ok(())
}

/// One tab-separated line per hit: query, target, strand, target position,
/// query position, diagonal.
fn write_hits<W: Write>(
    out: &mut W,
    index: &MinimizerIndex,
    query_name: &str,
    hits: &[MinimizerHit],
) -> Result<()> {
    for hit in hits {
        let target = index
            .sequences()
            .get(hit.sequence_id)
            .map(|seq| seq.name())
            .unwrap_or("*");
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}",
            query_name,
            target,
            hit.strand(),
            hit.target_position,
            hit.query_position,
            hit.diagonal()
        )?;
    }
    Ok(())
}
