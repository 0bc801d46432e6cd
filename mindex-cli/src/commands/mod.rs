//! Command implementations for the mindex CLI

pub mod fetch;
pub mod query;
pub mod stats;

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Instant;

use mindex_core::{load_sequence_file, BuildSummary, IndexParams, MinimizerIndex};

/// Load a reference file and build an index over it
pub(crate) fn build_index(
    params: IndexParams,
    reference: &Path,
) -> Result<(MinimizerIndex, BuildSummary)> {
    log::info!("Loading reference sequences from {}", reference.display());
    let seqs = load_sequence_file(reference)
        .with_context(|| format!("Failed to load reference sequences: {}", reference.display()))?;

    let mut index = MinimizerIndex::new(params).context("Invalid index parameters")?;
    index.set_sequence_file(seqs)?;

    let started = Instant::now();
    let summary = match index.build() {
        Ok(summary) => summary,
        Err(e) if e.is_fatal() => {
            log::error!("Index construction hit an internal error: {}", e);
            return Err(e).context("Index construction aborted");
        }
        Err(e) => return Err(e).context("Failed to build index"),
    };
    log::info!("Index built in {:.2?}", started.elapsed());

    Ok((index, summary))
}
