//! mindex demo
//!
//! Builds a small minimizer index over two contigs and queries it with a
//! forward read and a reverse-complemented read.

use mindex_core::seed::utils::reverse_complement;
use mindex_core::{FnvBucket, IndexParams, MinimizerIndex};

fn main() {
    env_logger::init();

    println!("mindex demo");
    println!("===========\n");

    let contig1 = b"GATTACAGGCTTCCAAGTCGTTAGCCATGACTTGACCAGTACGGTCAGGCATT";
    let contig2 = b"TTGACCAGTACGGTCANNNNNNNNAAGCTTGCATGCCTGCAGGTCGACTCTAGA";

    let params = IndexParams {
        k: 8,
        w: 4,
        frequency_percentile: 0.0,
        ..Default::default()
    };
    let mut index = match MinimizerIndex::<FnvBucket>::new(params) {
        Ok(index) => index,
        Err(e) => {
            eprintln!("Invalid parameters: {}", e);
            return;
        }
    };

    if let Err(e) = index.add_sequences(&[&contig1[..], &contig2[..]], &["contig1", "contig2"]) {
        eprintln!("Failed to add sequences: {}", e);
        return;
    }

    let summary = match index.build() {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Build failed: {}", e);
            return;
        }
    };
    println!(
        "Indexed {} sequences: {} seeds, {} keys, cutoff {}, avg spacing {:.2}\n",
        summary.num_sequences_indexed,
        summary.num_seeds,
        summary.num_keys,
        summary.occurrence.cutoff,
        summary.average_spacing
    );

    let read = &contig1[10..40];
    let queries = [("forward read", read.to_vec()), ("reverse read", reverse_complement(read))];
    for (label, query) in queries {
        println!("{}: {}", label, String::from_utf8_lossy(&query));
        match index.collect_hits(&query) {
            Ok(hits) => {
                for hit in hits.iter().take(8) {
                    println!(
                        "  {} {} t={} q={}",
                        index.seq_header(hit.sequence_id).unwrap_or("?"),
                        hit.strand(),
                        hit.target_position,
                        hit.query_position
                    );
                }
                if hits.len() > 8 {
                    println!("  ... and {} more hits", hits.len() - 8);
                }
            }
            Err(e) => println!("  query failed: {}", e),
        }
        println!();
    }
}
