use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use anyhow::{Result, Context};

mod config;
mod commands;

use config::Config;
use mindex_core::{IndexParams, IndexRegion};

#[derive(Parser)]
#[command(name = "mindex")]
#[command(about = "mindex - minimizer seed index for long-read mapping")]
#[command(version)]
#[command(long_about = "
mindex builds a canonical minimizer index over a set of reference sequences
and looks up the seeds of query sequences against it.

Examples:
  mindex stats --ref genome.fa -k 15 -w 10
  mindex query --ref genome.fa --qry reads.fa --out hits.tsv
  mindex fetch --ref genome.fa --name chr1 --start 1000 --end 1100 --rc
  mindex config --out mindex.toml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of threads to use
    #[arg(short, long, global = true)]
    pub threads: Option<usize>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build an index and report seed and occurrence statistics
    Stats {
        /// Reference sequence file (FASTA/FASTQ, optionally gzipped)
        #[arg(long = "ref", required = true)]
        reference: PathBuf,

        #[command(flatten)]
        index: IndexArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Write every seed of the built index to this file
        #[arg(long)]
        dump_seeds: Option<PathBuf>,
    },

    /// Collect minimizer hits of query sequences against a reference index
    Query {
        /// Reference sequence file (FASTA/FASTQ, optionally gzipped)
        #[arg(long = "ref", required = true)]
        reference: PathBuf,

        /// Query sequence file (FASTA/FASTQ, optionally gzipped)
        #[arg(long, required = true)]
        qry: PathBuf,

        /// Output file (tab-separated); stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,

        #[command(flatten)]
        index: IndexArgs,
    },

    /// Print a reference sub-sequence, optionally reverse complemented
    Fetch {
        /// Reference sequence file (FASTA/FASTQ, optionally gzipped)
        #[arg(long = "ref", required = true)]
        reference: PathBuf,

        /// Sequence name (header up to the first whitespace)
        #[arg(long, required = true)]
        name: String,

        /// Zero-based start
        #[arg(long, default_value = "0")]
        start: usize,

        /// Exclusive end; defaults to the sequence end
        #[arg(long)]
        end: Option<usize>,

        /// Reverse complement the fetched range
        #[arg(long)]
        rc: bool,
    },

    /// Print or write an example configuration file
    Config {
        /// Write the example configuration here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

/// Index parameter overrides shared by the index-building commands
#[derive(Args, Clone, Debug, Default)]
pub struct IndexArgs {
    /// K-mer length (1-30)
    #[arg(short, long)]
    pub k: Option<usize>,

    /// Window size in k-mers
    #[arg(short, long)]
    pub w: Option<usize>,

    /// Index the forward strand only
    #[arg(long)]
    pub no_rc: bool,

    /// Collapse homopolymer runs before building k-mers
    #[arg(long)]
    pub hpc: bool,

    /// Homopolymer runs this long or longer are left uncollapsed
    #[arg(long)]
    pub max_hpc_run: Option<usize>,

    /// Fraction of the most frequent keys ignored at query time
    #[arg(long)]
    pub freq_percentile: Option<f64>,

    /// Lower bound on the occurrence cutoff
    #[arg(long)]
    pub min_occ: Option<usize>,

    /// Skip reference sequences shorter than this
    #[arg(long)]
    pub min_len: Option<usize>,

    /// Only index one contig range, e.g. 'chr1:10,000-20,000'
    #[arg(long)]
    pub region: Option<String>,
}

impl IndexArgs {
    /// Apply command-line overrides on top of the configured parameters
    pub fn resolve(&self, base: &IndexParams) -> Result<IndexParams> {
        let mut params = base.clone();
        if let Some(k) = self.k {
            params.k = k;
        }
        if let Some(w) = self.w {
            params.w = w;
        }
        if self.no_rc {
            params.use_reverse_complement = false;
        }
        if self.hpc {
            params.homopolymer_suppression = true;
        }
        if let Some(run) = self.max_hpc_run {
            params.max_homopolymer_run = run;
        }
        if let Some(p) = self.freq_percentile {
            params.frequency_percentile = p;
        }
        if let Some(min_occ) = self.min_occ {
            params.min_occurrence_cutoff = min_occ;
        }
        if let Some(min_len) = self.min_len {
            params.min_sequence_len = min_len;
        }
        if let Some(region) = &self.region {
            params.region = Some(
                IndexRegion::parse(region)
                    .with_context(|| format!("Invalid --region '{}'", region))?,
            );
        }
        params.validate().context("Invalid index parameters")?;
        Ok(params)
    }
}

fn setup_logging(verbose: u8, quiet: bool) -> Result<()> {
    if quiet {
        std::env::set_var("RUST_LOG", "error");
    } else {
        let level = match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        std::env::set_var("RUST_LOG", level);
    }

    env_logger::Builder::from_default_env()
        .format_timestamp_secs()
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet)?;

    let config = Config::load(cli.config.as_deref())?;

    let threads = cli.threads.unwrap_or(config.general.threads);
    if threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to set thread count")?;
    }

    match cli.command {
        Commands::Stats {
            reference,
            index,
            json,
            dump_seeds,
        } => {
            let params = index.resolve(&config.index)?;
            commands::stats::execute(params, reference, json, dump_seeds)?;
        }

        Commands::Query {
            reference,
            qry,
            out,
            index,
        } => {
            let params = index.resolve(&config.index)?;
            commands::query::execute(params, reference, qry, out)?;
        }

        Commands::Fetch {
            reference,
            name,
            start,
            end,
            rc,
        } => {
            commands::fetch::execute(reference, &name, start, end, rc)?;
        }

        Commands::Config { out } => match out {
            Some(path) => {
                Config::default().save_to_file(&path)?;
                log::info!("Wrote example configuration to {}", path.display());
            }
            None => print!("{}", Config::example_toml()?),
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_args_override_config() {
        let args = IndexArgs {
            k: Some(11),
            hpc: true,
            region: Some("chr2:100-200".to_string()),
            ..Default::default()
        };
        let params = args.resolve(&IndexParams::default()).unwrap();
        assert_eq!(params.k, 11);
        assert_eq!(params.w, IndexParams::default().w);
        assert!(params.homopolymer_suppression);
        assert_eq!(params.region, Some(IndexRegion::new("chr2", 100, 200)));
    }

    #[test]
    fn test_index_args_rejects_bad_k() {
        let args = IndexArgs {
            k: Some(40),
            ..Default::default()
        };
        assert!(args.resolve(&IndexParams::default()).is_err());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "mindex", "-vv", "query", "--ref", "a.fa", "--qry", "b.fa", "-k", "12",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Query { index, out, .. } => {
                assert_eq!(index.k, Some(12));
                assert!(out.is_none());
            }
            _ => panic!("expected query command"),
        }
    }
}
