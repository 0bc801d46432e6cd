//! Minimizer index: seed collection, sorting and the bucketed key lookup
//!
//! The index moves through a single transition: sequences are added to the
//! backing [`SequenceFile`], then [`MinimizerIndex::build`] generates all
//! seeds, sorts them by key, computes occurrence statistics and constructs
//! the bucketed hash. A built index is immutable and can be queried
//! concurrently.

use std::io::Write;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::seed::utils::decode_kmer;
use crate::seed::{IndexParams, Minimizer, MinimizerGenerator, SeedError, SeedResult};
use crate::sequences::{Sequence, SequenceFile};
use crate::types::{SeedSpan, SeqId};

pub mod buckets;
pub mod hits;
pub mod occurrence;
pub mod sort;
pub mod store;

pub use buckets::{BTreeBucket, BucketMap, BucketedHashIndex, FnvBucket, NUM_BUCKETS};
pub use occurrence::OccurrenceStats;
pub use store::SeedStore;

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;

/// Errors that can occur while building or querying an index
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error(transparent)]
    Seed(#[from] SeedError),

    #[error("No sequences were added to the index")]
    NoSequences,

    #[error("Cannot add an empty sequence ('{0}')")]
    EmptySequence(String),

    #[error("Got {seqs} sequences but {headers} headers")]
    MismatchedBatch { seqs: usize, headers: usize },

    #[error("Index already built; clear it before adding sequences or rebuilding")]
    AlreadyBuilt,

    #[error("Index has not been built")]
    NotBuilt,

    #[error("Sequence count {0} exceeds the sequence id space")]
    TooManySequences(usize),

    #[error("Internal consistency violation: seed keys out of order at index {index} ({previous} > {current})")]
    UnsortedSeeds {
        index: usize,
        previous: u64,
        current: u64,
    },

    #[error("Internal consistency violation: {0}")]
    Inconsistent(String),
}

impl IndexError {
    /// Errors that indicate a bug rather than bad input; callers should not
    /// continue using the index after one of these.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            IndexError::UnsortedSeeds { .. } | IndexError::Inconsistent(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    Empty,
    Loaded,
    Built,
}

/// What a call to [`MinimizerIndex::build`] produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildSummary {
    pub num_sequences_indexed: usize,
    pub num_seeds: usize,
    pub num_keys: usize,
    pub occurrence: OccurrenceStats,
    /// Mean position step between consecutive seeds of a sequence
    pub average_spacing: f64,
}

pub struct MinimizerIndex<M: BucketMap = FnvBucket> {
    params: IndexParams,
    generator: MinimizerGenerator,
    seqs: SequenceFile,
    store: SeedStore,
    hash: BucketedHashIndex<M>,
    occurrence: OccurrenceStats,
    average_spacing: f64,
    state: IndexState,
}

impl<M: BucketMap> MinimizerIndex<M> {
    /// Create an empty index; parameters are validated up front.
    pub fn new(params: IndexParams) -> IndexResult<Self> {
        params.validate()?;
        let generator = MinimizerGenerator::from_params(&params)?;
        Ok(Self {
            hash: BucketedHashIndex::new(params.k),
            params,
            generator,
            seqs: SequenceFile::new(),
            store: SeedStore::new(),
            occurrence: OccurrenceStats::default(),
            average_spacing: 0.0,
            state: IndexState::Empty,
        })
    }

    /// Add one sequence to the backing collection.
    pub fn add_sequence(&mut self, seq: &[u8], header: &str) -> IndexResult<SeqId> {
        if self.state == IndexState::Built {
            return Err(IndexError::AlreadyBuilt);
        }
        if seq.is_empty() {
            return Err(IndexError::EmptySequence(header.to_string()));
        }
        if self.seqs.len() >= SeqId::MAX as usize {
            return Err(IndexError::TooManySequences(self.seqs.len() + 1));
        }
        let id = self.seqs.add(Sequence::new(header, seq.to_vec()));
        self.state = IndexState::Loaded;
        Ok(id)
    }

    /// Add paired sequences and headers. Nothing is added when the lists
    /// differ in length; empty sequences are skipped.
    pub fn add_sequences<S, H>(&mut self, seqs: &[S], headers: &[H]) -> IndexResult<usize>
    where
        S: AsRef<[u8]>,
        H: AsRef<str>,
    {
        if seqs.len() != headers.len() {
            return Err(IndexError::MismatchedBatch {
                seqs: seqs.len(),
                headers: headers.len(),
            });
        }
        let mut added = 0;
        for (seq, header) in seqs.iter().zip(headers) {
            match self.add_sequence(seq.as_ref(), header.as_ref()) {
                Ok(_) => added += 1,
                Err(IndexError::EmptySequence(name)) => {
                    log::debug!("Skipping empty sequence '{}'", name);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(added)
    }

    /// Replace the backing collection with a pre-populated one.
    pub fn set_sequence_file(&mut self, seqs: SequenceFile) -> IndexResult<()> {
        if self.state == IndexState::Built {
            return Err(IndexError::AlreadyBuilt);
        }
        if seqs.len() > SeqId::MAX as usize {
            return Err(IndexError::TooManySequences(seqs.len()));
        }
        self.state = if seqs.is_empty() {
            IndexState::Empty
        } else {
            IndexState::Loaded
        };
        self.seqs = seqs;
        Ok(())
    }

    /// Drop all sequences and seeds, returning to the empty state.
    pub fn clear(&mut self) {
        self.seqs.clear();
        self.store.clear();
        self.hash.clear();
        self.occurrence = OccurrenceStats::default();
        self.average_spacing = 0.0;
        self.state = IndexState::Empty;
    }

    /// Generate, sort and hash the seeds of every added sequence.
    pub fn build(&mut self) -> IndexResult<BuildSummary> {
        if self.state == IndexState::Built {
            return Err(IndexError::AlreadyBuilt);
        }
        if self.seqs.is_empty() {
            return Err(IndexError::NoSequences);
        }

        self.store.clear();
        self.store.reserve_for(self.seqs.total_len(), self.params.w);
        log::info!(
            "Building index over {} sequences ({} bp), k = {}, w = {}",
            self.seqs.len(),
            self.seqs.total_len(),
            self.params.k,
            self.params.w
        );
        log::debug!("Reserved space for {} seeds", self.store.capacity());

        let eligible = self.eligible_sequences();
        let generated: Vec<(SeqId, SeedResult<Vec<u128>>)> = if self.params.parallel {
            eligible
                .par_iter()
                .map(|&id| (id, self.generate_for(id)))
                .collect()
        } else {
            eligible
                .iter()
                .map(|&id| (id, self.generate_for(id)))
                .collect()
        };

        let mut num_indexed = 0;
        let mut spacing_sum = 0i64;
        for (id, result) in generated {
            match result {
                Ok(mut local) => {
                    spacing_sum += store::spacing_sum(&local);
                    self.store.append(&mut local);
                    num_indexed += 1;
                }
                Err(e) => log::warn!("Skipping sequence {}: {}", id, e),
            }
        }
        self.average_spacing = if self.store.is_empty() {
            0.0
        } else {
            spacing_sum as f64 / self.store.len() as f64
        };
        log::info!("Collected {} minimizers", self.store.len());

        self.store.sort();
        log::debug!("Sorted {} minimizers", self.store.len());

        self.occurrence = OccurrenceStats::from_sorted_seeds(
            self.store.as_slice(),
            self.params.frequency_percentile,
            self.params.min_occurrence_cutoff,
        );
        log::info!(
            "Occurrence: keys = {}, max = {}, cutoff = {}, singletons = {:.4}, avg = {:.2}",
            self.occurrence.num_keys,
            self.occurrence.max_occurrence,
            self.occurrence.cutoff,
            self.occurrence.singleton_fraction,
            self.occurrence.average_occurrence
        );

        self.hash.build(self.store.as_slice())?;

        let recount = OccurrenceStats::from_spans(
            self.hash.spans(),
            self.params.frequency_percentile,
            self.params.min_occurrence_cutoff,
        );
        if recount != self.occurrence {
            return Err(IndexError::Inconsistent(format!(
                "hash spans report {} keys (cutoff {}), seed array reports {} keys (cutoff {})",
                recount.num_keys, recount.cutoff, self.occurrence.num_keys, self.occurrence.cutoff
            )));
        }
        log::info!(
            "Index built: {} keys, {} seeds",
            self.hash.num_keys(),
            self.store.len()
        );

        self.state = IndexState::Built;
        Ok(BuildSummary {
            num_sequences_indexed: num_indexed,
            num_seeds: self.store.len(),
            num_keys: self.hash.num_keys(),
            occurrence: self.occurrence,
            average_spacing: self.average_spacing,
        })
    }

    /// Ids of sequences passing the length and region filters
    fn eligible_sequences(&self) -> Vec<SeqId> {
        let region = self.params.region.as_ref();
        self.seqs
            .iter()
            .enumerate()
            .filter(|(_, seq)| seq.len() >= self.params.min_sequence_len)
            .filter(|(_, seq)| region.map_or(true, |r| r.matches_header(&seq.header)))
            .map(|(id, _)| id as SeqId)
            .collect()
    }

    fn generate_for(&self, id: SeqId) -> SeedResult<Vec<u128>> {
        let mut local = Vec::new();
        if let Some(seq) = self.seqs.get(id) {
            let (start, end) = self
                .params
                .region
                .as_ref()
                .map_or((0, 0), |r| (r.start, r.end));
            self.generator
                .generate_range(&seq.data, id, start, end, &mut local)?;
        }
        Ok(local)
    }

    pub fn params(&self) -> &IndexParams {
        &self.params
    }

    pub fn k(&self) -> usize {
        self.params.k
    }

    pub fn w(&self) -> usize {
        self.params.w
    }

    pub fn state(&self) -> IndexState {
        self.state
    }

    pub fn is_built(&self) -> bool {
        self.state == IndexState::Built
    }

    pub fn occurrence_stats(&self) -> &OccurrenceStats {
        &self.occurrence
    }

    pub fn occurrence_cutoff(&self) -> usize {
        self.occurrence.cutoff
    }

    pub fn average_spacing(&self) -> f64 {
        self.average_spacing
    }

    pub fn sequences(&self) -> &SequenceFile {
        &self.seqs
    }

    pub fn num_seqs(&self) -> usize {
        self.seqs.len()
    }

    pub fn total_len(&self) -> usize {
        self.seqs.total_len()
    }

    pub fn num_keys(&self) -> usize {
        self.hash.num_keys()
    }

    pub fn num_seeds(&self) -> usize {
        self.store.len()
    }

    /// Sorted packed seeds
    pub fn seeds(&self) -> &[u128] {
        self.store.as_slice()
    }

    pub fn spans(&self) -> &[SeedSpan] {
        self.hash.spans()
    }

    pub fn bucket_sizes(&self) -> Vec<usize> {
        self.hash.bucket_sizes()
    }

    /// Range of the seed array holding `key`, if indexed
    pub fn lookup(&self, key: u64) -> Option<SeedSpan> {
        self.hash.span_of(key)
    }

    pub fn fetch_raw_seq(&self, id: SeqId) -> Option<&[u8]> {
        self.seqs.get(id).map(|seq| seq.data.as_slice())
    }

    pub fn fetch_seq_as_string(
        &self,
        id: SeqId,
        start: usize,
        end: usize,
        reverse_complement: bool,
    ) -> Option<String> {
        self.seqs
            .get(id)
            .and_then(|seq| seq.substring(start, end, reverse_complement))
    }

    pub fn fetch_full_seq_as_string(&self, id: SeqId, reverse_complement: bool) -> Option<String> {
        self.seqs
            .get(id)
            .and_then(|seq| seq.substring(0, seq.len(), reverse_complement))
    }

    pub fn seq_header(&self, id: SeqId) -> Option<&str> {
        self.seqs.get(id).map(|seq| seq.header.as_str())
    }

    pub fn seq_len(&self, id: SeqId) -> Option<usize> {
        self.seqs.get(id).map(Sequence::len)
    }

    /// Write one line per seed: index, sequence, position, strand, key, bucket.
    pub fn dump_seeds<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(
            out,
            "shift = {}, buckets = {}",
            self.hash.shift(),
            NUM_BUCKETS
        )?;
        for (i, &packed) in self.store.as_slice().iter().enumerate() {
            let mm = Minimizer::unpack(packed);
            writeln!(
                out,
                "[{}] seq_id = {}, pos = {}, strand = {}, key = {}, kmer = {}, bucket = {}",
                i,
                mm.seq_id,
                mm.pos,
                mm.strand,
                mm.key,
                String::from_utf8_lossy(&decode_kmer(mm.key, self.params.k)),
                self.hash.bucket_of(mm.key)
            )?;
        }
        Ok(())
    }
}
