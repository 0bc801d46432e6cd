//! mindex core library
//!
//! Minimizer seeding, the bucketed minimizer index, and sequence loading.

pub mod types;
pub mod seed;
pub mod index;
pub mod sequences;
pub mod io;

// Re-export commonly used types and functions
pub use types::{MinimizerHit, SeedSpan, SeqId, SeqPos, Strand};
pub use seed::{
    generate_minimizers, IndexParams, IndexRegion, Minimizer, MinimizerGenerator, PackedMinimizer,
    SeedError, SeedResult,
};
pub use index::{
    BTreeBucket, BucketMap, BuildSummary, FnvBucket, IndexError, IndexResult, IndexState,
    MinimizerIndex, OccurrenceStats,
};
pub use sequences::{Sequence, SequenceFile};
pub use io::load_sequence_file;

/// Version information for the mindex core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
