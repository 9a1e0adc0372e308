//! Exploratory cryptanalysis of the unsolved Kryptos K4 passage.
//!
//! For every candidate separator letter the ciphertext is split into
//! segments; the tool then searches all orderings and equal-length group
//! partitions of those segments for groupings whose letter-frequency
//! profiles share the same shape. The pipeline:
//! - Lazy exhaustive permutation generation (Heap's algorithm)
//! - Equal-length partitioning with symmetry-aware SHA-256 dedup
//! - Letter-frequency shape comparison
//! - A bounded-queue worker pool with cooperative cancellation
//! - A statistics recorder with periodic durable snapshots

pub mod cli;
pub mod ciphertext;
pub mod error;
pub mod frequency;
pub mod partition;
pub mod permute;
pub mod report;
pub mod scheduler;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use ciphertext::K4;
pub use error::{AnalysisError, Result};
pub use frequency::{have_identical_shapes, LetterFrequency};
pub use partition::Partitioner;
pub use permute::Permutations;
pub use report::DiscoverySink;
pub use scheduler::SchedulerConfig;
pub use stats::StatsRecorder;
pub use types::{Collection, Group, Job};
