//! Duplicate detection pipeline.
//!
//! Stages, leaf to root:
//! - [`partition`]: group candidates by exact byte size, drop singletons
//! - [`compare`]: prove byte-identity within each partition (hash or bytes)
//! - [`finder`]: orchestrate the stages and assemble [`DuplicateGroup`]s

pub mod compare;
pub mod finder;
pub mod groups;
pub mod partition;

pub use compare::Comparator;
pub use finder::{DuplicateFinder, FinderError, ScanSummary};
pub use groups::DuplicateGroup;
pub use partition::{partition_by_size, PartitionStats};
