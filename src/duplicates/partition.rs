//! Size partitioning, the first filtering stage.
//!
//! Files are bucketed by exact byte size in a single pass. A partition with
//! one member cannot contain duplicates and is dropped immediately, which
//! short-circuits all content comparison for unique-sized files - the cheap
//! filter that makes the expensive stage affordable.
//!
//! Partitions are keyed in a `BTreeMap`, so downstream stages see them in
//! size-ascending order and the cross-group ordering of results is stable
//! run to run.

use std::collections::BTreeMap;
use std::fs;

use crate::diagnostics::DiagnosticsSink;
use crate::scanner::FileRef;

/// Statistics from the partitioning stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionStats {
    /// Files that entered the stage
    pub total_files: usize,
    /// Partitions remaining after singleton elimination
    pub partitions: usize,
    /// Files remaining in those partitions
    pub candidate_files: usize,
    /// Files dropped because their size could no longer be read
    pub skipped_files: usize,
}

impl PartitionStats {
    /// Files eliminated without any content being read.
    #[must_use]
    pub fn eliminated(&self) -> usize {
        self.total_files - self.candidate_files - self.skipped_files
    }
}

/// Group files by exact size, dropping partitions of fewer than two.
///
/// A file that vanished since discovery (race with deletion) is skipped
/// with a debug note rather than treated as an error.
#[must_use]
pub fn partition_by_size(
    files: Vec<FileRef>,
    sink: &dyn DiagnosticsSink,
) -> (BTreeMap<u64, Vec<FileRef>>, PartitionStats) {
    let total_files = files.len();
    let mut skipped_files = 0usize;
    let mut partitions: BTreeMap<u64, Vec<FileRef>> = BTreeMap::new();

    for file in files {
        if let Err(error) = fs::symlink_metadata(&file.path) {
            sink.debug(&format!(
                "could not read size of {}: {}",
                file.path.display(),
                error
            ));
            skipped_files += 1;
            continue;
        }
        partitions.entry(file.size).or_default().push(file);
    }

    partitions.retain(|_, group| group.len() >= 2);

    let stats = PartitionStats {
        total_files,
        partitions: partitions.len(),
        candidate_files: partitions.values().map(Vec::len).sum(),
        skipped_files,
    };

    (partitions, stats)
}
