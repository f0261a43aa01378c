//! Scan orchestration.
//!
//! # Overview
//!
//! [`DuplicateFinder`] drives the detection pipeline:
//!
//! 1. **Collect**: walk the roots, apply inclusion filters
//! 2. **Partition**: bucket candidates by exact size, drop singletons
//! 3. **Compare**: prove byte-identity within each partition
//! 4. **Group**: concatenate the verified classes into the final result
//!
//! Data flows strictly one way; nothing is shared or persisted between
//! invocations. Interruption is checked between stages and between
//! partitions: an interrupted scan returns [`FinderError::Interrupted`]
//! and surfaces no partial result.
//!
//! # Example
//!
//! ```no_run
//! use dedupr::config::ScanConfig;
//! use dedupr::duplicates::DuplicateFinder;
//! use std::path::PathBuf;
//!
//! let finder = DuplicateFinder::new(ScanConfig::default());
//! let (groups, summary) = finder.scan(&[PathBuf::from(".")]).unwrap();
//! println!(
//!     "{} group(s), {} bytes reclaimable",
//!     groups.len(),
//!     summary.reclaimable_bytes
//! );
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::ScanConfig;
use crate::diagnostics::{DiagnosticsSink, LogSink};
use crate::scanner::Collector;

use super::compare::Comparator;
use super::groups::DuplicateGroup;
use super::partition::partition_by_size;

/// Errors that abort an entire scan.
///
/// Per-file and per-directory problems never abort a scan; they are
/// reported through the diagnostics sink and recovered locally.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was interrupted before completion; no result was produced.
    #[error("scan interrupted before completion")]
    Interrupted,
}

/// Counters describing one completed scan.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Candidates collected from the roots
    pub scanned_files: usize,
    /// Candidates dropped because they vanished before partitioning
    pub skipped_files: usize,
    /// Size partitions with two or more members
    pub size_partitions: usize,
    /// Files in those partitions (content comparison ran on these)
    pub candidate_files: usize,
    /// Verified duplicate groups
    pub duplicate_groups: usize,
    /// Redundant copies across all groups (members beyond one per group)
    pub duplicate_files: usize,
    /// Bytes freed if every group kept a single copy
    pub reclaimable_bytes: u64,
    /// Wall-clock duration of the scan
    pub duration: Duration,
}

/// The duplicate detection engine.
///
/// One instance per scan invocation; owns nothing shared.
pub struct DuplicateFinder {
    config: ScanConfig,
    sink: Arc<dyn DiagnosticsSink>,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl DuplicateFinder {
    /// Create a finder with the given configuration and the default
    /// log-backed diagnostics sink.
    #[must_use]
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            sink: Arc::new(LogSink),
            shutdown_flag: None,
        }
    }

    /// Create a finder with the default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ScanConfig::default())
    }

    /// Replace the diagnostics sink.
    #[must_use]
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticsSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    fn check_interrupted(&self) -> Result<(), FinderError> {
        if self.is_shutdown_requested() {
            Err(FinderError::Interrupted)
        } else {
            Ok(())
        }
    }

    /// Run the full detection pipeline over `roots`.
    ///
    /// Finding no duplicates is a normal outcome (empty list), as is a root
    /// that does not exist (it contributes no candidates). Within each
    /// returned group, member order is discovery order; groups themselves
    /// come out in size-ascending partition order.
    ///
    /// # Errors
    ///
    /// Only [`FinderError::Interrupted`], when the shutdown flag was set
    /// before the pipeline finished.
    pub fn scan(
        &self,
        roots: &[PathBuf],
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let started = Instant::now();
        self.sink.debug(&format!(
            "scanning {} root(s) using {}",
            roots.len(),
            self.config.strategy
        ));

        let mut collector = Collector::new(&self.config, Arc::clone(&self.sink));
        if let Some(flag) = &self.shutdown_flag {
            collector = collector.with_shutdown_flag(Arc::clone(flag));
        }
        let files = collector.collect(roots);
        self.check_interrupted()?;

        let scanned_files = files.len();
        self.sink
            .debug(&format!("found {scanned_files} file(s) to analyze"));

        let (partitions, partition_stats) = partition_by_size(files, self.sink.as_ref());
        self.check_interrupted()?;
        self.sink.debug(&format!(
            "{} size partition(s) with potential duplicates",
            partition_stats.partitions
        ));

        let comparator = Comparator::new(&self.config, Arc::clone(&self.sink));
        let mut groups = Vec::new();
        for (size, partition) in partitions {
            self.check_interrupted()?;
            for class in comparator.compare_partition(partition) {
                groups.push(DuplicateGroup::new(size, class));
            }
        }
        self.check_interrupted()?;

        let summary = ScanSummary {
            scanned_files,
            skipped_files: partition_stats.skipped_files,
            size_partitions: partition_stats.partitions,
            candidate_files: partition_stats.candidate_files,
            duplicate_groups: groups.len(),
            duplicate_files: groups.iter().map(|group| group.len() - 1).sum(),
            reclaimable_bytes: groups.iter().map(DuplicateGroup::reclaimable_bytes).sum(),
            duration: started.elapsed(),
        };
        self.sink.debug(&format!(
            "found {} duplicate group(s) in {:?}",
            summary.duplicate_groups, summary.duration
        ));

        Ok((groups, summary))
    }
}
