//! Duplicate purging.
//!
//! # Overview
//!
//! Within each group exactly one member - the *keeper*, chosen by a
//! [`KeeperPolicy`] - survives; every other member is a deletion candidate.
//! Deletion is best-effort: a failure on one file is recorded in the
//! [`PurgeReport`] and never blocks the rest of the group or other groups.
//!
//! Dry-run mode computes the identical plan without touching the
//! filesystem.
//!
//! # Example
//!
//! ```no_run
//! use dedupr::actions::purge::{purge, KeeperPolicy};
//! use dedupr::diagnostics::NullSink;
//!
//! let groups = vec![];
//! let report = purge(&groups, true, KeeperPolicy::FirstDiscovered, &NullSink);
//! println!("{}", report.summary(true));
//! ```

use std::fs;
use std::path::PathBuf;

use clap::ValueEnum;

use crate::diagnostics::DiagnosticsSink;
use crate::duplicates::DuplicateGroup;

/// Which copy of a duplicate group survives a purge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum KeeperPolicy {
    /// Keep the earliest-discovered member (index 0).
    #[default]
    FirstDiscovered,
    /// Keep the member with the shortest filename (character count of the
    /// final path component); ties fall back to discovery order.
    ShortestName,
}

impl KeeperPolicy {
    /// Index of the member this policy keeps.
    ///
    /// The tie-break scan uses strict `<`, so the earliest member wins
    /// among equally short names.
    #[must_use]
    pub fn keeper_index(&self, group: &DuplicateGroup) -> usize {
        match self {
            Self::FirstDiscovered => 0,
            Self::ShortestName => {
                let mut keeper = 0;
                let mut shortest = usize::MAX;
                for (index, file) in group.files.iter().enumerate() {
                    let length = file.file_name_chars();
                    if length < shortest {
                        keeper = index;
                        shortest = length;
                    }
                }
                keeper
            }
        }
    }
}

impl std::fmt::Display for KeeperPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FirstDiscovered => f.write_str("first-discovered"),
            Self::ShortestName => f.write_str("shortest-name"),
        }
    }
}

/// What happened (or would happen) to one deletion candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurgeOutcome {
    /// The file was deleted.
    Removed,
    /// Dry run: the file would have been deleted.
    WouldRemove,
    /// Deletion failed; the reason, the rest of the purge continued.
    Failed(String),
}

/// One deletion candidate and its outcome.
#[derive(Debug, Clone)]
pub struct PurgeRecord {
    /// Path of the candidate.
    pub path: PathBuf,
    /// Size of the candidate in bytes.
    pub size: u64,
    /// What happened to it.
    pub outcome: PurgeOutcome,
}

/// Results of one purge call. Ephemeral: produced and consumed within a
/// single invocation.
#[derive(Debug, Clone, Default)]
pub struct PurgeReport {
    /// One record per deletion candidate, in group order.
    pub records: Vec<PurgeRecord>,
}

impl PurgeReport {
    /// Number of files actually deleted.
    #[must_use]
    pub fn removed_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome == PurgeOutcome::Removed)
            .count()
    }

    /// Number of files a dry run would delete.
    #[must_use]
    pub fn would_remove_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome == PurgeOutcome::WouldRemove)
            .count()
    }

    /// Number of failed deletions.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, PurgeOutcome::Failed(_)))
            .count()
    }

    /// Total number of deletion candidates.
    #[must_use]
    pub fn planned_count(&self) -> usize {
        self.records.len()
    }

    /// Check if no deletion failed.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failure_count() == 0
    }

    /// Bytes freed by the deletions that succeeded (or would succeed, in a
    /// dry run).
    #[must_use]
    pub fn bytes_reclaimed(&self) -> u64 {
        self.records
            .iter()
            .filter(|r| {
                matches!(
                    r.outcome,
                    PurgeOutcome::Removed | PurgeOutcome::WouldRemove
                )
            })
            .map(|r| r.size)
            .sum()
    }

    /// Human-readable one-line summary.
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let reclaimed = bytesize::ByteSize::b(self.bytes_reclaimed());
        if dry_run {
            format!(
                "Would remove {} duplicate file(s), reclaiming {}",
                self.would_remove_count(),
                reclaimed
            )
        } else if self.all_succeeded() {
            format!(
                "Removed {} duplicate file(s), reclaimed {}",
                self.removed_count(),
                reclaimed
            )
        } else {
            format!(
                "Removed {} duplicate file(s), {} failed, reclaimed {}",
                self.removed_count(),
                self.failure_count(),
                reclaimed
            )
        }
    }
}

/// Delete all but one member of each group.
///
/// Groups with fewer than two members are skipped. In dry-run mode nothing
/// is deleted; the plan comes back as [`PurgeOutcome::WouldRemove`]
/// records. In live mode each candidate gets a single deletion attempt;
/// failures are recorded per file and reported through the sink, and the
/// purge continues.
#[must_use]
pub fn purge(
    groups: &[DuplicateGroup],
    dry_run: bool,
    policy: KeeperPolicy,
    sink: &dyn DiagnosticsSink,
) -> PurgeReport {
    let mut report = PurgeReport::default();

    for group in groups {
        if group.len() < 2 {
            continue;
        }
        let keeper = policy.keeper_index(group);

        for (index, file) in group.files.iter().enumerate() {
            if index == keeper {
                continue;
            }

            let outcome = if dry_run {
                PurgeOutcome::WouldRemove
            } else {
                match fs::remove_file(&file.path) {
                    Ok(()) => {
                        sink.debug(&format!("removed {}", file.path.display()));
                        PurgeOutcome::Removed
                    }
                    Err(error) => {
                        sink.warning(&format!(
                            "could not remove {}: {}",
                            file.path.display(),
                            error
                        ));
                        PurgeOutcome::Failed(error.to_string())
                    }
                }
            };

            report.records.push(PurgeRecord {
                path: file.path.clone(),
                size: file.size,
                outcome,
            });
        }
    }

    report
}
