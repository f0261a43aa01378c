//! Text report rendering.
//!
//! Renders duplicate groups with a `[KEEP]`/`[DUPLICATE]` marker per file
//! (the keeper chosen by the active policy) plus the overall totals, and
//! renders purge results. All writers are generic over `std::io::Write`.

use std::io::{self, Write};

use bytesize::ByteSize;

use crate::actions::purge::{KeeperPolicy, PurgeOutcome, PurgeReport};
use crate::duplicates::{DuplicateGroup, ScanSummary};

/// Write the duplicate-group report.
///
/// # Errors
///
/// Propagates I/O errors from the destination.
pub fn write_report<W: Write>(
    out: &mut W,
    groups: &[DuplicateGroup],
    summary: &ScanSummary,
    policy: KeeperPolicy,
) -> io::Result<()> {
    if groups.is_empty() {
        writeln!(out, "No duplicate files found.")?;
        return Ok(());
    }

    writeln!(out)?;
    writeln!(
        out,
        "Found {} duplicate group(s) with {} duplicate file(s).",
        summary.duplicate_groups, summary.duplicate_files
    )?;
    writeln!(
        out,
        "Total space that could be saved: {}",
        ByteSize::b(summary.reclaimable_bytes)
    )?;
    writeln!(out)?;

    for (number, group) in groups.iter().enumerate() {
        let keeper = policy.keeper_index(group);

        writeln!(
            out,
            "Group {} ({} files, {} each):",
            number + 1,
            group.len(),
            ByteSize::b(group.size)
        )?;
        writeln!(
            out,
            "  Space wasted: {}",
            ByteSize::b(group.reclaimable_bytes())
        )?;

        for (index, file) in group.files.iter().enumerate() {
            let marker = if index == keeper { "[KEEP]" } else { "[DUPLICATE]" };
            writeln!(out, "  {}. {} {}", index + 1, file.path.display(), marker)?;
        }
        writeln!(out)?;
    }

    Ok(())
}

/// Write the purge result (live or dry-run).
///
/// # Errors
///
/// Propagates I/O errors from the destination.
pub fn write_purge_report<W: Write>(
    out: &mut W,
    report: &PurgeReport,
    dry_run: bool,
) -> io::Result<()> {
    if dry_run {
        writeln!(out, "--- DRY RUN ---")?;
    }

    for record in &report.records {
        match &record.outcome {
            PurgeOutcome::Removed => writeln!(out, "  Removed: {}", record.path.display())?,
            PurgeOutcome::WouldRemove => {
                writeln!(out, "  Would remove: {}", record.path.display())?;
            }
            PurgeOutcome::Failed(reason) => {
                writeln!(out, "  Failed: {} ({})", record.path.display(), reason)?;
            }
        }
    }

    writeln!(out, "{}", report.summary(dry_run))?;
    Ok(())
}
