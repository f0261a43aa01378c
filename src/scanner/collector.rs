//! File collection over one or more roots.
//!
//! # Overview
//!
//! The [`Collector`] walks the given roots and produces the flat list of
//! candidate [`FileRef`]s for duplicate detection, applying the inclusion
//! filters (size bounds, symlink policy, recursion policy) as it goes.
//!
//! Traversal runs over an explicit work stack rather than the call stack,
//! so pathologically deep trees cannot overflow it and shutdown checks
//! happen between directories. Directory entries are visited in name order,
//! which makes discovery order deterministic for a fixed filesystem state.
//!
//! Traversal errors are non-fatal: the offending entry or subtree is
//! skipped with a warning to the diagnostics sink and the walk continues.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::ScanConfig;
use crate::diagnostics::DiagnosticsSink;

use super::{FileRef, ScanError};

/// Walks roots and collects candidate files.
pub struct Collector<'a> {
    config: &'a ScanConfig,
    sink: Arc<dyn DiagnosticsSink>,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl<'a> Collector<'a> {
    /// Create a collector for the given configuration.
    #[must_use]
    pub fn new(config: &'a ScanConfig, sink: Arc<dyn DiagnosticsSink>) -> Self {
        Self {
            config,
            sink,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination between directories.
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

    /// Collect candidate files from all roots, in root order.
    ///
    /// A root that does not exist contributes no candidates and no error;
    /// surfacing that condition to the user is the caller's concern.
    #[must_use]
    pub fn collect(&self, roots: &[PathBuf]) -> Vec<FileRef> {
        let mut files = Vec::new();

        for root in roots {
            if self.is_shutdown_requested() {
                break;
            }

            // Follows symlinks, so a symlinked root behaves like its target.
            let metadata = match fs::metadata(root) {
                Ok(metadata) => metadata,
                Err(error) => {
                    self.sink
                        .debug(&format!("skipping root {}: {}", root.display(), error));
                    continue;
                }
            };

            if metadata.is_dir() {
                self.walk_directory(root, &mut files);
            } else if metadata.is_file() {
                let is_symlink = fs::symlink_metadata(root)
                    .map(|m| m.file_type().is_symlink())
                    .unwrap_or(false);
                self.consider_candidate(root.to_path_buf(), metadata.len(), is_symlink, &mut files);
            }
        }

        files
    }

    /// Iterative traversal of one directory root. `stack` holds the
    /// directories not yet read.
    fn walk_directory(&self, root: &Path, files: &mut Vec<FileRef>) {
        let mut stack = vec![root.to_path_buf()];

        while let Some(dir) = stack.pop() {
            if self.is_shutdown_requested() {
                return;
            }

            let reader = match fs::read_dir(&dir) {
                Ok(reader) => reader,
                Err(error) => {
                    self.report_error(&dir, error);
                    continue;
                }
            };

            let mut entries = Vec::new();
            for entry in reader {
                match entry {
                    Ok(entry) => entries.push(entry.path()),
                    Err(error) => self.report_error(&dir, error),
                }
            }
            // Name order keeps discovery order stable across runs.
            entries.sort();

            let mut subdirs = Vec::new();
            for path in entries {
                let metadata = match fs::symlink_metadata(&path) {
                    Ok(metadata) => metadata,
                    Err(error) => {
                        self.report_error(&path, error);
                        continue;
                    }
                };
                let file_type = metadata.file_type();

                if file_type.is_dir() {
                    if self.config.recursive {
                        subdirs.push(path);
                    }
                } else if file_type.is_symlink() {
                    self.consider_symlink(path, &mut subdirs, files);
                } else if file_type.is_file() {
                    self.consider_candidate(path, metadata.len(), false, files);
                }
                // Sockets, FIFOs and devices are not regular files; ignored.
            }

            // LIFO stack: push in reverse so subdirectories pop in name order.
            for subdir in subdirs.into_iter().rev() {
                stack.push(subdir);
            }
        }
    }

    /// Classify a symlink entry: skipped entirely unless symlinks are
    /// followed; otherwise treated as its target (file or directory).
    fn consider_symlink(
        &self,
        path: PathBuf,
        subdirs: &mut Vec<PathBuf>,
        files: &mut Vec<FileRef>,
    ) {
        if !self.config.follow_symlinks {
            self.sink
                .debug(&format!("skipping symlink: {}", path.display()));
            return;
        }

        match fs::metadata(&path) {
            Ok(metadata) if metadata.is_dir() => {
                if self.config.recursive {
                    subdirs.push(path);
                }
            }
            Ok(metadata) if metadata.is_file() => {
                self.consider_candidate(path, metadata.len(), true, files);
            }
            Ok(_) => {}
            Err(error) => self.report_error(&path, error),
        }
    }

    /// Apply the inclusion predicate and record the candidate.
    fn consider_candidate(
        &self,
        path: PathBuf,
        size: u64,
        is_symlink: bool,
        files: &mut Vec<FileRef>,
    ) {
        if is_symlink && !self.config.follow_symlinks {
            self.sink
                .debug(&format!("skipping symlink: {}", path.display()));
            return;
        }
        if !self.config.size_in_bounds(size) {
            self.sink.debug(&format!(
                "size filter excludes {} ({} bytes)",
                path.display(),
                size
            ));
            return;
        }

        files.push(FileRef {
            path,
            size,
            is_symlink,
        });
    }

    /// Funnel a traversal error into the diagnostics sink.
    fn report_error(&self, path: &Path, error: io::Error) {
        match error.kind() {
            io::ErrorKind::NotFound => {
                // Race with deletion; not worth a warning.
                self.sink.debug(&format!(
                    "path vanished during traversal: {}",
                    path.display()
                ));
            }
            io::ErrorKind::PermissionDenied => {
                self.sink
                    .warning(&ScanError::PermissionDenied(path.to_path_buf()).to_string());
            }
            _ => {
                self.sink.warning(
                    &ScanError::Io {
                        path: path.to_path_buf(),
                        source: error,
                    }
                    .to_string(),
                );
            }
        }
    }
}
