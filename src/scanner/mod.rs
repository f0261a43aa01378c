//! Scanner module for file discovery and content digesting.
//!
//! # Architecture
//!
//! - [`collector`]: root traversal and candidate discovery
//! - [`hasher`]: streaming whole-file digests
//!
//! # Example
//!
//! ```no_run
//! use dedupr::config::ScanConfig;
//! use dedupr::diagnostics::LogSink;
//! use dedupr::scanner::Collector;
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! let config = ScanConfig::default().with_min_size(1024);
//! let collector = Collector::new(&config, Arc::new(LogSink));
//! let files = collector.collect(&[PathBuf::from(".")]);
//! println!("Found {} candidate files", files.len());
//! ```

pub mod collector;
pub mod hasher;

use std::path::PathBuf;

// Re-export main types
pub use collector::Collector;
pub use hasher::{ContentDigest, FileHasher};

/// Handle to one candidate file plus the metadata cached at discovery time.
///
/// Immutable once collected; no later stage mutates the underlying file
/// during detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    /// Path to the file
    pub path: PathBuf,
    /// File size in bytes at discovery time
    pub size: u64,
    /// Whether the candidate was reached through a symbolic link
    pub is_symlink: bool,
}

impl FileRef {
    /// Create a reference to a regular (non-symlinked) file.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self {
            path,
            size,
            is_symlink: false,
        }
    }

    /// Character count of the final path component.
    ///
    /// Used by the shortest-name keeper policy; counts characters, not
    /// bytes, so multi-byte names compare the way they read.
    #[must_use]
    pub fn file_name_chars(&self) -> usize {
        self.path
            .file_name()
            .map_or(0, |name| name.to_string_lossy().chars().count())
    }
}

/// Errors that can occur during traversal.
///
/// All of these are recoverable: the collector reports them through the
/// diagnostics sink and keeps walking.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while accessing a path.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while digesting a file.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The file disappeared between discovery and hashing.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
