//! Scan configuration and comparison strategy selection.
//!
//! A [`ScanConfig`] is built once per scan invocation and is immutable
//! thereafter. The hash algorithm set is closed: parsing any name outside
//! [`HashAlgorithm`]'s variants fails with [`ConfigError::UnknownAlgorithm`]
//! before any I/O happens.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use thiserror::Error;

/// Default I/O chunk size for hashing and byte comparison (8 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Default number of I/O worker threads for parallel hashing.
///
/// Kept low to prevent disk thrashing on spinning media.
pub const DEFAULT_IO_THREADS: usize = 4;

/// Errors produced while constructing a scan configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The requested hash algorithm is not in the supported set.
    #[error("unsupported hash algorithm: '{0}' (expected one of: md5, sha1, sha256, sha512, blake3)")]
    UnknownAlgorithm(String),
}

/// Supported content digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum HashAlgorithm {
    /// MD5 (128-bit). Fast, no collision resistance; fine for dedup of
    /// non-adversarial data.
    Md5,
    /// SHA-1 (160-bit).
    Sha1,
    /// SHA-256 (256-bit). The default.
    Sha256,
    /// SHA-512 (512-bit).
    Sha512,
    /// BLAKE3 (256-bit). Much faster than the SHA-2 family.
    Blake3,
}

impl HashAlgorithm {
    /// All supported algorithms, in declaration order.
    pub const ALL: [Self; 5] = [Self::Md5, Self::Sha1, Self::Sha256, Self::Sha512, Self::Blake3];

    /// Canonical lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
            Self::Blake3 => "blake3",
        }
    }

    /// Digest width in bytes.
    #[must_use]
    pub fn digest_len(self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha256 | Self::Blake3 => 32,
            Self::Sha512 => 64,
        }
    }
}

impl Default for HashAlgorithm {
    fn default() -> Self {
        Self::Sha256
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            "blake3" => Ok(Self::Blake3),
            other => Err(ConfigError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// How file contents are proven identical within a size partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareStrategy {
    /// Whole-file digest comparison: one streaming read per file.
    Hash(HashAlgorithm),
    /// Direct pairwise stream comparison: no collision risk, O(k²) pairs
    /// per partition in the worst case.
    Bytes,
}

impl Default for CompareStrategy {
    fn default() -> Self {
        Self::Hash(HashAlgorithm::default())
    }
}

impl fmt::Display for CompareStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hash(algorithm) => write!(f, "hash comparison ({algorithm})"),
            Self::Bytes => f.write_str("byte-by-byte comparison"),
        }
    }
}

/// Configuration for one scan invocation.
///
/// # Example
///
/// ```
/// use dedupr::config::{CompareStrategy, HashAlgorithm, ScanConfig};
///
/// let config = ScanConfig::default()
///     .with_strategy(CompareStrategy::Hash(HashAlgorithm::Blake3))
///     .with_min_size(1024)
///     .with_recursive(false);
///
/// assert!(!config.recursive);
/// assert!(config.size_in_bounds(2048));
/// assert!(!config.size_in_bounds(512));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Content comparison strategy.
    pub strategy: CompareStrategy,
    /// Minimum file size in bytes to consider.
    pub min_size: u64,
    /// Maximum file size in bytes to consider; `None` means unbounded.
    pub max_size: Option<u64>,
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Follow symbolic links (files and directory entries alike).
    pub follow_symlinks: bool,
    /// Read granularity for hashing and byte comparison, in bytes.
    pub chunk_size: usize,
    /// Worker threads for parallel hashing within a size partition.
    pub io_threads: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            strategy: CompareStrategy::default(),
            min_size: 0,
            max_size: None,
            recursive: true,
            follow_symlinks: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
            io_threads: DEFAULT_IO_THREADS,
        }
    }
}

impl ScanConfig {
    /// Set the comparison strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: CompareStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the minimum file size filter.
    #[must_use]
    pub fn with_min_size(mut self, min_size: u64) -> Self {
        self.min_size = min_size;
        self
    }

    /// Set (or clear) the maximum file size filter.
    #[must_use]
    pub fn with_max_size(mut self, max_size: Option<u64>) -> Self {
        self.max_size = max_size;
        self
    }

    /// Enable or disable recursive traversal.
    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Enable or disable symlink following.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow_symlinks: bool) -> Self {
        self.follow_symlinks = follow_symlinks;
        self
    }

    /// Set the I/O chunk size. Clamped to at least 1 byte.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Set the hashing thread count. Clamped to at least 1.
    #[must_use]
    pub fn with_io_threads(mut self, io_threads: usize) -> Self {
        self.io_threads = io_threads.max(1);
        self
    }

    /// Check a file size against the configured bounds.
    #[must_use]
    pub fn size_in_bounds(&self, size: u64) -> bool {
        if size < self.min_size {
            return false;
        }
        if let Some(max) = self.max_size {
            if size > max {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_from_str_accepts_supported_set() {
        for algorithm in HashAlgorithm::ALL {
            assert_eq!(algorithm.name().parse::<HashAlgorithm>(), Ok(algorithm));
        }
        // Case-insensitive, whitespace-tolerant
        assert_eq!(" SHA256 ".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha256));
    }

    #[test]
    fn test_algorithm_from_str_rejects_unknown_names() {
        let err = "crc32".parse::<HashAlgorithm>().unwrap_err();
        assert_eq!(err, ConfigError::UnknownAlgorithm("crc32".to_string()));
        assert!("".parse::<HashAlgorithm>().is_err());
        assert!("sha-256".parse::<HashAlgorithm>().is_err());
    }

    #[test]
    fn test_algorithm_digest_lengths() {
        assert_eq!(HashAlgorithm::Md5.digest_len(), 16);
        assert_eq!(HashAlgorithm::Sha1.digest_len(), 20);
        assert_eq!(HashAlgorithm::Sha256.digest_len(), 32);
        assert_eq!(HashAlgorithm::Sha512.digest_len(), 64);
        assert_eq!(HashAlgorithm::Blake3.digest_len(), 32);
    }

    #[test]
    fn test_config_defaults() {
        let config = ScanConfig::default();
        assert_eq!(
            config.strategy,
            CompareStrategy::Hash(HashAlgorithm::Sha256)
        );
        assert_eq!(config.min_size, 0);
        assert_eq!(config.max_size, None);
        assert!(config.recursive);
        assert!(!config.follow_symlinks);
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.io_threads, DEFAULT_IO_THREADS);
    }

    #[test]
    fn test_config_builder_clamps_zero_values() {
        let config = ScanConfig::default().with_chunk_size(0).with_io_threads(0);
        assert_eq!(config.chunk_size, 1);
        assert_eq!(config.io_threads, 1);
    }

    #[test]
    fn test_size_in_bounds() {
        let config = ScanConfig::default()
            .with_min_size(10)
            .with_max_size(Some(100));
        assert!(!config.size_in_bounds(9));
        assert!(config.size_in_bounds(10));
        assert!(config.size_in_bounds(100));
        assert!(!config.size_in_bounds(101));

        let unbounded = ScanConfig::default();
        assert!(unbounded.size_in_bounds(0));
        assert!(unbounded.size_in_bounds(u64::MAX));
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(
            CompareStrategy::Hash(HashAlgorithm::Blake3).to_string(),
            "hash comparison (blake3)"
        );
        assert_eq!(CompareStrategy::Bytes.to_string(), "byte-by-byte comparison");
    }
}
