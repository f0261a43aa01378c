//! Command-line interface definitions.
//!
//! All arguments are defined with the clap derive API on a single flat
//! parser: one scan invocation per process, with purging as an opt-in flag
//! on the same run.
//!
//! # Example
//!
//! ```bash
//! # Scan a directory for duplicates using the default SHA-256 digests
//! dedupr ~/Downloads
//!
//! # Byte-by-byte comparison across two roots
//! dedupr /data/a /data/b --all-bytes
//!
//! # Preview a purge that keeps the shortest-named copy of each group
//! dedupr ~/Downloads --purge --dry-run --keep shortest-name
//!
//! # Save the report to a file
//! dedupr ~/Downloads --min-size 1MB -o report.txt
//! ```

use clap::Parser;
use std::path::PathBuf;

use crate::actions::purge::KeeperPolicy;
use crate::config::{CompareStrategy, HashAlgorithm, ScanConfig};

/// Platform-agnostic duplicate file finder and purger.
///
/// Finds groups of byte-identical files under the given paths using size
/// bucketing followed by content comparison, and can optionally remove all
/// but one copy of each group.
#[derive(Debug, Parser)]
#[command(name = "dedupr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directories or files to scan for duplicates
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Use byte-by-byte comparison instead of hashing
    ///
    /// Slower (pairwise reads) but immune to hash collisions.
    #[arg(long)]
    pub all_bytes: bool,

    /// Hash algorithm for content comparison
    #[arg(
        long,
        value_enum,
        default_value_t = HashAlgorithm::Sha256,
        conflicts_with = "all_bytes"
    )]
    pub hash_algorithm: HashAlgorithm,

    /// Minimum file size to consider (e.g., 1KB, 1MiB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Maximum file size to consider (e.g., 1GB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub max_size: Option<u64>,

    /// Do not descend into subdirectories
    #[arg(long)]
    pub no_recursive: bool,

    /// Follow symbolic links during scan
    ///
    /// Warning: May cause infinite loops if symlinks form cycles.
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Remove duplicate files, keeping one copy of each group
    #[arg(long)]
    pub purge: bool,

    /// Compute the purge plan without deleting anything (use with --purge)
    #[arg(long)]
    pub dry_run: bool,

    /// Which copy survives a purge
    #[arg(long = "keep", value_enum, default_value_t = KeeperPolicy::FirstDiscovered)]
    pub keeper_policy: KeeperPolicy,

    /// Number of I/O threads for hashing (default: 4)
    ///
    /// Lower values reduce disk thrashing on HDDs.
    #[arg(long, value_name = "N", default_value = "4")]
    pub io_threads: usize,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Translate parsed arguments into an engine configuration.
    #[must_use]
    pub fn scan_config(&self) -> ScanConfig {
        let strategy = if self.all_bytes {
            CompareStrategy::Bytes
        } else {
            CompareStrategy::Hash(self.hash_algorithm)
        };

        ScanConfig::default()
            .with_strategy(strategy)
            .with_min_size(self.min_size.unwrap_or(0))
            .with_max_size(self.max_size)
            .with_recursive(!self.no_recursive)
            .with_follow_symlinks(self.follow_symlinks)
            .with_io_threads(self.io_threads)
    }
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB.
/// Case-insensitive; numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use dedupr::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1KB").unwrap(), 1000);
/// assert_eq!(parse_size("1KiB").unwrap(), 1024);
/// assert_eq!(parse_size("1.5MB").unwrap(), 1_500_000);
/// ```
///
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid or
/// negative number, or an unknown size suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    // Find where the number ends and the suffix begins
    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    if num < 0.0 {
        return Err("Size cannot be negative".to_string());
    }

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}
