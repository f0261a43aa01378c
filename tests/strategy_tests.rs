//! Cross-checks between the hash strategies and byte-by-byte comparison.
//!
//! Every hash algorithm must produce exactly the groups byte comparison
//! produces on the same fixture set; the fixtures avoid hash collisions by
//! construction.

use dedupr::config::{CompareStrategy, HashAlgorithm, ScanConfig};
use dedupr::diagnostics::NullSink;
use dedupr::duplicates::DuplicateFinder;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::{tempdir, TempDir};

/// A fixture tree mixing duplicate clusters, same-size distinct files,
/// empty files and multi-chunk content.
fn build_fixture() -> TempDir {
    let dir = tempdir().unwrap();
    let root = dir.path();

    fs::write(root.join("cluster_a1.txt"), "identical alpha content").unwrap();
    fs::write(root.join("cluster_a2.txt"), "identical alpha content").unwrap();
    fs::write(root.join("cluster_a3.txt"), "identical alpha content").unwrap();

    // Same size as the alpha cluster, different content
    fs::write(root.join("decoy.txt"), "identical alpha CONTENT").unwrap();

    fs::write(root.join("empty_one"), "").unwrap();
    fs::write(root.join("empty_two"), "").unwrap();

    // Larger than one I/O chunk, differing only in the final byte
    let mut big = vec![b'q'; 20_000];
    fs::write(root.join("big_same_1.bin"), &big).unwrap();
    fs::write(root.join("big_same_2.bin"), &big).unwrap();
    big[19_999] = b'r';
    fs::write(root.join("big_other.bin"), &big).unwrap();

    let sub = root.join("nested");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("cluster_b1"), "beta").unwrap();
    fs::write(sub.join("cluster_b2"), "beta").unwrap();

    dir
}

/// Scan and normalize: groups as sorted path lists, sorted by first path,
/// so comparisons don't depend on cross-group ordering.
fn normalized_groups(strategy: CompareStrategy, root: &Path) -> Vec<Vec<PathBuf>> {
    let finder = DuplicateFinder::new(ScanConfig::default().with_strategy(strategy))
        .with_diagnostics(Arc::new(NullSink));
    let (groups, _) = finder.scan(&[root.to_path_buf()]).unwrap();

    let mut normalized: Vec<Vec<PathBuf>> = groups
        .into_iter()
        .map(|group| {
            let mut paths: Vec<PathBuf> = group.files.into_iter().map(|f| f.path).collect();
            paths.sort();
            paths
        })
        .collect();
    normalized.sort();
    normalized
}

#[test]
fn test_every_hash_algorithm_matches_byte_comparison() {
    let fixture = build_fixture();
    let reference = normalized_groups(CompareStrategy::Bytes, fixture.path());

    // Four clusters: alpha, the empties, the big pair, and beta
    assert_eq!(reference.len(), 4);

    for algorithm in HashAlgorithm::ALL {
        let hashed = normalized_groups(CompareStrategy::Hash(algorithm), fixture.path());
        assert_eq!(
            hashed, reference,
            "strategy mismatch for algorithm {algorithm}"
        );
    }
}

#[test]
fn test_strategies_agree_on_empty_result() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("one"), "unique content 1").unwrap();
    fs::write(dir.path().join("two"), "unique content 22").unwrap();

    for strategy in [
        CompareStrategy::Bytes,
        CompareStrategy::Hash(HashAlgorithm::Md5),
        CompareStrategy::Hash(HashAlgorithm::Blake3),
    ] {
        assert!(normalized_groups(strategy, dir.path()).is_empty());
    }
}

#[test]
fn test_strategies_agree_with_small_chunk_size() {
    let fixture = build_fixture();

    let tiny_chunks = |strategy| {
        let config = ScanConfig::default()
            .with_strategy(strategy)
            .with_chunk_size(7);
        let finder = DuplicateFinder::new(config).with_diagnostics(Arc::new(NullSink));
        let (groups, _) = finder.scan(&[fixture.path().to_path_buf()]).unwrap();
        groups.len()
    };

    assert_eq!(
        tiny_chunks(CompareStrategy::Bytes),
        tiny_chunks(CompareStrategy::Hash(HashAlgorithm::Sha512))
    );
}
