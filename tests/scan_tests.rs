//! End-to-end scan behavior over real fixture trees.

use dedupr::config::{CompareStrategy, HashAlgorithm, ScanConfig};
use dedupr::diagnostics::NullSink;
use dedupr::duplicates::{DuplicateFinder, DuplicateGroup};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::tempdir;

fn scan(config: ScanConfig, roots: &[&Path]) -> Vec<DuplicateGroup> {
    let finder = DuplicateFinder::new(config).with_diagnostics(Arc::new(NullSink));
    let roots: Vec<PathBuf> = roots.iter().map(|p| p.to_path_buf()).collect();
    let (groups, _summary) = finder.scan(&roots).unwrap();
    groups
}

fn file_names(group: &DuplicateGroup) -> Vec<String> {
    group
        .files
        .iter()
        .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_group_invariants_hold() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a1"), "alpha").unwrap();
    fs::write(dir.path().join("a2"), "alpha").unwrap();
    fs::write(dir.path().join("a3"), "alpha").unwrap();
    fs::write(dir.path().join("b1"), "beta-longer").unwrap();
    fs::write(dir.path().join("b2"), "beta-longer").unwrap();
    fs::write(dir.path().join("unique"), "just one of these").unwrap();

    let groups = scan(ScanConfig::default(), &[dir.path()]);

    assert_eq!(groups.len(), 2);
    for group in &groups {
        assert!(group.len() >= 2);
        for file in &group.files {
            assert_eq!(file.size, group.size);
            // Members are byte-identical to the first member
            assert_eq!(
                fs::read(&file.path).unwrap(),
                fs::read(&group.files[0].path).unwrap()
            );
        }
    }
}

#[test]
fn test_same_size_different_content_not_grouped() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("x"), "aaaa").unwrap();
    fs::write(dir.path().join("y"), "aaab").unwrap();

    for strategy in [
        CompareStrategy::Hash(HashAlgorithm::Sha256),
        CompareStrategy::Bytes,
    ] {
        let groups = scan(
            ScanConfig::default().with_strategy(strategy),
            &[dir.path()],
        );
        assert!(groups.is_empty());
    }
}

#[test]
fn test_recursion_toggle() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("one.txt"), "duplicated").unwrap();
    fs::write(sub.join("two.txt"), "duplicated").unwrap();

    let groups = scan(
        ScanConfig::default().with_recursive(false),
        &[dir.path()],
    );
    assert!(groups.is_empty());

    let groups = scan(ScanConfig::default(), &[dir.path()]);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
}

#[test]
fn test_size_bounds_keep_files_out_of_groups() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("small1"), "ab").unwrap();
    fs::write(dir.path().join("small2"), "ab").unwrap();
    fs::write(dir.path().join("large1"), "a longer duplicate body").unwrap();
    fs::write(dir.path().join("large2"), "a longer duplicate body").unwrap();

    // Below min_size: the small pair never appears
    let groups = scan(ScanConfig::default().with_min_size(5), &[dir.path()]);
    assert_eq!(groups.len(), 1);
    assert!(groups[0].size > 5);

    // Above max_size: the large pair never appears
    let groups = scan(
        ScanConfig::default().with_max_size(Some(5)),
        &[dir.path()],
    );
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].size, 2);
}

#[test]
fn test_zero_byte_files_group_under_both_strategies() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("empty1"), "").unwrap();
    fs::write(dir.path().join("empty2"), "").unwrap();
    fs::write(dir.path().join("nonempty"), "x").unwrap();

    for strategy in [
        CompareStrategy::Hash(HashAlgorithm::Sha256),
        CompareStrategy::Bytes,
    ] {
        let groups = scan(
            ScanConfig::default().with_strategy(strategy),
            &[dir.path()],
        );
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].size, 0);
        assert_eq!(file_names(&groups[0]), vec!["empty1", "empty2"]);
    }
}

#[test]
fn test_duplicates_found_across_roots() {
    let dir_a = tempdir().unwrap();
    let dir_b = tempdir().unwrap();
    fs::write(dir_a.path().join("here.txt"), "shared content").unwrap();
    fs::write(dir_b.path().join("there.txt"), "shared content").unwrap();

    let groups = scan(ScanConfig::default(), &[dir_a.path(), dir_b.path()]);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
}

#[test]
fn test_missing_root_does_not_spoil_the_scan() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), "pair").unwrap();
    fs::write(dir.path().join("b"), "pair").unwrap();

    let missing = PathBuf::from("/no/such/root");
    let groups = scan(ScanConfig::default(), &[missing.as_path(), dir.path()]);
    assert_eq!(groups.len(), 1);
}

#[test]
fn test_scan_is_idempotent() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("m1"), "mirror").unwrap();
    fs::write(dir.path().join("m2"), "mirror").unwrap();
    fs::write(dir.path().join("n1"), "other mirror").unwrap();
    fs::write(dir.path().join("n2"), "other mirror").unwrap();

    let first = scan(ScanConfig::default(), &[dir.path()]);
    let second = scan(ScanConfig::default(), &[dir.path()]);

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        let paths_a: Vec<_> = a.files.iter().map(|f| f.path.clone()).collect();
        let paths_b: Vec<_> = b.files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(paths_a, paths_b);
    }
}

#[test]
fn test_file_roots_participate_directly() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    fs::write(&a, "same").unwrap();
    fs::write(&b, "same").unwrap();

    let groups = scan(ScanConfig::default(), &[a.as_path(), b.as_path()]);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
}

#[cfg(unix)]
#[test]
fn test_symlink_policy_controls_participation() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("target.txt");
    let copy = dir.path().join("copy.txt");
    fs::write(&target, "linked content").unwrap();
    fs::write(&copy, "linked content").unwrap();
    let link = dir.path().join("link.txt");
    std::os::unix::fs::symlink(&target, &link).unwrap();

    // Symlink excluded: just the two regular files
    let groups = scan(ScanConfig::default(), &[dir.path()]);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);

    // Symlink followed: it participates like a regular file
    let groups = scan(
        ScanConfig::default().with_follow_symlinks(true),
        &[dir.path()],
    );
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 3);
    assert_eq!(
        groups[0].files.iter().filter(|f| f.is_symlink).count(),
        1
    );
}
