//! Content comparison within one size partition.
//!
//! # Overview
//!
//! The [`Comparator`] splits a size partition into equivalence classes of
//! byte-identical files, using one of two interchangeable strategies:
//!
//! - **Hash**: one streaming digest per file, classes keyed by digest.
//!   O(n) total bytes read. Hashing runs in parallel on a bounded worker
//!   pool; digests are collected in input order, so the resulting classes
//!   are identical to a sequential run.
//! - **Bytes**: direct pairwise stream comparison with an already-matched
//!   marker set, reference files taken in input order. O(k²) pairs in the
//!   worst case, no collision risk.
//!
//! Either way, a file that cannot be read is excluded from all classes
//! with a warning - it is never counted as matching anything, and never
//! aborts the partition.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;

use crate::config::{CompareStrategy, HashAlgorithm, ScanConfig};
use crate::diagnostics::DiagnosticsSink;
use crate::scanner::{ContentDigest, FileHasher, FileRef};

/// Splits size partitions into verified-identical classes.
pub struct Comparator {
    strategy: CompareStrategy,
    chunk_size: usize,
    sink: Arc<dyn DiagnosticsSink>,
    pool: Option<rayon::ThreadPool>,
}

impl Comparator {
    /// Create a comparator for the given configuration.
    ///
    /// For the hash strategy a dedicated worker pool of `io_threads`
    /// threads is built; if that fails, hashing falls back to the current
    /// thread.
    #[must_use]
    pub fn new(config: &ScanConfig, sink: Arc<dyn DiagnosticsSink>) -> Self {
        let pool = match config.strategy {
            CompareStrategy::Hash(_) => {
                match rayon::ThreadPoolBuilder::new()
                    .num_threads(config.io_threads)
                    .build()
                {
                    Ok(pool) => Some(pool),
                    Err(error) => {
                        sink.debug(&format!(
                            "could not build hashing pool, hashing sequentially: {error}"
                        ));
                        None
                    }
                }
            }
            CompareStrategy::Bytes => None,
        };

        Self {
            strategy: config.strategy,
            chunk_size: config.chunk_size,
            sink,
            pool,
        }
    }

    /// Split one size partition into classes of byte-identical files.
    ///
    /// Every returned class has at least two members; singletons are
    /// dropped. Class membership order equals input order. Files from
    /// different partitions must never be passed together - the caller
    /// guarantees all inputs share one size.
    #[must_use]
    pub fn compare_partition(&self, files: Vec<FileRef>) -> Vec<Vec<FileRef>> {
        if files.len() < 2 {
            return Vec::new();
        }
        match self.strategy {
            CompareStrategy::Hash(algorithm) => self.classes_by_digest(files, algorithm),
            CompareStrategy::Bytes => self.classes_by_bytes(files),
        }
    }

    fn classes_by_digest(
        &self,
        files: Vec<FileRef>,
        algorithm: HashAlgorithm,
    ) -> Vec<Vec<FileRef>> {
        let hasher = FileHasher::new(algorithm, self.chunk_size);

        let digests: Vec<Option<ContentDigest>> = match &self.pool {
            Some(pool) => pool.install(|| {
                files
                    .par_iter()
                    .map(|file| self.digest_or_warn(&hasher, file))
                    .collect()
            }),
            None => files
                .iter()
                .map(|file| self.digest_or_warn(&hasher, file))
                .collect(),
        };

        // Sequential grouping in input order: class membership reflects
        // discovery order, not worker completion order.
        let mut first_seen: Vec<ContentDigest> = Vec::new();
        let mut classes: HashMap<ContentDigest, Vec<FileRef>> = HashMap::new();
        for (file, digest) in files.into_iter().zip(digests) {
            let Some(digest) = digest else { continue };
            match classes.entry(digest) {
                Entry::Occupied(mut entry) => entry.get_mut().push(file),
                Entry::Vacant(entry) => {
                    first_seen.push(entry.key().clone());
                    entry.insert(vec![file]);
                }
            }
        }

        first_seen
            .into_iter()
            .filter_map(|digest| {
                let class = classes.remove(&digest)?;
                (class.len() >= 2).then_some(class)
            })
            .collect()
    }

    fn digest_or_warn(&self, hasher: &FileHasher, file: &FileRef) -> Option<ContentDigest> {
        match hasher.hash_file(&file.path) {
            Ok(digest) => Some(digest),
            Err(error) => {
                self.sink
                    .warning(&format!("could not hash {}: {}", file.path.display(), error));
                None
            }
        }
    }

    fn classes_by_bytes(&self, files: Vec<FileRef>) -> Vec<Vec<FileRef>> {
        let mut matched = vec![false; files.len()];
        let mut classes = Vec::new();

        for i in 0..files.len() {
            if matched[i] {
                continue;
            }
            matched[i] = true;
            let mut class = vec![files[i].clone()];

            for j in (i + 1)..files.len() {
                if matched[j] {
                    continue;
                }
                match self.streams_identical(&files[i].path, &files[j].path) {
                    Ok(true) => {
                        matched[j] = true;
                        class.push(files[j].clone());
                    }
                    Ok(false) => {}
                    Err(error) => {
                        // Unreadable pair: treated as not identical, the
                        // rest of the partition proceeds.
                        self.sink.warning(&format!(
                            "could not compare {} with {}: {}",
                            files[i].path.display(),
                            files[j].path.display(),
                            error
                        ));
                    }
                }
            }

            if class.len() >= 2 {
                classes.push(class);
            }
        }

        classes
    }

    /// Chunk-by-chunk comparison. `Ok(true)` only when both streams end
    /// together with every chunk equal. Both files are opened per pair.
    fn streams_identical(&self, a: &Path, b: &Path) -> io::Result<bool> {
        let mut file_a = File::open(a)?;
        let mut file_b = File::open(b)?;
        let mut buffer_a = vec![0u8; self.chunk_size];
        let mut buffer_b = vec![0u8; self.chunk_size];

        loop {
            let read_a = read_full(&mut file_a, &mut buffer_a)?;
            let read_b = read_full(&mut file_b, &mut buffer_b)?;
            if read_a != read_b || buffer_a[..read_a] != buffer_b[..read_b] {
                return Ok(false);
            }
            if read_a == 0 {
                return Ok(true);
            }
        }
    }
}

/// Read until the buffer is full or EOF; a plain `read` may return short.
fn read_full(file: &mut File, buffer: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        let read = file.read(&mut buffer[filled..])?;
        if read == 0 {
            break;
        }
        filled += read;
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HashAlgorithm;
    use crate::diagnostics::{MemorySink, NullSink};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn make_files(dir: &TempDir, contents: &[&[u8]]) -> Vec<FileRef> {
        contents
            .iter()
            .enumerate()
            .map(|(i, content)| {
                let path = dir.path().join(format!("file{i}.bin"));
                fs::write(&path, content).unwrap();
                FileRef::new(path, content.len() as u64)
            })
            .collect()
    }

    fn comparator(strategy: CompareStrategy) -> Comparator {
        let config = ScanConfig::default().with_strategy(strategy);
        Comparator::new(&config, Arc::new(NullSink))
    }

    fn both_strategies() -> Vec<Comparator> {
        vec![
            comparator(CompareStrategy::Hash(HashAlgorithm::Sha256)),
            comparator(CompareStrategy::Bytes),
        ]
    }

    #[test]
    fn test_identical_files_form_one_class() {
        let dir = TempDir::new().unwrap();
        let files = make_files(&dir, &[b"same", b"same", b"diff"]);

        for comparator in both_strategies() {
            let classes = comparator.compare_partition(files.clone());
            assert_eq!(classes.len(), 1);
            assert_eq!(classes[0].len(), 2);
            assert_eq!(classes[0][0].path, files[0].path);
            assert_eq!(classes[0][1].path, files[1].path);
        }
    }

    #[test]
    fn test_all_distinct_yields_no_classes() {
        let dir = TempDir::new().unwrap();
        let files = make_files(&dir, &[b"aaaa", b"bbbb", b"cccc"]);

        for comparator in both_strategies() {
            assert!(comparator.compare_partition(files.clone()).is_empty());
        }
    }

    #[test]
    fn test_multiple_classes_in_one_partition() {
        let dir = TempDir::new().unwrap();
        let files = make_files(&dir, &[b"aaaa", b"bbbb", b"aaaa", b"bbbb", b"cccc"]);

        for comparator in both_strategies() {
            let classes = comparator.compare_partition(files.clone());
            assert_eq!(classes.len(), 2);
            // Classes appear in discovery order of their first member
            assert_eq!(classes[0][0].path, files[0].path);
            assert_eq!(classes[0][1].path, files[2].path);
            assert_eq!(classes[1][0].path, files[1].path);
            assert_eq!(classes[1][1].path, files[3].path);
        }
    }

    #[test]
    fn test_empty_files_are_identical() {
        let dir = TempDir::new().unwrap();
        let files = make_files(&dir, &[b"", b""]);

        for comparator in both_strategies() {
            let classes = comparator.compare_partition(files.clone());
            assert_eq!(classes.len(), 1);
            assert_eq!(classes[0].len(), 2);
        }
    }

    #[test]
    fn test_difference_in_final_chunk_detected() {
        let dir = TempDir::new().unwrap();
        let mut base = vec![b'x'; 8192 * 2];
        let same = base.clone();
        base[8192 * 2 - 1] = b'y';
        let files = make_files(&dir, &[&same[..], &base[..], &same[..]]);

        for comparator in both_strategies() {
            let classes = comparator.compare_partition(files.clone());
            assert_eq!(classes.len(), 1);
            assert_eq!(classes[0].len(), 2);
            assert_eq!(classes[0][0].path, files[0].path);
            assert_eq!(classes[0][1].path, files[2].path);
        }
    }

    #[test]
    fn test_unreadable_file_excluded_with_warning() {
        let dir = TempDir::new().unwrap();
        let mut files = make_files(&dir, &[b"pair", b"pair"]);
        files.push(FileRef::new(PathBuf::from("/gone/file"), 4));

        let sink = Arc::new(MemorySink::new());
        let config =
            ScanConfig::default().with_strategy(CompareStrategy::Hash(HashAlgorithm::Sha256));
        let comparator = Comparator::new(&config, Arc::clone(&sink) as Arc<dyn DiagnosticsSink>);

        let classes = comparator.compare_partition(files);
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].len(), 2);
        assert_eq!(sink.warnings().len(), 1);
    }

    #[test]
    fn test_small_partition_short_circuits() {
        let dir = TempDir::new().unwrap();
        let files = make_files(&dir, &[b"solo"]);
        for comparator in both_strategies() {
            assert!(comparator.compare_partition(files.clone()).is_empty());
        }
    }

    #[test]
    fn test_tiny_chunk_size_still_correct() {
        let dir = TempDir::new().unwrap();
        let files = make_files(&dir, &[b"0123456789", b"0123456789", b"0123456788"]);

        let config = ScanConfig::default()
            .with_strategy(CompareStrategy::Bytes)
            .with_chunk_size(3);
        let comparator = Comparator::new(&config, Arc::new(NullSink));
        let classes = comparator.compare_partition(files.clone());
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].len(), 2);
    }
}
