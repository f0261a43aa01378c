//! Streaming whole-file digests.
//!
//! # Overview
//!
//! [`FileHasher`] folds a file into the selected digest state in fixed-size
//! chunks, so memory stays bounded regardless of file size. Files sharing a
//! digest are treated as byte-identical by the hash strategy: at the widths
//! in use (128 to 512 bits) an accidental collision is astronomically
//! unlikely, and accepting that residual risk in exchange for O(n) total
//! reads is the point of the strategy. Callers who cannot accept it use
//! byte-by-byte comparison instead.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};

use crate::config::HashAlgorithm;

use super::HashError;

/// A computed content digest.
///
/// Width depends on the algorithm (16 to 64 bytes). Comparable and hashable,
/// so it can key the comparator's grouping map.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentDigest(Vec<u8>);

impl ContentDigest {
    /// Raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hexadecimal rendering.
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|byte| format!("{byte:02x}")).collect()
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Incremental digest state, dispatching on the configured algorithm.
enum DigestState {
    Md5(Md5),
    Sha1(Sha1),
    Sha256(Sha256),
    Sha512(Sha512),
    Blake3(Box<blake3::Hasher>),
}

impl DigestState {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Md5 => Self::Md5(Md5::new()),
            HashAlgorithm::Sha1 => Self::Sha1(Sha1::new()),
            HashAlgorithm::Sha256 => Self::Sha256(Sha256::new()),
            HashAlgorithm::Sha512 => Self::Sha512(Sha512::new()),
            HashAlgorithm::Blake3 => Self::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    fn update(&mut self, chunk: &[u8]) {
        match self {
            Self::Md5(state) => state.update(chunk),
            Self::Sha1(state) => state.update(chunk),
            Self::Sha256(state) => state.update(chunk),
            Self::Sha512(state) => state.update(chunk),
            Self::Blake3(state) => {
                state.update(chunk);
            }
        }
    }

    fn finalize(self) -> ContentDigest {
        let bytes = match self {
            Self::Md5(state) => state.finalize().to_vec(),
            Self::Sha1(state) => state.finalize().to_vec(),
            Self::Sha256(state) => state.finalize().to_vec(),
            Self::Sha512(state) => state.finalize().to_vec(),
            Self::Blake3(state) => state.finalize().as_bytes().to_vec(),
        };
        ContentDigest(bytes)
    }
}

/// Computes whole-file digests with a fixed algorithm and chunk size.
#[derive(Debug, Clone, Copy)]
pub struct FileHasher {
    algorithm: HashAlgorithm,
    chunk_size: usize,
}

impl FileHasher {
    /// Create a hasher. Chunk size is clamped to at least 1 byte.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm, chunk_size: usize) -> Self {
        Self {
            algorithm,
            chunk_size: chunk_size.max(1),
        }
    }

    /// The configured algorithm.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Digest the entire file at `path`.
    ///
    /// A zero-byte file yields the algorithm's empty-input digest, so all
    /// empty files compare equal without special-casing.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read.
    pub fn hash_file(&self, path: &Path) -> Result<ContentDigest, HashError> {
        let mut file = File::open(path).map_err(|error| map_error(path, error))?;
        let mut state = DigestState::new(self.algorithm);
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            let read = file
                .read(&mut buffer)
                .map_err(|error| map_error(path, error))?;
            if read == 0 {
                break;
            }
            state.update(&buffer[..read]);
        }

        Ok(state.finalize())
    }
}

fn map_error(path: &Path, error: std::io::Error) -> HashError {
    match error.kind() {
        std::io::ErrorKind::NotFound => HashError::NotFound(path.to_path_buf()),
        std::io::ErrorKind::PermissionDenied => HashError::PermissionDenied(path.to_path_buf()),
        _ => HashError::Io {
            path: path.to_path_buf(),
            source: error,
        },
    }
}
