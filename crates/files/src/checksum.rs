//! Algorithm-tagged content digests.
//!
//! A checksum is rendered as `<algorithm>:<lowercase-hex-digest>`, for example
//! `sha256:9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08`.
//! Only SHA-256 is produced today; the algorithm tag keeps older archives readable if
//! another algorithm is added later.

use crate::FilesError;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Digest algorithms understood by [`Checksum`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Sha256,
}

impl HashAlgorithm {
    /// Tag used before the `:` in the string form.
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
        }
    }

    /// Length of the hex digest in characters.
    pub fn hex_len(&self) -> usize {
        match self {
            HashAlgorithm::Sha256 => 64,
        }
    }

    fn digest_hex(&self, bytes: &[u8]) -> String {
        match self {
            HashAlgorithm::Sha256 => hex::encode(Sha256::digest(bytes)),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = FilesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha256" => Ok(HashAlgorithm::Sha256),
            other => Err(FilesError::UnsupportedAlgorithm(other.to_owned())),
        }
    }
}

/// A content digest tagged with the algorithm that produced it.
///
/// Equal byte sequences always yield equal checksums; the hex digest is stored in
/// lowercase so string comparison and value comparison agree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Checksum {
    algorithm: HashAlgorithm,
    digest: String,
}

impl Checksum {
    /// Computes the SHA-256 checksum of `bytes`.
    pub fn compute(bytes: &[u8]) -> Self {
        Self::compute_with(HashAlgorithm::Sha256, bytes)
    }

    pub fn compute_with(algorithm: HashAlgorithm, bytes: &[u8]) -> Self {
        Self {
            algorithm,
            digest: algorithm.digest_hex(bytes),
        }
    }

    /// Parses the `<algorithm>:<hex>` form.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::InvalidChecksum`] if the separator is missing or the digest
    /// is not lowercase hex of the algorithm's length, and
    /// [`FilesError::UnsupportedAlgorithm`] for an unknown tag.
    pub fn parse(input: &str) -> Result<Self, FilesError> {
        let (tag, digest) = input
            .split_once(':')
            .ok_or_else(|| FilesError::InvalidChecksum(format!("missing ':' in '{}'", input)))?;
        let algorithm: HashAlgorithm = tag.parse()?;

        let well_formed = digest.len() == algorithm.hex_len()
            && digest
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if !well_formed {
            return Err(FilesError::InvalidChecksum(format!(
                "expected {} lowercase hex characters after '{}:', got '{}'",
                algorithm.hex_len(),
                algorithm,
                digest
            )));
        }

        Ok(Self {
            algorithm,
            digest: digest.to_owned(),
        })
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Hex digest without the algorithm tag.
    pub fn hex(&self) -> &str {
        &self.digest
    }

    /// Returns true if `bytes` hash to this checksum under the same algorithm.
    pub fn verify(&self, bytes: &[u8]) -> bool {
        self.algorithm.digest_hex(bytes) == self.digest
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.digest)
    }
}

impl FromStr for Checksum {
    type Err = FilesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Checksum::parse(s)
    }
}

impl serde::Serialize for Checksum {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Checksum {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Checksum::parse(&s).map_err(serde::de::Error::custom)
    }
}
