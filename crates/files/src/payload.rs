//! Integrity metadata for a single payload.

use crate::{detect_media_type, Checksum, FilesError};
use mdx_types::NonEmptyText;
use std::fs;
use std::path::Path;

/// Metadata derived from a payload's bytes.
///
/// This is the raw material for an asset record in an MDX manifest. Every field is
/// computed from the same byte slice in a single call, so the size and checksum can
/// never describe different content.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct PayloadInfo {
    /// Algorithm-tagged digest of the payload
    pub checksum: Checksum,

    /// Exact length of the payload in bytes
    pub size_bytes: u64,

    /// Detected media type, if any
    ///
    /// This is a best-effort detection and should not be considered authoritative.
    pub media_type: Option<NonEmptyText>,
}

impl PayloadInfo {
    /// Describes `bytes`, using `path` only as a hint for media type detection.
    pub fn describe(path: &str, bytes: &[u8]) -> Self {
        Self {
            checksum: Checksum::compute(bytes),
            size_bytes: bytes.len() as u64,
            media_type: detect_media_type(path, bytes).and_then(|m| NonEmptyText::new(m).ok()),
        }
    }

    /// Reads a file from disk and describes its contents.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::Io`] if the file cannot be read; the message names the path.
    pub fn from_file(path: &Path) -> Result<Self, FilesError> {
        let bytes = fs::read(path).map_err(|e| {
            FilesError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read {}: {}", path.display(), e),
            ))
        })?;
        Ok(Self::describe(&path.to_string_lossy(), &bytes))
    }
}
