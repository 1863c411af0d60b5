//! MDX Payload Integrity
//!
//! This crate computes the integrity metadata that an MDX manifest records for every
//! embedded payload: a content digest, the exact byte size, and a media type.
//!
//! ## Design Principles
//!
//! - Metadata is always derived from the payload bytes themselves, never supplied by callers
//! - Digests are tagged with their algorithm (`sha256:<hex>`) so the format can grow
//! - Media type detection is best-effort and never fails a build
//!
//! ## Example Usage
//!
//! ```
//! use mdx_files::{Checksum, PayloadInfo};
//!
//! let info = PayloadInfo::describe("assets/images/a.svg", b"<svg/>");
//! assert_eq!(info.size_bytes, 6);
//! assert!(info.checksum.verify(b"<svg/>"));
//! assert_eq!(info.media_type.as_ref().map(|m| m.as_str()), Some("image/svg+xml"));
//! assert_eq!(info.checksum, Checksum::compute(b"<svg/>"));
//! ```

mod checksum;
mod media;
mod payload;

pub use checksum::{Checksum, HashAlgorithm};
pub use media::detect_media_type;
pub use payload::PayloadInfo;

/// Errors that can occur while computing or parsing payload metadata
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// Checksum string is not `<algorithm>:<lowercase-hex>` of the right length
    #[error("Invalid checksum: {0}")]
    InvalidChecksum(String),

    /// Algorithm tag is not one this crate can compute
    #[error("Unsupported checksum algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
