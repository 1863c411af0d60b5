//! In-memory output of a manifest build.

use crate::annotations::AnnotationSet;
use crate::history::VersionHistory;
use crate::manifest::Manifest;
use mdx_types::ArchivePath;

/// A named archive member and its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub path: ArchivePath,
    pub bytes: Vec<u8>,
}

/// Version history record plus the snapshot members it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryPayload {
    pub record: VersionHistory,
    pub snapshots: Vec<Member>,
}

/// Every payload that goes into an archive besides the manifest itself.
///
/// These are the same bytes the manifest's sizes and checksums were computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payloads {
    pub content: Vec<u8>,
    pub assets: Vec<Member>,
    pub styles: Vec<Member>,
    pub history: Option<HistoryPayload>,
    pub annotations: Option<AnnotationSet>,
}

impl Payloads {
    /// Content and nothing else.
    pub fn content_only(content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: content.into(),
            assets: Vec::new(),
            styles: Vec::new(),
            history: None,
            annotations: None,
        }
    }
}

/// A manifest together with the payloads it describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub manifest: Manifest,
    pub payloads: Payloads,
}
