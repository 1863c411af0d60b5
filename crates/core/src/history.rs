//! Version history records.
//!
//! `history/versions.json` lists the versions a document has gone through, oldest
//! first. Each entry points at a full-content snapshot under `history/snapshots/`.

use crate::constants::{RECORD_SCHEMA_VERSION, SNAPSHOTS_DIR};
use crate::validation::is_semver;
use crate::{MdxError, MdxResult};
use mdx_types::ArchivePath;
use mdx_uuid::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionHistory {
    pub schema_version: String,
    pub current_version: String,
    pub versions: Vec<VersionEntry>,
}

impl VersionHistory {
    /// Builds a validated history whose current version is the last entry.
    pub fn from_entries(versions: Vec<VersionEntry>) -> MdxResult<Self> {
        let current_version = versions
            .last()
            .map(|entry| entry.version.clone())
            .ok_or_else(|| MdxError::InvalidHistory("history has no versions".into()))?;
        let history = Self {
            schema_version: RECORD_SCHEMA_VERSION.to_owned(),
            current_version,
            versions,
        };
        history.validate()?;
        Ok(history)
    }

    /// Checks the chain is linear and ordered.
    ///
    /// The first entry has no parent, every later entry names its predecessor, timestamps
    /// never go backwards and `current_version` is the final entry.
    pub fn validate(&self) -> MdxResult<()> {
        let last = self
            .versions
            .last()
            .ok_or_else(|| MdxError::InvalidHistory("history has no versions".into()))?;
        if last.version != self.current_version {
            return Err(MdxError::InvalidHistory(format!(
                "current_version '{}' is not the latest entry '{}'",
                self.current_version, last.version
            )));
        }

        let mut seen = HashSet::new();
        let mut previous: Option<&VersionEntry> = None;
        for entry in &self.versions {
            if !is_semver(&entry.version) {
                return Err(MdxError::InvalidHistory(format!(
                    "'{}' is not a semantic version",
                    entry.version
                )));
            }
            if !seen.insert(entry.version.as_str()) {
                return Err(MdxError::InvalidHistory(format!(
                    "version '{}' appears more than once",
                    entry.version
                )));
            }
            if !entry.snapshot.path.is_under(SNAPSHOTS_DIR) {
                return Err(MdxError::PathPrefix {
                    path: entry.snapshot.path.to_string(),
                    expected: SNAPSHOTS_DIR,
                });
            }

            match (previous, entry.parent_version.as_deref()) {
                (None, None) => {}
                (None, Some(parent)) => {
                    return Err(MdxError::InvalidHistory(format!(
                        "first version '{}' cannot have parent '{}'",
                        entry.version, parent
                    )));
                }
                (Some(prev), parent) if parent != Some(prev.version.as_str()) => {
                    return Err(MdxError::InvalidHistory(format!(
                        "version '{}' must have parent '{}', found {:?}",
                        entry.version, prev.version, parent
                    )));
                }
                (Some(prev), _) if entry.timestamp < prev.timestamp => {
                    return Err(MdxError::InvalidHistory(format!(
                        "version '{}' is older than its parent '{}'",
                        entry.version, prev.version
                    )));
                }
                _ => {}
            }
            previous = Some(entry);
        }
        Ok(())
    }

    pub fn snapshot_paths(&self) -> impl Iterator<Item = &ArchivePath> {
        self.versions.iter().map(|entry| &entry.snapshot.path)
    }

    pub fn to_json(&self) -> MdxResult<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|source| MdxError::Serialization {
            what: "version history",
            source,
        })
    }

    pub fn from_json(bytes: &[u8]) -> MdxResult<Self> {
        serde_json::from_slice(bytes).map_err(|source| MdxError::Deserialization {
            what: "version history",
            source,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEntry {
    pub version: String,
    pub timestamp: Timestamp,
    pub author: HistoryAuthor,
    pub message: String,
    pub snapshot: Snapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_version: Option<String>,
    pub changes: ChangeSummary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl VersionEntry {
    /// A root entry with a full snapshot and an empty change summary.
    pub fn new(
        version: impl Into<String>,
        timestamp: Timestamp,
        author: HistoryAuthor,
        message: impl Into<String>,
        snapshot_path: ArchivePath,
    ) -> Self {
        Self {
            version: version.into(),
            timestamp,
            author,
            message: message.into(),
            snapshot: Snapshot {
                kind: SnapshotKind::Full,
                path: snapshot_path,
            },
            parent_version: None,
            changes: ChangeSummary::default(),
            tags: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent_version = Some(parent.into());
        self
    }

    pub fn with_changes(mut self, changes: ChangeSummary) -> Self {
        self.changes = changes;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryAuthor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "type")]
    pub kind: SnapshotKind,
    pub path: ArchivePath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotKind {
    Full,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub summary: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modified: Vec<String>,
}
