//! Reading, verifying and extracting MDX archives.

use crate::annotations::AnnotationSet;
use crate::constants::{
    ANNOTATIONS_FILENAME, ASSETS_DIR, MANIFEST_FILENAME, SNAPSHOTS_DIR, STYLES_DIR,
    VERSIONS_FILENAME,
};
use crate::history::VersionHistory;
use crate::manifest::Manifest;
use crate::{MdxError, MdxResult};
use mdx_files::Checksum;
use mdx_types::ArchivePath;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};
use zip::result::ZipError;
use zip::ZipArchive;

/// Name and sizes of one archive member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberEntry {
    pub name: String,
    pub size: u64,
    pub compressed_size: u64,
}

/// A problem found by [`MdxArchive::verify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationIssue {
    ManifestNotFirst { first: String },
    MissingMember { field: String, path: String },
    SizeMismatch { path: String, expected: u64, actual: u64 },
    ChecksumMismatch { path: String, expected: String, actual: String },
    UnreferencedMember { path: String },
    InvalidRecord { path: String, detail: String },
}

impl fmt::Display for VerificationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationIssue::ManifestNotFirst { first } => {
                write!(f, "first member is '{}', expected '{}'", first, MANIFEST_FILENAME)
            }
            VerificationIssue::MissingMember { field, path } => {
                write!(f, "{} references missing member '{}'", field, path)
            }
            VerificationIssue::SizeMismatch {
                path,
                expected,
                actual,
            } => write!(f, "'{}' is {} bytes, manifest says {}", path, actual, expected),
            VerificationIssue::ChecksumMismatch {
                path,
                expected,
                actual,
            } => write!(f, "'{}' hashes to {}, manifest says {}", path, actual, expected),
            VerificationIssue::UnreferencedMember { path } => {
                write!(f, "'{}' is not referenced by the manifest", path)
            }
            VerificationIssue::InvalidRecord { path, detail } => {
                write!(f, "'{}' is not a valid record: {}", path, detail)
            }
        }
    }
}

/// Outcome of [`MdxArchive::verify`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    pub members_checked: usize,
    pub issues: Vec<VerificationIssue>,
}

impl VerificationReport {
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }
}

/// An opened MDX archive with its parsed manifest.
pub struct MdxArchive<R> {
    zip: ZipArchive<R>,
    manifest: Manifest,
}

impl MdxArchive<BufReader<File>> {
    pub fn open(path: &Path) -> MdxResult<Self> {
        let file = File::open(path).map_err(|e| MdxError::io(path, e))?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read + Seek> MdxArchive<R> {
    /// Reads the central directory and parses `manifest.json`.
    pub fn from_reader(reader: R) -> MdxResult<Self> {
        let mut zip = ZipArchive::new(reader)?;
        let bytes = read_entry(&mut zip, MANIFEST_FILENAME)?;
        let manifest = Manifest::from_json(&bytes)?;
        Ok(Self { zip, manifest })
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Member names in archive order.
    pub fn member_names(&self) -> Vec<String> {
        (0..self.zip.len())
            .filter_map(|i| self.zip.name_for_index(i))
            .map(str::to_owned)
            .collect()
    }

    /// Members in archive order with their stored and compressed sizes.
    pub fn entries(&mut self) -> MdxResult<Vec<MemberEntry>> {
        let mut entries = Vec::with_capacity(self.zip.len());
        for i in 0..self.zip.len() {
            let entry = self.zip.by_index_raw(i)?;
            entries.push(MemberEntry {
                name: entry.name().to_owned(),
                size: entry.size(),
                compressed_size: entry.compressed_size(),
            });
        }
        Ok(entries)
    }

    pub fn read_member(&mut self, name: &str) -> MdxResult<Vec<u8>> {
        read_entry(&mut self.zip, name)
    }

    /// The entry point decoded as UTF-8.
    pub fn content(&mut self) -> MdxResult<String> {
        let entry_point = self.manifest.content.entry_point.clone();
        let bytes = self.read_member(&entry_point)?;
        String::from_utf8(bytes).map_err(|e| {
            MdxError::InvalidInput(format!("{} is not valid UTF-8: {}", entry_point, e))
        })
    }

    pub fn history(&mut self) -> MdxResult<Option<VersionHistory>> {
        if !self.manifest.history.as_ref().is_some_and(|h| h.enabled) {
            return Ok(None);
        }
        let bytes = self.read_member(VERSIONS_FILENAME)?;
        VersionHistory::from_json(&bytes).map(Some)
    }

    pub fn annotations(&mut self) -> MdxResult<Option<AnnotationSet>> {
        if self.zip.index_for_name(ANNOTATIONS_FILENAME).is_none() {
            return Ok(None);
        }
        let bytes = self.read_member(ANNOTATIONS_FILENAME)?;
        AnnotationSet::from_json(&bytes).map(Some)
    }

    /// Checks the archive against its manifest.
    ///
    /// Every issue is collected; only I/O and codec failures abort the check.
    pub fn verify(&mut self) -> MdxResult<VerificationReport> {
        let mut report = VerificationReport::default();
        let names = self.member_names();

        if let Some(first) = names.first().filter(|n| n.as_str() != MANIFEST_FILENAME) {
            report.issues.push(VerificationIssue::ManifestNotFirst {
                first: first.clone(),
            });
        }

        let present: BTreeSet<&str> = names.iter().map(String::as_str).collect();
        for (field, path) in self.manifest.referenced_paths() {
            if !present.contains(path) {
                report.issues.push(VerificationIssue::MissingMember {
                    field,
                    path: path.to_owned(),
                });
            }
        }

        let history_enabled = self.manifest.history.as_ref().is_some_and(|h| h.enabled);
        let mut snapshots: Option<BTreeSet<String>> = (!history_enabled).then(BTreeSet::new);
        if history_enabled && present.contains(VERSIONS_FILENAME) {
            let bytes = read_entry(&mut self.zip, VERSIONS_FILENAME)?;
            match VersionHistory::from_json(&bytes).and_then(|h| h.validate().map(|()| h)) {
                Ok(history) => {
                    let named: BTreeSet<String> =
                        history.snapshot_paths().map(ArchivePath::to_string).collect();
                    for path in &named {
                        if !present.contains(path.as_str()) {
                            report.issues.push(VerificationIssue::MissingMember {
                                field: "history.snapshot".to_owned(),
                                path: path.clone(),
                            });
                        }
                    }
                    snapshots = Some(named);
                }
                Err(e) => report.issues.push(VerificationIssue::InvalidRecord {
                    path: VERSIONS_FILENAME.to_owned(),
                    detail: e.to_string(),
                }),
            }
        }
        if let Some(named) = &snapshots {
            for name in &names {
                let is_snapshot = ArchivePath::new(name).is_ok_and(|p| p.is_under(SNAPSHOTS_DIR));
                if is_snapshot && !named.contains(name) {
                    report.issues.push(VerificationIssue::UnreferencedMember {
                        path: name.clone(),
                    });
                }
            }
        }

        if present.contains(ANNOTATIONS_FILENAME) {
            let bytes = read_entry(&mut self.zip, ANNOTATIONS_FILENAME)?;
            let checked = AnnotationSet::from_json(&bytes)
                .and_then(|set| set.validate(|source| present.contains(source)));
            if let Err(e) = checked {
                report.issues.push(VerificationIssue::InvalidRecord {
                    path: ANNOTATIONS_FILENAME.to_owned(),
                    detail: e.to_string(),
                });
            }
        }

        let mut expected: HashMap<String, (u64, Checksum)> = HashMap::new();
        for (_, meta) in self.manifest.assets.records() {
            expected.insert(meta.path.to_string(), (meta.size_bytes, meta.checksum.clone()));
        }
        for sheet in &self.manifest.styles.stylesheets {
            expected.insert(sheet.path.to_string(), (sheet.size_bytes, sheet.checksum.clone()));
        }

        for name in &names {
            let Some((size, checksum)) = expected.get(name) else {
                let tracked = ArchivePath::new(name)
                    .map(|p| p.is_under(ASSETS_DIR) || p.is_under(STYLES_DIR))
                    .unwrap_or(false);
                if tracked {
                    report.issues.push(VerificationIssue::UnreferencedMember {
                        path: name.clone(),
                    });
                }
                continue;
            };

            let bytes = read_entry(&mut self.zip, name)?;
            report.members_checked += 1;
            if bytes.len() as u64 != *size {
                report.issues.push(VerificationIssue::SizeMismatch {
                    path: name.clone(),
                    expected: *size,
                    actual: bytes.len() as u64,
                });
            }
            if !checksum.verify(&bytes) {
                report.issues.push(VerificationIssue::ChecksumMismatch {
                    path: name.clone(),
                    expected: checksum.to_string(),
                    actual: Checksum::compute_with(checksum.algorithm(), &bytes).to_string(),
                });
            }
        }

        tracing::debug!(
            members_checked = report.members_checked,
            issues = report.issues.len(),
            "verified archive"
        );
        Ok(report)
    }

    /// Writes every member beneath `dir` and returns the files created.
    ///
    /// # Errors
    ///
    /// Returns [`MdxError::UnsafeMemberName`] before writing anything if any entry name
    /// would resolve outside `dir`.
    pub fn extract_to(&mut self, dir: &Path) -> MdxResult<Vec<PathBuf>> {
        let mut targets = Vec::with_capacity(self.zip.len());
        for i in 0..self.zip.len() {
            let entry = self.zip.by_index(i)?;
            let relative = entry
                .enclosed_name()
                .ok_or_else(|| MdxError::UnsafeMemberName(entry.name().to_owned()))?;
            targets.push((i, entry.is_dir(), dir.join(relative)));
        }

        let mut written = Vec::new();
        for (i, is_dir, target) in targets {
            if is_dir {
                fs::create_dir_all(&target).map_err(|e| MdxError::io(&target, e))?;
                continue;
            }
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| MdxError::io(parent, e))?;
            }
            let mut entry = self.zip.by_index(i)?;
            let mut out = File::create(&target).map_err(|e| MdxError::io(&target, e))?;
            std::io::copy(&mut entry, &mut out).map_err(|e| MdxError::io(&target, e))?;
            written.push(target);
        }

        tracing::info!(dir = %dir.display(), files = written.len(), "extracted archive");
        Ok(written)
    }
}

fn read_entry<R: Read + Seek>(zip: &mut ZipArchive<R>, name: &str) -> MdxResult<Vec<u8>> {
    let mut entry = match zip.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Err(MdxError::MissingMember(name.to_owned())),
        Err(e) => return Err(e.into()),
    };
    let mut bytes = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
    entry
        .read_to_end(&mut bytes)
        .map_err(|e| MdxError::io(name, e))?;
    Ok(bytes)
}
