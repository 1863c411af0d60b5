//! Archive Writer.
//!
//! Serializes a [`Manifest`] and its [`Payloads`] into a ZIP container. The member plan
//! is computed and checked against the manifest before the first byte is written, so a
//! manifest that disagrees with its payloads never reaches disk.
//!
//! Member order is fixed: `manifest.json`, the entry point, assets (images, data,
//! models), stylesheets, `history/versions.json`, snapshots, then
//! `annotations/annotations.json`.

use crate::config::ArchiveConfig;
use crate::constants::{ANNOTATIONS_FILENAME, MANIFEST_FILENAME, SNAPSHOTS_DIR, VERSIONS_FILENAME};
use crate::manifest::Manifest;
use crate::package::{HistoryPayload, Member, Package, Payloads};
use crate::validation::validate_under;
use crate::{MdxError, MdxResult};
use mdx_files::Checksum;
use mdx_types::ArchivePath;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// One member in write order.
#[derive(Debug)]
pub struct PlannedMember<'a> {
    pub name: Cow<'a, str>,
    pub bytes: Cow<'a, [u8]>,
}

/// What was written by [`ArchiveWriter::write_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub path: PathBuf,
    pub members: usize,
    pub bytes: u64,
}

#[derive(Clone, Debug, Default)]
pub struct ArchiveWriter {
    config: ArchiveConfig,
}

impl ArchiveWriter {
    pub fn new(config: ArchiveConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    /// Checks `payloads` against `manifest` and returns the members in write order.
    ///
    /// # Errors
    ///
    /// - [`MdxError::MissingMember`] if the manifest names a path with no payload.
    /// - [`MdxError::UnreferencedMember`] if a payload is not named by the manifest or
    ///   the version history, or annotations are supplied without collaboration enabled.
    /// - [`MdxError::PathPrefix`] if a snapshot sits outside `history/snapshots/`.
    /// - [`MdxError::IntegrityMismatch`] if a payload's size or checksum differs from
    ///   the manifest record.
    /// - [`MdxError::DuplicateMember`] if two members share a name.
    pub fn plan<'a>(
        &self,
        manifest: &Manifest,
        payloads: &'a Payloads,
    ) -> MdxResult<Vec<PlannedMember<'a>>> {
        let mut plan = Vec::new();
        plan.push(PlannedMember {
            name: Cow::Borrowed(MANIFEST_FILENAME),
            bytes: Cow::Owned(manifest.to_json()?),
        });
        plan.push(PlannedMember {
            name: Cow::Owned(manifest.content.entry_point.clone()),
            bytes: Cow::Borrowed(payloads.content.as_slice()),
        });

        let assets = index_members(&payloads.assets)?;
        let mut used = HashSet::new();
        for (_, meta) in manifest.assets.records() {
            let member = assets
                .get(meta.path.as_str())
                .ok_or_else(|| MdxError::MissingMember(meta.path.to_string()))?;
            check_integrity(meta.path.as_str(), meta.size_bytes, &meta.checksum, &member.bytes)?;
            used.insert(meta.path.as_str());
            plan.push(borrowed(member));
        }
        if let Some(orphan) = payloads
            .assets
            .iter()
            .find(|m| !used.contains(m.path.as_str()))
        {
            return Err(MdxError::UnreferencedMember(orphan.path.to_string()));
        }

        let styles = index_members(&payloads.styles)?;
        used.clear();
        for record in &manifest.styles.stylesheets {
            let member = styles
                .get(record.path.as_str())
                .ok_or_else(|| MdxError::MissingMember(record.path.to_string()))?;
            check_integrity(
                record.path.as_str(),
                record.size_bytes,
                &record.checksum,
                &member.bytes,
            )?;
            used.insert(record.path.as_str());
            plan.push(borrowed(member));
        }
        if let Some(orphan) = payloads
            .styles
            .iter()
            .find(|m| !used.contains(m.path.as_str()))
        {
            return Err(MdxError::UnreferencedMember(orphan.path.to_string()));
        }

        let history_enabled = manifest.history.as_ref().is_some_and(|h| h.enabled);
        match (&payloads.history, history_enabled) {
            (Some(history), true) => {
                check_snapshots(history)?;
                plan.push(PlannedMember {
                    name: Cow::Borrowed(VERSIONS_FILENAME),
                    bytes: Cow::Owned(history.record.to_json()?),
                });
                plan.extend(history.snapshots.iter().map(borrowed));
            }
            (None, true) => return Err(MdxError::MissingMember(VERSIONS_FILENAME.to_owned())),
            (Some(_), false) => {
                return Err(MdxError::UnreferencedMember(VERSIONS_FILENAME.to_owned()));
            }
            (None, false) => {}
        }

        if let Some(annotations) = &payloads.annotations {
            let allowed = manifest
                .collaboration
                .as_ref()
                .is_some_and(|c| c.allow_annotations);
            if !allowed {
                return Err(MdxError::UnreferencedMember(ANNOTATIONS_FILENAME.to_owned()));
            }
            plan.push(PlannedMember {
                name: Cow::Borrowed(ANNOTATIONS_FILENAME),
                bytes: Cow::Owned(annotations.to_json()?),
            });
        }

        let mut names = HashSet::new();
        if let Some(dup) = plan.iter().find(|m| !names.insert(m.name.as_ref())) {
            return Err(MdxError::DuplicateMember(dup.name.to_string()));
        }

        for (field, path) in manifest.referenced_paths() {
            if !names.contains(path) {
                return Err(MdxError::MissingReference {
                    field,
                    path: path.to_owned(),
                });
            }
        }
        if let Some(annotations) = &payloads.annotations {
            annotations.validate(|source| names.contains(source))?;
        }

        Ok(plan)
    }

    /// Writes the archive into `writer` and returns it once the central directory is
    /// flushed.
    pub fn write_to<W: Write + Seek>(
        &self,
        manifest: &Manifest,
        payloads: &Payloads,
        writer: W,
    ) -> MdxResult<W> {
        let plan = self.plan(manifest, payloads)?;
        self.write_members(&plan, writer)
    }

    fn write_members<W: Write + Seek>(
        &self,
        plan: &[PlannedMember<'_>],
        writer: W,
    ) -> MdxResult<W> {
        let mut zip = ZipWriter::new(writer);
        for member in plan {
            zip.start_file(member.name.as_ref(), self.member_options())?;
            zip.write_all(&member.bytes)
                .map_err(|e| MdxError::io(member.name.as_ref(), e))?;
            tracing::debug!(member = %member.name, size = member.bytes.len(), "wrote member");
        }
        Ok(zip.finish()?)
    }

    /// Writes the archive to `dest`, replacing any existing file.
    ///
    /// Output goes to a temporary file beside `dest` that is renamed into place only
    /// after the archive is complete. On any error the temporary file is removed and
    /// `dest` is left as it was.
    pub fn write_file(
        &self,
        manifest: &Manifest,
        payloads: &Payloads,
        dest: &Path,
    ) -> MdxResult<ArchiveSummary> {
        let parent = match dest.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let plan = self.plan(manifest, payloads)?;
        let members = plan.len();

        fs::create_dir_all(&parent).map_err(|e| MdxError::io(&parent, e))?;
        let mut tmp =
            tempfile::NamedTempFile::new_in(&parent).map_err(|e| MdxError::io(&parent, e))?;
        self.write_members(&plan, tmp.as_file_mut())?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| MdxError::io(tmp.path(), e))?;
        let file = tmp.persist(dest).map_err(|e| MdxError::io(dest, e.error))?;
        let bytes = file
            .metadata()
            .map_err(|e| MdxError::io(dest, e))?
            .len();

        tracing::info!(path = %dest.display(), members, bytes, "wrote archive");
        Ok(ArchiveSummary {
            path: dest.to_path_buf(),
            members,
            bytes,
        })
    }

    pub fn write_package(&self, package: &Package, dest: &Path) -> MdxResult<ArchiveSummary> {
        self.write_file(&package.manifest, &package.payloads, dest)
    }

    fn member_options(&self) -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(self.config.compression_level()))
            .last_modified_time(self.config.member_time())
            .unix_permissions(0o644)
    }
}

fn borrowed(member: &Member) -> PlannedMember<'_> {
    PlannedMember {
        name: Cow::Borrowed(member.path.as_str()),
        bytes: Cow::Borrowed(member.bytes.as_slice()),
    }
}

fn index_members(members: &[Member]) -> MdxResult<HashMap<&str, &Member>> {
    let mut index = HashMap::with_capacity(members.len());
    for member in members {
        if index.insert(member.path.as_str(), member).is_some() {
            return Err(MdxError::DuplicateMember(member.path.to_string()));
        }
    }
    Ok(index)
}

/// Every snapshot lies under `history/snapshots/` and is named by the record, and every
/// snapshot the record names has a payload.
fn check_snapshots(history: &HistoryPayload) -> MdxResult<()> {
    let named: HashSet<&str> = history
        .record
        .snapshot_paths()
        .map(ArchivePath::as_str)
        .collect();
    for snapshot in &history.snapshots {
        validate_under(&snapshot.path, SNAPSHOTS_DIR)?;
        if !named.contains(snapshot.path.as_str()) {
            return Err(MdxError::UnreferencedMember(snapshot.path.to_string()));
        }
    }
    if let Some(missing) = history
        .record
        .snapshot_paths()
        .find(|p| !history.snapshots.iter().any(|m| &m.path == *p))
    {
        return Err(MdxError::MissingMember(missing.to_string()));
    }
    Ok(())
}

fn check_integrity(
    path: &str,
    size_bytes: u64,
    checksum: &Checksum,
    bytes: &[u8],
) -> MdxResult<()> {
    if bytes.len() as u64 != size_bytes {
        return Err(MdxError::IntegrityMismatch {
            path: path.to_owned(),
            detail: format!(
                "manifest records {} bytes, payload has {}",
                size_bytes,
                bytes.len()
            ),
        });
    }
    if !checksum.verify(bytes) {
        return Err(MdxError::IntegrityMismatch {
            path: path.to_owned(),
            detail: format!("payload does not hash to {}", checksum),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{Annotation, AnnotationSet, Motivation};
    use crate::builder::{AssetSource, DocumentIdentity, ManifestBuilder};
    use crate::history::{HistoryAuthor, VersionEntry, VersionHistory};
    use crate::manifest::{Author, AuthorRole, ContentDescriptor, Extension};
    use crate::reader::MdxArchive;
    use mdx_uuid::{FixedIdentity, IdentityProvider, Timestamp};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn package(body: &str) -> Package {
        let provider =
            FixedIdentity::seeded(Timestamp::parse("2026-01-15T09:30:00Z").unwrap(), 11);
        let identity = DocumentIdentity::new(&provider, "Archive Test")
            .with_author(Author::new("Tester", AuthorRole::Author));
        ManifestBuilder::new(identity, ContentDescriptor::new(&[Extension::Tables]), body)
            .asset(AssetSource::image("assets/images/a.svg", b"<svg/>".to_vec(), "A"))
            .asset(AssetSource::csv("assets/data/t.csv", b"x,y\n1,2\n".to_vec(), true))
            .style("styles/theme.css", "body {}")
            .theme("styles/theme.css")
            .build()
            .unwrap()
    }

    fn collaborative_package() -> Package {
        let provider =
            FixedIdentity::seeded(Timestamp::parse("2026-01-15T09:30:00Z").unwrap(), 12);
        let history = VersionHistory::from_entries(vec![VersionEntry::new(
            "1.0.0",
            provider.now_utc(),
            HistoryAuthor {
                name: "Tester".into(),
                email: None,
            },
            "Initial",
            ArchivePath::new("history/snapshots/v1.0.0.md").unwrap(),
        )])
        .unwrap();
        let note = Annotation::new(
            &provider,
            Motivation::Commenting,
            "Reviewer",
            ArchivePath::new("document.md").unwrap(),
            "Hello",
            "Short and clear.",
        );
        let identity = DocumentIdentity::new(&provider, "History Test")
            .with_author(Author::new("Tester", AuthorRole::Author));

        ManifestBuilder::new(identity, ContentDescriptor::new(&[]), "# Hello")
            .history(history)
            .snapshot("history/snapshots/v1.0.0.md", "# Hello")
            .annotations(AnnotationSet::new(vec![note]))
            .build()
            .unwrap()
    }

    fn write_to_memory(package: &Package) -> Vec<u8> {
        ArchiveWriter::default()
            .write_to(&package.manifest, &package.payloads, Cursor::new(Vec::new()))
            .unwrap()
            .into_inner()
    }

    #[test]
    fn members_follow_fixed_order() {
        let package = package("# Hello");
        let bytes = write_to_memory(&package);
        let archive = MdxArchive::from_reader(Cursor::new(bytes)).unwrap();

        assert_eq!(
            archive.member_names(),
            vec![
                "manifest.json",
                "document.md",
                "assets/images/a.svg",
                "assets/data/t.csv",
                "styles/theme.css",
            ]
        );
    }

    #[test]
    fn round_trip_reproduces_payloads() {
        let package = package("# Hello");
        let bytes = write_to_memory(&package);
        let mut archive = MdxArchive::from_reader(Cursor::new(bytes)).unwrap();

        assert_eq!(archive.content().unwrap(), "# Hello");
        assert_eq!(archive.read_member("assets/images/a.svg").unwrap(), b"<svg/>");
        assert_eq!(archive.read_member("assets/data/t.csv").unwrap(), b"x,y\n1,2\n");
        assert_eq!(archive.manifest(), &package.manifest);

        let meta = archive.manifest().assets.find("assets/images/a.svg").unwrap().clone();
        let extracted = archive.read_member("assets/images/a.svg").unwrap();
        assert_eq!(extracted.len() as u64, meta.size_bytes);
        assert!(meta.checksum.verify(&extracted));
    }

    #[test]
    fn empty_document_has_exactly_two_members() {
        let provider =
            FixedIdentity::seeded(Timestamp::parse("2026-01-15T09:30:00Z").unwrap(), 1);
        let package = ManifestBuilder::new(
            DocumentIdentity::new(&provider, "Empty")
                .with_author(Author::new("A", AuthorRole::Author)),
            ContentDescriptor::new(&[]),
            "",
        )
        .build()
        .unwrap();
        let bytes = write_to_memory(&package);
        let archive = MdxArchive::from_reader(Cursor::new(bytes)).unwrap();

        assert_eq!(archive.member_names(), vec!["manifest.json", "document.md"]);
        assert!(archive.manifest().assets.images.is_empty());
    }

    #[test]
    fn identical_inputs_give_identical_archives() {
        let first = write_to_memory(&package("# Same"));
        let second = write_to_memory(&package("# Same"));
        assert_eq!(first, second);
    }

    #[test]
    fn plan_rejects_tampered_payload() {
        let mut package = package("# Hello");
        package.payloads.assets[0].bytes = b"<svg></svg>".to_vec();

        let result = ArchiveWriter::default().plan(&package.manifest, &package.payloads);
        assert!(matches!(result, Err(MdxError::IntegrityMismatch { .. })));
    }

    #[test]
    fn plan_rejects_missing_and_extra_members() {
        let mut missing = package("# Hello");
        missing.payloads.assets.remove(0);
        assert!(matches!(
            ArchiveWriter::default().plan(&missing.manifest, &missing.payloads),
            Err(MdxError::MissingMember(p)) if p == "assets/images/a.svg"
        ));

        let mut extra = package("# Hello");
        extra.payloads.styles.push(Member {
            path: ArchivePath::new("styles/print.css").unwrap(),
            bytes: b"@media print {}".to_vec(),
        });
        assert!(matches!(
            ArchiveWriter::default().plan(&extra.manifest, &extra.payloads),
            Err(MdxError::UnreferencedMember(p)) if p == "styles/print.css"
        ));
    }

    #[test]
    fn write_file_replaces_destination_atomically() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("out").join("doc.mdx");
        let package = package("# Hello");

        let summary = ArchiveWriter::default().write_package(&package, &dest).unwrap();
        assert_eq!(summary.members, 5);
        assert_eq!(summary.bytes, fs::metadata(&dest).unwrap().len());

        let mut broken = package.clone();
        broken.payloads.assets[0].bytes.push(b'!');
        let before = fs::read(&dest).unwrap();
        assert!(ArchiveWriter::default().write_package(&broken, &dest).is_err());
        assert_eq!(fs::read(&dest).unwrap(), before);

        let leftovers = fs::read_dir(dest.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn plan_rejects_snapshots_the_history_does_not_name() {
        let writer = ArchiveWriter::default();
        assert!(writer
            .plan(&collaborative_package().manifest, &collaborative_package().payloads)
            .is_ok());

        let mut stray = collaborative_package();
        stray.payloads.history.as_mut().unwrap().snapshots.push(Member {
            path: ArchivePath::new("assets/images/stray.svg").unwrap(),
            bytes: b"<svg/>".to_vec(),
        });
        assert!(matches!(
            writer.plan(&stray.manifest, &stray.payloads),
            Err(MdxError::PathPrefix { path, .. }) if path == "assets/images/stray.svg"
        ));

        let mut unnamed = collaborative_package();
        unnamed.payloads.history.as_mut().unwrap().snapshots.push(Member {
            path: ArchivePath::new("history/snapshots/v9.0.0.md").unwrap(),
            bytes: b"# Later".to_vec(),
        });
        assert!(matches!(
            writer.plan(&unnamed.manifest, &unnamed.payloads),
            Err(MdxError::UnreferencedMember(p)) if p == "history/snapshots/v9.0.0.md"
        ));

        let mut missing = collaborative_package();
        missing.payloads.history.as_mut().unwrap().snapshots.clear();
        assert!(matches!(
            writer.plan(&missing.manifest, &missing.payloads),
            Err(MdxError::MissingMember(p)) if p == "history/snapshots/v1.0.0.md"
        ));
    }

    #[test]
    fn plan_rejects_annotations_without_collaboration() {
        let mut package = collaborative_package();
        package.manifest.collaboration = None;
        assert!(matches!(
            ArchiveWriter::default().plan(&package.manifest, &package.payloads),
            Err(MdxError::UnreferencedMember(p)) if p == "annotations/annotations.json"
        ));

        let mut disabled = collaborative_package();
        if let Some(collaboration) = disabled.manifest.collaboration.as_mut() {
            collaboration.allow_annotations = false;
        }
        assert!(ArchiveWriter::default()
            .plan(&disabled.manifest, &disabled.payloads)
            .is_err());
    }

    #[test]
    fn write_file_to_directory_fails_without_leftovers() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("doc.mdx");
        fs::create_dir(&dest).unwrap();

        let result = ArchiveWriter::default().write_package(&package("# Hello"), &dest);

        assert!(matches!(result, Err(MdxError::Io { .. })));
        let names: Vec<String> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["doc.mdx"]);
        assert!(dest.is_dir());
        assert_eq!(fs::read_dir(&dest).unwrap().count(), 0);
    }

    #[test]
    fn invalid_package_creates_no_directories() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("nested").join("doc.mdx");
        let mut broken = package("# Hello");
        broken.payloads.assets.clear();

        assert!(ArchiveWriter::default().write_package(&broken, &dest).is_err());
        assert!(!temp.path().join("nested").exists());
    }
}
