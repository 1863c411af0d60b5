//! # MDX Fixtures
//!
//! Literal example documents and conformance cases, and the orchestration that turns
//! them into files on disk.
//!
//! Every archive fixture is a function from an [`IdentityProvider`] to a built
//! [`Package`]; [`generate_all`] runs each one through the [`ArchiveWriter`] and then
//! writes the conformance cases.

pub mod alignment;
pub mod config;
pub mod conformance;
pub mod demonstration;
mod shared;
pub mod technical;

pub use config::FixtureConfig;

use mdx_core::{ArchiveSummary, ArchiveWriter, MdxArchive, MdxError, MdxResult, Package};
use mdx_uuid::IdentityProvider;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error(transparent)]
    Mdx(#[from] MdxError),
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("two fixtures write to {0}")]
    DuplicateDestination(String),
    #[error("invalid fixture configuration: {0}")]
    InvalidConfig(String),
}

impl FixtureError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FixtureError::Io {
            path: path.into(),
            source,
        }
    }
}

/// An archive fixture and the file it is written to.
#[derive(Clone, Copy)]
pub struct ArchiveFixture {
    pub file_name: &'static str,
    pub build: fn(&dyn IdentityProvider) -> MdxResult<Package>,
}

/// File name of the demonstration archive.
pub const DEMONSTRATION_FILE: &str = "example-document.mdx";

pub fn archive_fixtures() -> Vec<ArchiveFixture> {
    vec![
        ArchiveFixture {
            file_name: DEMONSTRATION_FILE,
            build: demonstration::build,
        },
        ArchiveFixture {
            file_name: "alignment-basic.mdx",
            build: alignment::basic,
        },
        ArchiveFixture {
            file_name: "alignment-directives.mdx",
            build: alignment::directives,
        },
        ArchiveFixture {
            file_name: "alignment-complex.mdx",
            build: alignment::complex,
        },
        ArchiveFixture {
            file_name: "technical-doc.mdx",
            build: technical::build,
        },
    ]
}

/// Everything [`generate_all`] wrote.
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    pub archives: Vec<ArchiveSummary>,
    pub conformance_files: Vec<PathBuf>,
    pub extracted_files: Vec<PathBuf>,
}

/// Builds and writes every archive fixture, optionally extracts the demonstration
/// archive, then writes the conformance cases.
///
/// Destination names are checked for collisions before anything is written.
pub fn generate_all(
    config: &FixtureConfig,
    provider: &dyn IdentityProvider,
) -> Result<GenerationReport, FixtureError> {
    generate(&archive_fixtures(), config, provider)
}

/// [`generate_all`] over an explicit fixture list.
pub fn generate(
    fixtures: &[ArchiveFixture],
    config: &FixtureConfig,
    provider: &dyn IdentityProvider,
) -> Result<GenerationReport, FixtureError> {
    let mut names = HashSet::new();
    for fixture in fixtures {
        if !names.insert(fixture.file_name) {
            return Err(FixtureError::DuplicateDestination(
                config.output_dir().join(fixture.file_name).display().to_string(),
            ));
        }
    }

    let writer = ArchiveWriter::new(*config.archive());
    let mut report = GenerationReport::default();

    for fixture in fixtures {
        let package = (fixture.build)(provider)?;
        let dest = config.output_dir().join(fixture.file_name);
        let summary = writer.write_package(&package, &dest)?;
        report.archives.push(summary);
    }

    if let Some(extract_dir) = config.extract_dir() {
        if let Some(demo) = report
            .archives
            .iter()
            .find(|a| a.path.file_name().is_some_and(|n| n == DEMONSTRATION_FILE))
        {
            report.extracted_files = extract(&demo.path, extract_dir)?;
        }
    }

    report.conformance_files = conformance::write_all(config.conformance_dir())?;
    Ok(report)
}

fn extract(archive: &Path, dir: &Path) -> Result<Vec<PathBuf>, FixtureError> {
    let mut archive = MdxArchive::open(archive)?;
    Ok(archive.extract_to(dir)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdx_core::ArchiveConfig;
    use mdx_uuid::{FixedIdentity, Timestamp};
    use std::fs;
    use tempfile::TempDir;

    fn provider() -> FixedIdentity {
        FixedIdentity::seeded(Timestamp::parse("2026-01-15T09:30:00Z").unwrap(), 9)
    }

    fn config(root: &Path, extract: bool) -> FixtureConfig {
        FixtureConfig::new(
            root.join("examples"),
            root.join("tests").join("alignment"),
            extract.then(|| root.join("example-extracted")),
            ArchiveConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn generates_every_archive_and_case() {
        let temp = TempDir::new().unwrap();
        let report = generate_all(&config(temp.path(), false), &provider()).unwrap();

        assert_eq!(report.archives.len(), 5);
        assert_eq!(report.conformance_files.len(), 11);
        assert!(report.extracted_files.is_empty());

        for summary in &report.archives {
            let mut archive = MdxArchive::open(&summary.path).unwrap();
            let verification = archive.verify().unwrap();
            assert!(verification.is_ok(), "{}: {:?}", summary.path.display(), verification.issues);
            assert_eq!(archive.member_names()[0], "manifest.json");
            assert_eq!(archive.member_names().len(), summary.members);
        }
    }

    #[test]
    fn demonstration_archive_has_history_and_annotations() {
        let temp = TempDir::new().unwrap();
        generate_all(&config(temp.path(), false), &provider()).unwrap();

        let path = temp.path().join("examples").join(DEMONSTRATION_FILE);
        let mut archive = MdxArchive::open(&path).unwrap();

        assert_eq!(archive.history().unwrap().unwrap().versions.len(), 2);
        assert_eq!(archive.annotations().unwrap().unwrap().len(), 2);
        assert_eq!(
            archive.read_member("history/snapshots/v0.1.0.md").unwrap(),
            b"# Initial Draft\n\nPlaceholder content."
        );
        assert_eq!(
            archive.read_member("history/snapshots/v1.0.0.md").unwrap(),
            archive.content().unwrap().into_bytes()
        );
    }

    #[test]
    fn extracts_demonstration_when_configured() {
        let temp = TempDir::new().unwrap();
        let report = generate_all(&config(temp.path(), true), &provider()).unwrap();

        let extracted = temp.path().join("example-extracted");
        assert!(!report.extracted_files.is_empty());
        assert!(extracted.join("manifest.json").is_file());
        assert!(extracted.join("annotations/annotations.json").is_file());
        assert!(extracted.join("assets/models/component.gltf").is_file());
    }

    #[test]
    fn fixed_provider_gives_identical_archives() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        generate_all(&config(first.path(), false), &provider()).unwrap();
        generate_all(&config(second.path(), false), &provider()).unwrap();

        for fixture in archive_fixtures() {
            let a = fs::read(first.path().join("examples").join(fixture.file_name)).unwrap();
            let b = fs::read(second.path().join("examples").join(fixture.file_name)).unwrap();
            assert_eq!(a, b, "{} differs between runs", fixture.file_name);
        }
    }

    #[test]
    fn rejects_duplicate_destinations_before_writing() {
        let temp = TempDir::new().unwrap();
        let fixtures = [
            ArchiveFixture {
                file_name: "same.mdx",
                build: alignment::basic,
            },
            ArchiveFixture {
                file_name: "same.mdx",
                build: alignment::complex,
            },
        ];

        let result = generate(&fixtures, &config(temp.path(), false), &provider());

        assert!(matches!(result, Err(FixtureError::DuplicateDestination(_))));
        assert!(!temp.path().join("examples").exists());
    }
}
