//! # MDX Core
//!
//! Builds, writes, reads and verifies MDX document archives.
//!
//! An MDX archive is a ZIP container holding `manifest.json`, a Markdown entry point,
//! and optional assets, stylesheets, version history and annotations. The manifest
//! records a size and checksum for every asset and stylesheet, and this crate keeps
//! those records consistent with the bytes that are actually written:
//!
//! - [`ManifestBuilder`] validates document metadata and computes integrity metadata
//!   from the payload bytes it is given
//! - [`ArchiveWriter`] re-checks the manifest against the payloads and writes members in
//!   a fixed order, replacing the destination only on success
//! - [`MdxArchive`] opens an archive, verifies it against its manifest, and extracts it
//!
//! **No process concerns**: environment variables, logging setup and output locations
//! belong to the binaries.

pub mod annotations;
pub mod archive;
pub mod builder;
pub mod config;
pub mod constants;
mod error;
pub mod history;
pub mod manifest;
pub mod package;
pub mod reader;
pub mod validation;

pub use annotations::{Annotation, AnnotationSet, AnnotationStatus, Motivation};
pub use archive::{ArchiveSummary, ArchiveWriter};
pub use builder::{AssetKind, AssetSource, DocumentIdentity, ManifestBuilder};
pub use config::ArchiveConfig;
pub use error::{MdxError, MdxResult};
pub use history::{ChangeSummary, HistoryAuthor, VersionEntry, VersionHistory};
pub use manifest::{
    AlignmentClasses, AssetCategory, AttributesConfig, Author, AuthorRole, CollaborationConfig,
    ContentDescriptor, Extension, Manifest, RenderingConfig, TabularShape, TocConfig,
};
pub use package::{Member, Package, Payloads};
pub use reader::{MdxArchive, MemberEntry, VerificationIssue, VerificationReport};
