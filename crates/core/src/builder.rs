//! Manifest Builder.
//!
//! [`ManifestBuilder`] is a pure transform: it takes document metadata and payload
//! bytes, validates them, and returns a [`Package`] whose manifest records a size and
//! checksum computed from exactly the bytes carried alongside it. No I/O happens here.

use crate::annotations::AnnotationSet;
use crate::constants::{
    ANNOTATIONS_FILENAME, CONTENT_ENCODING, DEFAULT_MEDIA_TYPE, MANIFEST_FILENAME, MDX_VERSION,
    SNAPSHOTS_DIR, STYLES_DIR, VERSIONS_FILENAME,
};
use crate::history::VersionHistory;
use crate::manifest::{
    AssetCategory, AssetInventory, AssetMeta, Author, CollaborationConfig, ContentDescriptor,
    DataAsset, DocumentInfo, HistoryConfig, ImageAsset, License, Manifest, ModelAsset,
    RenderingConfig, StyleConfig, StyleRecord, TabularShape,
};
use crate::package::{HistoryPayload, Member, Package, Payloads};
use crate::validation::{
    validate_email, validate_entry_point, validate_language_tag, validate_semver,
    validate_toc_depth, validate_under,
};
use crate::{MdxError, MdxResult};
use mdx_files::PayloadInfo;
use mdx_types::{ArchivePath, NonEmptyText};
use mdx_uuid::{DocumentId, IdentityProvider, Timestamp};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Unvalidated document metadata.
///
/// Nothing is checked until [`ManifestBuilder::build`], so an identity can be assembled
/// from arbitrary caller input and still fail cleanly.
#[derive(Debug, Clone)]
pub struct DocumentIdentity {
    id: String,
    title: String,
    subtitle: Option<String>,
    description: Option<String>,
    authors: Vec<Author>,
    created: Timestamp,
    modified: Timestamp,
    version: String,
    language: String,
    license: Option<License>,
    keywords: Vec<String>,
}

impl DocumentIdentity {
    /// A fresh identity: new id, created and modified both "now", version `1.0.0`,
    /// language `en-US`.
    pub fn new(provider: &dyn IdentityProvider, title: impl Into<String>) -> Self {
        let now = provider.now_utc();
        Self {
            id: provider.new_document_id().to_string(),
            title: title.into(),
            subtitle: None,
            description: None,
            authors: Vec::new(),
            created: now,
            modified: now,
            version: "1.0.0".to_owned(),
            language: "en-US".to_owned(),
            license: None,
            keywords: Vec::new(),
        }
    }

    /// Replaces the generated id with an externally supplied one.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_author(mut self, author: Author) -> Self {
        self.authors.push(author);
        self
    }

    pub fn with_created(mut self, created: Timestamp) -> Self {
        self.created = created;
        self
    }

    pub fn with_modified(mut self, modified: Timestamp) -> Self {
        self.modified = modified;
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_license(mut self, kind: impl Into<String>, url: Option<&str>) -> Self {
        self.license = Some(License {
            kind: kind.into(),
            url: url.map(str::to_owned),
        });
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    fn into_info(self) -> MdxResult<DocumentInfo> {
        let id = DocumentId::parse(&self.id)?;
        let title = NonEmptyText::new(&self.title)
            .map_err(|_| MdxError::InvalidInput("document title cannot be empty".into()))?;

        if self.authors.is_empty() {
            return Err(MdxError::InvalidInput(
                "a document needs at least one author".into(),
            ));
        }
        for author in &self.authors {
            if author.name.trim().is_empty() {
                return Err(MdxError::InvalidInput("author name cannot be empty".into()));
            }
            if let Some(email) = &author.email {
                validate_email(email)?;
            }
        }

        if self.created > self.modified {
            return Err(MdxError::InvalidInput(format!(
                "created ({}) is later than modified ({})",
                self.created, self.modified
            )));
        }
        validate_semver("document.version", &self.version)?;
        validate_language_tag(&self.language)?;

        if let Some(license) = &self.license {
            if license.kind.trim().is_empty() {
                return Err(MdxError::InvalidInput("license type cannot be empty".into()));
            }
        }
        if self.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(MdxError::InvalidInput("keywords cannot be empty".into()));
        }

        Ok(DocumentInfo {
            id,
            title,
            subtitle: self.subtitle,
            description: self.description,
            authors: self.authors,
            created: self.created,
            modified: self.modified,
            version: self.version,
            language: self.language,
            license: self.license,
            keywords: self.keywords,
        })
    }
}

/// Category-specific metadata for an asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetKind {
    Image { alt_text: String },
    Data(TabularShape),
    Model { format_version: String },
}

impl AssetKind {
    pub fn category(&self) -> AssetCategory {
        match self {
            AssetKind::Image { .. } => AssetCategory::Images,
            AssetKind::Data(_) => AssetCategory::Data,
            AssetKind::Model { .. } => AssetCategory::Models,
        }
    }
}

/// An asset payload waiting to be described by the builder.
#[derive(Debug, Clone)]
pub struct AssetSource {
    path: String,
    bytes: Vec<u8>,
    mime_type: Option<String>,
    preview: Option<String>,
    kind: AssetKind,
}

impl AssetSource {
    pub fn new(path: impl Into<String>, bytes: impl Into<Vec<u8>>, kind: AssetKind) -> Self {
        Self {
            path: path.into(),
            bytes: bytes.into(),
            mime_type: None,
            preview: None,
            kind,
        }
    }

    pub fn image(
        path: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
        alt_text: impl Into<String>,
    ) -> Self {
        Self::new(
            path,
            bytes,
            AssetKind::Image {
                alt_text: alt_text.into(),
            },
        )
    }

    pub fn data(path: impl Into<String>, bytes: impl Into<Vec<u8>>, shape: TabularShape) -> Self {
        Self::new(path, bytes, AssetKind::Data(shape))
    }

    /// A data asset whose shape is counted from the CSV bytes.
    pub fn csv(path: impl Into<String>, bytes: impl Into<Vec<u8>>, has_header: bool) -> Self {
        let bytes = bytes.into();
        let shape = TabularShape::from_csv(&bytes, has_header);
        Self::data(path, bytes, shape)
    }

    pub fn model(
        path: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
        format_version: impl Into<String>,
    ) -> Self {
        Self::new(
            path,
            bytes,
            AssetKind::Model {
                format_version: format_version.into(),
            },
        )
    }

    /// Names an image asset to show in place of a model. Only valid on models.
    pub fn with_preview(mut self, preview: impl Into<String>) -> Self {
        self.preview = Some(preview.into());
        self
    }

    /// Overrides media type detection.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn category(&self) -> AssetCategory {
        self.kind.category()
    }
}

/// Assembles a [`Manifest`] and the payloads it describes.
#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    identity: DocumentIdentity,
    content: ContentDescriptor,
    body: Vec<u8>,
    assets: Vec<AssetSource>,
    styles: Vec<(String, Vec<u8>)>,
    theme: Option<String>,
    syntax_highlighting: Option<String>,
    alignment_classes: BTreeMap<String, String>,
    rendering: RenderingConfig,
    collaboration: Option<CollaborationConfig>,
    history: Option<VersionHistory>,
    snapshots: Vec<(String, Vec<u8>)>,
    annotations: Option<AnnotationSet>,
}

impl ManifestBuilder {
    pub fn new(
        identity: DocumentIdentity,
        content: ContentDescriptor,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            identity,
            content,
            body: body.into(),
            assets: Vec::new(),
            styles: Vec::new(),
            theme: None,
            syntax_highlighting: None,
            alignment_classes: BTreeMap::new(),
            rendering: RenderingConfig::default(),
            collaboration: None,
            history: None,
            snapshots: Vec::new(),
            annotations: None,
        }
    }

    pub fn asset(mut self, asset: AssetSource) -> Self {
        self.assets.push(asset);
        self
    }

    /// Adds a stylesheet payload under `styles/`.
    pub fn style(mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.styles.push((path.into(), bytes.into()));
        self
    }

    /// Marks one of the added stylesheets as the document theme.
    pub fn theme(mut self, path: impl Into<String>) -> Self {
        self.theme = Some(path.into());
        self
    }

    pub fn syntax_highlighting(mut self, name: impl Into<String>) -> Self {
        self.syntax_highlighting = Some(name.into());
        self
    }

    pub fn alignment_classes(mut self, classes: BTreeMap<String, String>) -> Self {
        self.alignment_classes = classes;
        self
    }

    pub fn rendering(mut self, rendering: RenderingConfig) -> Self {
        self.rendering = rendering;
        self
    }

    pub fn collaboration(mut self, collaboration: CollaborationConfig) -> Self {
        self.collaboration = Some(collaboration);
        self
    }

    pub fn history(mut self, history: VersionHistory) -> Self {
        self.history = Some(history);
        self
    }

    /// Adds a snapshot payload under `history/snapshots/`.
    pub fn snapshot(mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.snapshots.push((path.into(), bytes.into()));
        self
    }

    pub fn annotations(mut self, annotations: AnnotationSet) -> Self {
        self.annotations = Some(annotations);
        self
    }

    /// Validates every input and computes integrity metadata from the payload bytes.
    ///
    /// # Errors
    ///
    /// - [`MdxError::Identity`] if the document id is not a canonical v4 UUID.
    /// - [`MdxError::InvalidInput`] for an empty title, bad version, language or author.
    /// - [`MdxError::Path`] for an empty or unsafe member path.
    /// - [`MdxError::PathPrefix`] if an asset, style or snapshot sits outside its directory.
    /// - [`MdxError::DuplicateMember`] if two payloads share a path.
    /// - [`MdxError::MissingReference`] for a preview, theme, snapshot or annotation target
    ///   that names no payload.
    pub fn build(self) -> MdxResult<Package> {
        let ManifestBuilder {
            identity,
            content,
            body,
            assets,
            styles,
            theme,
            syntax_highlighting,
            alignment_classes,
            rendering,
            mut collaboration,
            history,
            snapshots,
            annotations,
        } = self;

        let document = identity.into_info()?;
        let entry_point = validate_entry_point(&content.entry_point)?;
        validate_content_descriptor(&content)?;
        let text = std::str::from_utf8(&body)
            .map_err(|e| MdxError::InvalidInput(format!("content is not valid UTF-8: {}", e)))?;

        let mut members = BTreeSet::new();
        register(&mut members, MANIFEST_FILENAME)?;
        register(&mut members, entry_point.as_str())?;

        let (inventory, asset_members) = describe_assets(assets, &mut members)?;

        let mut stylesheets = Vec::with_capacity(styles.len());
        let mut style_members = Vec::with_capacity(styles.len());
        for (raw, bytes) in styles {
            let path = ArchivePath::new(&raw)?;
            validate_under(&path, STYLES_DIR)?;
            register(&mut members, path.as_str())?;
            let info = PayloadInfo::describe(path.as_str(), &bytes);
            tracing::debug!(path = %path, size = info.size_bytes, "described stylesheet");
            stylesheets.push(StyleRecord {
                path: path.clone(),
                size_bytes: info.size_bytes,
                checksum: info.checksum,
            });
            style_members.push(Member { path, bytes });
        }

        let theme = theme.map(ArchivePath::new).transpose()?;
        if let Some(theme) = &theme {
            if !stylesheets.iter().any(|sheet| &sheet.path == theme) {
                return Err(MdxError::MissingReference {
                    field: "styles.theme".into(),
                    path: theme.to_string(),
                });
            }
        }
        if alignment_classes
            .iter()
            .any(|(class, css)| class.trim().is_empty() || css.trim().is_empty())
        {
            return Err(MdxError::InvalidInput(
                "alignment classes need a name and a declaration".into(),
            ));
        }

        if let Some(toc) = &rendering.table_of_contents {
            validate_toc_depth(toc.depth)?;
        }

        let (history_config, history_payload) = match history {
            None if !snapshots.is_empty() => {
                return Err(MdxError::InvalidHistory(
                    "snapshots supplied without a version history".into(),
                ));
            }
            None => (None, None),
            Some(record) => {
                let payload = attach_history(record, snapshots, &mut members)?;
                let config = HistoryConfig {
                    enabled: true,
                    versions_file: ArchivePath::new(VERSIONS_FILENAME)?,
                    snapshots_directory: SNAPSHOTS_DIR.to_owned(),
                };
                (Some(config), Some(payload))
            }
        };

        if let Some(set) = &annotations {
            match collaboration {
                Some(config) if !config.allow_annotations => {
                    return Err(MdxError::InvalidAnnotation(
                        "collaboration.allow_annotations is disabled".into(),
                    ));
                }
                Some(_) => {}
                None => {
                    collaboration = Some(CollaborationConfig {
                        allow_annotations: true,
                        track_changes: false,
                    });
                }
            }
            register(&mut members, ANNOTATIONS_FILENAME)?;
            set.validate(|path| members.contains(path))?;
            for annotation in set.unmatched_quotes(entry_point.as_str(), text) {
                tracing::warn!(
                    id = %annotation.id,
                    quote = %annotation.target.selector.exact,
                    "annotation quote not found in content"
                );
            }
        }

        let manifest = Manifest {
            mdx_version: MDX_VERSION.to_owned(),
            document,
            content,
            assets: inventory,
            styles: StyleConfig {
                theme,
                syntax_highlighting,
                alignment_classes,
                stylesheets,
            },
            rendering,
            collaboration,
            history: history_config,
        };

        tracing::debug!(
            title = %manifest.document.title,
            assets = manifest.assets.len(),
            members = members.len(),
            "built manifest"
        );

        Ok(Package {
            manifest,
            payloads: Payloads {
                content: body,
                assets: asset_members,
                styles: style_members,
                history: history_payload,
                annotations,
            },
        })
    }
}

fn register(members: &mut BTreeSet<String>, path: &str) -> MdxResult<()> {
    if members.insert(path.to_owned()) {
        Ok(())
    } else {
        Err(MdxError::DuplicateMember(path.to_owned()))
    }
}

fn validate_content_descriptor(content: &ContentDescriptor) -> MdxResult<()> {
    if content.encoding != CONTENT_ENCODING {
        return Err(MdxError::InvalidInput(format!(
            "content encoding must be {}, got '{}'",
            CONTENT_ENCODING, content.encoding
        )));
    }
    if content.markdown_variant.trim().is_empty() {
        return Err(MdxError::InvalidInput(
            "markdown variant cannot be empty".into(),
        ));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = content.extensions.iter().find(|e| !seen.insert(e.as_str())) {
        return Err(MdxError::InvalidInput(format!(
            "extension '{}' is listed twice",
            dup
        )));
    }
    Ok(())
}

fn describe_assets(
    assets: Vec<AssetSource>,
    members: &mut BTreeSet<String>,
) -> MdxResult<(AssetInventory, Vec<Member>)> {
    let mut inventory = AssetInventory::default();
    let mut payloads = Vec::with_capacity(assets.len());

    for source in assets {
        let category = source.category();
        let path = ArchivePath::new(&source.path)?;
        validate_under(&path, category.dir())?;
        register(members, path.as_str())?;

        let info = PayloadInfo::describe(path.as_str(), &source.bytes);
        let mime_type = match source.mime_type {
            Some(mime) if mime.trim().is_empty() => {
                return Err(MdxError::InvalidInput(format!(
                    "empty MIME type override for '{}'",
                    path
                )));
            }
            Some(mime) => mime,
            None => info
                .media_type
                .map(|m| m.as_str().to_owned())
                .unwrap_or_else(|| DEFAULT_MEDIA_TYPE.to_owned()),
        };
        tracing::debug!(
            path = %path,
            category = category.name(),
            size = info.size_bytes,
            mime_type = %mime_type,
            "described asset"
        );

        let meta = AssetMeta {
            path: path.clone(),
            mime_type,
            size_bytes: info.size_bytes,
            checksum: info.checksum,
        };

        if source.preview.is_some() && category != AssetCategory::Models {
            return Err(MdxError::InvalidInput(format!(
                "only model assets can have a preview, '{}' is in {}",
                path,
                category.name()
            )));
        }

        match source.kind {
            AssetKind::Image { alt_text } => inventory.images.push(ImageAsset { meta, alt_text }),
            AssetKind::Data(shape) => inventory.data.push(DataAsset {
                meta,
                rows: shape.rows,
                columns: shape.columns,
                has_header: shape.has_header,
            }),
            AssetKind::Model { format_version } => inventory.models.push(ModelAsset {
                meta,
                format_version,
                preview: source.preview.map(ArchivePath::new).transpose()?,
            }),
        }
        payloads.push(Member {
            path,
            bytes: source.bytes,
        });
    }

    for model in &inventory.models {
        if let Some(preview) = &model.preview {
            if !inventory.images.iter().any(|image| &image.meta.path == preview) {
                return Err(MdxError::MissingReference {
                    field: format!("preview of {}", model.meta.path),
                    path: preview.to_string(),
                });
            }
        }
    }

    Ok((inventory, payloads))
}

fn attach_history(
    record: VersionHistory,
    snapshots: Vec<(String, Vec<u8>)>,
    members: &mut BTreeSet<String>,
) -> MdxResult<HistoryPayload> {
    record.validate()?;
    register(members, VERSIONS_FILENAME)?;

    let mut snapshot_members = Vec::with_capacity(snapshots.len());
    for (raw, bytes) in snapshots {
        let path = ArchivePath::new(&raw)?;
        validate_under(&path, SNAPSHOTS_DIR)?;
        register(members, path.as_str())?;
        snapshot_members.push(Member { path, bytes });
    }

    for entry in &record.versions {
        if !snapshot_members.iter().any(|m| m.path == entry.snapshot.path) {
            return Err(MdxError::MissingReference {
                field: format!("history version {}", entry.version),
                path: entry.snapshot.path.to_string(),
            });
        }
    }
    if let Some(orphan) = snapshot_members
        .iter()
        .find(|m| !record.snapshot_paths().any(|p| p == &m.path))
    {
        return Err(MdxError::UnreferencedMember(orphan.path.to_string()));
    }

    Ok(HistoryPayload {
        record,
        snapshots: snapshot_members,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{Annotation, Motivation};
    use crate::history::{HistoryAuthor, VersionEntry};
    use crate::manifest::{AuthorRole, Extension, TocConfig};
    use mdx_files::Checksum;
    use mdx_uuid::FixedIdentity;

    fn provider() -> FixedIdentity {
        FixedIdentity::seeded(Timestamp::parse("2026-01-15T09:30:00Z").unwrap(), 3)
    }

    fn identity(provider: &FixedIdentity) -> DocumentIdentity {
        DocumentIdentity::new(provider, "Test Document")
            .with_author(
                Author::new("MDX Working Group", AuthorRole::Author).with_email("mdx@example.org"),
            )
    }

    fn builder(provider: &FixedIdentity, body: &str) -> ManifestBuilder {
        ManifestBuilder::new(
            identity(provider),
            ContentDescriptor::new(&[Extension::Tables, Extension::Alignment]),
            body,
        )
    }

    #[test]
    fn hello_with_one_svg() {
        let provider = provider();
        let package = builder(&provider, "# Hello")
            .asset(AssetSource::image("assets/images/a.svg", b"<svg/>".to_vec(), "A"))
            .build()
            .unwrap();

        let image = &package.manifest.assets.images[0];
        assert_eq!(image.meta.size_bytes, 6);
        assert_eq!(
            image.meta.checksum.to_string(),
            format!("sha256:{}", Checksum::compute(b"<svg/>").hex())
        );
        assert_eq!(image.meta.mime_type, "image/svg+xml");
        assert_eq!(package.payloads.assets[0].bytes, b"<svg/>");
        assert_eq!(package.payloads.content, b"# Hello");
    }

    #[test]
    fn zero_assets_keep_empty_categories() {
        let provider = provider();
        let package = builder(&provider, "").build().unwrap();

        let value: serde_json::Value =
            serde_json::from_slice(&package.manifest.to_json().unwrap()).unwrap();
        assert_eq!(value["assets"]["images"], serde_json::json!([]));
        assert_eq!(value["assets"]["data"], serde_json::json!([]));
        assert_eq!(value["assets"]["models"], serde_json::json!([]));
        assert!(value.get("history").is_none());
        assert!(value.get("collaboration").is_none());
        assert_eq!(value["mdx_version"], "1.1.0");
    }

    #[test]
    fn rejects_wrong_category_prefix() {
        let provider = provider();
        let result = builder(&provider, "# Hello")
            .asset(AssetSource::image("media/images/x.svg", b"<svg/>".to_vec(), ""))
            .build();
        assert!(matches!(result, Err(MdxError::PathPrefix { expected: "assets/images", .. })));

        let misfiled = builder(&provider, "# Hello")
            .asset(AssetSource::csv("assets/images/table.csv", b"a,b\n1,2".to_vec(), true))
            .build();
        assert!(matches!(misfiled, Err(MdxError::PathPrefix { expected: "assets/data", .. })));
    }

    #[test]
    fn rejects_malformed_identity() {
        let provider = provider();
        let bad_id = ManifestBuilder::new(
            identity(&provider).with_id("550E8400-E29B-41D4-A716-446655440000"),
            ContentDescriptor::new(&[]),
            "",
        )
        .build();
        assert!(matches!(bad_id, Err(MdxError::Identity(_))));

        let no_title = ManifestBuilder::new(
            DocumentIdentity::new(&provider, "   ")
                .with_author(Author::new("A", AuthorRole::Author)),
            ContentDescriptor::new(&[]),
            "",
        )
        .build();
        assert!(matches!(no_title, Err(MdxError::InvalidInput(_))));

        let no_author = ManifestBuilder::new(
            DocumentIdentity::new(&provider, "T"),
            ContentDescriptor::new(&[]),
            "",
        )
        .build();
        assert!(matches!(no_author, Err(MdxError::InvalidInput(_))));

        let reversed = ManifestBuilder::new(
            identity(&provider).with_created(Timestamp::parse("2026-02-01T00:00:00Z").unwrap()),
            ContentDescriptor::new(&[]),
            "",
        )
        .build();
        assert!(matches!(reversed, Err(MdxError::InvalidInput(_))));
    }

    #[test]
    fn rejects_empty_entry_point() {
        let provider = provider();
        let result = ManifestBuilder::new(
            identity(&provider),
            ContentDescriptor::new(&[]).with_entry_point(""),
            "# Hello",
        )
        .build();
        assert!(matches!(result, Err(MdxError::Path(_))));
    }

    #[test]
    fn rejects_duplicate_paths() {
        let provider = provider();
        let result = builder(&provider, "")
            .asset(AssetSource::image("assets/images/a.svg", b"<svg/>".to_vec(), ""))
            .asset(AssetSource::image("assets/images/a.svg", b"<svg></svg>".to_vec(), ""))
            .build();
        assert!(matches!(result, Err(MdxError::DuplicateMember(p)) if p == "assets/images/a.svg"));
    }

    #[test]
    fn model_preview_must_be_an_image_asset() {
        let provider = provider();
        let missing = builder(&provider, "")
            .asset(
                AssetSource::model("assets/models/cube.gltf", b"{}".to_vec(), "2.0")
                    .with_preview("assets/images/cube.svg"),
            )
            .build();
        assert!(matches!(missing, Err(MdxError::MissingReference { .. })));

        let present = builder(&provider, "")
            .asset(AssetSource::image("assets/images/cube.svg", b"<svg/>".to_vec(), "Cube"))
            .asset(
                AssetSource::model("assets/models/cube.gltf", b"{}".to_vec(), "2.0")
                    .with_preview("assets/images/cube.svg"),
            )
            .build()
            .unwrap();
        let model = &present.manifest.assets.models[0];
        assert_eq!(model.meta.mime_type, "model/gltf+json");
        assert_eq!(model.preview.as_ref().unwrap().as_str(), "assets/images/cube.svg");

        let misplaced = builder(&provider, "")
            .asset(
                AssetSource::image("assets/images/a.svg", b"<svg/>".to_vec(), "").with_preview("x"),
            )
            .build();
        assert!(matches!(misplaced, Err(MdxError::InvalidInput(_))));
    }

    #[test]
    fn mime_type_override_and_fallback() {
        let provider = provider();
        let package = builder(&provider, "")
            .asset(
                AssetSource::image("assets/images/poster.svg", b"<svg/>".to_vec(), "")
                    .with_mime_type("image/svg+xml; charset=utf-8"),
            )
            .asset(AssetSource::csv("assets/data/blob.bin", b"1,2".to_vec(), false))
            .build()
            .unwrap();
        assert_eq!(
            package.manifest.assets.images[0].meta.mime_type,
            "image/svg+xml; charset=utf-8"
        );
        assert_eq!(
            package.manifest.assets.data[0].meta.mime_type,
            "application/octet-stream"
        );
    }

    #[test]
    fn styles_are_checksummed_and_theme_must_exist() {
        let provider = provider();
        let package = builder(&provider, "")
            .style("styles/theme.css", "body {}")
            .theme("styles/theme.css")
            .build()
            .unwrap();
        let sheet = &package.manifest.styles.stylesheets[0];
        assert_eq!(sheet.size_bytes, 7);
        assert!(sheet.checksum.verify(b"body {}"));
        assert_eq!(package.manifest.styles.theme.as_ref().unwrap(), &sheet.path);

        let missing_theme = builder(&provider, "").theme("styles/theme.css").build();
        assert!(matches!(missing_theme, Err(MdxError::MissingReference { .. })));

        let outside = builder(&provider, "").style("css/theme.css", "body {}").build();
        assert!(matches!(outside, Err(MdxError::PathPrefix { expected: "styles", .. })));
    }

    #[test]
    fn toc_depth_is_bounded() {
        let provider = provider();
        let result = builder(&provider, "")
            .rendering(RenderingConfig {
                table_of_contents: Some(TocConfig {
                    enabled: true,
                    depth: 9,
                }),
                ..RenderingConfig::default()
            })
            .build();
        assert!(matches!(result, Err(MdxError::InvalidInput(_))));
    }

    #[test]
    fn deterministic_with_fixed_provider() {
        let build = || {
            let provider = provider();
            builder(&provider, "# Hello")
                .asset(AssetSource::image("assets/images/a.svg", b"<svg/>".to_vec(), "A"))
                .style("styles/theme.css", "body {}")
                .build()
                .unwrap()
        };
        let first = build();
        let second = build();
        assert_eq!(first, second);
        assert_eq!(
            first.manifest.to_json().unwrap(),
            second.manifest.to_json().unwrap()
        );
    }

    fn history_with_snapshot(provider: &FixedIdentity) -> VersionHistory {
        VersionHistory::from_entries(vec![VersionEntry::new(
            "1.0.0",
            provider.now_utc(),
            HistoryAuthor {
                name: "A".into(),
                email: None,
            },
            "Initial",
            ArchivePath::new("history/snapshots/v1.0.0.md").unwrap(),
        )])
        .unwrap()
    }

    #[test]
    fn history_requires_matching_snapshots() {
        let provider = provider();
        let ok = builder(&provider, "# Hello")
            .history(history_with_snapshot(&provider))
            .snapshot("history/snapshots/v1.0.0.md", "# Hello")
            .build()
            .unwrap();
        let config = ok.manifest.history.as_ref().unwrap();
        assert!(config.enabled);
        assert_eq!(config.versions_file.as_str(), "history/versions.json");
        assert_eq!(config.snapshots_directory, "history/snapshots");

        let missing = builder(&provider, "")
            .history(history_with_snapshot(&provider))
            .build();
        assert!(matches!(missing, Err(MdxError::MissingReference { .. })));

        let orphan = builder(&provider, "")
            .history(history_with_snapshot(&provider))
            .snapshot("history/snapshots/v1.0.0.md", "")
            .snapshot("history/snapshots/v0.9.0.md", "")
            .build();
        assert!(matches!(orphan, Err(MdxError::UnreferencedMember(_))));

        let stray = builder(&provider, "").snapshot("history/snapshots/v1.md", "").build();
        assert!(matches!(stray, Err(MdxError::InvalidHistory(_))));
    }

    #[test]
    fn annotations_enable_collaboration() {
        let provider = provider();
        let note = Annotation::new(
            &provider,
            Motivation::Commenting,
            "Reviewer",
            ArchivePath::new("document.md").unwrap(),
            "Hello",
            "Nice",
        );
        let package = builder(&provider, "# Hello")
            .annotations(AnnotationSet::new(vec![note.clone()]))
            .build()
            .unwrap();
        let collaboration = package.manifest.collaboration.unwrap();
        assert!(collaboration.allow_annotations);
        assert!(!collaboration.track_changes);

        let disabled = builder(&provider, "# Hello")
            .collaboration(CollaborationConfig {
                allow_annotations: false,
                track_changes: true,
            })
            .annotations(AnnotationSet::new(vec![note]))
            .build();
        assert!(matches!(disabled, Err(MdxError::InvalidAnnotation(_))));
    }

    #[test]
    fn annotation_with_stale_quote_still_builds() {
        let provider = provider();
        let note = Annotation::new(
            &provider,
            Motivation::Highlighting,
            "Reader",
            ArchivePath::new("document.md").unwrap(),
            "no longer here",
            "",
        );
        let result = builder(&provider, "# Hello")
            .annotations(AnnotationSet::new(vec![note]))
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn rejects_non_utf8_content() {
        let provider = provider();
        let result = ManifestBuilder::new(
            identity(&provider),
            ContentDescriptor::new(&[]),
            vec![0xff, 0xfe],
        )
        .build();
        assert!(matches!(result, Err(MdxError::InvalidInput(_))));
    }
}
