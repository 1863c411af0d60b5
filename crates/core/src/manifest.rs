//! The MDX manifest record.
//!
//! A [`Manifest`] is the typed form of `manifest.json`. It is produced by
//! [`crate::ManifestBuilder`], serialized once by [`crate::ArchiveWriter`], and parsed
//! back by [`crate::MdxArchive`]. Field order in these structs is the key order in the
//! emitted JSON.

use crate::constants::{DATA_DIR, IMAGES_DIR, MODELS_DIR};
use crate::{MdxError, MdxResult};
use mdx_files::Checksum;
use mdx_types::{ArchivePath, NonEmptyText};
use mdx_uuid::{DocumentId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub mdx_version: String,
    pub document: DocumentInfo,
    pub content: ContentDescriptor,
    #[serde(default)]
    pub assets: AssetInventory,
    #[serde(default)]
    pub styles: StyleConfig,
    #[serde(default)]
    pub rendering: RenderingConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collaboration: Option<CollaborationConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<HistoryConfig>,
}

impl Manifest {
    /// Serializes to pretty-printed JSON bytes.
    pub fn to_json(&self) -> MdxResult<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|source| MdxError::Serialization {
            what: "manifest",
            source,
        })
    }

    pub fn from_json(bytes: &[u8]) -> MdxResult<Self> {
        serde_json::from_slice(bytes).map_err(|source| MdxError::Deserialization {
            what: "manifest",
            source,
        })
    }

    /// Every archive path the manifest points at, paired with the field that names it.
    ///
    /// A path may appear more than once, e.g. an image that is also a model preview.
    pub fn referenced_paths(&self) -> Vec<(String, &str)> {
        let mut refs = vec![("content.entry_point".to_owned(), self.content.entry_point.as_str())];

        for (category, meta) in self.assets.records() {
            refs.push((format!("assets.{}", category.name()), meta.path.as_str()));
        }
        for model in &self.assets.models {
            if let Some(preview) = &model.preview {
                refs.push(("assets.models.preview".to_owned(), preview.as_str()));
            }
        }
        if let Some(theme) = &self.styles.theme {
            refs.push(("styles.theme".to_owned(), theme.as_str()));
        }
        for sheet in &self.styles.stylesheets {
            refs.push(("styles.stylesheets".to_owned(), sheet.path.as_str()));
        }
        if let Some(history) = &self.history {
            if history.enabled {
                refs.push(("history.versions_file".to_owned(), history.versions_file.as_str()));
            }
        }
        refs
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub id: DocumentId,
    pub title: NonEmptyText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub authors: Vec<Author>,
    pub created: Timestamp,
    pub modified: Timestamp,
    pub version: String,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: AuthorRole,
}

impl Author {
    pub fn new(name: impl Into<String>, role: AuthorRole) -> Self {
        Self {
            name: name.into(),
            email: None,
            role,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorRole {
    Author,
    Contributor,
    Editor,
    Reviewer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Where the Markdown body lives and how to read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDescriptor {
    pub entry_point: String,
    pub encoding: String,
    pub markdown_variant: String,
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl ContentDescriptor {
    /// `document.md`, UTF-8 CommonMark, with the given extensions enabled.
    pub fn new(extensions: &[Extension]) -> Self {
        Self {
            entry_point: crate::constants::DEFAULT_ENTRY_POINT.to_owned(),
            encoding: crate::constants::CONTENT_ENCODING.to_owned(),
            markdown_variant: crate::constants::MARKDOWN_VARIANT.to_owned(),
            extensions: extensions.iter().map(|e| e.as_str().to_owned()).collect(),
        }
    }

    pub fn with_entry_point(mut self, entry_point: impl Into<String>) -> Self {
        self.entry_point = entry_point.into();
        self
    }
}

/// Markdown extensions a document may enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extension {
    Tables,
    Footnotes,
    TaskLists,
    Math,
    Strikethrough,
    Attributes,
    Alignment,
}

impl Extension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Extension::Tables => "tables",
            Extension::Footnotes => "footnotes",
            Extension::TaskLists => "task-lists",
            Extension::Math => "math",
            Extension::Strikethrough => "strikethrough",
            Extension::Attributes => "attributes",
            Extension::Alignment => "alignment",
        }
    }
}

/// The three asset groupings of a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetCategory {
    Images,
    Data,
    Models,
}

impl AssetCategory {
    pub fn name(&self) -> &'static str {
        match self {
            AssetCategory::Images => "images",
            AssetCategory::Data => "data",
            AssetCategory::Models => "models",
        }
    }

    /// Directory every asset of this category must live under.
    pub fn dir(&self) -> &'static str {
        match self {
            AssetCategory::Images => IMAGES_DIR,
            AssetCategory::Data => DATA_DIR,
            AssetCategory::Models => MODELS_DIR,
        }
    }
}

/// Asset records grouped by category.
///
/// All three arrays are always serialized, even when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetInventory {
    #[serde(default)]
    pub images: Vec<ImageAsset>,
    #[serde(default)]
    pub data: Vec<DataAsset>,
    #[serde(default)]
    pub models: Vec<ModelAsset>,
}

impl AssetInventory {
    /// Common metadata of every record, images first, then data, then models.
    pub fn records(&self) -> impl Iterator<Item = (AssetCategory, &AssetMeta)> {
        self.images
            .iter()
            .map(|a| (AssetCategory::Images, &a.meta))
            .chain(self.data.iter().map(|a| (AssetCategory::Data, &a.meta)))
            .chain(self.models.iter().map(|a| (AssetCategory::Models, &a.meta)))
    }

    pub fn find(&self, path: &str) -> Option<&AssetMeta> {
        self.records()
            .map(|(_, meta)| meta)
            .find(|meta| meta.path.as_str() == path)
    }

    pub fn len(&self) -> usize {
        self.images.len() + self.data.len() + self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fields shared by every asset record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMeta {
    pub path: ArchivePath,
    pub mime_type: String,
    pub size_bytes: u64,
    pub checksum: Checksum,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    #[serde(flatten)]
    pub meta: AssetMeta,
    pub alt_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataAsset {
    #[serde(flatten)]
    pub meta: AssetMeta,
    pub rows: u64,
    pub columns: u64,
    pub has_header: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelAsset {
    #[serde(flatten)]
    pub meta: AssetMeta,
    pub format_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<ArchivePath>,
}

/// Row and column counts of a tabular data asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabularShape {
    pub rows: u64,
    pub columns: u64,
    pub has_header: bool,
}

impl TabularShape {
    /// Counts non-blank lines and the comma-separated fields of the first one.
    ///
    /// `rows` excludes the header line when `has_header` is set. Quoted commas are not
    /// special-cased; fixture data never contains them.
    pub fn from_csv(bytes: &[u8], has_header: bool) -> Self {
        let text = String::from_utf8_lossy(bytes);
        let mut lines = text.lines().filter(|line| !line.trim().is_empty());
        let columns = lines
            .next()
            .map(|first| first.split(',').count() as u64)
            .unwrap_or(0);
        let total = if columns == 0 { 0 } else { 1 + lines.count() as u64 };
        let rows = if has_header { total.saturating_sub(1) } else { total };
        Self {
            rows,
            columns,
            has_header,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ArchivePath>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syntax_highlighting: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub alignment_classes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stylesheets: Vec<StyleRecord>,
}

/// Integrity entry for a stylesheet member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRecord {
    pub path: ArchivePath,
    pub size_bytes: u64,
    pub checksum: Checksum,
}

/// CSS class declarations for the alignment extension.
pub struct AlignmentClasses;

impl AlignmentClasses {
    pub fn standard() -> BTreeMap<String, String> {
        [
            ("align-left", "text-align: left;"),
            ("align-center", "text-align: center;"),
            ("align-right", "text-align: right;"),
            ("align-justify", "text-align: justify;"),
        ]
        .into_iter()
        .map(|(class, css)| (class.to_owned(), css.to_owned()))
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub math_renderer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_of_contents: Option<TocConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<AttributesConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocConfig {
    pub enabled: bool,
    pub depth: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributesConfig {
    pub enabled: bool,
    pub allow_inline_styles: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaborationConfig {
    pub allow_annotations: bool,
    pub track_changes: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub enabled: bool,
    pub versions_file: ArchivePath,
    pub snapshots_directory: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_meta(path: &str, bytes: &[u8]) -> AssetMeta {
        AssetMeta {
            path: ArchivePath::new(path).unwrap(),
            mime_type: "image/svg+xml".into(),
            size_bytes: bytes.len() as u64,
            checksum: Checksum::compute(bytes),
        }
    }

    #[test]
    fn image_asset_flattens_common_fields() {
        let image = ImageAsset {
            meta: sample_meta("assets/images/a.svg", b"<svg/>"),
            alt_text: "A".into(),
        };
        let value = serde_json::to_value(&image).unwrap();

        assert_eq!(value["path"], "assets/images/a.svg");
        assert_eq!(value["size_bytes"], 6);
        assert_eq!(
            value["checksum"],
            "sha256:d4dc56669143034f31aa309635d4113d9ad76a02b1739da22c965ed2049be9e6"
        );
        assert_eq!(value["alt_text"], "A");

        let back: ImageAsset = serde_json::from_value(value).unwrap();
        assert_eq!(back, image);
    }

    #[test]
    fn empty_inventory_serializes_all_categories() {
        let value = serde_json::to_value(AssetInventory::default()).unwrap();
        assert_eq!(value["images"], serde_json::json!([]));
        assert_eq!(value["data"], serde_json::json!([]));
        assert_eq!(value["models"], serde_json::json!([]));
    }

    #[test]
    fn inventory_records_walk_categories_in_order() {
        let inventory = AssetInventory {
            images: vec![ImageAsset {
                meta: sample_meta("assets/images/a.svg", b"a"),
                alt_text: String::new(),
            }],
            data: vec![DataAsset {
                meta: sample_meta("assets/data/b.csv", b"b"),
                rows: 0,
                columns: 1,
                has_header: false,
            }],
            models: vec![ModelAsset {
                meta: sample_meta("assets/models/c.gltf", b"c"),
                format_version: "2.0".into(),
                preview: None,
            }],
        };

        let categories: Vec<AssetCategory> = inventory.records().map(|(c, _)| c).collect();
        assert_eq!(
            categories,
            vec![AssetCategory::Images, AssetCategory::Data, AssetCategory::Models]
        );
        assert_eq!(inventory.len(), 3);
        assert!(inventory.find("assets/data/b.csv").is_some());
        assert!(inventory.find("assets/data/missing.csv").is_none());
    }

    #[test]
    fn tabular_shape_from_csv() {
        let csv = b"Quarter,Revenue,Expenses\nQ1,1,2\nQ2,3,4\n\n";
        let shape = TabularShape::from_csv(csv, true);
        assert_eq!(shape.rows, 2);
        assert_eq!(shape.columns, 3);
        assert!(shape.has_header);

        let headless = TabularShape::from_csv(b"1,2\n3,4", false);
        assert_eq!(headless.rows, 2);

        let empty = TabularShape::from_csv(b"", true);
        assert_eq!((empty.rows, empty.columns), (0, 0));
    }

    #[test]
    fn extension_names_are_kebab_case() {
        let content = ContentDescriptor::new(&[Extension::TaskLists, Extension::Alignment]);
        assert_eq!(content.extensions, vec!["task-lists", "alignment"]);
        assert_eq!(content.entry_point, "document.md");
        assert_eq!(content.encoding, "UTF-8");
        assert_eq!(content.markdown_variant, "CommonMark");
    }

    #[test]
    fn standard_alignment_classes() {
        let classes = AlignmentClasses::standard();
        assert_eq!(classes.len(), 4);
        assert_eq!(classes["align-center"], "text-align: center;");
    }

    #[test]
    fn author_role_serializes_lowercase() {
        let author = Author::new("Technical Writer", AuthorRole::Editor);
        let json = serde_json::to_string(&author).unwrap();
        assert_eq!(json, r#"{"name":"Technical Writer","role":"editor"}"#);
    }
}
