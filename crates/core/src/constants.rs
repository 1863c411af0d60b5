//! Constants used throughout the MDX core crate.
//!
//! Archive member names and directory prefixes live here so that the builder, the
//! writer and the reader agree on the container layout.

/// MDX format version written into every manifest.
pub const MDX_VERSION: &str = "1.1.0";

/// Name of the manifest member. Always the first member of an archive.
pub const MANIFEST_FILENAME: &str = "manifest.json";

/// Default Markdown entry point.
pub const DEFAULT_ENTRY_POINT: &str = "document.md";

/// Only content encoding the format supports.
pub const CONTENT_ENCODING: &str = "UTF-8";

/// Markdown dialect the content is written in.
pub const MARKDOWN_VARIANT: &str = "CommonMark";

/// Directory for image assets.
pub const IMAGES_DIR: &str = "assets/images";

/// Directory for tabular data assets.
pub const DATA_DIR: &str = "assets/data";

/// Directory for 3D model assets.
pub const MODELS_DIR: &str = "assets/models";

/// Parent of every asset directory.
pub const ASSETS_DIR: &str = "assets";

/// Directory for stylesheets.
pub const STYLES_DIR: &str = "styles";

/// Parent directory for version history.
pub const HISTORY_DIR: &str = "history";

/// Version history record.
pub const VERSIONS_FILENAME: &str = "history/versions.json";

/// Directory holding full-content snapshots.
pub const SNAPSHOTS_DIR: &str = "history/snapshots";

/// Parent directory for annotations.
pub const ANNOTATIONS_DIR: &str = "annotations";

/// Annotation record.
pub const ANNOTATIONS_FILENAME: &str = "annotations/annotations.json";

/// JSON-LD context for W3C Web Annotation records.
pub const ANNOTATION_CONTEXT: &str = "http://www.w3.org/ns/anno.jsonld";

/// Prefix of every annotation identifier.
pub const ANNOTATION_ID_PREFIX: &str = "urn:mdx:annotation:";

/// Schema version of the history and annotation records.
pub const RECORD_SCHEMA_VERSION: &str = "1.0.0";

/// Fallback media type when neither caller nor detection supplies one.
pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// Deepest heading level a table of contents may include.
pub const MAX_TOC_DEPTH: u8 = 6;

/// Default deflate level for archive members.
pub const DEFAULT_COMPRESSION_LEVEL: i64 = 6;
