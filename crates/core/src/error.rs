use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MdxError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid document identity: {0}")]
    Identity(#[from] mdx_uuid::UuidError),
    #[error("invalid archive path: {0}")]
    Path(#[from] mdx_types::PathError),
    #[error("'{path}' must live under {expected}/")]
    PathPrefix { path: String, expected: &'static str },
    #[error("{field} references '{path}', which is not part of the document")]
    MissingReference { field: String, path: String },
    #[error("duplicate archive member: {0}")]
    DuplicateMember(String),
    #[error("invalid version history: {0}")]
    InvalidHistory(String),
    #[error("invalid annotations: {0}")]
    InvalidAnnotation(String),
    #[error("archive member missing: {0}")]
    MissingMember(String),
    #[error("archive member '{0}' is not referenced by the manifest")]
    UnreferencedMember(String),
    #[error("integrity mismatch for '{path}': {detail}")]
    IntegrityMismatch { path: String, detail: String },
    #[error("unsafe member name in archive: {0}")]
    UnsafeMemberName(String),
    #[error("failed to serialize {what}: {source}")]
    Serialization {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to parse {what}: {source}")]
    Deserialization {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("payload metadata error: {0}")]
    Payload(#[from] mdx_files::FilesError),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type MdxResult<T> = std::result::Result<T, MdxError>;

impl MdxError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MdxError::Io {
            path: path.into(),
            source,
        }
    }
}
