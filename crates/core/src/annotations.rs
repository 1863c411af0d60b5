//! W3C Web Annotation records stored in `annotations/annotations.json`.
//!
//! Annotations anchor to content by quoting it, not by offset. A quote that no longer
//! occurs in the content is reported but does not invalidate the record.

use crate::constants::{ANNOTATION_CONTEXT, ANNOTATION_ID_PREFIX, RECORD_SCHEMA_VERSION};
use crate::{MdxError, MdxResult};
use mdx_types::ArchivePath;
use mdx_uuid::{DocumentId, IdentityProvider, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationSet {
    pub schema_version: String,
    #[serde(rename = "@context")]
    pub context: String,
    pub annotations: Vec<Annotation>,
}

impl AnnotationSet {
    pub fn new(annotations: Vec<Annotation>) -> Self {
        Self {
            schema_version: RECORD_SCHEMA_VERSION.to_owned(),
            context: ANNOTATION_CONTEXT.to_owned(),
            annotations,
        }
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Checks ids, quotes and targets.
    ///
    /// `is_member` decides whether a target source names a member of the archive.
    pub fn validate(&self, is_member: impl Fn(&str) -> bool) -> MdxResult<()> {
        let mut ids = HashSet::new();
        for annotation in &self.annotations {
            let uuid = annotation
                .id
                .strip_prefix(ANNOTATION_ID_PREFIX)
                .ok_or_else(|| {
                    MdxError::InvalidAnnotation(format!(
                        "id '{}' must start with '{}'",
                        annotation.id, ANNOTATION_ID_PREFIX
                    ))
                })?;
            DocumentId::parse(uuid)?;

            if !ids.insert(annotation.id.as_str()) {
                return Err(MdxError::InvalidAnnotation(format!(
                    "duplicate annotation id '{}'",
                    annotation.id
                )));
            }
            if annotation.target.selector.exact.trim().is_empty() {
                return Err(MdxError::InvalidAnnotation(format!(
                    "annotation '{}' quotes no text",
                    annotation.id
                )));
            }
            if !is_member(annotation.target.source.as_str()) {
                return Err(MdxError::MissingReference {
                    field: format!("annotation {}", annotation.id),
                    path: annotation.target.source.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Annotations on `source` whose quote does not occur in `content`.
    pub fn unmatched_quotes<'a>(&'a self, source: &str, content: &str) -> Vec<&'a Annotation> {
        self.annotations
            .iter()
            .filter(|a| a.target.source.as_str() == source)
            .filter(|a| !content.contains(a.target.selector.exact.as_str()))
            .collect()
    }

    pub fn to_json(&self) -> MdxResult<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|source| MdxError::Serialization {
            what: "annotations",
            source,
        })
    }

    pub fn from_json(bytes: &[u8]) -> MdxResult<Self> {
        serde_json::from_slice(bytes).map_err(|source| MdxError::Deserialization {
            what: "annotations",
            source,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub motivation: Motivation,
    pub created: Timestamp,
    pub creator: Creator,
    pub target: Target,
    pub body: Body,
    #[serde(rename = "mdx:status")]
    pub status: AnnotationStatus,
}

impl Annotation {
    /// Creates an annotation quoting `exact` from `source`.
    ///
    /// Comments start `open`; highlights start `active`.
    pub fn new(
        provider: &dyn IdentityProvider,
        motivation: Motivation,
        creator: impl Into<String>,
        source: ArchivePath,
        exact: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        let status = match motivation {
            Motivation::Commenting => AnnotationStatus::Open,
            Motivation::Highlighting => AnnotationStatus::Active,
        };
        Self {
            id: format!("{}{}", ANNOTATION_ID_PREFIX, provider.new_document_id()),
            kind: "Annotation".to_owned(),
            motivation,
            created: provider.now_utc(),
            creator: Creator {
                kind: "Person".to_owned(),
                name: creator.into(),
            },
            target: Target {
                source,
                selector: TextQuoteSelector {
                    kind: "TextQuoteSelector".to_owned(),
                    exact: exact.into(),
                },
            },
            body: Body {
                kind: "TextualBody".to_owned(),
                value: body.into(),
                format: "text/plain".to_owned(),
            },
            status,
        }
    }

    pub fn with_status(mut self, status: AnnotationStatus) -> Self {
        self.status = status;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Motivation {
    Commenting,
    Highlighting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationStatus {
    Open,
    Active,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub source: ArchivePath,
    pub selector: TextQuoteSelector,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextQuoteSelector {
    #[serde(rename = "type")]
    pub kind: String,
    pub exact: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    pub format: String,
}
