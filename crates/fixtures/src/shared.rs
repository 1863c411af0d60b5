//! Pieces shared by several fixture documents.

use mdx_core::{
    AttributesConfig, Author, AuthorRole, ContentDescriptor, DocumentIdentity, Extension,
    RenderingConfig,
};
use mdx_uuid::IdentityProvider;

pub(crate) const WORKING_GROUP: &str = "MDX Working Group";
pub(crate) const WORKING_GROUP_EMAIL: &str = "mdx@example.org";
pub(crate) const GLTF_VERSION: &str = "2.0";

/// Identity of an alignment sample: working group author, version 1.0.0.
pub(crate) fn alignment_identity(
    provider: &dyn IdentityProvider,
    title: &str,
    description: &str,
) -> DocumentIdentity {
    DocumentIdentity::new(provider, title)
        .with_description(description)
        .with_author(Author::new(WORKING_GROUP, AuthorRole::Author))
}

pub(crate) fn alignment_content() -> ContentDescriptor {
    ContentDescriptor::new(&[Extension::Tables, Extension::Attributes, Extension::Alignment])
}

/// Attribute support on, with or without inline `style` attributes.
pub(crate) fn attributes(allow_inline_styles: bool) -> AttributesConfig {
    AttributesConfig {
        enabled: true,
        allow_inline_styles,
    }
}

pub(crate) fn attributes_only(allow_inline_styles: bool) -> RenderingConfig {
    RenderingConfig {
        attributes: Some(attributes(allow_inline_styles)),
        ..RenderingConfig::default()
    }
}
