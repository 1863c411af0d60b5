//! A realistic technical manual using alignment throughout.

use crate::shared::attributes;
use mdx_core::{
    AlignmentClasses, AssetSource, Author, AuthorRole, ContentDescriptor, DocumentIdentity,
    Extension, ManifestBuilder, MdxResult, Package, RenderingConfig, TocConfig,
};
use mdx_uuid::IdentityProvider;

const DOCUMENT: &str = include_str!("../content/technical-doc/document.md");
const ARCHITECTURE: &str = include_str!("../content/technical-doc/architecture.svg");
const WORKFLOW: &str = include_str!("../content/technical-doc/workflow.svg");
const API_PERFORMANCE: &str = include_str!("../content/technical-doc/api-performance.csv");
const THEME: &str = include_str!("../content/technical-doc/theme.css");

pub fn build(provider: &dyn IdentityProvider) -> MdxResult<Package> {
    let identity = DocumentIdentity::new(
        provider,
        "MDX Document Management System - Technical Documentation",
    )
    .with_subtitle("API Reference and Architecture Guide")
    .with_description("Complete technical documentation for the MDX DMS platform")
    .with_author(
        Author::new("Engineering Team", AuthorRole::Author).with_email("engineering@example.com"),
    )
    .with_author(Author::new("Technical Writer", AuthorRole::Editor))
    .with_version("2.1.0")
    .with_keywords(["api", "documentation", "technical", "mdx", "architecture"]);

    let descriptor = ContentDescriptor::new(&[
        Extension::Tables,
        Extension::Footnotes,
        Extension::TaskLists,
        Extension::Attributes,
        Extension::Alignment,
    ]);

    ManifestBuilder::new(identity, descriptor, DOCUMENT)
        .asset(AssetSource::image(
            "assets/images/architecture.svg",
            ARCHITECTURE,
            "System architecture diagram",
        ))
        .asset(AssetSource::image(
            "assets/images/workflow.svg",
            WORKFLOW,
            "Document processing workflow",
        ))
        .asset(AssetSource::csv("assets/data/api-performance.csv", API_PERFORMANCE, true))
        .style("styles/theme.css", THEME)
        .theme("styles/theme.css")
        .syntax_highlighting("github-dark")
        .alignment_classes(AlignmentClasses::standard())
        .rendering(RenderingConfig {
            table_of_contents: Some(TocConfig {
                enabled: true,
                depth: 3,
            }),
            attributes: Some(attributes(false)),
            ..RenderingConfig::default()
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdx_uuid::{FixedIdentity, Timestamp};

    #[test]
    fn records_manual_metadata() {
        let provider = FixedIdentity::seeded(Timestamp::parse("2026-01-15T09:30:00Z").unwrap(), 4);
        let package = build(&provider).unwrap();
        let document = &package.manifest.document;

        assert_eq!(document.version, "2.1.0");
        assert_eq!(document.subtitle.as_deref(), Some("API Reference and Architecture Guide"));
        assert_eq!(document.keywords.len(), 5);
        assert_eq!(document.authors[1].role, AuthorRole::Editor);

        let data = &package.manifest.assets.data[0];
        assert_eq!((data.rows, data.columns), (6, 5));
        assert!(package.manifest.assets.models.is_empty());
        assert_eq!(package.payloads.styles.len(), 1);
    }
}
