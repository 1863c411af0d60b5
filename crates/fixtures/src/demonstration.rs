//! The full demonstration document.
//!
//! Exercises everything the format offers at once: all three asset categories, a
//! theme stylesheet, a two-entry version history with snapshots, and annotations.

use crate::shared::{attributes, GLTF_VERSION, WORKING_GROUP, WORKING_GROUP_EMAIL};
use mdx_core::constants::DEFAULT_ENTRY_POINT;
use mdx_core::{
    AlignmentClasses, Annotation, AnnotationSet, AssetSource, Author, AuthorRole, ChangeSummary,
    CollaborationConfig, ContentDescriptor, DocumentIdentity, Extension, HistoryAuthor,
    ManifestBuilder, MdxResult, Motivation, Package, RenderingConfig, TocConfig, VersionEntry,
    VersionHistory,
};
use mdx_types::ArchivePath;
use mdx_uuid::{IdentityProvider, Timestamp};

const DOCUMENT: &str = include_str!("../content/demonstration/document.md");
const STRUCTURE_DIAGRAM: &str = include_str!("../content/demonstration/structure-diagram.svg");
const MODEL_PREVIEW: &str = include_str!("../content/demonstration/model-preview.svg");
const QUARTERLY_RESULTS: &str = include_str!("../content/demonstration/quarterly-results.csv");
const COMPONENT: &str = include_str!("../content/demonstration/component.gltf");
const THEME: &str = include_str!("../content/demonstration/theme.css");

const INITIAL_SNAPSHOT: &str = "# Initial Draft\n\nPlaceholder content.";
/// Clamped to the build time so the history never runs backwards.
const INITIAL_DRAFT_AT: &str = "2026-01-01T10:00:00Z";
const THEME_PATH: &str = "styles/theme.css";

const ASSETS: [&str; 4] = [
    "assets/images/structure-diagram.svg",
    "assets/images/model-preview.svg",
    "assets/data/quarterly-results.csv",
    "assets/models/component.gltf",
];

/// Document body with the footer date filled in.
pub fn content(now: Timestamp) -> String {
    DOCUMENT.replace("{last_updated}", &now.date())
}

pub fn build(provider: &dyn IdentityProvider) -> MdxResult<Package> {
    let now = provider.now_utc();
    let body = content(now);

    let identity = DocumentIdentity::new(provider, "MDX Format Demonstration Document")
        .with_description("A comprehensive demonstration of MDX format capabilities.")
        .with_author(Author::new(WORKING_GROUP, AuthorRole::Author).with_email(WORKING_GROUP_EMAIL))
        .with_author(Author::new("Technical Writer", AuthorRole::Contributor))
        .with_license(
            "CC-BY-4.0",
            Some("https://creativecommons.org/licenses/by/4.0/"),
        );

    let descriptor = ContentDescriptor::new(&[
        Extension::Tables,
        Extension::Footnotes,
        Extension::TaskLists,
        Extension::Math,
        Extension::Strikethrough,
        Extension::Attributes,
        Extension::Alignment,
    ]);

    let rendering = RenderingConfig {
        math_renderer: Some("katex".into()),
        table_of_contents: Some(TocConfig {
            enabled: true,
            depth: 3,
        }),
        attributes: Some(attributes(true)),
    };

    ManifestBuilder::new(identity, descriptor, body.as_str())
        .asset(AssetSource::image(
            ASSETS[0],
            STRUCTURE_DIAGRAM,
            "MDX document structure diagram",
        ))
        .asset(AssetSource::image(ASSETS[1], MODEL_PREVIEW, "3D model preview"))
        .asset(AssetSource::csv(ASSETS[2], QUARTERLY_RESULTS, true))
        .asset(AssetSource::model(ASSETS[3], COMPONENT, GLTF_VERSION).with_preview(ASSETS[1]))
        .style(THEME_PATH, THEME)
        .theme(THEME_PATH)
        .syntax_highlighting("github-dark")
        .alignment_classes(AlignmentClasses::standard())
        .rendering(rendering)
        .collaboration(CollaborationConfig {
            allow_annotations: true,
            track_changes: true,
        })
        .history(history(now)?)
        .snapshot("history/snapshots/v0.1.0.md", INITIAL_SNAPSHOT)
        .snapshot("history/snapshots/v1.0.0.md", body.as_str())
        .annotations(annotations(provider)?)
        .build()
}

fn history(now: Timestamp) -> MdxResult<VersionHistory> {
    let author = HistoryAuthor {
        name: WORKING_GROUP.into(),
        email: Some(WORKING_GROUP_EMAIL.into()),
    };

    let initial = VersionEntry::new(
        "0.1.0",
        Timestamp::parse(INITIAL_DRAFT_AT)?.min(now),
        author.clone(),
        "Initial draft",
        ArchivePath::new("history/snapshots/v0.1.0.md")?,
    )
    .with_changes(ChangeSummary {
        summary: "Initial document creation".into(),
        added: vec![DEFAULT_ENTRY_POINT.into()],
        modified: Vec::new(),
    });

    let added = ASSETS
        .iter()
        .chain(std::iter::once(&THEME_PATH))
        .map(|p| p.to_string())
        .collect();
    let release = VersionEntry::new(
        "1.0.0",
        now,
        author,
        "Release version with complete documentation",
        ArchivePath::new("history/snapshots/v1.0.0.md")?,
    )
    .with_parent("0.1.0")
    .with_changes(ChangeSummary {
        summary: "Added assets, styling, and examples".into(),
        added,
        modified: vec![DEFAULT_ENTRY_POINT.into(), "manifest.json".into()],
    })
    .with_tag("release");

    VersionHistory::from_entries(vec![initial, release])
}

fn annotations(provider: &dyn IdentityProvider) -> MdxResult<AnnotationSet> {
    let source = ArchivePath::new(DEFAULT_ENTRY_POINT)?;
    Ok(AnnotationSet::new(vec![
        Annotation::new(
            provider,
            Motivation::Commenting,
            "Reviewer",
            source.clone(),
            "Radical Openness",
            "This principle is key to the format's success.",
        ),
        Annotation::new(
            provider,
            Motivation::Highlighting,
            "Reader",
            source,
            "self-contained document archive",
            "Key concept!",
        ),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdx_core::AnnotationStatus;
    use mdx_uuid::FixedIdentity;

    fn provider() -> FixedIdentity {
        FixedIdentity::seeded(Timestamp::parse("2026-01-15T09:30:00Z").unwrap(), 1)
    }

    #[test]
    fn footer_date_is_filled_in() {
        let body = content(Timestamp::parse("2026-01-15T09:30:00Z").unwrap());
        assert!(body.contains("2026-01-15"));
        assert!(!body.contains("{last_updated}"));
    }

    #[test]
    fn builds_complete_package() {
        let package = build(&provider()).unwrap();
        let manifest = &package.manifest;

        assert_eq!(manifest.assets.len(), 4);
        assert_eq!(manifest.assets.data[0].rows, 4);
        assert_eq!(manifest.assets.data[0].columns, 5);
        assert_eq!(manifest.styles.theme.as_ref().unwrap().as_str(), "styles/theme.css");
        assert_eq!(manifest.styles.stylesheets.len(), 1);
        assert_eq!(manifest.document.authors.len(), 2);
        assert_eq!(manifest.document.license.as_ref().unwrap().kind, "CC-BY-4.0");
        assert!(manifest.collaboration.unwrap().track_changes);
        assert!(manifest.history.as_ref().unwrap().enabled);
    }

    #[test]
    fn history_links_release_to_draft() {
        let package = build(&provider()).unwrap();
        let history = &package.payloads.history.as_ref().unwrap().record;

        assert_eq!(history.current_version, "1.0.0");
        assert_eq!(history.versions[1].parent_version.as_deref(), Some("0.1.0"));
        assert_eq!(history.versions[1].changes.added.len(), 5);
        assert_eq!(history.versions[1].tags, vec!["release"]);
        assert_eq!(package.payloads.history.as_ref().unwrap().snapshots.len(), 2);
    }

    #[test]
    fn annotations_quote_the_content() {
        let package = build(&provider()).unwrap();
        let set = package.payloads.annotations.as_ref().unwrap();
        let body = String::from_utf8(package.payloads.content.clone()).unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.annotations[0].status, AnnotationStatus::Open);
        assert_eq!(set.annotations[1].status, AnnotationStatus::Active);
        assert!(set.unmatched_quotes("document.md", &body).is_empty());
    }

    #[test]
    fn fixed_provider_is_reproducible() {
        assert_eq!(build(&provider()).unwrap(), build(&provider()).unwrap());
    }

    #[test]
    fn early_clock_still_builds() {
        let early = Timestamp::parse("2020-06-01T00:00:00Z").unwrap();
        let package = build(&FixedIdentity::seeded(early, 1)).unwrap();
        let history = &package.payloads.history.as_ref().unwrap().record;

        assert_eq!(history.versions[0].timestamp, early);
        assert_eq!(history.versions[1].timestamp, early);
    }

    #[test]
    fn draft_keeps_its_date_under_a_later_clock() {
        let package = build(&provider()).unwrap();
        let history = &package.payloads.history.as_ref().unwrap().record;

        assert_eq!(
            history.versions[0].timestamp,
            Timestamp::parse("2026-01-01T10:00:00Z").unwrap()
        );
    }
}
