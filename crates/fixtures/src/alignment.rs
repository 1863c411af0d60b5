//! The three alignment samples.

use crate::shared::{alignment_content, alignment_identity, attributes_only, GLTF_VERSION};
use mdx_core::{AlignmentClasses, AssetSource, ManifestBuilder, MdxResult, Package};
use mdx_uuid::IdentityProvider;

const BASIC: &str = include_str!("../content/alignment-basic/document.md");
const DIRECTIVES: &str = include_str!("../content/alignment-directives/document.md");
const COMPLEX: &str = include_str!("../content/alignment-complex/document.md");

const VIDEO_POSTER: &str = include_str!("../content/alignment-directives/video-poster.svg");
const MODEL_PREVIEW: &str = include_str!("../content/alignment-directives/model-preview.svg");
const CHART_PREVIEW: &str = include_str!("../content/alignment-directives/chart-preview.svg");
const SALES: &str = include_str!("../content/alignment-directives/sales.csv");
const OBJECT: &str = include_str!("../content/alignment-directives/object.gltf");

/// Left, center, right and justify on plain blocks. No assets.
pub fn basic(provider: &dyn IdentityProvider) -> MdxResult<Package> {
    ManifestBuilder::new(
        alignment_identity(
            provider,
            "Alignment Basics",
            "Demonstrates basic alignment features in MDX v1.1",
        ),
        alignment_content(),
        BASIC,
    )
    .alignment_classes(AlignmentClasses::standard())
    .rendering(attributes_only(false))
    .build()
}

/// Alignment applied to media directives, with one asset of every category.
pub fn directives(provider: &dyn IdentityProvider) -> MdxResult<Package> {
    ManifestBuilder::new(
        alignment_identity(
            provider,
            "Alignment with Directives",
            "Demonstrates alignment integration with MDX media directives",
        ),
        alignment_content(),
        DIRECTIVES,
    )
    .asset(AssetSource::image(
        "assets/images/video-poster.svg",
        VIDEO_POSTER,
        "Video placeholder",
    ))
    .asset(AssetSource::image(
        "assets/images/model-preview.svg",
        MODEL_PREVIEW,
        "3D model preview",
    ))
    .asset(AssetSource::image(
        "assets/images/chart-preview.svg",
        CHART_PREVIEW,
        "Chart visualization",
    ))
    .asset(AssetSource::csv("assets/data/sales.csv", SALES, true))
    .asset(
        AssetSource::model("assets/models/object.gltf", OBJECT, GLTF_VERSION)
            .with_preview("assets/images/model-preview.svg"),
    )
    .alignment_classes(AlignmentClasses::standard())
    .rendering(attributes_only(true))
    .build()
}

/// Nested containers and precedence between inline, block and container alignment.
pub fn complex(provider: &dyn IdentityProvider) -> MdxResult<Package> {
    ManifestBuilder::new(
        alignment_identity(
            provider,
            "Complex Alignment Patterns",
            "Advanced alignment examples with nesting and precedence",
        ),
        alignment_content(),
        COMPLEX,
    )
    .alignment_classes(AlignmentClasses::standard())
    .rendering(attributes_only(true))
    .build()
}
