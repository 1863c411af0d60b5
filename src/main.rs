use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mdx_fixtures::{FixtureConfig, generate_all};
use mdx_uuid::SystemIdentity;

/// Main entry point for the MDX fixture generator
///
/// Writes every example archive and the alignment conformance cases, using the
/// system clock and random document identifiers.
///
/// # Environment Variables
/// - `MDX_OUTPUT_DIR`: directory for example archives (default: "generated/examples")
/// - `MDX_CONFORMANCE_DIR`: directory for conformance cases (default: "generated/tests/alignment")
/// - `MDX_EXTRACT_DIR`: when set, the demonstration archive is also unpacked here
/// - `MDX_COMPRESSION_LEVEL`: deflate level 0-9 (default: 6)
///
/// # Returns
/// * `Ok(())` - If every fixture was written
/// * `Err(anyhow::Error)` - If configuration, building or writing fails
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("mdx=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = FixtureConfig::from_env()?;
    tracing::info!(
        output_dir = %config.output_dir().display(),
        conformance_dir = %config.conformance_dir().display(),
        compression_level = config.archive().compression_level(),
        "generating fixtures"
    );

    let report = generate_all(&config, &SystemIdentity)?;

    for archive in &report.archives {
        tracing::info!(
            path = %archive.path.display(),
            members = archive.members,
            bytes = archive.bytes,
            "created archive"
        );
    }
    if let Some(dir) = config.extract_dir() {
        tracing::info!(
            dir = %dir.display(),
            files = report.extracted_files.len(),
            "extracted demonstration"
        );
    }
    tracing::info!(
        archives = report.archives.len(),
        conformance_files = report.conformance_files.len(),
        "fixture generation complete"
    );

    Ok(())
}
