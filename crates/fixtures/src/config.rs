//! Fixture generation configuration.
//!
//! Resolved once at startup. [`FixtureConfig::from_env`] is the only place the
//! orchestrator looks at environment variables; [`crate::generate_all`] never does.

use crate::FixtureError;
use mdx_core::ArchiveConfig;
use std::path::{Path, PathBuf};

/// Environment variable naming the archive output directory.
pub const OUTPUT_DIR_ENV: &str = "MDX_OUTPUT_DIR";
/// Environment variable naming the conformance file directory.
pub const CONFORMANCE_DIR_ENV: &str = "MDX_CONFORMANCE_DIR";
/// Environment variable naming where to extract the demonstration archive.
pub const EXTRACT_DIR_ENV: &str = "MDX_EXTRACT_DIR";
/// Environment variable holding the deflate level.
pub const COMPRESSION_LEVEL_ENV: &str = "MDX_COMPRESSION_LEVEL";

pub const DEFAULT_OUTPUT_DIR: &str = "generated/examples";
pub const DEFAULT_CONFORMANCE_DIR: &str = "generated/tests/alignment";

#[derive(Clone, Debug)]
pub struct FixtureConfig {
    output_dir: PathBuf,
    conformance_dir: PathBuf,
    extract_dir: Option<PathBuf>,
    archive: ArchiveConfig,
}

impl FixtureConfig {
    pub fn new(
        output_dir: PathBuf,
        conformance_dir: PathBuf,
        extract_dir: Option<PathBuf>,
        archive: ArchiveConfig,
    ) -> Result<Self, FixtureError> {
        if output_dir.as_os_str().is_empty() || conformance_dir.as_os_str().is_empty() {
            return Err(FixtureError::InvalidConfig(
                "output and conformance directories cannot be empty".into(),
            ));
        }
        Ok(Self {
            output_dir,
            conformance_dir,
            extract_dir,
            archive,
        })
    }

    /// Reads `MDX_OUTPUT_DIR`, `MDX_CONFORMANCE_DIR`, `MDX_EXTRACT_DIR` and
    /// `MDX_COMPRESSION_LEVEL`, falling back to defaults for unset or blank values.
    pub fn from_env() -> Result<Self, FixtureError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`FixtureConfig::from_env`] with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, FixtureError> {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let output_dir = non_blank(OUTPUT_DIR_ENV).unwrap_or_else(|| DEFAULT_OUTPUT_DIR.into());
        let conformance_dir =
            non_blank(CONFORMANCE_DIR_ENV).unwrap_or_else(|| DEFAULT_CONFORMANCE_DIR.into());
        let extract_dir = non_blank(EXTRACT_DIR_ENV).map(PathBuf::from);
        let archive = ArchiveConfig::from_env_value(lookup(COMPRESSION_LEVEL_ENV).as_deref())?;

        Self::new(
            PathBuf::from(output_dir),
            PathBuf::from(conformance_dir),
            extract_dir,
            archive,
        )
    }

    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = dir;
        self
    }

    pub fn with_conformance_dir(mut self, dir: PathBuf) -> Self {
        self.conformance_dir = dir;
        self
    }

    pub fn with_extract_dir(mut self, dir: PathBuf) -> Self {
        self.extract_dir = Some(dir);
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn conformance_dir(&self) -> &Path {
        &self.conformance_dir
    }

    pub fn extract_dir(&self) -> Option<&Path> {
        self.extract_dir.as_deref()
    }

    pub fn archive(&self) -> &ArchiveConfig {
        &self.archive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = FixtureConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.output_dir(), Path::new("generated/examples"));
        assert_eq!(config.conformance_dir(), Path::new("generated/tests/alignment"));
        assert!(config.extract_dir().is_none());
        assert_eq!(config.archive().compression_level(), 6);
    }

    #[test]
    fn reads_overrides() {
        let config = FixtureConfig::from_lookup(lookup(&[
            ("MDX_OUTPUT_DIR", "out"),
            ("MDX_CONFORMANCE_DIR", "conf"),
            ("MDX_EXTRACT_DIR", "extracted"),
            ("MDX_COMPRESSION_LEVEL", "9"),
        ]))
        .unwrap();
        assert_eq!(config.output_dir(), Path::new("out"));
        assert_eq!(config.conformance_dir(), Path::new("conf"));
        assert_eq!(config.extract_dir(), Some(Path::new("extracted")));
        assert_eq!(config.archive().compression_level(), 9);
    }

    #[test]
    fn blank_values_fall_back() {
        let config =
            FixtureConfig::from_lookup(lookup(&[("MDX_OUTPUT_DIR", "  "), ("MDX_EXTRACT_DIR", "")]))
                .unwrap();
        assert_eq!(config.output_dir(), Path::new("generated/examples"));
        assert!(config.extract_dir().is_none());
    }

    #[test]
    fn rejects_bad_compression_level() {
        let result = FixtureConfig::from_lookup(lookup(&[("MDX_COMPRESSION_LEVEL", "11")]));
        assert!(matches!(result, Err(FixtureError::Mdx(_))));
    }

    #[test]
    fn builder_overrides() {
        let config = FixtureConfig::from_lookup(lookup(&[]))
            .unwrap()
            .with_output_dir(PathBuf::from("a"))
            .with_conformance_dir(PathBuf::from("b"))
            .with_extract_dir(PathBuf::from("c"));
        assert_eq!(config.output_dir(), Path::new("a"));
        assert_eq!(config.conformance_dir(), Path::new("b"));
        assert_eq!(config.extract_dir(), Some(Path::new("c")));
    }
}
