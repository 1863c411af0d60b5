//! Plain Markdown cases for alignment parsers.
//!
//! These are written as loose files, not archives.

use crate::FixtureError;
use std::fs;
use std::path::{Path, PathBuf};

macro_rules! case {
    ($name:literal) => {
        ($name, include_str!(concat!("../content/conformance/", $name)))
    };
}

/// File name and contents of every conformance case, README last.
pub const CASES: [(&str, &str); 11] = [
    case!("01-basic-alignment.md"),
    case!("02-headings.md"),
    case!("03-lists.md"),
    case!("04-blockquotes.md"),
    case!("05-directives.md"),
    case!("06-containers.md"),
    case!("07-precedence.md"),
    case!("08-combined-attributes.md"),
    case!("09-malformed.md"),
    case!("10-backward-compat.md"),
    case!("README.md"),
];

/// Writes every case into `dir`, creating it if needed.
pub fn write_all(dir: &Path) -> Result<Vec<PathBuf>, FixtureError> {
    fs::create_dir_all(dir).map_err(|e| FixtureError::io(dir, e))?;

    let mut written = Vec::with_capacity(CASES.len());
    for (name, contents) in CASES {
        let path = dir.join(name);
        fs::write(&path, contents).map_err(|e| FixtureError::io(&path, e))?;
        tracing::debug!(path = %path.display(), "wrote conformance case");
        written.push(path);
    }
    tracing::info!(dir = %dir.display(), files = written.len(), "wrote conformance cases");
    Ok(written)
}
