//! Input validation utilities.
//!
//! Checks applied to caller-supplied metadata before it is recorded in a manifest.

use crate::constants::{
    ANNOTATIONS_DIR, ASSETS_DIR, HISTORY_DIR, MANIFEST_FILENAME, MAX_TOC_DEPTH, STYLES_DIR,
};
use crate::{MdxError, MdxResult};
use mdx_types::ArchivePath;

/// Returns true for `MAJOR.MINOR.PATCH` with an optional `-prerelease` suffix.
///
/// Numeric components may not carry leading zeros.
pub fn is_semver(value: &str) -> bool {
    let (core, pre) = match value.split_once('-') {
        Some((core, pre)) => (core, Some(pre)),
        None => (value, None),
    };

    let parts: Vec<&str> = core.split('.').collect();
    let core_ok = parts.len() == 3
        && parts.iter().all(|p| {
            !p.is_empty()
                && p.bytes().all(|b| b.is_ascii_digit())
                && !(p.len() > 1 && p.starts_with('0'))
        });

    let pre_ok = pre.is_none_or(|pre| {
        !pre.is_empty()
            && pre.split('.').all(|id| {
                !id.is_empty() && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
            })
    });

    core_ok && pre_ok
}

/// Validates a semantic version, naming `field` in the error.
pub fn validate_semver(field: &str, value: &str) -> MdxResult<()> {
    if is_semver(value) {
        Ok(())
    } else {
        Err(MdxError::InvalidInput(format!(
            "{} must be a semantic version (MAJOR.MINOR.PATCH), got '{}'",
            field, value
        )))
    }
}

/// Validates a BCP 47 style language tag such as `en` or `en-US`.
pub fn validate_language_tag(value: &str) -> MdxResult<()> {
    let mut subtags = value.split('-');
    let primary_ok = subtags
        .next()
        .is_some_and(|p| (2..=3).contains(&p.len()) && p.bytes().all(|b| b.is_ascii_alphabetic()));
    let rest_ok =
        subtags.all(|s| (1..=8).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_alphanumeric()));

    if primary_ok && rest_ok {
        Ok(())
    } else {
        Err(MdxError::InvalidInput(format!(
            "language must be a language tag like 'en-US', got '{}'",
            value
        )))
    }
}

/// Minimal address shape check: one `@` with text on both sides.
pub fn validate_email(value: &str) -> MdxResult<()> {
    match value.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
        {
            Ok(())
        }
        _ => Err(MdxError::InvalidInput(format!(
            "invalid email address: '{}'",
            value
        ))),
    }
}

pub fn validate_toc_depth(depth: u8) -> MdxResult<()> {
    if (1..=MAX_TOC_DEPTH).contains(&depth) {
        Ok(())
    } else {
        Err(MdxError::InvalidInput(format!(
            "table of contents depth must be between 1 and {}, got {}",
            MAX_TOC_DEPTH, depth
        )))
    }
}

/// Requires `path` to lie beneath `dir`.
pub fn validate_under(path: &ArchivePath, dir: &'static str) -> MdxResult<()> {
    if path.is_under(dir) {
        Ok(())
    } else {
        Err(MdxError::PathPrefix {
            path: path.to_string(),
            expected: dir,
        })
    }
}

/// Validates the Markdown entry point.
///
/// The entry point may not shadow the manifest or sit inside a directory reserved for
/// assets, styles, history or annotations, and must end in `.md` or `.markdown`.
pub fn validate_entry_point(raw: &str) -> MdxResult<ArchivePath> {
    let path = ArchivePath::new(raw)?;
    let reserved = [ASSETS_DIR, STYLES_DIR, HISTORY_DIR, ANNOTATIONS_DIR];
    if path.as_str() == MANIFEST_FILENAME || reserved.iter().any(|dir| path.is_under(dir)) {
        return Err(MdxError::InvalidInput(format!(
            "entry point '{}' collides with a reserved archive location",
            path
        )));
    }
    if !matches!(path.extension().as_deref(), Some("md" | "markdown")) {
        return Err(MdxError::InvalidInput(format!(
            "entry point '{}' is not a Markdown file",
            path
        )));
    }
    Ok(path)
}
