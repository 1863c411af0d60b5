//! Archive writer configuration.
//!
//! Like the rest of the workspace, configuration is resolved once at startup and passed
//! into the writer; nothing in this crate reads environment variables itself.

use crate::constants::DEFAULT_COMPRESSION_LEVEL;
use crate::{MdxError, MdxResult};

/// Settings applied to every member an [`crate::ArchiveWriter`] emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArchiveConfig {
    compression_level: i64,
}

impl ArchiveConfig {
    /// Create a config with an explicit deflate level.
    pub fn new(compression_level: i64) -> MdxResult<Self> {
        if !(0..=9).contains(&compression_level) {
            return Err(MdxError::InvalidInput(format!(
                "compression level must be between 0 and 9, got {}",
                compression_level
            )));
        }
        Ok(Self { compression_level })
    }

    /// Resolve from an optional raw value such as an environment variable.
    ///
    /// `None` or a blank value yields the default level.
    pub fn from_env_value(raw: Option<&str>) -> MdxResult<Self> {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(Self::default()),
            Some(value) => {
                let level = value.parse::<i64>().map_err(|_| {
                    MdxError::InvalidInput(format!(
                        "compression level must be an integer, got '{}'",
                        value
                    ))
                })?;
                Self::new(level)
            }
        }
    }

    pub fn compression_level(&self) -> i64 {
        self.compression_level
    }

    /// Modification time stamped on every member.
    ///
    /// Fixed at the ZIP epoch (1980-01-01 00:00:00) so identical inputs produce
    /// identical archives.
    pub fn member_time(&self) -> zip::DateTime {
        zip::DateTime::default()
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}
