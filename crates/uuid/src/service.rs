//! Internal implementation of document identifiers and timestamps.

use crate::{UuidError, UuidResult};
use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use std::{fmt, str::FromStr};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// `strftime` layout shared by every timestamp in an MDX archive.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A document identifier in canonical form (lowercase, hyphenated UUIDv4).
///
/// Once constructed the identifier is immutable and always displays in canonical form.
///
/// # Construction
/// - [`DocumentId::new`] generates a fresh random identifier.
/// - [`DocumentId::parse`] validates an externally supplied identifier.
/// - [`DocumentId::from_uuid`] wraps an existing v4 UUID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DocumentId(pub(crate) Uuid);

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentId {
    /// Generates a new random identifier (RFC 4122 version 4).
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `uuid` is not a version 4 UUID.
    pub fn from_uuid(uuid: Uuid) -> UuidResult<Self> {
        Self::parse(&uuid.hyphenated().to_string())
    }

    /// Validates and parses an identifier that must already be in canonical form.
    ///
    /// This does **not** normalise other common UUID forms (for example, simple or
    /// uppercase). Callers must provide the canonical representation.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not in canonical form.
    pub fn parse(input: &str) -> UuidResult<Self> {
        if !Self::is_canonical(input) {
            return Err(UuidError::InvalidInput(format!(
                "document id must be a lowercase hyphenated UUIDv4, got: '{}'",
                input
            )));
        }
        let uuid = Uuid::parse_str(input).map_err(|e| {
            UuidError::InvalidInput(format!("document id '{}' is not a UUID: {}", input, e))
        })?;
        Ok(Self(uuid))
    }

    /// Returns the underlying `uuid::Uuid`.
    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// Returns true if `input` is a lowercase hyphenated UUIDv4.
    ///
    /// This is a purely syntactic check:
    /// - exactly 36 bytes, hyphens at offsets 8, 13, 18 and 23
    /// - every other byte is `0-9` or `a-f`
    /// - version nibble (offset 14) is `4`
    /// - variant nibble (offset 19) is one of `8`, `9`, `a`, `b`
    pub fn is_canonical(input: &str) -> bool {
        let bytes = input.as_bytes();
        if bytes.len() != 36 {
            return false;
        }
        let layout_ok = bytes.iter().enumerate().all(|(i, b)| match i {
            8 | 13 | 18 | 23 => *b == b'-',
            _ => matches!(b, b'0'..=b'9' | b'a'..=b'f'),
        });
        layout_ok && bytes[14] == b'4' && matches!(bytes[19], b'8' | b'9' | b'a' | b'b')
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for DocumentId {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentId::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for DocumentId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for DocumentId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        DocumentId::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// A UTC instant with whole-second precision.
///
/// Sub-second components are dropped at construction, so two timestamps that display
/// identically always compare equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current wall-clock time, truncated to seconds.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(datetime.trunc_subsecs(0))
    }

    /// Parses the fixed `YYYY-MM-DDTHH:MM:SSZ` layout.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] for any other layout, including fractional
    /// seconds and numeric offsets.
    pub fn parse(input: &str) -> UuidResult<Self> {
        if input.len() != 20 || !input.ends_with('Z') {
            return Err(UuidError::InvalidInput(format!(
                "timestamp must use YYYY-MM-DDTHH:MM:SSZ, got: '{}'",
                input
            )));
        }
        let naive = NaiveDateTime::parse_from_str(input, TIMESTAMP_FORMAT).map_err(|e| {
            UuidError::InvalidInput(format!("Invalid timestamp '{}': {}", input, e))
        })?;
        Ok(Self(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc)))
    }

    pub fn datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Calendar date part, `YYYY-MM-DD`.
    pub fn date(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

impl FromStr for Timestamp {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timestamp::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Timestamp {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Timestamp {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Timestamp::parse(&s).map_err(serde::de::Error::custom)
    }
}
