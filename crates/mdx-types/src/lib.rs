//! Validated primitive types shared across the MDX crates.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// Errors that can occur when validating an archive member path.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PathError {
    #[error("Archive path cannot be empty")]
    Empty,
    #[error("Archive path must be relative: '{0}'")]
    Absolute(String),
    #[error("Archive path must use '/' separators: '{0}'")]
    Backslash(String),
    #[error("Archive path contains an empty, '.' or '..' segment: '{0}'")]
    InvalidSegment(String),
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A path naming a member inside an MDX archive.
///
/// Archive paths are always relative and `/`-separated, e.g. `assets/images/diagram.svg`.
/// Construction rejects anything that could resolve outside the archive root when
/// extracted: absolute paths, backslashes, and empty, `.` or `..` segments.
///
/// Unlike [`NonEmptyText`], the input is not trimmed; surrounding whitespace is kept
/// verbatim because it is significant in a member name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArchivePath(String);

impl ArchivePath {
    /// Validates `input` as an archive member path.
    ///
    /// # Errors
    ///
    /// Returns a [`PathError`] describing the first rule the input breaks.
    pub fn new(input: impl AsRef<str>) -> Result<Self, PathError> {
        let input = input.as_ref();
        if input.is_empty() {
            return Err(PathError::Empty);
        }
        if input.starts_with('/') {
            return Err(PathError::Absolute(input.to_owned()));
        }
        if input.contains('\\') {
            return Err(PathError::Backslash(input.to_owned()));
        }
        if input
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return Err(PathError::InvalidSegment(input.to_owned()));
        }
        Ok(Self(input.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this path lies strictly beneath the directory `dir`.
    ///
    /// `dir` is given without a trailing slash, e.g. `assets/images`.
    pub fn is_under(&self, dir: &str) -> bool {
        let dir = dir.trim_end_matches('/');
        self.0.len() > dir.len() + 1
            && self.0.starts_with(dir)
            && self.0.as_bytes()[dir.len()] == b'/'
    }

    /// Final path segment.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Lowercased extension of the final segment, if it has one.
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name();
        match name.rfind('.') {
            Some(idx) if idx > 0 && idx + 1 < name.len() => {
                Some(name[idx + 1..].to_ascii_lowercase())
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for ArchivePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ArchivePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for ArchivePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArchivePath::new(s)
    }
}

impl serde::Serialize for ArchivePath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for ArchivePath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ArchivePath::new(&s).map_err(serde::de::Error::custom)
    }
}
