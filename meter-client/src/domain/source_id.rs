use std::fmt;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceIdError {
    #[error("source id must not be empty")]
    Empty,
    #[error("source id '{0}' contains characters other than ASCII letters, digits, '-' or '_'")]
    InvalidCharacters(String),
}

/// Opaque identifier of one meter's data feed.
///
/// The identifier ends up in a file name and a URL path segment, so only
/// ASCII alphanumerics, `-` and `_` are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(try_from = "String"))]
pub struct SourceId(String);

impl SourceId {
    pub fn new(raw: impl Into<String>) -> Result<Self, SourceIdError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(SourceIdError::Empty);
        }
        if !raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(SourceIdError::InvalidCharacters(raw));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the local file holding this source's readings.
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.0)
    }

    /// Short display label: the last `suffix_len` characters of the id.
    pub fn label(&self, suffix_len: usize) -> &str {
        let start = self.0.len().saturating_sub(suffix_len);
        &self.0[start..]
    }
}

impl TryFrom<String> for SourceId {
    type Error = SourceIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
