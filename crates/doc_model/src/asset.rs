//! Asset references
//!
//! Blocks and backgrounds never embed image bytes; they point into a flat
//! namespace of pre-made assets by file-name-like reference.

use serde::{Deserialize, Serialize};

/// Reference to a visual asset (e.g. `"standardcover.png"`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRef(String);

impl AssetRef {
    /// Create a new asset reference. A leading `/` is stripped so that
    /// `"/glitter.png"` and `"glitter.png"` name the same asset.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        match name.strip_prefix('/') {
            Some(stripped) => Self(stripped.to_string()),
            None => Self(name),
        }
    }

    /// Get the string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive substring test against the asset name
    pub fn contains_ignore_case(&self, needle: &str) -> bool {
        self.0.to_lowercase().contains(&needle.to_lowercase())
    }
}

impl std::fmt::Display for AssetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AssetRef {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for AssetRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_slash_is_normalized() {
        assert_eq!(AssetRef::new("/glitter.png"), AssetRef::new("glitter.png"));
    }

    #[test]
    fn test_contains_ignore_case() {
        let asset = AssetRef::new("MarHeader.svg");
        assert!(asset.contains_ignore_case("header"));
        assert!(!asset.contains_ignore_case("cover"));
    }
}
