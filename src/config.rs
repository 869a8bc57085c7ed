//! Configuration for find queries.

use serde::{Deserialize, Serialize};

/// Options consumed by the query compiler.
///
/// Missing fields fall back to their defaults when deserialized, so a UI can
/// send `{"entire_word": true}` alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FindOptions {
    /// Match letter case exactly.
    pub case_sensitive: bool,

    /// Only accept hits that are not glued to other word characters.
    pub entire_word: bool,
}

impl FindOptions {
    /// Create options with defaults (case-insensitive, substring matching).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set case sensitivity.
    pub fn with_case_sensitive(mut self, value: bool) -> Self {
        self.case_sensitive = value;
        self
    }

    /// Match whole words only.
    pub fn with_entire_word(mut self, value: bool) -> Self {
        self.entire_word = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_options_default() {
        let opts = FindOptions::default();
        assert!(!opts.case_sensitive);
        assert!(!opts.entire_word);
    }

    #[test]
    fn test_find_options_builder() {
        let opts = FindOptions::new()
            .with_case_sensitive(true)
            .with_entire_word(true);
        assert!(opts.case_sensitive);
        assert!(opts.entire_word);
    }

    #[test]
    fn test_find_options_partial_json() {
        let opts: FindOptions = serde_json::from_str(r#"{"entire_word": true}"#).unwrap();
        assert!(!opts.case_sensitive);
        assert!(opts.entire_word);

        let opts: FindOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, FindOptions::default());
    }
}
