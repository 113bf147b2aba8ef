//! Keyword-based budget category classification.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use crate::error::ConfigError;

/// Ordered mapping of category name to keywords.
///
/// Keywords match case-insensitively as substrings. Categories are tried in
/// insertion order, so an earlier category wins when several match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryMap {
    categories: IndexMap<String, Vec<String>>,
}

impl CategoryMap {
    /// Create an empty mapping under which nothing is classified.
    pub fn empty() -> Self {
        Self {
            categories: IndexMap::new(),
        }
    }

    /// Append a category. Re-inserting an existing name replaces its keywords
    /// but keeps its original precedence.
    pub fn with_category<I, S>(mut self, name: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories
            .insert(name.into(), keywords.into_iter().map(Into::into).collect());
        self
    }

    /// Parse a mapping from a JSON object of `{category: [keywords]}`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a mapping from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a mapping from `path`, falling back to the built-in defaults.
    ///
    /// A missing or malformed file is reported once at warning level and never
    /// aborts parsing.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match Self::from_file(path) {
            Ok(map) => {
                debug!("Loaded {} categories from {}", map.len(), path.display());
                map
            }
            Err(e) => {
                warn!("Error loading category config: {}; using default category mappings", e);
                Self::default()
            }
        }
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the mapping has no categories.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Categories with their keywords, in precedence order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.categories
            .iter()
            .map(|(name, keywords)| (name.as_str(), keywords.as_slice()))
    }

    /// Every non-empty keyword across all categories, flattened in precedence order.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.categories
            .values()
            .flatten()
            .map(String::as_str)
            .filter(|k| !k.is_empty())
    }

    /// Return the first category with a keyword contained in `text`.
    pub fn classify(&self, text: &str) -> Option<&str> {
        let text_lower = text.to_lowercase();

        self.categories
            .iter()
            .find(|(_, keywords)| {
                keywords
                    .iter()
                    .filter(|k| !k.is_empty())
                    .any(|k| text_lower.contains(&k.to_lowercase()))
            })
            .map(|(name, _)| name.as_str())
    }
}

impl Default for CategoryMap {
    /// Built-in mapping for common US payslip deductions.
    fn default() -> Self {
        Self::empty()
            .with_category("Health Savings Account", ["hsa"])
            .with_category("Legal", ["legal"])
            .with_category("Retirement", ["401(k)", "401k", "roth"])
            .with_category("Insurance:Medical", ["medical"])
            .with_category("Insurance:Dental", ["dental"])
            .with_category("Insurance:Vision", ["vision"])
            .with_category("Insurance:Supplemental", [" life"])
            .with_category("Taxes:Stock Award Withholding", ["stock offset"])
            .with_category("Taxes:Withholding", ["withholding"])
            .with_category("Taxes:Social Security", ["social security"])
            .with_category("Taxes:Medicare", ["medicare"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classify_case_insensitive() {
        let map = CategoryMap::default();
        assert_eq!(map.classify("MEDICAL"), Some("Insurance:Medical"));
        assert_eq!(map.classify("Roth 401(k)"), Some("Retirement"));
        assert_eq!(map.classify("Fed Withholding"), Some("Taxes:Withholding"));
        assert_eq!(map.classify("Regular Pay"), None);
    }

    #[test]
    fn test_first_category_wins() {
        let map = CategoryMap::empty()
            .with_category("Insurance:Medical", ["medical"])
            .with_category("Insurance:Dental", ["dental"]);

        assert_eq!(map.classify("Dental Medical Combo"), Some("Insurance:Medical"));

        let reversed = CategoryMap::empty()
            .with_category("Insurance:Dental", ["dental"])
            .with_category("Insurance:Medical", ["medical"]);

        assert_eq!(reversed.classify("Dental Medical Combo"), Some("Insurance:Dental"));
    }

    #[test]
    fn test_empty_map_classifies_nothing() {
        let map = CategoryMap::empty();
        assert_eq!(map.classify("Medical"), None);
        assert_eq!(map.keywords().count(), 0);
    }

    #[test]
    fn test_empty_keyword_never_matches() {
        let map = CategoryMap::empty().with_category("Everything", [""]);
        assert_eq!(map.classify("Medical"), None);
        assert_eq!(map.keywords().count(), 0);
    }

    #[test]
    fn test_leading_space_keyword() {
        let map = CategoryMap::default();
        assert_eq!(map.classify("Group Term Life"), Some("Insurance:Supplemental"));
        assert_eq!(map.classify("Lifestyle Stipend"), None);
    }

    #[test]
    fn test_json_preserves_order() {
        let map = CategoryMap::from_json(
            r#"{"Zeta": ["shared"], "Alpha": ["shared", "alpha"]}"#,
        )
        .unwrap();

        let names: Vec<&str> = map.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
        assert_eq!(map.classify("shared item"), Some("Zeta"));
        assert_eq!(map.keywords().collect::<Vec<_>>(), vec!["shared", "shared", "alpha"]);
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let dir = tempfile::tempdir().unwrap();

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{not json").unwrap();
        assert_eq!(CategoryMap::load_or_default(Some(&bad)), CategoryMap::default());

        let wrong_shape = dir.path().join("shape.json");
        std::fs::write(&wrong_shape, r#"{"Legal": "legal"}"#).unwrap();
        assert_eq!(CategoryMap::load_or_default(Some(&wrong_shape)), CategoryMap::default());

        let missing = dir.path().join("missing.json");
        assert_eq!(CategoryMap::load_or_default(Some(&missing)), CategoryMap::default());

        assert_eq!(CategoryMap::load_or_default(None), CategoryMap::default());
    }

    #[test]
    fn test_load_custom_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("categories.json");
        std::fs::write(&path, r#"{"Union": ["union dues"]}"#).unwrap();

        let map = CategoryMap::load_or_default(Some(&path));
        assert_eq!(map.len(), 1);
        assert_eq!(map.classify("Union Dues"), Some("Union"));
        assert_eq!(map.classify("Medical"), None);
    }
}
