//! Common types used throughout odm-fetch
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// The flattened `properties` of one provider item
pub type Record = JsonObject;

// ============================================================================
// Resource Kind
// ============================================================================

/// The two query targets exposed by the ODM API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// `/odm-people`
    People,
    /// `/odm-organizations`
    Organizations,
}

impl ResourceKind {
    /// Name used in URLs and messages
    pub fn as_str(self) -> &'static str {
        match self {
            Self::People => "people",
            Self::Organizations => "organizations",
        }
    }

    /// Endpoint path relative to the API base URL
    pub fn path(self) -> &'static str {
        match self {
            Self::People => "odm-people",
            Self::Organizations => "odm-organizations",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "people" => Ok(Self::People),
            "organizations" | "orgs" => Ok(Self::Organizations),
            other => Err(format!("unknown resource kind: {other}")),
        }
    }
}

// ============================================================================
// Query
// ============================================================================

/// Name of the query parameter carrying the page number
pub const PAGE_PARAM: &str = "page";

/// Query parameters for one logical fetch
///
/// Values are stringified on insert; the provider receives them as URL
/// parameters. Keys are unique and iterate in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query {
    params: BTreeMap<String, String>,
}

impl Query {
    /// Create an empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a parameter
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    /// Add or replace a parameter in place
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        self.params.insert(key.into(), value.to_string());
    }

    /// Get a parameter value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Copy of this query with `page` overlaid
    ///
    /// An explicit `page` already present is overridden.
    #[must_use]
    pub fn with_page(&self, page: u32) -> Self {
        self.clone().with(PAGE_PARAM, page)
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether the query has no parameters
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterate over `(key, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Self::new();
        for (key, value) in iter {
            query.set(key, value);
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_kind_paths() {
        assert_eq!(ResourceKind::People.path(), "odm-people");
        assert_eq!(ResourceKind::Organizations.path(), "odm-organizations");
        assert_eq!(ResourceKind::Organizations.to_string(), "organizations");
    }

    #[test]
    fn test_resource_kind_from_str() {
        assert_eq!("People".parse::<ResourceKind>(), Ok(ResourceKind::People));
        assert_eq!(
            "orgs".parse::<ResourceKind>(),
            Ok(ResourceKind::Organizations)
        );
        assert!("companies".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_query_stringifies_values() {
        let query = Query::new().with("name", "Steve").with("updated_since", 1_500_000_000);
        assert_eq!(query.get("name"), Some("Steve"));
        assert_eq!(query.get("updated_since"), Some("1500000000"));
        assert_eq!(query.len(), 2);
    }

    #[test]
    fn test_with_page_overrides_and_leaves_base_untouched() {
        let base = Query::new().with("name", "Data").with("page", 9);
        let paged = base.with_page(3);

        assert_eq!(paged.get("page"), Some("3"));
        assert_eq!(paged.get("name"), Some("Data"));
        assert_eq!(base.get("page"), Some("9"));
    }

    #[test]
    fn test_query_from_iter() {
        let query: Query = vec![("a", "1"), ("b", "2")].into_iter().collect();
        let pairs: Vec<_> = query.iter().collect();
        assert_eq!(pairs, vec![("a", "1"), ("b", "2")]);
    }
}
