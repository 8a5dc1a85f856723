//! Server-side filter sets.
//!
//! A `FilterSet` is an ordered `key -> value` map forwarded verbatim to the
//! remote collection as query parameters. Validation happens here, before a
//! request is ever built.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};

/// Longest accepted filter value, in characters.
pub const MAX_FILTER_VALUE_LEN: usize = 256;

/// Keys that collide with the windowing parameters.
const RESERVED_KEYS: &[&str] = &["skip", "limit"];

static FILTER_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_.-]*$").expect("filter key regex should be valid")
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet(BTreeMap<String, String>);

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert; does not validate.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert a validated key/value pair, returning the previous value.
    pub fn insert(&mut self, key: &str, value: &str) -> Result<Option<String>> {
        validate_key(key)?;
        validate_value(key, value)?;
        Ok(self.0.insert(key.to_string(), value.to_string()))
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Check every pair. Called before any fetch is attempted.
    pub fn validate(&self) -> Result<()> {
        for (key, value) in &self.0 {
            validate_key(key)?;
            validate_value(key, value)?;
        }
        Ok(())
    }
}

fn validate_key(key: &str) -> Result<()> {
    if !FILTER_KEY_RE.is_match(key) {
        return Err(FolioError::validation(
            format!("filter key '{key}'"),
            "must start with a letter and contain only letters, digits, '_', '.' or '-'",
        ));
    }
    if RESERVED_KEYS.contains(&key) {
        return Err(FolioError::validation(
            format!("filter key '{key}'"),
            "is reserved for pagination",
        ));
    }
    Ok(())
}

fn validate_value(key: &str, value: &str) -> Result<()> {
    if value.chars().count() > MAX_FILTER_VALUE_LEN {
        return Err(FolioError::validation(
            format!("filter value for '{key}'"),
            format!("must be at most {MAX_FILTER_VALUE_LEN} characters"),
        ));
    }
    if value.chars().any(char::is_control) {
        return Err(FolioError::validation(
            format!("filter value for '{key}'"),
            "must not contain control characters",
        ));
    }
    Ok(())
}

impl fmt::Display for FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self.iter().map(|(k, v)| format!("{k}={v}")).collect();
        write!(f, "{}", pairs.join(","))
    }
}

/// Parse a single `key=value` pair, as given on the command line.
pub fn parse_filter_pair(s: &str) -> Result<(String, String)> {
    let (key, value) = s.split_once('=').ok_or_else(|| {
        FolioError::validation(format!("filter '{s}'"), "expected format: key=value")
    })?;
    let key = key.trim();
    validate_key(key)?;
    validate_value(key, value)?;
    Ok((key.to_string(), value.to_string()))
}

impl FromStr for FilterSet {
    type Err = FolioError;

    /// Parse a comma-separated list of `key=value` pairs.
    fn from_str(s: &str) -> Result<Self> {
        let mut filters = FilterSet::new();
        for pair in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = parse_filter_pair(pair)?;
            filters.0.insert(key, value);
        }
        Ok(filters)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FilterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_valid_pair() {
        let mut filters = FilterSet::new();
        assert_eq!(filters.insert("reviewer_id", "42").unwrap(), None);
        assert_eq!(filters.get("reviewer_id"), Some("42"));
    }

    #[test]
    fn test_invalid_keys_rejected() {
        let mut filters = FilterSet::new();
        assert!(filters.insert("", "x").is_err());
        assert!(filters.insert("1abc", "x").is_err());
        assert!(filters.insert("has space", "x").is_err());
        assert!(filters.insert("skip", "10").is_err());
        assert!(filters.insert("limit", "10").is_err());
        assert!(filters.is_empty());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut filters = FilterSet::new();
        assert!(filters.insert("status", "bad\nvalue").is_err());
        let long = "x".repeat(MAX_FILTER_VALUE_LEN + 1);
        assert!(filters.insert("status", &long).is_err());
        let exact = "x".repeat(MAX_FILTER_VALUE_LEN);
        assert!(filters.insert("status", &exact).is_ok());
    }

    #[test]
    fn test_validate_catches_unchecked_builder_input() {
        let filters = FilterSet::new().with("ok", "1").with("not ok", "2");
        assert!(matches!(
            filters.validate(),
            Err(FolioError::Validation { .. })
        ));
    }

    #[test]
    fn test_from_str_parses_pairs() {
        let filters: FilterSet = "status=pending, journal_id=7".parse().unwrap();
        assert_eq!(filters.len(), 2);
        assert_eq!(filters.get("status"), Some("pending"));
        assert_eq!(filters.get("journal_id"), Some("7"));
        assert_eq!(filters.to_string(), "journal_id=7,status=pending");
    }

    #[test]
    fn test_from_str_rejects_missing_equals() {
        assert!("status".parse::<FilterSet>().is_err());
    }

    #[test]
    fn test_value_may_contain_equals() {
        let (key, value) = parse_filter_pair("q=a=b").unwrap();
        assert_eq!(key, "q");
        assert_eq!(value, "a=b");
    }
}
