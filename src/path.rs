//! Path interpolation.
//!
//! Turns a path pattern plus parameter and search values into a concrete
//! path. Pure and idempotent: identical inputs always yield an identical
//! path string.

use thiserror::Error;

use crate::pattern::split_segments;
use crate::screen::Params;

/// An error produced while interpolating a path pattern.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// A `:name` placeholder had no matching parameter value.
    #[error(r#"no value for parameter "{0}""#)]
    MissingParameter(String),
}

/// Query parameters, ordered by first insertion.
///
/// A plain map would lose the order the caller supplied the keys in; the
/// order of the generated query string follows the order keys were first
/// inserted. A value of [`None`] marks the key as absent: it is kept for
/// ordering purposes but never emitted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchParams(Vec<(String, Option<String>)>);

impl SearchParams {
    /// Create an empty set of query parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse query parameters from a query string (without the leading `?`).
    ///
    /// ```rust
    /// # use signpost::prelude::*;
    /// let search = SearchParams::from_query("tab=likes&page=2");
    /// assert_eq!(search.get("tab"), Some("likes"));
    /// assert_eq!(search.get("page"), Some("2"));
    /// ```
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut search = Self::new();
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).unwrap_or_default();
        for (key, value) in pairs {
            search.insert(key, value);
        }
        search
    }

    /// Insert a value for `key`.
    ///
    /// The position of an already present key is kept; only its value is
    /// replaced. Pass [`None`] to mark the key absent.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Option<String>>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Get the value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Iterate over all entries in first-insertion order, absent ones
    /// included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Whether no entry carries a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|(_, v)| v.is_none())
    }
}

/// Parameter and search values for building a concrete path from a pattern.
#[derive(Clone, Debug, Default)]
pub struct PathContext {
    /// Values for the pattern's `:name` placeholders.
    pub params: Params,
    /// Query parameters to append.
    pub search: SearchParams,
}

impl PathContext {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter value.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Add a query parameter.
    #[must_use]
    pub fn with_search(mut self, key: impl Into<String>, value: impl Into<Option<String>>) -> Self {
        self.search.insert(key, value);
        self
    }
}

/// Build a concrete path from `pattern` and `context`.
///
/// Every `:name` placeholder is substituted with the matching parameter
/// value (URL-encoded). A query string is appended, built only from search
/// entries whose value is present, in first-insertion order; when every
/// value is absent no `?` is appended.
///
/// ```rust
/// # use signpost::prelude::*;
/// let context = PathContext::new()
///     .with_param("id", "42")
///     .with_search("tab", String::from("likes"))
///     .with_search("draft", None);
/// let path = interpolate("/users/:id", &context).unwrap();
/// assert_eq!(path, "/users/42?tab=likes");
/// ```
pub fn interpolate(pattern: &str, context: &PathContext) -> Result<String, PathError> {
    let mut path = String::new();

    for segment in split_segments(pattern) {
        path.push('/');
        match segment.strip_prefix(':') {
            Some(name) => {
                let value = context
                    .params
                    .get(name)
                    .ok_or_else(|| PathError::MissingParameter(name.to_string()))?;
                path.push_str(&urlencoding::encode(value));
            }
            None => path.push_str(segment),
        }
    }

    if path.is_empty() {
        path.push('/');
    }

    let pairs: Vec<(&str, &str)> = context
        .search
        .iter()
        .filter_map(|(k, v)| v.map(|v| (k, v)))
        .collect();
    if !pairs.is_empty() {
        if let Ok(query) = serde_urlencoded::to_string(&pairs) {
            path.push('?');
            path.push_str(&query);
        }
    }

    Ok(path)
}
