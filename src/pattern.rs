//! The boundary to the path-pattern compiler.
//!
//! The router only needs two things from a compiled pattern: whether a path
//! matches it, and the parameter values a matching path carries. Both sit
//! behind [`PathPattern`] so a host can plug in its own compiler via
//! [`PatternCompiler`]. The built-in [`SegmentCompiler`] understands fixed
//! segments and `:name` parameters, which covers the patterns the router
//! itself generates paths for.

use tracing::error;

use crate::screen::Params;

/// A compiled path pattern.
pub trait PathPattern {
    /// Whether `path` matches this pattern.
    #[must_use]
    fn test(&self, path: &str) -> bool;

    /// Extract the parameter values from a matching `path`, or [`None`] if it
    /// does not match.
    fn extract(&self, path: &str) -> Option<Params>;
}

/// Compiles path pattern strings into matchers.
pub trait PatternCompiler {
    /// Compile `pattern` into a matcher and parameter extractor.
    fn compile(&self, pattern: &str) -> Box<dyn PathPattern>;
}

/// Split a path into its segments, ignoring leading, trailing and doubled
/// slashes.
pub(crate) fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.trim_matches('/').split('/').filter(|s| !s.is_empty())
}

enum Piece {
    Fixed(String),
    Parameter(String),
}

/// A pattern made of fixed and `:name` parameter segments.
pub struct SegmentPattern {
    pieces: Vec<Piece>,
}

impl SegmentPattern {
    /// Parse `pattern` into its pieces.
    #[must_use]
    pub fn parse(pattern: &str) -> Self {
        let pieces = split_segments(pattern)
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) => Piece::Parameter(name.to_string()),
                None => Piece::Fixed(segment.to_string()),
            })
            .collect();
        Self { pieces }
    }
}

impl PathPattern for SegmentPattern {
    fn test(&self, path: &str) -> bool {
        self.extract(path).is_some()
    }

    fn extract(&self, path: &str) -> Option<Params> {
        let segments: Vec<&str> = split_segments(path).collect();
        if segments.len() != self.pieces.len() {
            return None;
        }

        let mut params = Params::new();
        for (piece, value) in self.pieces.iter().zip(segments) {
            let value = decode(value);
            match piece {
                Piece::Fixed(expected) => {
                    if value != *expected {
                        return None;
                    }
                }
                Piece::Parameter(key) => {
                    params.insert(key.clone(), value);
                }
            }
        }
        Some(params)
    }
}

fn decode(segment: &str) -> String {
    match urlencoding::decode(segment) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => {
            error!(r#"failed to decode path segment: "{segment}""#);
            segment.to_string()
        }
    }
}

/// The built-in [`PatternCompiler`] producing [`SegmentPattern`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct SegmentCompiler;

impl PatternCompiler for SegmentCompiler {
    fn compile(&self, pattern: &str) -> Box<dyn PathPattern> {
        Box::new(SegmentPattern::parse(pattern))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_segments() {
        let pattern = SegmentPattern::parse("/about/team");

        assert!(pattern.test("/about/team"));
        assert!(pattern.test("/about/team/"));
        assert!(!pattern.test("/about"));
        assert!(!pattern.test("/about/team/lead"));
    }

    #[test]
    fn parameter_segments() {
        let pattern = SegmentPattern::parse("/users/:id");

        let params = pattern.extract("/users/42").unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("42"));
        assert!(pattern.extract("/users").is_none());
    }

    #[test]
    fn parameter_values_are_decoded() {
        let pattern = SegmentPattern::parse("/tags/:name");

        let params = pattern.extract("/tags/a%20b").unwrap();
        assert_eq!(params.get("name").map(String::as_str), Some("a b"));
    }

    #[test]
    fn root_pattern() {
        let pattern = SegmentPattern::parse("/");

        assert!(pattern.test("/"));
        assert!(!pattern.test("/users"));
    }
}
