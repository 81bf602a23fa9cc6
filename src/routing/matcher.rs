//! Path pattern matching.
//!
//! # Responsibilities
//! - Parse route patterns (`/`, `/bucket`, `/a/:x`)
//! - Match a request path segment by segment
//! - Capture `:name` segments as parameters
//!
//! # Design Decisions
//! - Matching is case-sensitive
//! - A trailing `/` is insignificant, except for the root pattern
//! - A parameter captures exactly one non-empty segment, percent-decoded
//!   (a segment that does not decode to UTF-8 is kept as sent)
//! - No regex and no wildcards: O(segments) per pattern

use std::collections::BTreeMap;

use percent_encoding::percent_decode_str;

use crate::routing::error::ConfigurationError;

/// Parameters captured from `:name` segments.
pub type Params = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
}

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse a pattern, normalizing away a trailing `/`.
    pub fn parse(pattern: &str) -> Result<Self, ConfigurationError> {
        let invalid = |reason| ConfigurationError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        };

        if !pattern.starts_with('/') {
            return Err(invalid("must start with `/`"));
        }

        let raw = normalize(pattern);
        let mut segments = Vec::new();
        let mut seen_params: Vec<&str> = Vec::new();

        for part in split_segments(raw) {
            if part.is_empty() {
                return Err(invalid("empty path segment"));
            }
            match part.strip_prefix(':') {
                Some("") => return Err(invalid("empty parameter name")),
                Some(name) => {
                    if seen_params.contains(&name) {
                        return Err(invalid("repeated parameter name"));
                    }
                    seen_params.push(name);
                    segments.push(Segment::Param(name.to_string()));
                }
                None => segments.push(Segment::Static(part.to_string())),
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The normalized pattern text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether the pattern captures any parameters.
    pub fn is_static(&self) -> bool {
        self.segments.iter().all(|s| matches!(s, Segment::Static(_)))
    }

    /// Match a normalized request path. Returns captured parameters on success.
    pub fn matches(&self, path: &str) -> Option<Params> {
        let mut params = Params::new();
        let mut parts = split_segments(normalize(path));

        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Static(expected) if expected == part => {}
                Segment::Static(_) => return None,
                Segment::Param(_) if part.is_empty() => return None,
                Segment::Param(name) => {
                    let value = percent_decode_str(part)
                        .decode_utf8()
                        .map_or_else(|_| part.to_string(), |v| v.into_owned());
                    params.insert(name.clone(), value);
                }
            }
        }

        if parts.next().is_some() {
            return None;
        }
        Some(params)
    }
}

/// Strip a trailing `/` unless the path is the root.
pub(crate) fn normalize(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    // The root has no segments; "/a/b" has two.
    let rest = path.strip_prefix('/').unwrap_or(path);
    (!rest.is_empty()).then(|| rest.split('/')).into_iter().flatten()
}
