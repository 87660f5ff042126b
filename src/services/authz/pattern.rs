//! Path patterns for the access-rule table.
//!
//! Grammar (segments separated by `/`):
//! - `name` matches that segment literally
//! - `*` matches exactly one segment
//! - `**` matches the remainder of the path, including nothing; only allowed last
//!
//! Empty segments are ignored on both sides, so `/api/rooms/` and
//! `/api//rooms` both behave like `/api/rooms`. Request paths have their `.`
//! and `..` segments (plain or percent-encoded) resolved before matching, so
//! `/api/rooms/../dashboard` is judged as `/api/dashboard`.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("pattern must start with '/': {0}")]
    NotAbsolute(String),
    #[error("'**' is only allowed as the last segment: {0}")]
    InnerMultiWildcard(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Any,
    Rest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        if !pattern.starts_with('/') {
            return Err(PatternError::NotAbsolute(pattern.to_string()));
        }

        let raw: Vec<&str> = split(pattern).collect();
        let mut segments = Vec::with_capacity(raw.len());
        for (i, seg) in raw.iter().enumerate() {
            let seg = match *seg {
                "**" if i + 1 == raw.len() => Segment::Rest,
                "**" => return Err(PatternError::InnerMultiWildcard(pattern.to_string())),
                "*" => Segment::Any,
                lit => Segment::Literal(lit.to_string()),
            };
            segments.push(seg);
        }

        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, path: &str) -> bool {
        self.matches_segments(&normalized_segments(path))
    }

    /// Match against a path already split by [`normalized_segments`].
    pub fn matches_segments(&self, path: &[&str]) -> bool {
        let mut path = path.iter().copied();
        for seg in &self.segments {
            match seg {
                Segment::Rest => return true,
                Segment::Any => {
                    if path.next().is_none() {
                        return false;
                    }
                }
                Segment::Literal(lit) => {
                    if path.next() != Some(lit.as_str()) {
                        return false;
                    }
                }
            }
        }
        path.next().is_none()
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dot {
    Current,
    Parent,
}

fn dot_segment(seg: &str) -> Option<Dot> {
    match seg.to_ascii_lowercase().replace("%2e", ".").as_str() {
        "." => Some(Dot::Current),
        ".." => Some(Dot::Parent),
        _ => None,
    }
}

/// Request path as segments, with `.` dropped and `..` removing its parent.
/// `..` above the root is discarded.
pub fn normalized_segments(path: &str) -> Vec<&str> {
    let mut out = Vec::new();
    for seg in split(path) {
        match dot_segment(seg) {
            Some(Dot::Current) => {}
            Some(Dot::Parent) => {
                out.pop();
            }
            None => out.push(seg),
        }
    }
    out
}

/// `true` if any segment is `.` or `..`, plain or percent-encoded.
pub fn has_dot_segment(path: &str) -> bool {
    split(path).any(|seg| dot_segment(seg).is_some())
}
