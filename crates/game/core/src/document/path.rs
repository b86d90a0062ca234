//! Validated dot-paths addressing a field inside a document's data tree.
//!
//! A path is 1 to [`EngineConfig::MAX_PATH_DEPTH`] segments, each matching
//! `[A-Za-z_][A-Za-z0-9_]*`. Nothing outside the data tree is addressable.

use core::fmt;
use core::str::FromStr;

use arrayvec::ArrayVec;

use crate::config::EngineConfig;

const MAX_DEPTH: usize = EngineConfig::MAX_PATH_DEPTH;

/// Reasons a string is not a valid property path.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("path is empty")]
    Empty,

    #[error("segment {index} is empty")]
    EmptySegment { index: usize },

    #[error("segment `{segment}` is not an identifier")]
    InvalidSegment { segment: String },

    #[error("path is deeper than {max} segments")]
    TooDeep { max: usize },
}

/// A parsed property path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    segments: ArrayVec<String, MAX_DEPTH>,
}

impl PropertyPath {
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Err(PathError::Empty);
        }

        let mut segments = ArrayVec::new();
        for (index, segment) in raw.split('.').enumerate() {
            if segment.is_empty() {
                return Err(PathError::EmptySegment { index });
            }
            if !is_identifier(segment) {
                return Err(PathError::InvalidSegment {
                    segment: segment.to_owned(),
                });
            }
            segments
                .try_push(segment.to_owned())
                .map_err(|_| PathError::TooDeep { max: MAX_DEPTH })?;
        }

        Ok(Self { segments })
    }

    /// Build a path from known-good segments, e.g. `["specials", "luck"]`.
    pub fn from_segments<'a>(segments: impl IntoIterator<Item = &'a str>) -> Result<Self, PathError> {
        let joined: Vec<&str> = segments.into_iter().collect();
        Self::parse(&joined.join("."))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// First segment; paths are never empty.
    pub fn root(&self) -> &str {
        &self.segments[0]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl FromStr for PropertyPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}
