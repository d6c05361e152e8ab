//! Logical content paths.
//!
//! # Responsibilities
//! - Validate the `/{namespace}/{root}/{subpath...}` shape
//! - Reject traversal segments before any store sees them
//! - Provide segment access and suffix joining
//!
//! # Design Decisions
//! - Empty segments (`//`) are collapsed, a trailing `/` is preserved
//! - `.` and `..` are rejected rather than normalized

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Path prefix of the immutable, content-derived namespace.
pub const IDENTIFIER_NAMESPACE: &str = "ipfs";

/// Path prefix of the mutable name namespace.
pub const NAME_NAMESPACE: &str = "ipns";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path {0:?} does not start with /{IDENTIFIER_NAMESPACE}/ or /{NAME_NAMESPACE}/")]
    UnknownNamespace(String),

    #[error("path {0:?} has no root token after the namespace")]
    MissingRoot(String),

    #[error("path {0:?} contains a relative segment")]
    RelativeSegment(String),
}

/// The two namespaces a content path can start with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    Identifier,
    Name,
}

impl Namespace {
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            IDENTIFIER_NAMESPACE => Some(Namespace::Identifier),
            NAME_NAMESPACE => Some(Namespace::Name),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Identifier => IDENTIFIER_NAMESPACE,
            Namespace::Name => NAME_NAMESPACE,
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated `/{namespace}/{root}[/subpath]` path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentPath {
    namespace: Namespace,
    /// Non-empty segments after the namespace; the first one is the root token.
    segments: Vec<String>,
    trailing_slash: bool,
}

impl ContentPath {
    /// Parse and validate a raw path.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        let mut parts = raw.split('/').filter(|s| !s.is_empty());

        let namespace = parts
            .next()
            .and_then(Namespace::from_segment)
            .filter(|_| raw.starts_with('/'))
            .ok_or_else(|| PathError::UnknownNamespace(raw.to_string()))?;

        let segments: Vec<String> = parts.map(str::to_string).collect();
        if segments.is_empty() {
            return Err(PathError::MissingRoot(raw.to_string()));
        }
        if segments.iter().any(|s| s == "." || s == "..") {
            return Err(PathError::RelativeSegment(raw.to_string()));
        }

        Ok(Self {
            namespace,
            segments,
            trailing_slash: raw.len() > 1 && raw.ends_with('/'),
        })
    }

    /// Build `/{namespace}/{root}` directly.
    pub fn root(namespace: Namespace, root: &str) -> Result<Self, PathError> {
        Self::parse(&format!("/{}/{}", namespace, root))
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// The root token (identifier or name label).
    pub fn root_token(&self) -> &str {
        &self.segments[0]
    }

    /// Segments following the root token.
    pub fn subpath_segments(&self) -> &[String] {
        &self.segments[1..]
    }

    /// All segments, namespace included.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.namespace.as_str()).chain(self.segments.iter().map(String::as_str))
    }

    pub fn has_trailing_slash(&self) -> bool {
        self.trailing_slash
    }

    /// Last segment, used for content type guessing.
    pub fn file_name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Append a `/`-separated suffix. The result is validated like any parsed path.
    pub fn join(&self, suffix: &str) -> Result<Self, PathError> {
        let base = self.to_string();
        let base = base.trim_end_matches('/');
        let suffix = suffix.trim_start_matches('/');
        Self::parse(&format!("{}/{}", base, suffix))
    }
}

impl fmt::Display for ContentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.namespace)?;
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        if self.trailing_slash {
            f.write_str("/")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for ContentPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
