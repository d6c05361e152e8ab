//! Root path extraction.
//!
//! # Responsibilities
//! - Derive the canonical root of a content path
//! - Re-base name paths that re-enter identifier space
//! - Strip the root to produce the sub-path seen by rule matching
//!
//! # Design Decisions
//! - `/ipns/{label}/ipfs/{id}/...` is rooted at `/ipfs/{id}` so rule lookups
//!   run against the immutable tree, never the mutable name
//! - The literal prefix consumed from the request is tracked separately from
//!   the canonical base, since a re-based base is not a textual prefix

use thiserror::Error;

use crate::content::path::{ContentPath, Namespace};

/// Name of the rules file expected at a content root.
pub const RULES_FILE_NAME: &str = "_redirects";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("path {0:?} is not addressable for rule processing")]
pub struct NotAddressable(pub String);

/// Canonical root of a content path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootPath {
    base: ContentPath,
    /// Number of leading segments (namespace included) the root consumed.
    consumed: usize,
    rebased: bool,
}

impl RootPath {
    /// `/{namespace}/{root}` the rules file and rewrite targets hang off.
    pub fn base(&self) -> &ContentPath {
        &self.base
    }

    /// True when a name path was re-rooted to an inner identifier.
    pub fn is_rebased(&self) -> bool {
        self.rebased
    }

    /// True when the root is a mutable name.
    pub fn is_name(&self) -> bool {
        self.base.namespace() == Namespace::Name
    }

    /// Location of the rules file for this root.
    pub fn rules_file(&self) -> ContentPath {
        // The rules file name is a single plain segment, joining cannot fail.
        self.base
            .join(RULES_FILE_NAME)
            .unwrap_or_else(|_| self.base.clone())
    }

    /// `path` with the root stripped: leading `/` kept, trailing `/` removed.
    /// The bare root yields an empty string.
    pub fn sub_path(&self, path: &ContentPath) -> String {
        let rest: Vec<&str> = path.segments().skip(self.consumed).collect();
        if rest.is_empty() {
            String::new()
        } else {
            format!("/{}", rest.join("/"))
        }
    }

    /// Anchor a destination at this root. The query and fragment are dropped.
    pub fn anchor(&self, destination: &str) -> Result<ContentPath, crate::content::PathError> {
        let path = destination
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        self.base.join(path)
    }
}

/// Derive the root of a raw request path.
pub fn extract_root(path: &str) -> Result<RootPath, NotAddressable> {
    let parsed = ContentPath::parse(path).map_err(|_| NotAddressable(path.to_string()))?;

    let inner_identifier = match parsed.subpath_segments() {
        [namespace, id, ..] if Namespace::from_segment(namespace) == Some(Namespace::Identifier) => {
            Some(id.as_str())
        }
        _ => None,
    };

    let root = match (parsed.namespace(), inner_identifier) {
        (Namespace::Name, Some(id)) => RootPath {
            base: ContentPath::root(Namespace::Identifier, id)
                .map_err(|_| NotAddressable(path.to_string()))?,
            consumed: 4,
            rebased: true,
        },
        (namespace, _) => RootPath {
            base: ContentPath::root(namespace, parsed.root_token())
                .map_err(|_| NotAddressable(path.to_string()))?,
            consumed: 2,
            rebased: false,
        },
    };

    Ok(root)
}
