//! Origin isolation.
//!
//! Path-relative rules are only safe when the host addresses a single
//! content root. On a shared path gateway, many unrelated trees answer on
//! one origin, and rules from one tree would leak into another.

use serde::Serialize;

use crate::content::{extract_root, ContentPath};

/// How the request reached the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolationKind {
    /// Shared path gateway: `/ipfs/{id}/...` on a common host.
    #[default]
    None,
    /// Subdomain gateway: `{root}.ipfs.{gateway}`.
    DedicatedHost,
    /// A host linked to a name: `/ipns/{host}/...`.
    NameLinkedHost,
}

/// Per-request facts the pipeline needs about the HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestContext {
    pub isolation: IsolationKind,
}

impl RequestContext {
    pub fn new(isolation: IsolationKind) -> Self {
        Self { isolation }
    }
}

/// Whether rule processing may run for `path` under `context`.
///
/// A name-linked host qualifies once its path is rooted at an immutable
/// identifier, or when `bare_name_links` allows rooting at the name itself.
pub fn is_origin_isolated(context: &RequestContext, path: &ContentPath, bare_name_links: bool) -> bool {
    match context.isolation {
        IsolationKind::None => false,
        IsolationKind::DedicatedHost => true,
        IsolationKind::NameLinkedHost => match extract_root(&path.to_string()) {
            Ok(root) => root.is_rebased() || (bare_name_links && root.is_name()),
            Err(_) => false,
        },
    }
}
