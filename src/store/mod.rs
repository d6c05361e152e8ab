//! Content store subsystem.
//!
//! # Data Flow
//! ```text
//! ContentPath
//!     → names.rs (follow /ipns/ links to an /ipfs/ path)
//!     → ContentStore::resolve (ResolvedRef: canonical path + node kind)
//!     → ContentStore::fetch (Node::File | Node::Directory)
//! ```
//!
//! # Design Decisions
//! - Stores are read-only and shared via Arc across requests
//! - File vs directory is a tagged variant, matched by callers
//! - "Offline" is distinct from "not found": the former is retryable

pub mod fs;
pub mod memory;
pub mod names;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::content::ContentPath;

pub use fs::FsStore;
pub use memory::MemoryStore;
pub use names::NameTable;

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("no link named {path:?}")]
    NotFound { path: String },

    #[error("cannot resolve {path:?} while offline")]
    Offline { path: String },

    #[error("failed to access {path:?}: {message}")]
    Other { path: String, message: String },
}

/// Kind of node a path resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File { size: u64 },
    Directory,
}

/// Immutable handle produced by resolving a content path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRef {
    /// Fully resolved `/ipfs/...` path.
    pub canonical: ContentPath,
    pub kind: NodeKind,
}

impl ResolvedRef {
    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File { .. })
    }
}

#[derive(Debug, Clone)]
pub struct FileHandle {
    pub content: Bytes,
}

impl FileHandle {
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

#[derive(Debug, Clone)]
pub struct DirectoryHandle {
    /// Entry names, sorted.
    pub entries: Vec<String>,
}

/// Result of fetching a resolved reference.
#[derive(Debug, Clone)]
pub enum Node {
    File(FileHandle),
    Directory(DirectoryHandle),
}

/// Read-only content-addressed store.
#[async_trait]
pub trait ContentStore: Send + Sync + std::fmt::Debug {
    /// Resolve a logical path, following names, to an immutable reference.
    async fn resolve(&self, path: &ContentPath) -> Result<ResolvedRef, StoreError>;

    /// Retrieve the node behind a resolved reference.
    async fn fetch(&self, reference: &ResolvedRef) -> Result<Node, StoreError>;
}
