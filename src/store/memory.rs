//! In-memory content store.
//!
//! Files are keyed by their full `/ipfs/{id}/...` path; directories are
//! implied by the files below them.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use bytes::Bytes;

use crate::content::{ContentPath, PathError};
use crate::store::{
    ContentStore, DirectoryHandle, FileHandle, NameTable, Node, NodeKind, ResolvedRef, StoreError,
};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: BTreeMap<String, Bytes>,
    names: NameTable,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file at an `/ipfs/...` path.
    pub fn with_file(mut self, path: &str, content: impl Into<Bytes>) -> Result<Self, PathError> {
        let path = ContentPath::parse(path)?;
        self.files.insert(key(&path), content.into());
        Ok(self)
    }

    /// Link a name label to a target path.
    pub fn with_name(mut self, label: &str, target: &str) -> Result<Self, PathError> {
        self.names.insert(label, ContentPath::parse(target)?);
        Ok(self)
    }

    /// Treat unknown names as requiring network access.
    pub fn offline(mut self) -> Self {
        self.names.set_offline(true);
        self
    }

    fn children(&self, dir: &str) -> BTreeSet<String> {
        let prefix = format!("{}/", dir);
        self.files
            .keys()
            .filter_map(|k| k.strip_prefix(&prefix))
            .filter_map(|rest| rest.split('/').next())
            .map(str::to_string)
            .collect()
    }
}

fn key(path: &ContentPath) -> String {
    path.to_string().trim_end_matches('/').to_string()
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn resolve(&self, path: &ContentPath) -> Result<ResolvedRef, StoreError> {
        let canonical = self.names.resolve(path)?;
        let key = key(&canonical);

        if let Some(content) = self.files.get(&key) {
            return Ok(ResolvedRef {
                canonical,
                kind: NodeKind::File {
                    size: content.len() as u64,
                },
            });
        }

        if !self.children(&key).is_empty() {
            return Ok(ResolvedRef {
                canonical,
                kind: NodeKind::Directory,
            });
        }

        Err(StoreError::NotFound {
            path: path.to_string(),
        })
    }

    async fn fetch(&self, reference: &ResolvedRef) -> Result<Node, StoreError> {
        let key = key(&reference.canonical);
        match reference.kind {
            NodeKind::File { .. } => self
                .files
                .get(&key)
                .map(|content| {
                    Node::File(FileHandle {
                        content: content.clone(),
                    })
                })
                .ok_or(StoreError::NotFound { path: key }),
            NodeKind::Directory => Ok(Node::Directory(DirectoryHandle {
                entries: self.children(&key).into_iter().collect(),
            })),
        }
    }
}
