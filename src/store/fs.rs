//! Filesystem-backed content store.
//!
//! # Layout
//! ```text
//! {root}/ipfs/{id}/...   one directory tree per identifier
//! ```
//!
//! # Design Decisions
//! - Names are resolved through the static [`NameTable`] from configuration
//! - A missing store root reports `Offline`, not `NotFound`: the backing
//!   volume is unavailable rather than the content absent

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;

use crate::config::StoreConfig;
use crate::content::{ContentPath, PathError, IDENTIFIER_NAMESPACE};
use crate::store::{
    ContentStore, DirectoryHandle, FileHandle, NameTable, Node, NodeKind, ResolvedRef, StoreError,
};

#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
    names: NameTable,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>, names: NameTable) -> Self {
        Self {
            root: root.into(),
            names,
        }
    }

    /// Build from the `[store]` section: root directory, offline flag and name links.
    pub fn from_config(config: &StoreConfig) -> Result<Self, PathError> {
        let mut names = NameTable::new(config.offline);
        for (label, target) in &config.names {
            names.insert(label.as_str(), ContentPath::parse(target)?);
        }
        Ok(Self::new(&config.root, names))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn disk_path(&self, canonical: &ContentPath) -> PathBuf {
        let mut disk = self.root.join(IDENTIFIER_NAMESPACE);
        disk.push(canonical.root_token());
        for segment in canonical.subpath_segments() {
            disk.push(segment);
        }
        disk
    }

    async fn map_io_error(&self, path: &ContentPath, err: std::io::Error) -> StoreError {
        if err.kind() != ErrorKind::NotFound {
            return StoreError::Other {
                path: path.to_string(),
                message: err.to_string(),
            };
        }
        if tokio::fs::metadata(&self.root).await.is_err() {
            tracing::warn!(root = %self.root.display(), "Content store root is unavailable");
            return StoreError::Offline {
                path: path.to_string(),
            };
        }
        StoreError::NotFound {
            path: path.to_string(),
        }
    }
}

#[async_trait]
impl ContentStore for FsStore {
    async fn resolve(&self, path: &ContentPath) -> Result<ResolvedRef, StoreError> {
        let canonical = self.names.resolve(path)?;
        let disk = self.disk_path(&canonical);

        let metadata = match tokio::fs::metadata(&disk).await {
            Ok(m) => m,
            Err(e) => return Err(self.map_io_error(path, e).await),
        };

        let kind = if metadata.is_dir() {
            NodeKind::Directory
        } else {
            NodeKind::File {
                size: metadata.len(),
            }
        };

        Ok(ResolvedRef { canonical, kind })
    }

    async fn fetch(&self, reference: &ResolvedRef) -> Result<Node, StoreError> {
        let disk = self.disk_path(&reference.canonical);

        match reference.kind {
            NodeKind::File { .. } => match tokio::fs::read(&disk).await {
                Ok(content) => Ok(Node::File(FileHandle {
                    content: Bytes::from(content),
                })),
                Err(e) => Err(self.map_io_error(&reference.canonical, e).await),
            },
            NodeKind::Directory => {
                let mut reader = match tokio::fs::read_dir(&disk).await {
                    Ok(r) => r,
                    Err(e) => return Err(self.map_io_error(&reference.canonical, e).await),
                };

                let mut entries = Vec::new();
                loop {
                    match reader.next_entry().await {
                        Ok(Some(entry)) => entries.push(entry.file_name().to_string_lossy().into_owned()),
                        Ok(None) => break,
                        Err(e) => return Err(self.map_io_error(&reference.canonical, e).await),
                    }
                }
                entries.sort();

                Ok(Node::Directory(DirectoryHandle { entries }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[tokio::test]
    async fn test_resolve_and_fetch_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "ipfs/bafyroot/index.html", "<h1>home</h1>");
        write(dir.path(), "ipfs/bafyroot/assets/app.js", "console.log(1)");

        let mut names = NameTable::default();
        names.insert("example.com", ContentPath::parse("/ipfs/bafyroot").unwrap());
        let store = FsStore::new(dir.path(), names);

        let file = store
            .resolve(&ContentPath::parse("/ipns/example.com/index.html").unwrap())
            .await
            .unwrap();
        assert_eq!(file.kind, NodeKind::File { size: 13 });

        let root = store
            .resolve(&ContentPath::parse("/ipfs/bafyroot").unwrap())
            .await
            .unwrap();
        match store.fetch(&root).await.unwrap() {
            Node::Directory(handle) => assert_eq!(handle.entries, vec!["assets", "index.html"]),
            Node::File(_) => panic!("expected a directory"),
        }
    }

    #[tokio::test]
    async fn test_missing_file_vs_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "ipfs/bafyroot/index.html", "home");

        let store = FsStore::new(dir.path(), NameTable::default());
        let err = store
            .resolve(&ContentPath::parse("/ipfs/bafyroot/missing").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));

        let gone = FsStore::new(dir.path().join("unmounted"), NameTable::default());
        let err = gone
            .resolve(&ContentPath::parse("/ipfs/bafyroot/index.html").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Offline { .. }));
    }

    #[tokio::test]
    async fn test_from_config_links_names() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "ipfs/bafyroot/index.html", "home");

        let mut config = StoreConfig {
            root: dir.path().display().to_string(),
            ..StoreConfig::default()
        };
        config
            .names
            .insert("Example.com".to_string(), "/ipfs/bafyroot".to_string());

        let store = FsStore::from_config(&config).unwrap();
        let resolved = store
            .resolve(&ContentPath::parse("/ipns/example.com/index.html").unwrap())
            .await
            .unwrap();
        assert_eq!(resolved.canonical.to_string(), "/ipfs/bafyroot/index.html");

        config.names.insert("bad".to_string(), "ipfs/x".to_string());
        assert!(FsStore::from_config(&config).is_err());
    }
}
