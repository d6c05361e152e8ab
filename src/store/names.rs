//! Static name table.
//!
//! Maps name labels to content paths, standing in for DNS-style name
//! records. Targets may point at another name; chains are followed up to
//! [`MAX_NAME_HOPS`].

use std::collections::HashMap;

use crate::content::{ContentPath, Namespace};
use crate::store::StoreError;

pub const MAX_NAME_HOPS: usize = 32;

#[derive(Debug, Clone, Default)]
pub struct NameTable {
    entries: HashMap<String, ContentPath>,
    offline: bool,
}

impl NameTable {
    pub fn new(offline: bool) -> Self {
        Self {
            entries: HashMap::new(),
            offline,
        }
    }

    pub fn insert(&mut self, label: impl Into<String>, target: ContentPath) {
        self.entries.insert(label.into().to_lowercase(), target);
    }

    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// Rewrite `path` until it lives in the identifier namespace.
    pub fn resolve(&self, path: &ContentPath) -> Result<ContentPath, StoreError> {
        let mut current = path.clone();

        for _ in 0..MAX_NAME_HOPS {
            if current.namespace() == Namespace::Identifier {
                return Ok(current);
            }

            let label = current.root_token().to_lowercase();
            let target = match self.entries.get(&label) {
                Some(target) => target,
                None if self.offline => {
                    return Err(StoreError::Offline {
                        path: current.to_string(),
                    })
                }
                None => {
                    return Err(StoreError::NotFound {
                        path: current.to_string(),
                    })
                }
            };

            let mut rest = current.subpath_segments().join("/");
            if current.has_trailing_slash() {
                rest.push('/');
            }
            current = if rest.is_empty() {
                target.clone()
            } else {
                target.join(&rest).map_err(|e| StoreError::Other {
                    path: current.to_string(),
                    message: e.to_string(),
                })?
            };
        }

        Err(StoreError::Other {
            path: path.to_string(),
            message: format!("name chain longer than {} hops", MAX_NAME_HOPS),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(raw: &str) -> ContentPath {
        ContentPath::parse(raw).unwrap()
    }

    #[test]
    fn test_identifier_paths_pass_through() {
        let table = NameTable::default();
        let resolved = table.resolve(&path("/ipfs/bafyroot/a")).unwrap();
        assert_eq!(resolved.to_string(), "/ipfs/bafyroot/a");
    }

    #[test]
    fn test_follows_chains_and_keeps_subpath() {
        let mut table = NameTable::default();
        table.insert("example.com", path("/ipns/alias.example"));
        table.insert("alias.example", path("/ipfs/bafyroot/site"));

        let resolved = table.resolve(&path("/ipns/Example.com/blog/")).unwrap();
        assert_eq!(resolved.to_string(), "/ipfs/bafyroot/site/blog/");
    }

    #[test]
    fn test_unknown_name_depends_on_offline_mode() {
        let mut table = NameTable::default();
        assert!(matches!(
            table.resolve(&path("/ipns/missing.example")),
            Err(StoreError::NotFound { .. })
        ));

        table.set_offline(true);
        assert!(matches!(
            table.resolve(&path("/ipns/missing.example")),
            Err(StoreError::Offline { .. })
        ));
    }

    #[test]
    fn test_cycles_are_bounded() {
        let mut table = NameTable::default();
        table.insert("a.example", path("/ipns/b.example"));
        table.insert("b.example", path("/ipns/a.example"));

        assert!(matches!(
            table.resolve(&path("/ipns/a.example")),
            Err(StoreError::Other { .. })
        ));
    }
}
