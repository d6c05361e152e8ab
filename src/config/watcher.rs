//! Configuration file watcher for hot reload.
//!
//! # Design Decisions
//! - Watches the parent directory: editors often save by renaming a temp
//!   file over the original, which a watch on the file itself would miss
//! - Only valid configs that differ from the last one sent are forwarded

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::GatewayConfig;

/// Forwards validated configuration changes to the running server.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<GatewayConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<GatewayConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Start watching in notify's background thread.
    ///
    /// The returned watcher must be kept alive for as long as updates are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let ConfigWatcher { path, update_tx } = self;

        let watch_dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let file_name: Option<OsString> = path.file_name().map(|name| name.to_os_string());
        let mut last_sent = load_config(&path).ok();
        let target = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::error!(error = %e, "Config watch error");
                        return;
                    }
                };
                if !(event.kind.is_modify() || event.kind.is_create()) {
                    return;
                }
                if !event
                    .paths
                    .iter()
                    .any(|changed| changed.file_name() == file_name.as_deref())
                {
                    return;
                }

                match load_config(&target) {
                    Ok(config) if last_sent.as_ref() == Some(&config) => {
                        tracing::debug!(path = %target.display(), "Config file touched without changes");
                    }
                    Ok(config) => {
                        tracing::info!(path = %target.display(), "Config file changed, reloading");
                        last_sent = Some(config.clone());
                        let _ = update_tx.send(config);
                    }
                    Err(e) => {
                        tracing::error!(
                            path = %target.display(),
                            error = %e,
                            "Failed to reload config, keeping current configuration"
                        );
                    }
                }
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %path.display(), "Config watcher started");
        Ok(watcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_changed_file_is_forwarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gateway.toml");
        std::fs::write(&path, "[redirects]\nenabled = true\n").unwrap();

        let (watcher, mut updates) = ConfigWatcher::new(&path);
        let _guard = watcher.run().unwrap();

        std::fs::write(&path, "[redirects]\nenabled = false\n").unwrap();

        let config = tokio::time::timeout(Duration::from_secs(10), updates.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(!config.redirects.enabled);
    }
}
