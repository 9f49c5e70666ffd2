//! File watcher service for watch mode.
//!
//! Monitors the input image and the settings file for changes, broadcasting
//! debounced events so the preview can be re-rendered.

use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

/// Quiet period before a burst of writes is reported
pub const DEBOUNCE: Duration = Duration::from_millis(200);

/// Event sent when files change
#[derive(Debug, Clone)]
pub struct FileChangeEvent {
    /// Paths that changed
    pub paths: Vec<PathBuf>,
}

/// File watcher that monitors a fixed set of files
pub struct FileWatcher {
    /// Broadcast sender for file change events
    sender: broadcast::Sender<FileChangeEvent>,
    /// Handle to the watcher (kept alive)
    _watcher: Option<RecommendedWatcher>,
    /// Flag indicating if watcher is active
    active: bool,
}

impl FileWatcher {
    /// Create a watcher for the given files.
    ///
    /// Must be called inside a tokio runtime. Files that do not exist are
    /// skipped; if none exist the watcher is inactive.
    pub fn new(files: &[PathBuf]) -> Self {
        let (sender, _) = broadcast::channel(16);

        let targets: HashSet<PathBuf> = files
            .iter()
            .filter_map(|path| match path.canonicalize() {
                Ok(canonical) => Some(canonical),
                Err(e) => {
                    tracing::debug!(path = %path.display(), %e, "Watch path does not exist");
                    None
                }
            })
            .collect();

        let (watcher, active) = if targets.is_empty() {
            tracing::debug!("No watchable files, file watching disabled");
            (None, false)
        } else {
            match Self::start_watcher(targets.clone(), sender.clone()) {
                Ok(watcher) => {
                    tracing::info!(files = ?targets, "File watcher started");
                    (Some(watcher), true)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to start file watcher");
                    (None, false)
                }
            }
        };

        Self {
            sender,
            _watcher: watcher,
            active,
        }
    }

    fn start_watcher(
        targets: HashSet<PathBuf>,
        sender: broadcast::Sender<FileChangeEvent>,
    ) -> Result<RecommendedWatcher, notify::Error> {
        let (tx, rx) = mpsc::channel::<PathBuf>(100);
        tokio::spawn(debounce(rx, sender));

        // Editors often replace files instead of writing in place, which
        // drops a watch on the file itself; watch the parent directories
        let dirs: HashSet<PathBuf> = targets
            .iter()
            .filter_map(|path| path.parent().map(Path::to_path_buf))
            .collect();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<notify::Event, notify::Error>| {
                if let Ok(event) = res {
                    for path in event.paths {
                        if targets.contains(&path) {
                            let _ = tx.blocking_send(path);
                        }
                    }
                }
            },
            Config::default(),
        )?;

        for dir in &dirs {
            watcher.watch(dir, RecursiveMode::NonRecursive)?;
        }

        Ok(watcher)
    }

    /// Subscribe to file change events
    pub fn subscribe(&self) -> broadcast::Receiver<FileChangeEvent> {
        self.sender.subscribe()
    }

    /// Check if the watcher is active
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Coalesce raw path events until `DEBOUNCE` passes without a new one,
/// then broadcast the set. Ends when the watcher callback is dropped.
async fn debounce(mut rx: mpsc::Receiver<PathBuf>, sender: broadcast::Sender<FileChangeEvent>) {
    while let Some(first) = rx.recv().await {
        let mut changed = BTreeSet::from([first]);
        while let Ok(Some(path)) = tokio::time::timeout(DEBOUNCE, rx.recv()).await {
            changed.insert(path);
        }

        let paths: Vec<PathBuf> = changed.into_iter().collect();
        tracing::debug!(?paths, "Files changed (debounced)");
        // Err only means nobody is subscribed yet
        let _ = sender.send(FileChangeEvent { paths });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_files_leave_watcher_inactive() {
        let watcher = FileWatcher::new(&[PathBuf::from("/nonexistent/input.png")]);
        assert!(!watcher.is_active());
    }

    #[tokio::test]
    async fn test_no_files_is_inactive() {
        let watcher = FileWatcher::new(&[]);
        assert!(!watcher.is_active());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_write_is_broadcast_once_debounced() {
        let dir = tempfile::tempdir().unwrap();
        let watched = dir.path().join("settings.yaml");
        let ignored = dir.path().join("other.txt");
        std::fs::write(&watched, "algorithm: atkinson\n").unwrap();

        let watcher = FileWatcher::new(&[watched.clone()]);
        assert!(watcher.is_active());
        let mut rx = watcher.subscribe();

        std::fs::write(&ignored, "noise").unwrap();
        std::fs::write(&watched, "algorithm: sierra\n").unwrap();
        std::fs::write(&watched, "algorithm: burkes\n").unwrap();

        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("no change event within 5s")
            .unwrap();
        let canonical = watched.canonicalize().unwrap();
        assert_eq!(event.paths, vec![canonical]);
    }
}
