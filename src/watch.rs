//! File system watching for the dev loop
//!
//! Wraps a `notify` watcher, forwards its events through a tokio channel and
//! turns relevant bursts of changes into a single reload broadcast.

use crate::server::reload::LiveReload;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Directory names never worth reloading for
const IGNORED_COMPONENTS: &[&str] = &["target", ".git", "node_modules"];

/// Events emitted by the file watcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    Created(PathBuf),
    Modified(PathBuf),
    Deleted(PathBuf),
    /// An error reported by the underlying watcher
    Error(String),
}

impl WatchEvent {
    pub fn path(&self) -> Option<&Path> {
        match self {
            WatchEvent::Created(p) | WatchEvent::Modified(p) | WatchEvent::Deleted(p) => Some(p),
            WatchEvent::Error(_) => None,
        }
    }
}

/// Decides which changed paths should reload the browser
#[derive(Debug, Clone)]
pub struct WatchFilter {
    extensions: Vec<String>,
    ignored_dirs: Vec<PathBuf>,
}

impl WatchFilter {
    /// Filter accepting the given extensions (with or without the leading dot)
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
            ignored_dirs: Vec::new(),
        }
    }

    /// Skip everything under `dir`, e.g. the build output directory
    pub fn ignore_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        if let Ok(canonical) = dir.canonicalize() {
            if canonical != dir {
                self.ignored_dirs.push(canonical);
            }
        }
        self.ignored_dirs.push(dir);
        self
    }

    pub fn matches(&self, path: &Path) -> bool {
        if self.ignored_dirs.iter().any(|dir| path.starts_with(dir)) {
            return false;
        }

        let in_ignored_component = path.components().any(|c| {
            c.as_os_str()
                .to_str()
                .is_some_and(|name| IGNORED_COMPONENTS.contains(&name))
        });
        if in_ignored_component {
            return false;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        // Editor swap, backup and lock files
        if name.ends_with('~') || name.starts_with(".#") || name.ends_with(".swp") {
            return false;
        }

        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|allowed| *allowed == ext)
            })
    }
}

/// File system watcher
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    receiver: mpsc::UnboundedReceiver<WatchEvent>,
}

impl FileWatcher {
    /// Watch `root` recursively
    pub fn new(root: &Path) -> notify::Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let events: Vec<WatchEvent> = match res {
                Ok(event) => {
                    let wrap: fn(PathBuf) -> WatchEvent = match event.kind {
                        EventKind::Create(_) => WatchEvent::Created,
                        EventKind::Modify(_) => WatchEvent::Modified,
                        EventKind::Remove(_) => WatchEvent::Deleted,
                        _ => return,
                    };
                    event.paths.into_iter().map(wrap).collect()
                }
                Err(e) => vec![WatchEvent::Error(e.to_string())],
            };

            for event in events {
                let _ = tx.send(event);
            }
        })?;

        watcher.watch(root, RecursiveMode::Recursive)?;
        debug!("Watching {}", root.display());

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
        })
    }

    /// Wait for the next file system event; `None` once the watcher is gone
    pub async fn next_event(&mut self) -> Option<WatchEvent> {
        self.receiver.recv().await
    }

    /// Receive an event without waiting
    pub fn try_next_event(&mut self) -> Option<WatchEvent> {
        self.receiver.try_recv().ok()
    }
}

/// Collect the relevant paths of one burst of events.
///
/// Waits for the first relevant event, then keeps draining until `debounce`
/// has passed since that event. Events the filter drops never move the
/// deadline. Returns `None` when the watcher closes.
pub async fn next_change_batch(
    watcher: &mut FileWatcher,
    filter: &WatchFilter,
    debounce: Duration,
) -> Option<Vec<PathBuf>> {
    let mut changed: Vec<PathBuf> = Vec::new();
    let mut deadline: Option<Instant> = None;

    loop {
        let event = match deadline {
            None => watcher.next_event().await?,
            Some(deadline) => match tokio::time::timeout_at(deadline, watcher.next_event()).await {
                Ok(Some(event)) => event,
                Ok(None) | Err(_) => return Some(changed),
            },
        };

        match &event {
            WatchEvent::Error(message) => warn!("File watch error: {}", message),
            _ => {
                if let Some(path) = event.path() {
                    if filter.matches(path) {
                        deadline.get_or_insert_with(|| Instant::now() + debounce);
                        if !changed.iter().any(|p| p == path) {
                            changed.push(path.to_path_buf());
                        }
                    }
                }
            }
        }
    }
}

/// Broadcast a reload for every batch of relevant changes until the watcher closes
pub async fn forward_changes(
    mut watcher: FileWatcher,
    filter: WatchFilter,
    debounce: Duration,
    reload: LiveReload,
) {
    while let Some(changed) = next_change_batch(&mut watcher, &filter, debounce).await {
        let clients = reload.trigger_reload(changed.clone());
        info!(
            "Change detected in {}. Reloading {} client(s)...",
            changed
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
            clients
        );
    }
    debug!("File watcher closed");
}
