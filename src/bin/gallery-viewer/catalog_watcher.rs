//! Reloads the catalog when its file changes on disk.

use eframe::egui;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};

/// Watches the directory holding the catalog file for writes to that file.
pub struct CatalogWatcher {
    /// One message per relevant file system event
    changed_rx: Receiver<()>,
    /// The watcher must be kept alive for events to fire
    _watcher: RecommendedWatcher,
    path: PathBuf,
}

impl CatalogWatcher {
    /// Creates a new catalog watcher.
    ///
    /// Returns `None` if the catalog path can't be resolved or watching fails.
    pub fn new(ctx: egui::Context, catalog_path: &Path) -> Option<Self> {
        let path = match catalog_path.canonicalize() {
            Ok(path) => path,
            Err(err) => {
                log::warn!(
                    "Cannot watch catalog {}: {err}",
                    catalog_path.display()
                );
                return None;
            }
        };
        let dir = path.parent()?.to_path_buf();

        let (changed_tx, changed_rx) = mpsc::channel();
        let target = path.clone();
        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            // Editors often save by writing a new file and renaming it over the old one
            if let Ok(event) = res
                && matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
                && event.paths.iter().any(|changed| changed == &target)
            {
                let _ = changed_tx.send(());
                ctx.request_repaint();
            }
        })
        .ok()?;

        watcher.watch(&dir, RecursiveMode::NonRecursive).ok()?;

        log::info!("Watching catalog: {}", path.display());

        Some(Self {
            changed_rx,
            _watcher: watcher,
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if the catalog changed since the last poll.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        // Drain all pending events; one reload covers them all
        loop {
            match self.changed_rx.try_recv() {
                Ok(()) => changed = true,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::warn!("Catalog watcher channel disconnected");
                    break;
                }
            }
        }
        changed
    }
}
