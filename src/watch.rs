//! Re-print on save.
//!
//! Watches the document's directory (editors often save by replacing the
//! file) and reports changes to the document itself.

use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

/// Quiet period that ends a burst of events from one save
const DEBOUNCE: Duration = Duration::from_millis(300);

pub struct DocumentWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::UnboundedReceiver<()>,
}

impl DocumentWatcher {
    pub fn new(document: &Path) -> Result<Self> {
        let directory = document
            .parent()
            .with_context(|| format!("{} has no parent directory", document.display()))?;
        let file_name: OsString = document
            .file_name()
            .with_context(|| format!("{} has no file name", document.display()))?
            .to_os_string();

        let (tx, rx) = mpsc::unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    if let EventKind::Create(_) | EventKind::Modify(_) = event.kind {
                        let touches_document = event
                            .paths
                            .iter()
                            .any(|path| path.file_name() == Some(file_name.as_os_str()));
                        if touches_document {
                            let _ = tx.send(());
                        }
                    }
                }
                Err(e) => {
                    log::warn!("Document watcher error: {}", e);
                }
            },
            Config::default().with_poll_interval(Duration::from_secs(1)),
        )?;

        watcher
            .watch(directory, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", directory.display()))?;

        Ok(Self {
            _watcher: watcher,
            rx,
        })
    }

    /// Wait for the next save. `None` once the watcher is gone.
    pub async fn changed(&mut self) -> Option<()> {
        self.rx.recv().await?;

        // Swallow the rest of the burst
        while let Ok(Some(())) = tokio::time::timeout(DEBOUNCE, self.rx.recv()).await {}
        Some(())
    }
}
