// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Filesystem watcher for the workload folder.
//
// Raw events are forwarded from the notify backend thread into an async
// channel and drained by a single Tokio task.  Processing is strictly
// sequential: one file runs through the pipeline to completion before the
// next event is examined, and later events wait in the channel.

use std::sync::Arc;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::Notify;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use schnittwerk_core::config::WatchConfig;
use schnittwerk_core::error::{Result, SchnittwerkError};
use schnittwerk_core::is_pdf_path;
use schnittwerk_core::types::WatcherStatus;

use crate::events::{self, FsEvent};
use crate::process;

/// Watches the workload folder and feeds newly created PDFs through the
/// trim (and optional compression) pipeline.
pub struct FolderWatcher {
    config: WatchConfig,
    status: WatcherStatus,
    shutdown_signal: Arc<Notify>,
    task_handle: Option<JoinHandle<()>>,
}

impl FolderWatcher {
    /// Create a watcher in `Stopped` state.  Call [`FolderWatcher::start`] to
    /// begin watching.
    pub fn new(config: WatchConfig) -> Self {
        Self {
            config,
            status: WatcherStatus::Stopped,
            shutdown_signal: Arc::new(Notify::new()),
            task_handle: None,
        }
    }

    /// Return the current watcher status.
    pub fn status(&self) -> WatcherStatus {
        self.status
    }

    /// Register the backend watch (non-recursive) and spawn the drain task.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend watcher cannot be created or the
    /// workload folder cannot be watched (e.g. it does not exist).
    pub fn start(&mut self) -> Result<()> {
        if self.status == WatcherStatus::Running {
            debug!("watcher already running");
            return Ok(());
        }

        let (tx, rx) = mpsc::unbounded_channel();

        // The closure runs on the notify backend thread; it only forwards.
        let mut backend =
            notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
                let _ = tx.send(res);
            })
            .map_err(|e| SchnittwerkError::Watch(format!("create backend watcher: {e}")))?;

        backend
            .watch(&self.config.workload_folder, RecursiveMode::NonRecursive)
            .map_err(|e| {
                SchnittwerkError::Watch(format!(
                    "watch {}: {e}",
                    self.config.workload_folder.display()
                ))
            })?;

        info!(
            folder = %self.config.workload_folder.display(),
            "watching workload folder"
        );

        let shutdown = Arc::clone(&self.shutdown_signal);
        let config = self.config.clone();

        let handle = tokio::spawn(async move {
            Self::event_loop(backend, rx, shutdown, config).await;
        });

        self.task_handle = Some(handle);
        self.status = WatcherStatus::Running;
        Ok(())
    }

    /// Gracefully stop the watcher.
    ///
    /// Signals the drain task to exit and awaits its completion.  A file
    /// mid-pipeline is allowed to finish.
    pub async fn stop(&mut self) -> Result<()> {
        if self.status != WatcherStatus::Running {
            return Ok(());
        }

        info!("stopping folder watcher");
        self.shutdown_signal.notify_one();

        if let Some(handle) = self.task_handle.take() {
            handle
                .await
                .map_err(|e| SchnittwerkError::Watch(format!("task join: {e}")))?;
        }

        self.status = WatcherStatus::Stopped;
        info!("folder watcher stopped");
        Ok(())
    }

    /// Drain loop.  Holds the backend watcher so the subscription stays alive
    /// for the lifetime of the task.
    async fn event_loop(
        _backend: RecommendedWatcher,
        mut rx: UnboundedReceiver<notify::Result<notify::Event>>,
        shutdown: Arc<Notify>,
        config: WatchConfig,
    ) {
        loop {
            tokio::select! {
                _ = shutdown.notified() => break,
                received = rx.recv() => {
                    let Some(result) = received else { break };
                    match result {
                        Ok(event) => {
                            // Diagnostic pass-through: every raw event is
                            // visible at debug level, whatever its kind.
                            debug!(kind = ?event.kind, paths = ?event.paths, "filesystem event");
                            Self::dispatch(&config, event).await;
                        }
                        Err(e) => warn!(error = %e, "watch backend error"),
                    }
                }
            }
        }
    }

    /// Classify a raw event and run the pipeline for every created PDF.
    async fn dispatch(config: &WatchConfig, event: notify::Event) {
        for fs_event in events::classify(event) {
            let FsEvent::Created(path) = fs_event else {
                continue;
            };
            if !is_pdf_path(&path) {
                continue;
            }

            match process::process_file(config, &path).await {
                Ok(outcome) => info!(
                    input = %outcome.input.display(),
                    preprocessed = %outcome.preprocessed.display(),
                    pages_in = outcome.pages_in,
                    pages_kept = outcome.pages_kept,
                    "processed new PDF"
                ),
                Err(e) => warn!(
                    input = %path.display(),
                    error = %e,
                    "processing failed; watcher continues"
                ),
            }
        }
    }
}
