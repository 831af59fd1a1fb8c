// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Schnittwerk — PDF intake preprocessor.
//
// Entry point.  Initialises logging, loads the configuration, catches up on
// files that arrived while the process was down, then watches the workload
// folder until interrupted.

use std::sync::Arc;

use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use schnittwerk_core::WatchConfig;
use schnittwerk_pipeline::{FolderWatcher, compress, reconcile};

/// Fixed log file, next to the configuration file.
const LOG_FILE: &str = "schnittwerk.log";

#[tokio::main]
async fn main() {
    init_logging();
    info!("Schnittwerk starting");

    let config = match WatchConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "cannot load configuration");
            std::process::exit(1);
        }
    };
    info!(
        workload = %config.workload_folder.display(),
        preprocess = %config.preprocess_folder.display(),
        compression = config.compression_enabled(),
        "configuration loaded"
    );

    // Compression needs Ghostscript; fail before watching, not on the first file.
    if config.compression_enabled() {
        if let Err(e) = compress::ghostscript_path() {
            error!(error = %e, "compression is configured but unusable");
            std::process::exit(1);
        }
    }

    match reconcile(&config).await {
        Ok(processed) => info!(processed, "workload folder reconciled"),
        Err(e) => {
            error!(error = %e, "startup reconciliation failed");
            std::process::exit(1);
        }
    }

    let mut watcher = FolderWatcher::new(config);
    if let Err(e) = watcher.start() {
        error!(error = %e, "cannot start folder watcher");
        std::process::exit(1);
    }

    shutdown_signal().await;

    if let Err(e) = watcher.stop().await {
        warn!(error = %e, "watcher did not stop cleanly");
    }
    info!("Schnittwerk stopped");
}

/// Log to the console and duplicate everything into the fixed log file.
fn init_logging() {
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(LOG_FILE)
        .expect("cannot open log file");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(log_file))
                .with_ansi(false),
        )
        .init();
}

/// Suspend until SIGINT (Ctrl+C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("received Ctrl+C — shutting down");
        }
        _ = terminate => {
            info!("received SIGTERM — shutting down");
        }
    }
}
