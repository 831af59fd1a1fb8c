// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Startup reconciliation scan.
//
// Catches up on PDFs that arrived while the process was down: anything in the
// workload folder without a correspondingly named file in the preprocess
// folder is processed before live watching begins.

use tracing::{debug, info, warn};

use schnittwerk_core::config::WatchConfig;
use schnittwerk_core::error::Result;
use schnittwerk_core::is_pdf_path;

use crate::process;

/// Process every unprocessed PDF already present in the workload folder.
///
/// The existence check is name-based only: an output with the expected name
/// suppresses reprocessing regardless of its content or age.  Per-file
/// failures are logged and skipped; only fatal errors abort the scan.
/// Returns the number of files processed.
pub async fn reconcile(config: &WatchConfig) -> Result<usize> {
    let mut processed = 0;

    for entry in std::fs::read_dir(&config.workload_folder)? {
        let path = entry?.path();
        if !path.is_file() || !is_pdf_path(&path) {
            continue;
        }

        let target = process::output_path(&config.preprocess_folder, &path)?;
        if target.exists() {
            debug!(input = %path.display(), "output already present — skipping");
            continue;
        }

        match process::process_file(config, &path).await {
            Ok(outcome) => {
                info!(
                    input = %outcome.input.display(),
                    pages_kept = outcome.pages_kept,
                    "reconciled pending PDF"
                );
                processed += 1;
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => warn!(input = %path.display(), error = %e, "skipping file"),
        }
    }

    info!(processed, "startup reconciliation complete");
    Ok(processed)
}
