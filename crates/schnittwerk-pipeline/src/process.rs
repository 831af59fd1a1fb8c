// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The per-file pipeline: trim into the preprocess folder and, when a final
// folder is configured, compress into it.

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use schnittwerk_core::config::WatchConfig;
use schnittwerk_core::error::{Result, SchnittwerkError};
use schnittwerk_core::types::ProcessOutcome;
use schnittwerk_document::PdfReader;

use crate::compress;

/// Derive the output path for an input file.
///
/// Naming is the identity function on the input's file name, so reprocessing
/// the same input always targets the same output.
pub fn output_path(folder: &Path, input: &Path) -> Result<PathBuf> {
    let name = input.file_name().ok_or_else(|| {
        SchnittwerkError::Pdf(format!("input path has no file name: {}", input.display()))
    })?;
    Ok(folder.join(name))
}

/// Run one file through the pipeline.
///
/// The trimmed document is written to the preprocess folder; when the
/// configuration carries a final folder the trimmed file is then compressed
/// into it. Any error belongs to this file alone.
#[instrument(skip(config), fields(input = %input.display()))]
pub async fn process_file(config: &WatchConfig, input: &Path) -> Result<ProcessOutcome> {
    let preprocessed = output_path(&config.preprocess_folder, input)?;

    // lopdf parses and serialises synchronously; keep it off the async worker.
    let owned_input = input.to_path_buf();
    let (bytes, pages_in, pages_kept) = tokio::task::spawn_blocking(move || {
        let reader = PdfReader::open(&owned_input)?;
        let pages_in = reader.page_count();
        let bytes = reader.trim()?;
        Ok::<_, SchnittwerkError>((bytes, pages_in, pages_in.saturating_sub(2)))
    })
    .await
    .map_err(|e| SchnittwerkError::Pdf(format!("trim task join: {e}")))??;

    std::fs::write(&preprocessed, &bytes)?;
    info!(
        pages_in,
        pages_kept,
        output = %preprocessed.display(),
        "trimmed PDF written"
    );

    let compressed = match &config.final_folder {
        Some(final_folder) => {
            let target = output_path(final_folder, &preprocessed)?;
            compress::compress_file(&preprocessed, &target, config.compress_timeout()).await?;
            Some(target)
        }
        None => None,
    };

    Ok(ProcessOutcome {
        input: input.to_path_buf(),
        preprocessed,
        compressed,
        pages_in,
        pages_kept,
    })
}
