// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ghostscript-based PDF compression.
//
// The trimmed PDF is re-encoded by an external Ghostscript process at reduced
// image resolution ("screen" preset, 144 DPI downsampling).  Ghostscript
// writes into a scratch directory first; the finished file is then moved into
// place so the final path never holds a partial document.

use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info, instrument};

use schnittwerk_core::error::{Result, SchnittwerkError};

/// Ghostscript executable names probed on the search path, in order.
const GS_CANDIDATES: &[&str] = &["gs", "gswin32", "gswin64"];

/// Locate a runnable Ghostscript executable.
///
/// Each candidate is probed by running `<name> --version` and checking its
/// exit status. Fails with an error naming every candidate when none responds.
pub fn ghostscript_path() -> Result<String> {
    for name in GS_CANDIDATES {
        if probe(name) {
            debug!(executable = name, "Ghostscript found");
            return Ok((*name).to_string());
        }
    }
    Err(SchnittwerkError::GhostscriptMissing(GS_CANDIDATES.join("/")))
}

/// Whether `name` resolves to an executable that answers `--version`.
fn probe(name: &str) -> bool {
    std::process::Command::new(name)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Re-encode `input` at reduced image resolution, writing the result to
/// `output`.
///
/// The executable is resolved per invocation; the call is bounded by
/// `timeout`, and expiry kills the child process and fails this file only.
pub async fn compress_file(input: &Path, output: &Path, timeout: Duration) -> Result<()> {
    let gs = ghostscript_path()?;
    run_compression(&gs, input, output, timeout).await
}

#[instrument(skip_all, fields(input = %input.display(), output = %output.display()))]
async fn run_compression(
    gs: &str,
    input: &Path,
    output: &Path,
    timeout: Duration,
) -> Result<()> {
    let scratch = tempfile::tempdir()?;
    let scratch_output = scratch.path().join("output.pdf");

    info!("Started compressing {} to {}", input.display(), output.display());

    let mut command = Command::new(gs);
    command
        .args(gs_args(&scratch_output, input))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let finished = match tokio::time::timeout(timeout, command.output()).await {
        Ok(result) => result
            .map_err(|e| SchnittwerkError::Compression(format!("failed to run {gs}: {e}")))?,
        Err(_) => {
            // kill_on_drop reaps the child when the timed-out future is dropped.
            return Err(SchnittwerkError::CompressionTimeout {
                path: input.display().to_string(),
                secs: timeout.as_secs(),
            });
        }
    };

    if !finished.status.success() {
        return Err(SchnittwerkError::Compression(format!(
            "{gs} exited with {}: {}",
            finished.status,
            String::from_utf8_lossy(&finished.stderr).trim()
        )));
    }

    // fs::rename fails across filesystems; fall back to a copy.  The scratch
    // directory is removed when `scratch` drops.
    if std::fs::rename(&scratch_output, output).is_err() {
        std::fs::copy(&scratch_output, output)?;
    }

    info!("Compressed {} to {}", input.display(), output.display());
    Ok(())
}

/// Fixed Ghostscript argument set: quiet batch mode, pdfwrite device,
/// compatibility level 1.5, "screen" quality preset, embedded subset fonts,
/// and bicubic 144 DPI downsampling for colour, gray, and mono images.
fn gs_args(scratch_output: &Path, input: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-q",
        "-dNOPAUSE",
        "-dBATCH",
        "-dSAFER",
        "-dQUIET",
        "-sDEVICE=pdfwrite",
        "-dCompatibilityLevel=1.5",
        "-dPDFSETTINGS=/screen",
        "-dEmbedAllFonts=true",
        "-dSubsetFonts=true",
        "-dColorImageDownsampleType=/Bicubic",
        "-dColorImageResolution=144",
        "-dGrayImageDownsampleType=/Bicubic",
        "-dGrayImageResolution=144",
        "-dMonoImageDownsampleType=/Bicubic",
        "-dMonoImageResolution=144",
    ]
    .iter()
    .map(|s| OsString::from(*s))
    .collect();

    let mut output_flag = OsString::from("-sOutputFile=");
    output_flag.push(scratch_output.as_os_str());
    args.push(output_flag);
    args.push(input.as_os_str().to_os_string());
    args
}
