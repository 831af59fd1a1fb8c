// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Schnittwerk.

use thiserror::Error;

/// Top-level error type for all Schnittwerk operations.
#[derive(Debug, Error)]
pub enum SchnittwerkError {
    // -- Startup errors --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("no Ghostscript executable was found on path ({0})")]
    GhostscriptMissing(String),

    // -- Document errors --
    #[error("PDF operation failed: {0}")]
    Pdf(String),

    // -- Pipeline errors --
    #[error("filesystem watch failed: {0}")]
    Watch(String),

    #[error("compression failed: {0}")]
    Compression(String),

    #[error("compression of {path} timed out after {secs}s")]
    CompressionTimeout { path: String, secs: u64 },

    // -- Std conversions --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SchnittwerkError {
    /// Whether this error should abort the process.
    ///
    /// Startup errors (bad configuration, missing Ghostscript) are fatal;
    /// everything else is confined to the file being processed, so the
    /// watcher and reconcile loops log it and move on.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::GhostscriptMissing(_))
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SchnittwerkError>;
