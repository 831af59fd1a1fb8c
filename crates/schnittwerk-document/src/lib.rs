// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// schnittwerk-document — PDF processing for the Schnittwerk preprocessor.
//
// Provides the page-trim transform: open an existing PDF and produce a new
// document containing every page except the first and the last.

pub mod pdf;

// Re-export the primary struct so callers can use `schnittwerk_document::PdfReader`.
pub use pdf::reader::PdfReader;
