// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// schnittwerk-pipeline — Folder watching, startup reconciliation, and the
// per-file trim/compress pipeline.  This crate bridges between the core
// configuration types defined in `schnittwerk-core` and the filesystem.

pub mod compress;
pub mod events;
pub mod process;
pub mod reconcile;
pub mod watcher;

pub use events::FsEvent;
pub use reconcile::reconcile;
pub use watcher::FolderWatcher;

#[cfg(test)]
mod testutil;
