// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Classified filesystem events.
//
// The raw backend event carries a kind and a list of affected paths; it is
// mapped here onto one tagged variant per path so the watcher can match on
// the kind and delegate only on `Created`.

use std::path::PathBuf;

/// A filesystem event after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsEvent {
    /// A file or directory was created.
    Created(PathBuf),
    /// A file or directory was modified (content, metadata, or name).
    Modified(PathBuf),
    /// A file or directory was removed.
    Removed(PathBuf),
    /// Anything else the backend reports (access, unclassified).
    Other(PathBuf),
}

/// Map a raw backend event onto classified events, one per affected path.
pub fn classify(event: notify::Event) -> Vec<FsEvent> {
    let wrap: fn(PathBuf) -> FsEvent = match event.kind {
        notify::EventKind::Create(_) => FsEvent::Created,
        notify::EventKind::Modify(_) => FsEvent::Modified,
        notify::EventKind::Remove(_) => FsEvent::Removed,
        _ => FsEvent::Other,
    };
    event.paths.into_iter().map(wrap).collect()
}
