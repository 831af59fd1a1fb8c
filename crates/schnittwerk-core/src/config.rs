// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchnittwerkError};

/// Fixed relative path of the configuration file.
pub const CONFIG_FILE: &str = "schnittwerk.json";

/// Default Ghostscript invocation deadline, in seconds.
const DEFAULT_COMPRESS_TIMEOUT_SECS: u64 = 120;

/// Runtime settings for the folder-watching pipeline.
///
/// Loaded once at process start and passed by reference into every component;
/// immutable for the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Directory monitored for newly arriving PDF files.
    pub workload_folder: PathBuf,
    /// Directory receiving trimmed PDFs.
    pub preprocess_folder: PathBuf,
    /// Directory receiving compressed PDFs. Compression is skipped when unset.
    #[serde(default)]
    pub final_folder: Option<PathBuf>,
    /// Deadline for a single Ghostscript invocation, in seconds.
    #[serde(default = "default_compress_timeout_secs")]
    pub compress_timeout_secs: u64,
}

fn default_compress_timeout_secs() -> u64 {
    DEFAULT_COMPRESS_TIMEOUT_SECS
}

impl WatchConfig {
    /// Load the configuration from [`CONFIG_FILE`] in the working directory.
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load the configuration from an explicit path.
    ///
    /// Fails if the file is absent, is not valid JSON, or is missing a
    /// required key (serde reports the missing field by name). On success the
    /// output folders are created if they do not exist yet.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SchnittwerkError::Config(format!("cannot read {}: {e}", path.display()))
        })?;

        let config: Self = serde_json::from_str(&raw).map_err(|e| {
            SchnittwerkError::Config(format!("cannot parse {}: {e}", path.display()))
        })?;

        config.ensure_output_folders()?;
        Ok(config)
    }

    /// Create the preprocess folder (and the final folder, when configured).
    ///
    /// Runs eagerly at load time so the pipeline never writes into a missing
    /// directory.
    pub fn ensure_output_folders(&self) -> Result<()> {
        std::fs::create_dir_all(&self.preprocess_folder)?;
        if let Some(final_folder) = &self.final_folder {
            std::fs::create_dir_all(final_folder)?;
        }
        Ok(())
    }

    /// Whether the compression step is enabled.
    pub fn compression_enabled(&self) -> bool {
        self.final_folder.is_some()
    }

    /// Ghostscript deadline as a [`Duration`].
    pub fn compress_timeout(&self) -> Duration {
        Duration::from_secs(self.compress_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config_parses() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("schnittwerk.json");
        std::fs::write(
            &path,
            format!(
                r#"{{
                    "workload_folder": "{0}/workload",
                    "preprocess_folder": "{0}/preprocess",
                    "final_folder": "{0}/final",
                    "compress_timeout_secs": 30
                }}"#,
                dir.path().display()
            ),
        )
        .expect("write config");

        let config = WatchConfig::load_from(&path).expect("load");
        assert!(config.compression_enabled());
        assert_eq!(config.compress_timeout(), Duration::from_secs(30));
        // Output folders are created at load time.
        assert!(config.preprocess_folder.is_dir());
        assert!(config.final_folder.as_ref().expect("final").is_dir());
    }

    #[test]
    fn final_folder_and_timeout_are_optional() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("schnittwerk.json");
        std::fs::write(
            &path,
            format!(
                r#"{{
                    "workload_folder": "{0}/workload",
                    "preprocess_folder": "{0}/preprocess"
                }}"#,
                dir.path().display()
            ),
        )
        .expect("write config");

        let config = WatchConfig::load_from(&path).expect("load");
        assert!(!config.compression_enabled());
        assert_eq!(config.compress_timeout_secs, 120);
    }

    #[test]
    fn missing_required_key_is_fatal_and_named() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("schnittwerk.json");
        std::fs::write(&path, r#"{"preprocess_folder": "out"}"#).expect("write config");

        let err = WatchConfig::load_from(&path).expect_err("must fail");
        assert!(err.is_fatal());
        assert!(err.to_string().contains("workload_folder"));
    }

    #[test]
    fn malformed_json_is_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("schnittwerk.json");
        std::fs::write(&path, "workload_folder: not json").expect("write config");

        let err = WatchConfig::load_from(&path).expect_err("must fail");
        assert!(err.is_fatal());
    }

    #[test]
    fn absent_file_is_fatal() {
        let err = WatchConfig::load_from("/nonexistent/schnittwerk.json").expect_err("must fail");
        assert!(err.is_fatal());
    }
}
