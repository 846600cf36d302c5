//! Configuration
//!
//! `revmark.toml` in a workspace root, overlaid by `REVMARK__*` environment
//! variables (`__` separates nested keys, e.g. `REVMARK__MANIFEST__MERGE=true`).

pub mod facade;
pub mod sources;

pub use facade::ConfigLoader;

use crate::error::RevError;
use crate::logging::LoggingConfig;
use crate::manifest::FormatKind;
use crate::types::DEFAULT_MANIFEST_PATH;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevConfig {
    #[serde(default)]
    pub manifest: ManifestConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Manifest stage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// Manifest file location (default: rev-manifest.json)
    #[serde(default = "default_manifest_path")]
    pub path: PathBuf,

    /// Merge with an existing manifest instead of replacing it
    #[serde(default)]
    pub merge: bool,

    /// Serialization format: json, yaml, toml
    #[serde(default)]
    pub format: FormatKind,

    /// Directory the manifest path is resolved against; process cwd if unset
    #[serde(default)]
    pub cwd: Option<PathBuf>,

    /// Base of the emitted manifest file; `cwd` if unset
    #[serde(default)]
    pub base: Option<PathBuf>,
}

fn default_manifest_path() -> PathBuf {
    PathBuf::from(DEFAULT_MANIFEST_PATH)
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            path: default_manifest_path(),
            merge: false,
            format: FormatKind::default(),
            cwd: None,
            base: None,
        }
    }
}

impl ManifestConfig {
    pub fn validate(&self) -> Result<(), RevError> {
        if self.path.as_os_str().is_empty() {
            return Err(RevError::ConfigError(
                "manifest.path must not be empty".to_string(),
            ));
        }
        if self.path.file_name().is_none() {
            return Err(RevError::ConfigError(format!(
                "manifest.path {:?} does not name a file",
                self.path
            )));
        }
        Ok(())
    }
}
