//! Manifest stage options.

use super::format::{JsonFormat, ManifestFormat};
use super::reader::ReadOptions;
use crate::config::ManifestConfig;
use crate::types::DEFAULT_MANIFEST_PATH;
use std::path::PathBuf;
use std::sync::Arc;

/// Where the manifest goes and how it is written.
#[derive(Debug, Clone)]
pub struct ManifestOptions {
    /// Manifest location, resolved against `read.cwd` when relative
    pub path: PathBuf,
    /// Union new entries with an existing manifest at `path`
    pub merge: bool,
    pub format: Arc<dyn ManifestFormat>,
    /// Forwarded to the file reader
    pub read: ReadOptions,
}

impl Default for ManifestOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_MANIFEST_PATH),
            merge: false,
            format: Arc::new(JsonFormat),
            read: ReadOptions::default(),
        }
    }
}

impl ManifestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with a different manifest path.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn merge(mut self, merge: bool) -> Self {
        self.merge = merge;
        self
    }

    pub fn format<F: ManifestFormat + 'static>(mut self, format: F) -> Self {
        self.format = Arc::new(format);
        self
    }

    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.read.cwd = cwd.into();
        self
    }

    pub fn base(mut self, base: impl Into<PathBuf>) -> Self {
        self.read.base = Some(base.into());
        self
    }
}

impl From<&ManifestConfig> for ManifestOptions {
    fn from(config: &ManifestConfig) -> Self {
        let mut read = ReadOptions::default();
        if let Some(cwd) = &config.cwd {
            read.cwd = cwd.clone();
        }
        read.base = config.base.clone();

        Self {
            path: config.path.clone(),
            merge: config.merge,
            format: config.format.build(),
            read,
        }
    }
}
