//! Reading an existing manifest from storage.

use crate::error::ReadError;
use crate::file::FileRecord;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Options forwarded to the reader alongside the manifest path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadOptions {
    /// Directory a relative manifest path is resolved against
    pub cwd: PathBuf,
    /// Base of the produced record; defaults to `cwd`
    #[serde(default)]
    pub base: Option<PathBuf>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            base: None,
        }
    }
}

impl ReadOptions {
    /// Resolved base directory
    pub fn base(&self) -> PathBuf {
        match &self.base {
            Some(base) => paths::resolve(&self.cwd, base),
            None => self.cwd.clone(),
        }
    }

    /// Empty record at `path`, used when no manifest exists yet.
    pub fn empty_record(&self, path: &Path) -> FileRecord {
        FileRecord {
            cwd: self.cwd.clone(),
            base: self.base(),
            path: paths::resolve(&self.cwd, path),
            contents: crate::file::Contents::Null,
            revision: None,
        }
    }
}

/// Loads a file into a record.
///
/// Must report a missing file as [`ReadError::NotFound`] so the caller can
/// tell it apart from a real failure.
#[async_trait::async_trait]
pub trait FileReader: Send + Sync {
    async fn read(&self, path: &Path, options: &ReadOptions) -> Result<FileRecord, ReadError>;
}

/// Reads from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

#[async_trait::async_trait]
impl FileReader for FsReader {
    async fn read(&self, path: &Path, options: &ReadOptions) -> Result<FileRecord, ReadError> {
        let resolved = paths::resolve(&options.cwd, path);
        let bytes = tokio::fs::read(&resolved)
            .await
            .map_err(|e| ReadError::from_io(resolved.clone(), e))?;
        debug!(path = %resolved.display(), size = bytes.len(), "Read existing file");
        Ok(FileRecord::with_contents(
            options.cwd.clone(),
            options.base(),
            resolved,
            bytes,
        ))
    }
}
