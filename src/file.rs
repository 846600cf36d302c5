//! File Records
//!
//! The in-memory file object that flows through a pipeline: a path, the base
//! directory it is relative to, its contents, and the rename provenance the
//! rename stage attaches.

use crate::paths;
use crate::types::Fingerprint;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncRead;

/// File contents
pub enum Contents {
    /// No contents (directories, or files read without their data)
    Null,
    /// Fully buffered bytes
    Buffer(Vec<u8>),
    /// Unbuffered stream; rejected by the rename stage
    Stream(Box<dyn AsyncRead + Send + Unpin>),
}

impl fmt::Debug for Contents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contents::Null => f.write_str("Null"),
            Contents::Buffer(bytes) => write!(f, "Buffer({} bytes)", bytes.len()),
            Contents::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl Contents {
    pub fn is_null(&self) -> bool {
        matches!(self, Contents::Null)
    }

    pub fn is_buffer(&self) -> bool {
        matches!(self, Contents::Buffer(_))
    }

    pub fn is_stream(&self) -> bool {
        matches!(self, Contents::Stream(_))
    }

    /// Buffered bytes, if any
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Contents::Buffer(bytes) => Some(bytes),
            _ => None,
        }
    }
}

/// Rename provenance recorded when a file is fingerprinted.
///
/// Either all three fields are present on a record or none are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    /// Path before the rename
    pub original_path: PathBuf,
    /// Base before the rename
    pub original_base: PathBuf,
    /// Fingerprint embedded in the new name
    pub fingerprint: Fingerprint,
}

/// A file travelling through the pipeline
#[derive(Debug)]
pub struct FileRecord {
    /// Working directory relative paths are resolved against
    pub cwd: PathBuf,
    /// Base directory; manifest paths are computed relative to it
    pub base: PathBuf,
    pub path: PathBuf,
    pub contents: Contents,
    /// Set by the rename stage, `None` for files it did not rename
    pub revision: Option<Revision>,
}

impl FileRecord {
    /// Create a record with null contents. `cwd` and `base` default to the
    /// path's parent directory.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        FileRecord {
            cwd: dir.clone(),
            base: dir,
            path,
            contents: Contents::Null,
            revision: None,
        }
    }

    /// Create a record with buffered contents.
    pub fn with_contents(
        cwd: impl Into<PathBuf>,
        base: impl Into<PathBuf>,
        path: impl Into<PathBuf>,
        contents: impl Into<Vec<u8>>,
    ) -> Self {
        FileRecord {
            cwd: cwd.into(),
            base: base.into(),
            path: path.into(),
            contents: Contents::Buffer(contents.into()),
            revision: None,
        }
    }

    pub fn is_null(&self) -> bool {
        self.contents.is_null()
    }

    pub fn is_stream(&self) -> bool {
        self.contents.is_stream()
    }

    pub fn is_buffer(&self) -> bool {
        self.contents.is_buffer()
    }

    /// True once the rename stage has recorded provenance on this file.
    pub fn is_revisioned(&self) -> bool {
        self.revision.is_some()
    }

    /// Final path segment
    pub fn basename(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Extension of the final path segment, including the dot
    pub fn extname(&self) -> &str {
        paths::extname(&self.path)
    }

    /// Path relative to the resolved base, forward-slashed.
    pub fn relative(&self) -> String {
        let base = paths::resolve(&self.cwd, &self.base);
        let path = paths::resolve(&self.cwd, &self.path);
        paths::rel_path(&base.to_string_lossy(), &path.to_string_lossy())
    }
}
