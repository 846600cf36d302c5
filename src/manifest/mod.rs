//! Manifest-Building Stage
//!
//! Swallows every renamed file and records `original -> fingerprinted`
//! relative paths. At end of input it emits one manifest file, optionally
//! merged over the manifest already on disk, or nothing when no file was
//! renamed.

pub mod format;
pub mod options;
pub mod reader;

pub use format::{FormatKind, JsonFormat, ManifestFormat, TomlFormat, YamlFormat};
pub use options::ManifestOptions;
pub use reader::{FileReader, FsReader, ReadOptions};

use crate::error::{ReadError, RevError};
use crate::file::{Contents, FileRecord};
use crate::paths;
use crate::pipeline::{Emitter, Stage};
use crate::types::Manifest;
use std::sync::Arc;
use tracing::{debug, info};

const INDENT: &str = "  ";

/// Manifest stage. Create one per pipeline run.
pub struct ManifestStage {
    options: ManifestOptions,
    reader: Arc<dyn FileReader>,
    manifest: Manifest,
}

impl ManifestStage {
    /// Stage reading any existing manifest from the local filesystem.
    pub fn new(options: ManifestOptions) -> Self {
        Self::with_reader(options, Arc::new(FsReader))
    }

    pub fn with_reader(options: ManifestOptions, reader: Arc<dyn FileReader>) -> Self {
        Self {
            options,
            reader,
            manifest: Manifest::new(),
        }
    }

    /// Entries accumulated so far
    pub fn entries(&self) -> &Manifest {
        &self.manifest
    }

    /// Record one renamed file. Files without provenance are ignored.
    pub fn record(&mut self, file: &FileRecord) {
        let Some(revision) = &file.revision else {
            return;
        };
        if file.path.as_os_str().is_empty() {
            return;
        }

        let revisioned = file.relative();
        let original_name = revision
            .original_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let original = match revisioned.rfind('/') {
            Some(idx) => format!("{}/{}", &revisioned[..idx], original_name),
            None => original_name,
        };
        let original = paths::to_slash(&original);

        debug!(%original, %revisioned, "Manifest entry");
        self.manifest.insert(original, revisioned);
    }

    /// Load the manifest target: the existing file, or an empty record when
    /// there is none.
    async fn load_target(&self) -> Result<FileRecord, RevError> {
        match self.reader.read(&self.options.path, &self.options.read).await {
            Ok(file) => Ok(file),
            Err(ReadError::NotFound(path)) => {
                debug!(path = %path.display(), "No existing manifest");
                Ok(self.options.read.empty_record(&self.options.path))
            }
            Err(ReadError::Io { path, source }) => Err(RevError::ManifestRead { path, source }),
        }
    }

    /// Parse an existing manifest; unreadable documents count as empty.
    fn existing_entries(&self, target: &FileRecord) -> Manifest {
        let Some(bytes) = target.contents.as_bytes() else {
            return Manifest::new();
        };
        match self.options.format.parse(&String::from_utf8_lossy(bytes)) {
            Ok(existing) => existing,
            Err(e) => {
                debug!(
                    path = %target.path.display(),
                    error = %e,
                    "Existing manifest is malformed, ignoring it"
                );
                Manifest::new()
            }
        }
    }
}

#[async_trait::async_trait]
impl Stage for ManifestStage {
    fn name(&self) -> &str {
        "manifest"
    }

    fn transform(&mut self, file: FileRecord, _out: &mut Emitter) -> Result<(), RevError> {
        self.record(&file);
        Ok(())
    }

    async fn flush(&mut self, out: &mut Emitter) -> Result<(), RevError> {
        if self.manifest.is_empty() {
            info!(path = %self.options.path.display(), "Nothing renamed, skipping manifest");
            return Ok(());
        }

        let mut target = self.load_target().await?;
        let fresh = std::mem::take(&mut self.manifest);

        let manifest = if self.options.merge && !target.is_null() {
            let mut merged = self.existing_entries(&target);
            let existing = merged.len();
            merged.extend(fresh);
            debug!(existing, total = merged.len(), "Merged with existing manifest");
            merged
        } else {
            fresh
        };

        let text = self.options.format.stringify(&manifest, INDENT)?;
        target.contents = Contents::Buffer(text.into_bytes());
        target.revision = None;

        info!(
            path = %target.path.display(),
            entries = manifest.len(),
            "Emitting manifest"
        );
        out.push(target);
        Ok(())
    }
}
