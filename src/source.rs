//! Disk source and sink
//!
//! Loads a directory tree into buffered records and writes records back out,
//! so a pipeline can run against real files.

use crate::error::RevError;
use crate::file::{Contents, FileRecord};
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Read every regular file under `base` into a buffered record.
///
/// Records are ordered by path. `cwd` is set to `base`'s parent so relative
/// paths in the records stay meaningful.
pub fn read_tree(base: &Path) -> Result<Vec<FileRecord>, RevError> {
    let cwd = base.parent().map(Path::to_path_buf).unwrap_or_default();
    let mut files = Vec::new();

    for entry in WalkDir::new(base).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(base = %base.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let contents = std::fs::read(entry.path())?;
        files.push(FileRecord::with_contents(
            cwd.clone(),
            base.to_path_buf(),
            entry.path().to_path_buf(),
            contents,
        ));
    }

    debug!(base = %base.display(), count = files.len(), "Loaded source tree");
    Ok(files)
}

/// Write buffered records under `dest`, each at its path relative to its base.
///
/// Null records are skipped; streaming records are rejected.
pub async fn write_files(dest: &Path, files: &[FileRecord]) -> Result<usize, RevError> {
    let mut written = 0;
    for file in files {
        let bytes = match &file.contents {
            Contents::Null => continue,
            Contents::Buffer(bytes) => bytes,
            Contents::Stream(_) => {
                return Err(RevError::StreamingNotSupported {
                    plugin: crate::types::PLUGIN_NAME.to_string(),
                })
            }
        };
        let target = dest.join(file.relative());
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, bytes).await?;
        debug!(path = %target.display(), size = bytes.len(), "Wrote file");
        written += 1;
    }
    Ok(written)
}
