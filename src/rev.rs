//! Fingerprint-and-Rename Stage
//!
//! Renames every buffered file to `<fingerprint>-<name>` as it arrives and
//! records `old path -> fingerprint`. Source maps are held back until the
//! input is exhausted, then renamed with their parent's fingerprint so that
//! `app.js.map` follows `app.js` even when the map arrived first.

use crate::error::RevError;
use crate::file::{FileRecord, Revision};
use crate::fingerprint::fingerprint_contents;
use crate::paths;
use crate::pipeline::{Emitter, Stage};
use crate::types::{Fingerprint, MAP_EXTENSION, PLUGIN_NAME};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// The `file` field of a source map, naming the file it describes
#[derive(Debug, Deserialize)]
struct SourceMapHeader {
    file: Option<String>,
}

/// Rename stage. Create one per pipeline run.
#[derive(Debug, Default)]
pub struct RevStage {
    /// Original path -> fingerprint, for every non-map file renamed so far
    path_map: HashMap<PathBuf, Fingerprint>,
    /// Source maps awaiting end of input, in arrival order
    deferred_maps: Vec<FileRecord>,
}

impl RevStage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fingerprint recorded for an original path, if it has been renamed.
    pub fn fingerprint_for(&self, original_path: &Path) -> Option<&Fingerprint> {
        self.path_map.get(original_path)
    }

    /// Number of source maps waiting for the end of input
    pub fn pending_maps(&self) -> usize {
        self.deferred_maps.len()
    }

    /// Resolve every deferred map and push it to `out`, in arrival order.
    fn reconcile_maps(&mut self, out: &mut Emitter) -> Result<(), RevError> {
        let maps = std::mem::take(&mut self.deferred_maps);
        for mut map in maps {
            let parent = parent_filename(&map);
            match self.lookup_parent(&parent) {
                Some(fingerprint) => {
                    let mut renamed =
                        paths::rev_path(&paths::strip_map_suffix(&map.path), &fingerprint)?
                            .into_os_string();
                    renamed.push(MAP_EXTENSION);
                    let renamed = PathBuf::from(renamed);

                    debug!(
                        from = %map.path.display(),
                        to = %renamed.display(),
                        parent = %parent.display(),
                        "Source map follows parent fingerprint"
                    );
                    map.revision = Some(Revision {
                        original_path: std::mem::replace(&mut map.path, renamed),
                        original_base: map.base.clone(),
                        fingerprint,
                    });
                }
                None => {
                    warn!(
                        path = %map.path.display(),
                        parent = %parent.display(),
                        "Source map parent was not renamed, fingerprinting map contents"
                    );
                    revision_file(&mut map)?;
                }
            }
            out.push(map);
        }
        Ok(())
    }

    /// Look the parent up exactly as written. No directory joining is done,
    /// so a relative `file` only matches a relative original path.
    fn lookup_parent(&self, parent: &Path) -> Option<Fingerprint> {
        self.path_map.get(parent).cloned()
    }
}

/// Name of the file a source map describes.
///
/// Taken from the map's `file` field. When the contents are not JSON or lack
/// the field, it is the map's own name minus `.map`, expressed relative to the
/// map's directory (both resolved against `cwd`).
fn parent_filename(map: &FileRecord) -> PathBuf {
    let declared = map
        .contents
        .as_bytes()
        .and_then(|bytes| match serde_json::from_slice::<SourceMapHeader>(bytes) {
            Ok(header) => header.file,
            Err(e) => {
                debug!(path = %map.path.display(), error = %e, "Source map is not valid JSON");
                None
            }
        })
        .filter(|file| !file.is_empty());

    if let Some(file) = declared {
        return PathBuf::from(file);
    }

    let dir = map.path.parent().unwrap_or_else(|| Path::new(""));
    let stem = paths::basename_without(&map.path, MAP_EXTENSION);
    paths::lexical_relative(
        &paths::resolve(&map.cwd, dir),
        &paths::resolve(&map.cwd, Path::new(&stem)),
    )
}

/// Fingerprint a buffered file and rename it in place, recording provenance.
///
/// Returns the fingerprint. Callers have already rejected null and stream
/// contents.
pub fn revision_file(file: &mut FileRecord) -> Result<Fingerprint, RevError> {
    let fingerprint = fingerprint_contents(&file.contents)?;
    let renamed = paths::rev_filename(&file.path, &fingerprint)?;

    debug!(
        from = %file.path.display(),
        to = %renamed.display(),
        %fingerprint,
        "Renamed file"
    );
    file.revision = Some(Revision {
        original_path: std::mem::replace(&mut file.path, renamed),
        original_base: file.base.clone(),
        fingerprint: fingerprint.clone(),
    });
    Ok(fingerprint)
}

#[async_trait::async_trait]
impl Stage for RevStage {
    fn name(&self) -> &str {
        "rev"
    }

    fn transform(&mut self, mut file: FileRecord, out: &mut Emitter) -> Result<(), RevError> {
        if file.is_null() {
            out.push(file);
            return Ok(());
        }

        if file.is_stream() {
            return Err(RevError::StreamingNotSupported {
                plugin: PLUGIN_NAME.to_string(),
            });
        }

        if paths::is_map_file(&file.path) {
            debug!(path = %file.path.display(), "Deferring source map");
            self.deferred_maps.push(file);
            return Ok(());
        }

        let old_path = file.path.clone();
        let fingerprint = revision_file(&mut file)?;
        self.path_map.insert(old_path, fingerprint);
        out.push(file);
        Ok(())
    }

    async fn flush(&mut self, out: &mut Emitter) -> Result<(), RevError> {
        let maps = self.deferred_maps.len();
        self.reconcile_maps(out)?;
        info!(
            renamed = self.path_map.len(),
            source_maps = maps,
            "Fingerprinting complete"
        );
        self.path_map.clear();
        Ok(())
    }
}
