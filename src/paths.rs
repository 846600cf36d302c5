//! Path utilities
//!
//! Filename rewriting and slash-normalized relative paths shared by the
//! rename and manifest stages. All operations are lexical: nothing here
//! touches the filesystem.

use crate::error::RevError;
use crate::types::MAP_EXTENSION;
use std::path::{Component, Path, PathBuf};

/// Replace backslashes with forward slashes.
pub fn to_slash(path: &str) -> String {
    path.replace('\\', "/")
}

/// Split a filename into `(stem, extension)` at the last dot.
///
/// A leading dot does not start an extension, so `.env` has no extension.
pub fn split_extension(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(idx) if idx > 0 => filename.split_at(idx),
        _ => (filename, ""),
    }
}

/// Extension of the final path segment, including the dot, or `""`.
pub fn extname(path: &Path) -> &str {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| split_extension(name).1)
        .unwrap_or("")
}

/// True when the path's extension is exactly `.map`.
pub fn is_map_file(path: &Path) -> bool {
    extname(path) == MAP_EXTENSION
}

/// Final path segment with `suffix` removed when it ends with it.
///
/// The suffix is kept when it is the whole name.
pub fn basename_without(path: &Path, suffix: &str) -> String {
    let name = file_name_str(path).unwrap_or_default();
    match name.strip_suffix(suffix) {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => name.to_string(),
    }
}

/// Remove a trailing `.map` from the final path segment.
pub fn strip_map_suffix(path: &Path) -> PathBuf {
    match file_name_str(path).and_then(|name| name.strip_suffix(MAP_EXTENSION)) {
        Some(stripped) => path.with_file_name(stripped),
        None => path.to_path_buf(),
    }
}

fn file_name_str(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}

/// Rewrite the filename of `path` with `rewrite(stem, extension)`.
///
/// The directory portion is preserved unchanged.
pub fn modify_filename<F>(path: &Path, rewrite: F) -> Result<PathBuf, RevError>
where
    F: FnOnce(&str, &str) -> Result<String, RevError>,
{
    let name = path
        .file_name()
        .ok_or_else(|| RevError::MissingArgument(format!("{:?} has no file name", path)))?
        .to_str()
        .ok_or_else(|| RevError::InvalidInput(format!("{:?} is not valid UTF-8", path)))?;
    let (stem, ext) = split_extension(name);
    let renamed = rewrite(stem, ext)?;
    Ok(path.with_file_name(renamed))
}

/// Prefix `fingerprint` to the filename of `path`: `dir/stem.ext` -> `dir/<fp>-stem.ext`.
pub fn rev_path(path: &Path, fingerprint: &str) -> Result<PathBuf, RevError> {
    if path.as_os_str().is_empty() || fingerprint.is_empty() {
        return Err(RevError::MissingArgument(
            "`path` and `fingerprint` required".to_string(),
        ));
    }
    modify_filename(path, |stem, ext| Ok(format!("{}-{}{}", fingerprint, stem, ext)))
}

/// Fingerprint a filename while keeping compound suffixes such as `.min.js` intact.
///
/// The final extension is split off first; the remaining stem is split again at
/// its own last dot, only the part before that dot is rewritten, and both
/// suffixes are re-appended unchanged.
pub fn rev_filename(path: &Path, fingerprint: &str) -> Result<PathBuf, RevError> {
    if fingerprint.is_empty() {
        return Err(RevError::MissingArgument(
            "`path` and `fingerprint` required".to_string(),
        ));
    }
    // Prefix the string directly: a head like `.` (from `...js`) has no file name.
    modify_filename(path, |filename, extension| {
        let (head, suffix) = match filename.rfind('.') {
            Some(idx) if idx > 0 => filename.split_at(idx),
            _ => (filename, ""),
        };
        Ok(format!("{}-{}{}{}", fingerprint, head, suffix, extension))
    })
}

/// Path of `file_path` relative to `base`, forward-slashed.
///
/// A path outside `base` is returned as-is (slash-normalized); a single
/// leading separator left after stripping the base is dropped.
pub fn rel_path(base: &str, file_path: &str) -> String {
    let file_path = to_slash(file_path);
    let base = to_slash(base);

    match file_path.strip_prefix(base.as_str()) {
        Some(rest) => rest.strip_prefix('/').unwrap_or(rest).to_string(),
        None => file_path,
    }
}

/// Lexically normalize a path, folding `.` and `..` components.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_)));
                if popped {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Resolve `path` against `cwd` unless it is already absolute, then normalize.
pub fn resolve(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&cwd.join(path))
    }
}

/// Relative path from directory `from` to `to`, both already resolved.
///
/// Returns an empty path when they are equal.
pub fn lexical_relative(from: &Path, to: &Path) -> PathBuf {
    let from: Vec<Component> = from.components().collect();
    let to: Vec<Component> = to.components().collect();
    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = PathBuf::new();
    for _ in common..from.len() {
        out.push("..");
    }
    for component in &to[common..] {
        out.push(component.as_os_str());
    }
    out
}
