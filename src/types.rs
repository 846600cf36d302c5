//! Core types shared by the rename and manifest stages.

use std::collections::BTreeMap;

/// Fingerprint: 32 lowercase hex characters derived from file content
pub type Fingerprint = String;

/// Manifest document: original relative path -> fingerprinted relative path.
///
/// A `BTreeMap` keeps keys sorted, so serialized manifests are deterministic.
pub type Manifest = BTreeMap<String, String>;

/// Length of a fingerprint in hex characters
pub const FINGERPRINT_LEN: usize = 32;

/// Default manifest file name
pub const DEFAULT_MANIFEST_PATH: &str = "rev-manifest.json";

/// Extension that marks a file as a source map
pub const MAP_EXTENSION: &str = ".map";

/// Plugin name reported in stage errors
pub const PLUGIN_NAME: &str = "revmark";
