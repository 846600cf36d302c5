//! Revmark: Content-Fingerprinted Asset Naming
//!
//! Renames files flowing through a build pipeline by prefixing a content
//! fingerprint to each filename, reconciles source maps against their renamed
//! parents, and builds a `rev-manifest.json` mapping original paths to
//! fingerprinted ones.

pub mod config;
pub mod error;
pub mod file;
pub mod fingerprint;
pub mod logging;
pub mod manifest;
pub mod paths;
pub mod pipeline;
pub mod rev;
pub mod source;
pub mod types;

pub use error::{ReadError, RevError};
pub use file::{Contents, FileRecord, Revision};
pub use fingerprint::{fingerprint, fingerprint_contents};
pub use manifest::{
    FileReader, FsReader, JsonFormat, ManifestFormat, ManifestOptions, ManifestStage, TomlFormat,
    YamlFormat,
};
pub use pipeline::{Emitter, Pipeline, Stage};
pub use rev::RevStage;
pub use types::{Fingerprint, Manifest};
