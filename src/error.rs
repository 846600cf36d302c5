//! Error types for fingerprinting, renaming, and manifest emission.

use std::path::PathBuf;

/// Errors surfaced by the rename and manifest stages.
#[derive(Debug, thiserror::Error)]
pub enum RevError {
    /// A file arrived with unbuffered streaming content.
    #[error("{plugin}: Streaming not supported")]
    StreamingNotSupported { plugin: String },

    /// Fingerprinting was asked to hash something that is not buffered content.
    #[error("Invalid fingerprint input: {0}")]
    InvalidInput(String),

    /// A required argument was empty or absent.
    #[error("Missing argument: {0}")]
    MissingArgument(String),

    /// Reading a pre-existing manifest failed for a reason other than not-found.
    #[error("Failed to read manifest {path:?}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration could not be loaded or was invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for RevError {
    fn from(err: config::ConfigError) -> Self {
        RevError::ConfigError(err.to_string())
    }
}

/// Errors from the file-read collaborator.
///
/// `NotFound` is distinguished so callers can substitute an empty record.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("File not found: {0:?}")]
    NotFound(PathBuf),

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReadError {
    /// Classify an io error raised while reading `path`.
    pub fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            ReadError::NotFound(path)
        } else {
            ReadError::Io { path, source }
        }
    }
}
