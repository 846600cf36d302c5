//! ConfigLoader: composes sources and deserializes to [`RevConfig`].

use super::sources;
use super::RevConfig;
use crate::error::RevError;
use config::Config;
use std::path::Path;
use tracing::debug;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    /// Precedence: defaults (lowest) -> workspace `revmark.toml` -> environment (highest).
    pub fn load(workspace_root: &Path) -> Result<RevConfig, RevError> {
        let builder = Config::builder();
        let builder = sources::add_workspace_file(builder, workspace_root)?;
        let builder = sources::add_environment(builder)?;
        Self::finish(builder.build()?)
    }

    /// Load configuration from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<RevConfig, RevError> {
        let builder = Config::builder();
        let builder = sources::add_file(builder, path)?;
        let builder = sources::add_environment(builder)?;
        Self::finish(builder.build()?)
    }

    fn finish(config: Config) -> Result<RevConfig, RevError> {
        let config: RevConfig = config.try_deserialize()?;
        config.manifest.validate()?;
        debug!(
            manifest = %config.manifest.path.display(),
            merge = config.manifest.merge,
            "Loaded configuration"
        );
        Ok(config)
    }
}
