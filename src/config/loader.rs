//! Configuration loading: merge-policy defaults, then a config file, then
//! environment overrides.

use super::merge::merge_policy;
use super::sources::{environment, explicit_file, global_file};
use super::FacadeConfig;
use crate::error::FacadeError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads [`FacadeConfig`] from layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, the global config file if present, then environment.
    pub fn load() -> Result<FacadeConfig, FacadeError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = environment::add_to_builder(builder);
        Self::finish(builder.build()?.try_deserialize()?)
    }

    /// Defaults, the given file (must exist), then environment.
    pub fn load_from_file(path: &Path) -> Result<FacadeConfig, FacadeError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = explicit_file::add_to_builder(builder, path)?;
        let builder = environment::add_to_builder(builder);
        debug!(config_path = %path.display(), "Loading configuration file");
        Self::finish(builder.build()?.try_deserialize()?)
    }

    /// Path of the global config file, when one can be derived.
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    fn finish(config: FacadeConfig) -> Result<FacadeConfig, FacadeError> {
        config.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            FacadeError::ConfigError(messages.join("; "))
        })?;
        Ok(config)
    }
}
