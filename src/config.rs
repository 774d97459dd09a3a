//! Configuration System
//!
//! Settings for the facade layer and the `direct-store` binary: context
//! cache behavior and logging. Hierarchical: merge-policy defaults, then a
//! config file, then `DIRECT_STORE__*` environment overrides.

use crate::cache::CacheConfig;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

mod loader;
mod merge {
    pub(crate) mod merge_policy;
}
mod sources {
    pub(crate) mod environment;
    pub(crate) mod explicit_file;
    pub(crate) mod global_file;
}

pub use loader::ConfigLoader;
pub use sources::environment::{ENV_PREFIX, ENV_SEPARATOR};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacadeConfig {
    /// Context cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl FacadeConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
