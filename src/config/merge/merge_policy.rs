//! Merge rules: defaults, override order, conflict handling.
//!
//! Later sources override earlier ones key by key: defaults, then the config
//! file, then `DIRECT_STORE__*` environment variables.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("cache.enabled", true)?
        .set_default("cache.sweep_interval", 64)?
        .set_default("logging.level", "warn")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")
}
