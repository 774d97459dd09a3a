//! Environment source: `DIRECT_STORE__SECTION__KEY=value`.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

pub const ENV_PREFIX: &str = "DIRECT_STORE";
pub const ENV_SEPARATOR: &str = "__";

/// Add environment overrides to builder. Values are parsed, so
/// `DIRECT_STORE__CACHE__ENABLED=false` sets a boolean.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator(ENV_SEPARATOR)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    )
}
