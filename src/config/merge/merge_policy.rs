//! Merge policy: the lowest-precedence layer is the serialized default config.

use crate::config::BrandAssetsConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Start a builder seeded with `BrandAssetsConfig::default()`.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let defaults = Config::try_from(&BrandAssetsConfig::default())?;
    Ok(Config::builder().add_source(defaults))
}
