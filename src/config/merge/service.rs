//! MergeService: orchestrates sources, applies merge policy, deserializes to BrandAssetsConfig.

use crate::config::sources::{environment, file};
use crate::config::BrandAssetsConfig;
use config::ConfigError;
use std::path::Path;

use super::merge_policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config from defaults and environment only.
    pub fn load_defaults() -> Result<BrandAssetsConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load config from a specific file with environment overlay.
    /// Precedence: defaults (lowest) -> file -> environment (highest).
    pub fn load_from_file(path: &Path) -> Result<BrandAssetsConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = file::add_to_builder(builder, path)?;
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }
}
