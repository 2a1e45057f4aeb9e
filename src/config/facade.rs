//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::BrandAssetsConfig;
use crate::error::ApiError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from defaults and environment, then validate.
    pub fn load() -> Result<BrandAssetsConfig, ApiError> {
        let config = MergeService::load_defaults()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file, then validate.
    pub fn load_from_file(path: &Path) -> Result<BrandAssetsConfig, ApiError> {
        let config = MergeService::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Create default configuration.
    pub fn default() -> BrandAssetsConfig {
        BrandAssetsConfig::default()
    }
}
