//! Configuration
//!
//! Layered configuration for the asset relocation engine: built-in defaults,
//! an optional TOML file, then `BRAND_ASSETS__*` environment overrides.

pub mod facade;
pub mod media_paths;
pub mod merge;
pub mod sources;

pub use facade::ConfigLoader;
pub use media_paths::MediaConfig;

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// How the brand resolver treats a product whose categories resolve to
/// more than one distinct brand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Keep the first brand in category order and log the conflict.
    FirstMatch,
    /// Treat the product as having no brand.
    Reject,
}

impl Default for ConflictPolicy {
    fn default() -> Self {
        ConflictPolicy::FirstMatch
    }
}

fn default_folder_name() -> String {
    "DigitalAssets".to_string()
}

fn default_category_pattern() -> String {
    "digital assets".to_string()
}

fn default_brand_level() -> u32 {
    3
}

fn default_max_ancestry_depth() -> u32 {
    32
}

/// Brand detection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandConfig {
    /// Folder appended under the brand directory
    #[serde(default = "default_folder_name")]
    pub folder_name: String,

    /// Category name pattern; whitespace between words matches any single whitespace character
    #[serde(default = "default_category_pattern")]
    pub category_pattern: String,

    /// Tree depth at which a category is a brand
    #[serde(default = "default_brand_level")]
    pub brand_level: u32,

    /// Upper bound on parent links followed while looking for the brand
    #[serde(default = "default_max_ancestry_depth")]
    pub max_ancestry_depth: u32,

    #[serde(default)]
    pub conflict_policy: ConflictPolicy,
}

impl Default for BrandConfig {
    fn default() -> Self {
        Self {
            folder_name: default_folder_name(),
            category_pattern: default_category_pattern(),
            brand_level: default_brand_level(),
            max_ancestry_depth: default_max_ancestry_depth(),
            conflict_policy: ConflictPolicy::default(),
        }
    }
}

fn default_temp_suffix() -> String {
    ".tmp".to_string()
}

fn default_max_name_attempts() -> u32 {
    10_000
}

/// File relocation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelocationConfig {
    /// Marker stripped from the end of a file name before the destination is resolved
    #[serde(default = "default_temp_suffix")]
    pub temp_suffix: String,

    /// Upper bound on `<name>_<n>.<ext>` candidates tried per allocation
    #[serde(default = "default_max_name_attempts")]
    pub max_name_attempts: u32,
}

impl Default for RelocationConfig {
    fn default() -> Self {
        Self {
            temp_suffix: default_temp_suffix(),
            max_name_attempts: default_max_name_attempts(),
        }
    }
}

fn default_media_attribute_codes() -> Vec<String> {
    ["image", "small_image", "thumbnail", "swatch_image"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandAssetsConfig {
    #[serde(default)]
    pub media: MediaConfig,

    #[serde(default)]
    pub brand: BrandConfig,

    #[serde(default)]
    pub relocation: RelocationConfig,

    /// Image role codes mirrored onto product media attributes when an entry moves
    #[serde(default = "default_media_attribute_codes")]
    pub media_attribute_codes: Vec<String>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for BrandAssetsConfig {
    fn default() -> Self {
        Self {
            media: MediaConfig::default(),
            brand: BrandConfig::default(),
            relocation: RelocationConfig::default(),
            media_attribute_codes: default_media_attribute_codes(),
            logging: LoggingConfig::default(),
        }
    }
}

impl BrandAssetsConfig {
    /// Reject settings the engine cannot operate with.
    pub fn validate(&self) -> Result<(), ApiError> {
        self.media.validate()?;

        if self.brand.folder_name.trim().is_empty() {
            return Err(ApiError::ConfigError(
                "brand.folder_name cannot be empty".to_string(),
            ));
        }
        if self.brand.folder_name.contains('/') || self.brand.folder_name.contains('\\') {
            return Err(ApiError::ConfigError(format!(
                "brand.folder_name must be a single directory name: {}",
                self.brand.folder_name
            )));
        }
        if self.brand.category_pattern.trim().is_empty() {
            return Err(ApiError::ConfigError(
                "brand.category_pattern cannot be empty".to_string(),
            ));
        }
        if self.brand.brand_level == 0 {
            return Err(ApiError::ConfigError(
                "brand.brand_level must be at least 1".to_string(),
            ));
        }
        if self.brand.max_ancestry_depth == 0 {
            return Err(ApiError::ConfigError(
                "brand.max_ancestry_depth must be at least 1".to_string(),
            ));
        }
        if self.relocation.max_name_attempts == 0 {
            return Err(ApiError::ConfigError(
                "relocation.max_name_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
