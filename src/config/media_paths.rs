//! MediaConfig and root resolution for the media tree.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_root() -> PathBuf {
    PathBuf::from("pub/media")
}

fn default_image_base() -> String {
    "catalog/product".to_string()
}

fn default_link_base() -> String {
    "downloadable/files/links".to_string()
}

fn default_link_sample_base() -> String {
    "downloadable/files/link_samples".to_string()
}

fn default_sample_base() -> String {
    "downloadable/files/samples".to_string()
}

fn default_cache_dir() -> String {
    "cache".to_string()
}

/// Media tree configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Media directory; every base path below is relative to it
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Gallery images
    #[serde(default = "default_image_base")]
    pub image_base: String,

    /// Downloadable link files
    #[serde(default = "default_link_base")]
    pub link_base: String,

    /// Samples attached to downloadable links
    #[serde(default = "default_link_sample_base")]
    pub link_sample_base: String,

    /// Standalone downloadable samples
    #[serde(default = "default_sample_base")]
    pub sample_base: String,

    /// Directory (under each base) holding generated copies; never relocated
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
}

impl MediaConfig {
    /// Resolve the media root to an absolute path.
    ///
    /// Relative roots are taken against `working_dir`. The directory must exist.
    pub fn resolve_root(&self, working_dir: &Path) -> Result<PathBuf, ApiError> {
        let root = if self.root.is_absolute() {
            self.root.clone()
        } else {
            working_dir.join(&self.root)
        };
        dunce::canonicalize(&root).map_err(|e| {
            ApiError::ConfigError(format!(
                "Failed to resolve media root {}: {}",
                root.display(),
                e
            ))
        })
    }

    pub(crate) fn validate(&self) -> Result<(), ApiError> {
        for (key, value) in [
            ("media.image_base", &self.image_base),
            ("media.link_base", &self.link_base),
            ("media.link_sample_base", &self.link_sample_base),
            ("media.sample_base", &self.sample_base),
        ] {
            if value.trim_matches('/').is_empty() {
                return Err(ApiError::ConfigError(format!("{} cannot be empty", key)));
            }
        }
        Ok(())
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            image_base: default_image_base(),
            link_base: default_link_base(),
            link_sample_base: default_link_sample_base(),
            sample_base: default_sample_base(),
            cache_dir: default_cache_dir(),
        }
    }
}
