//! Error types for catalog access, file relocation and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Catalog collaborator errors (category tree, product persistence).
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    #[error("persistence failed: {0}")]
    Persistence(String),
}

impl CatalogError {
    pub fn category_not_found(id: u64) -> Self {
        CatalogError::NotFound {
            entity: "category",
            id,
        }
    }

    pub fn product_not_found(id: u64) -> Self {
        CatalogError::NotFound {
            entity: "product",
            id,
        }
    }
}

/// Errors raised while moving a single file inside the media tree.
#[derive(Debug, Error)]
pub enum RelocationError {
    #[error("source file missing: {}", path.display())]
    FileMissing { path: PathBuf },

    #[error("no free name for {name} in {dir} after {attempts} attempts")]
    CollisionExhausted {
        dir: String,
        name: String,
        attempts: u32,
    },

    #[error("invalid file name: {0:?}")]
    InvalidFileName(String),

    #[error("filesystem error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RelocationError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RelocationError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Top-level error for setup surfaces (configuration, logging).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("invalid reconcile action: {0:?} (expected \"move\" or \"remove\")")]
    InvalidAction(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Relocation(#[from] RelocationError),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
