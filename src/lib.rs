//! Brand Assets: category-driven placement of product asset files
//!
//! Keeps product images, downloadable link files and samples inside a
//! brand's `DigitalAssets` folder while the product belongs to that brand's
//! digital-assets category, and moves them back to the default dispersion
//! directories when it no longer does.

pub mod brand;
pub mod catalog;
pub mod config;
pub mod diff;
pub mod error;
pub mod logging;
pub mod media;
pub mod reconcile;
pub mod types;

pub use brand::{BrandPath, BrandPathResolver, BrandResolution};
pub use config::{BrandAssetsConfig, ConfigLoader};
pub use diff::{AssetDiff, AssetDiffer};
pub use error::{ApiError, CatalogError, RelocationError};
pub use reconcile::{AssetLocationReconciler, DigitalAssetHooks, ReconcileAction, ReconcileReport};
