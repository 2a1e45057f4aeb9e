//! Catalog domain
//!
//! Categories, products and the assets attached to them, plus the store
//! ports the relocation engine reads and writes through.

pub mod asset;
pub mod category;
pub mod memory;
pub mod product;

pub use asset::{
    Asset, AssetFile, AssetKind, DownloadableLink, DownloadableSample, FileSlot, FileStatus,
    ImageEntry,
};
pub use category::{Category, CategoryStore};
pub use memory::MemoryCatalog;
pub use product::{Product, ProductSnapshot, ProductStore, ProductType};
