//! Products, their pre-save snapshot and the product store port.

use crate::catalog::asset::{Asset, AssetFile, DownloadableLink, DownloadableSample, ImageEntry};
use crate::error::CatalogError;
use crate::types::{AssetId, CategoryId, ProductId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Product type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    #[default]
    Simple,
    Virtual,
    Downloadable,
    Configurable,
    Bundle,
    Grouped,
}

/// State of a product as last persisted.
///
/// Brand transitions are detected against `category_ids`; link and sample
/// diffs are computed against the asset collections.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductSnapshot {
    #[serde(default)]
    pub category_ids: Vec<CategoryId>,
    #[serde(default)]
    pub type_id: ProductType,
    #[serde(default)]
    pub links: Vec<DownloadableLink>,
    #[serde(default)]
    pub samples: Vec<DownloadableSample>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub type_id: ProductType,
    #[serde(default)]
    pub category_ids: Vec<CategoryId>,
    #[serde(default)]
    pub images: Vec<ImageEntry>,
    #[serde(default)]
    pub links: Vec<DownloadableLink>,
    #[serde(default)]
    pub samples: Vec<DownloadableSample>,
    /// Media attribute code -> image path (`image`, `small_image`, ...)
    #[serde(default)]
    pub media_attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub original: ProductSnapshot,

    /// Set while the engine itself saves the product so that save hooks
    /// do not reconcile it a second time.
    #[serde(skip)]
    assets_modified: bool,
}

impl Product {
    pub fn new(id: ProductId, sku: impl Into<String>, type_id: ProductType) -> Self {
        Self {
            id,
            sku: sku.into(),
            type_id,
            ..Self::default()
        }
    }

    pub fn with_categories(mut self, category_ids: &[CategoryId]) -> Self {
        self.category_ids = category_ids.to_vec();
        self
    }

    pub fn with_image(mut self, image: ImageEntry) -> Self {
        self.images.push(image);
        self
    }

    pub fn with_link(mut self, link: DownloadableLink) -> Self {
        self.links.push(link);
        self
    }

    pub fn with_sample(mut self, sample: DownloadableSample) -> Self {
        self.samples.push(sample);
        self
    }

    /// Treat the current state as the persisted one.
    pub fn persisted(mut self) -> Self {
        self.mark_persisted();
        self
    }

    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            category_ids: self.category_ids.clone(),
            type_id: self.type_id,
            links: self.links.clone(),
            samples: self.samples.clone(),
        }
    }

    pub fn mark_persisted(&mut self) {
        self.original = self.snapshot();
    }

    pub fn is_downloadable(&self) -> bool {
        self.type_id == ProductType::Downloadable
    }

    /// Type changed away from downloadable since the snapshot.
    pub fn left_downloadable(&self) -> bool {
        self.original.type_id == ProductType::Downloadable && !self.is_downloadable()
    }

    pub fn assets_modified(&self) -> bool {
        self.assets_modified
    }

    pub(crate) fn set_assets_modified(&mut self, modified: bool) {
        self.assets_modified = modified;
    }

    pub fn image(&self, id: AssetId) -> Option<&ImageEntry> {
        self.images.iter().find(|image| image.id == Some(id))
    }

    pub fn link(&self, id: AssetId) -> Option<&DownloadableLink> {
        self.links.iter().find(|link| link.id == Some(id))
    }

    pub fn sample(&self, id: AssetId) -> Option<&DownloadableSample> {
        self.samples.iter().find(|sample| sample.id == Some(id))
    }

    /// Close a save cycle: clear the reentrancy marker and every transient
    /// per-file flag, then adopt the current state as persisted.
    pub fn finish_save_cycle(&mut self) {
        self.assets_modified = false;
        for file in self.files_mut() {
            file.reset_transient();
        }
        self.mark_persisted();
    }

    fn files_mut(&mut self) -> impl Iterator<Item = &mut AssetFile> {
        let images = self.images.iter_mut().filter_map(|image| image.file.as_mut());
        let links = self
            .links
            .iter_mut()
            .flat_map(|link| link.link_file.as_mut().into_iter().chain(link.sample_file.as_mut()));
        let samples = self
            .samples
            .iter_mut()
            .filter_map(|sample| sample.sample_file.as_mut());
        images.chain(links).chain(samples)
    }

    /// Number of file references across all asset collections.
    pub fn file_count(&self) -> usize {
        self.images.iter().map(|i| i.files().len()).sum::<usize>()
            + self.links.iter().map(|l| l.files().len()).sum::<usize>()
            + self.samples.iter().map(|s| s.files().len()).sum::<usize>()
    }
}

/// Product store port.
pub trait ProductStore: Send + Sync {
    fn get_by_id(&self, id: ProductId) -> Result<Product, CatalogError>;

    /// Persist the product. Implementations may run their own save hooks;
    /// those see `assets_modified() == true` when the engine is the caller.
    fn save(&self, product: &Product) -> Result<(), CatalogError>;

    /// Rewrite the stored path of one gallery entry.
    fn update_gallery_path(&self, entry_id: AssetId, path: &str) -> Result<(), CatalogError>;
}
